//! Unescaping and decoding of the `plugins` payload.
//!
//! The source table stores `plugins` as a JSON document that picked up
//! two layers of escaping on its way in: interior quotes arrive
//! backslash-escaped or doubled, and the whole text is wrapped in one
//! extra pair of quote characters. The chain here undoes exactly that,
//! in a fixed order, and nothing more.

use serde_json::Value;

use boreal_core::CellValue;

use crate::error::LookupError;

/// Sentinel the feed writes when a record carries no plugin document.
///
/// It is republished as the literal string `"NaN"` rather than decoded.
pub const PLUGINS_NAN_SENTINEL: &str = "NaN";

/// Collapse the escape layers of a raw plugins payload.
///
/// Order matters: backslash-escaped quotes first, then a quote-to-quote
/// pass, then doubled quotes, then one character stripped from each end.
/// The middle pass is an identity rewrite kept so the sequence stays
/// step-for-step aligned with the ingest side's escape chain.
pub fn unescape_plugins(raw: &str) -> String {
    let unescaped = raw
        .replace("\\\"", "\"")
        .replace('"', "\"")
        .replace("\"\"", "\"");
    strip_edges(&unescaped)
}

/// Drop the first and last character; strings shorter than two characters
/// collapse to empty.
fn strip_edges(text: &str) -> String {
    let mut chars = text.chars();
    chars.next();
    chars.next_back();
    chars.as_str().to_string()
}

/// Decode a raw plugins payload into its response value.
///
/// A payload that unescapes to the literal `NaN` stays the string
/// `"NaN"`. Everything else must parse as JSON; a parse failure fails
/// the whole lookup, loudly, rather than shipping a half-unescaped
/// string to callers.
pub fn decode_plugins(raw: &str) -> Result<Value, LookupError> {
    let unescaped = unescape_plugins(raw);
    if unescaped == PLUGINS_NAN_SENTINEL {
        return Ok(Value::String(unescaped));
    }
    serde_json::from_str(&unescaped).map_err(|error| LookupError::PluginsDecode {
        reason: format!("payload is not valid JSON after unescaping: {error}"),
    })
}

/// Pull the textual payload out of a plugins cell.
///
/// Only text-shaped cells are decodable. A null or structured cell means
/// the stored payload was not the expected escaped string, and the lookup
/// fails rather than guessing at a shape.
pub fn plugins_text(cell: &CellValue) -> Result<&str, LookupError> {
    cell.as_text().ok_or_else(|| LookupError::PluginsDecode {
        reason: format!("expected a text payload, got a {} cell", cell.kind()),
    })
}
