//! Error taxonomy for the record-lookup operation.

use thiserror::Error;

use boreal_core::EngineError;

/// Errors surfaced by [`RecordLookup::fetch`](crate::lookup::RecordLookup::fetch).
///
/// Every variant fails the whole lookup; there is no partial response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The query engine failed. Propagated as-is, no retry.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The query matched no record.
    #[error("no metadata record with id '{id}'")]
    NotFound { id: String },

    /// A projected column was absent from the result row.
    #[error("result row is missing projected column '{name}'")]
    MissingColumn { name: String },

    /// The plugins payload did not survive unescaping and decoding.
    #[error("plugins payload is not decodable: {reason}")]
    PluginsDecode { reason: String },
}
