//! Query-engine contract types and traits.
//!
//! Everything the rest of Boreal knows about the analytical engine is
//! here: a request carrying SQL text, a tabular result with by-name row
//! access, engine-reported statistics, and the [`QueryEngine`] trait that
//! backends implement. Statement validation lives here too so every
//! backend rejects the same inputs.

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::constants::MAX_EXECUTION_PARAMS;
use crate::constants::MAX_QUERY_TEXT_BYTES;

// ============================================================================
// Value and Result Types
// ============================================================================

/// A typed cell produced by the analytical engine.
///
/// Mirrors the Presto surface Boreal actually touches: scalar columns
/// arrive as text, numbers, or booleans, and `TRY(CAST(... AS JSON))`
/// projections arrive as structured JSON values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CellValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    Json(serde_json::Value),
}

impl CellValue {
    /// Borrow the textual payload of the cell, if it has one.
    ///
    /// Depending on how the engine casts a column, a string may arrive
    /// either as a plain text cell or as a JSON string value; both count
    /// as textual here.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text),
            CellValue::Json(serde_json::Value::String(text)) => Some(text),
            _ => None,
        }
    }

    /// Short name of the cell's shape, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            CellValue::Null => "null",
            CellValue::Boolean(_) => "boolean",
            CellValue::Integer(_) => "integer",
            CellValue::Real(_) => "real",
            CellValue::Text(_) => "text",
            CellValue::Json(_) => "json",
        }
    }

    /// Convert the cell into the JSON value it represents on the wire.
    ///
    /// Non-finite reals have no JSON representation and collapse to null.
    pub fn into_json(self) -> serde_json::Value {
        match self {
            CellValue::Null => serde_json::Value::Null,
            CellValue::Boolean(value) => serde_json::Value::Bool(value),
            CellValue::Integer(value) => serde_json::Value::from(value),
            CellValue::Real(value) => serde_json::Number::from_f64(value)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            CellValue::Text(text) => serde_json::Value::String(text),
            CellValue::Json(value) => value,
        }
    }
}

/// Metadata for one output column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Output name of the column, after any `AS` alias.
    pub name: String,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Request to execute one read-only analytical query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct QueryRequest {
    /// Full SQL text of the statement.
    pub query: String,
    /// Positional execution parameters bound by the engine, in order.
    /// Empty when the statement embeds its values directly.
    pub params: Vec<String>,
    /// Cap on returned rows; `None` lets the engine default apply.
    pub max_rows: Option<u32>,
}

impl QueryRequest {
    /// Build a plain-text request with no bound parameters.
    pub fn from_sql(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            params: Vec::new(),
            max_rows: None,
        }
    }
}

/// Engine-reported execution statistics.
///
/// Logged for observability; never part of a caller-facing response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct QueryStats {
    /// Engine-side execution time in milliseconds.
    pub execution_time_ms: u64,
    /// Bytes of table data scanned to answer the query.
    pub data_scanned_bytes: u64,
}

/// Tabular result of a query execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct QueryOutput {
    /// Output columns in projection order.
    pub columns: Vec<ColumnInfo>,
    /// Row-major cells; each inner vector is one row in column order.
    pub rows: Vec<Vec<CellValue>>,
    /// Statistics reported by the engine for this execution.
    pub stats: QueryStats,
}

impl QueryOutput {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Borrow the first result row, if any.
    pub fn first_row(&self) -> Option<Row<'_>> {
        self.row(0)
    }

    /// Borrow the row at `index` with by-name cell access.
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|cells| Row {
            columns: &self.columns,
            cells,
        })
    }
}

/// Borrowed view of one result row with by-name cell access.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [ColumnInfo],
    cells: &'a [CellValue],
}

impl<'a> Row<'a> {
    /// Cell under the given output column name, if the column exists.
    ///
    /// Column names are matched exactly; lookups are linear over the
    /// projection, which stays small and fixed.
    pub fn value(&self, name: &str) -> Option<&'a CellValue> {
        self.columns
            .iter()
            .position(|column| column.name == name)
            .and_then(|index| self.cells.get(index))
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors surfaced by a query-engine implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("query not allowed: {reason}")]
    QueryRejected { reason: String },

    #[error("query size {size} exceeds maximum of {max} bytes")]
    QueryTooLarge { size: usize, max: u32 },

    #[error("parameter count {count} exceeds maximum of {max}")]
    TooManyParams { count: usize, max: u32 },

    #[error("query submission failed: {reason}")]
    SubmitFailed { reason: String },

    #[error("engine accepted the query but returned no execution id")]
    MissingQueryId,

    #[error("status poll failed: {reason}")]
    StatusPoll { reason: String },

    #[error("query execution {state}: {reason}")]
    ExecutionFailed { state: String, reason: String },

    #[error("query did not finish within {waited_ms}ms")]
    Timeout { waited_ms: u64 },

    #[error("result fetch failed: {reason}")]
    ResultFetch { reason: String },
}

// ============================================================================
// Validation
// ============================================================================

/// Statement keywords that are never allowed through a query engine.
///
/// Boreal only ever reads; anything that could mutate the catalog or the
/// underlying tables is rejected before submission.
const FORBIDDEN_KEYWORDS: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "MERGE", "CREATE", "DROP", "ALTER", "TRUNCATE", "GRANT",
    "REVOKE", "UNLOAD", "MSCK", "VACUUM", "OPTIMIZE",
];

/// Validate that a statement is a plain read.
///
/// The check is a word-boundary keyword scan, not a parse. Column and
/// table names that merely contain a keyword (`created`, `update_time`)
/// pass; a bare forbidden word anywhere in the text does not.
pub fn validate_query_text(query: &str) -> Result<(), EngineError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(EngineError::QueryRejected {
            reason: "query is empty".to_string(),
        });
    }

    let upper = trimmed.to_uppercase();
    if !upper.starts_with("SELECT") && !upper.starts_with("WITH") {
        return Err(EngineError::QueryRejected {
            reason: "only SELECT statements are supported".to_string(),
        });
    }

    for keyword in FORBIDDEN_KEYWORDS {
        if contains_keyword(&upper, keyword) {
            return Err(EngineError::QueryRejected {
                reason: format!("statement contains forbidden keyword {keyword}"),
            });
        }
    }

    Ok(())
}

/// Validate request-level bounds before any engine work.
pub fn validate_request(request: &QueryRequest) -> Result<(), EngineError> {
    if request.query.len() > MAX_QUERY_TEXT_BYTES as usize {
        return Err(EngineError::QueryTooLarge {
            size: request.query.len(),
            max: MAX_QUERY_TEXT_BYTES,
        });
    }
    if request.params.len() > MAX_EXECUTION_PARAMS as usize {
        return Err(EngineError::TooManyParams {
            count: request.params.len(),
            max: MAX_EXECUTION_PARAMS,
        });
    }
    Ok(())
}

/// True when `keyword` appears in `text` delimited by non-identifier
/// characters on both sides.
fn contains_keyword(text: &str, keyword: &str) -> bool {
    let bytes = text.as_bytes();
    let mut start = 0;
    while let Some(found) = text[start..].find(keyword) {
        let begin = start + found;
        let end = begin + keyword.len();
        let bounded_left = begin == 0 || !is_identifier_char(bytes[begin - 1]);
        let bounded_right = end == bytes.len() || !is_identifier_char(bytes[end]);
        if bounded_left && bounded_right {
            return true;
        }
        start = begin + 1;
    }
    false
}

fn is_identifier_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

// ============================================================================
// Engine Trait
// ============================================================================

/// Analytical query execution interface.
///
/// One call covers the whole lifecycle: submit the statement, wait for a
/// terminal state, and return the full tabular result. Implementations
/// must be safe to share across concurrent callers.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Execute one read-only query and return its result.
    async fn execute(&self, request: QueryRequest) -> Result<QueryOutput, EngineError>;
}

#[async_trait]
impl<T: QueryEngine + ?Sized> QueryEngine for std::sync::Arc<T> {
    async fn execute(&self, request: QueryRequest) -> Result<QueryOutput, EngineError> {
        (**self).execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_select() {
        assert!(validate_query_text("SELECT id FROM metadata").is_ok());
    }

    #[test]
    fn accepts_cte() {
        assert!(validate_query_text("WITH recent AS (SELECT id FROM metadata) SELECT * FROM recent").is_ok());
    }

    #[test]
    fn accepts_lowercase_select() {
        assert!(validate_query_text("select id from metadata where id = 'x'").is_ok());
    }

    #[test]
    fn rejects_empty_query() {
        assert!(matches!(
            validate_query_text("   "),
            Err(EngineError::QueryRejected { .. })
        ));
    }

    #[test]
    fn rejects_non_select() {
        assert!(validate_query_text("SHOW TABLES").is_err());
    }

    #[test]
    fn rejects_forbidden_keywords() {
        for statement in [
            "SELECT 1; DROP TABLE metadata",
            "SELECT * FROM metadata WHERE id = (DELETE FROM t)",
            "WITH x AS (SELECT 1) INSERT INTO t SELECT * FROM x",
        ] {
            assert!(validate_query_text(statement).is_err(), "{statement}");
        }
    }

    #[test]
    fn keyword_scan_respects_identifier_boundaries() {
        // Column names that contain a keyword as a substring are fine.
        assert!(validate_query_text("SELECT created, update_time FROM metadata").is_ok());
        assert!(validate_query_text("SELECT features_properties_date_created_date FROM metadata").is_ok());
        // The bare keyword is not.
        assert!(validate_query_text("SELECT 1 WHERE CREATE").is_err());
    }

    #[test]
    fn request_size_bounds_enforced() {
        let oversized = QueryRequest::from_sql("SELECT ".to_string() + &"x".repeat(MAX_QUERY_TEXT_BYTES as usize));
        assert!(matches!(
            validate_request(&oversized),
            Err(EngineError::QueryTooLarge { .. })
        ));

        let mut too_many_params = QueryRequest::from_sql("SELECT 1");
        too_many_params.params = vec!["v".to_string(); MAX_EXECUTION_PARAMS as usize + 1];
        assert!(matches!(
            validate_request(&too_many_params),
            Err(EngineError::TooManyParams { .. })
        ));

        assert!(validate_request(&QueryRequest::from_sql("SELECT 1")).is_ok());
    }

    #[test]
    fn row_lookup_by_name() {
        let output = QueryOutput {
            columns: vec![ColumnInfo::new("id"), ColumnInfo::new("title")],
            rows: vec![vec![
                CellValue::Text("abc-123".to_string()),
                CellValue::Text("A Title".to_string()),
            ]],
            stats: QueryStats::default(),
        };

        let row = output.first_row().unwrap();
        assert_eq!(row.value("id"), Some(&CellValue::Text("abc-123".to_string())));
        assert_eq!(row.value("title"), Some(&CellValue::Text("A Title".to_string())));
        assert_eq!(row.value("missing"), None);
    }

    #[test]
    fn first_row_of_empty_output_is_none() {
        let output = QueryOutput::default();
        assert!(output.first_row().is_none());
        assert_eq!(output.row_count(), 0);
    }

    #[test]
    fn cell_json_conversion() {
        assert_eq!(CellValue::Null.into_json(), serde_json::Value::Null);
        assert_eq!(CellValue::Boolean(true).into_json(), serde_json::json!(true));
        assert_eq!(CellValue::Integer(-7).into_json(), serde_json::json!(-7));
        assert_eq!(CellValue::Real(1.5).into_json(), serde_json::json!(1.5));
        assert_eq!(CellValue::Real(f64::NAN).into_json(), serde_json::Value::Null);
        assert_eq!(
            CellValue::Text("N/A".to_string()).into_json(),
            serde_json::json!("N/A")
        );
        assert_eq!(
            CellValue::Json(serde_json::json!({"a": 1})).into_json(),
            serde_json::json!({"a": 1})
        );
    }

    #[test]
    fn text_access_covers_both_string_shapes() {
        assert_eq!(CellValue::Text("x".to_string()).as_text(), Some("x"));
        assert_eq!(
            CellValue::Json(serde_json::Value::String("x".to_string())).as_text(),
            Some("x")
        );
        assert_eq!(CellValue::Null.as_text(), None);
        assert_eq!(CellValue::Json(serde_json::json!({})).as_text(), None);
    }

    #[test]
    fn error_messages_are_actionable() {
        let error = EngineError::QueryTooLarge {
            size: 300_000,
            max: MAX_QUERY_TEXT_BYTES,
        };
        assert!(error.to_string().contains("300000"));

        let error = EngineError::ExecutionFailed {
            state: "FAILED".to_string(),
            reason: "SYNTAX_ERROR: line 1:8".to_string(),
        };
        assert!(error.to_string().contains("SYNTAX_ERROR"));

        let error = EngineError::Timeout { waited_ms: 60_000 };
        assert!(error.to_string().contains("60000ms"));
    }
}
