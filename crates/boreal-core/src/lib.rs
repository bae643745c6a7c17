//! Core query-engine contract for Boreal.
//!
//! The analytical engine is a black box to the rest of the system: callers
//! hand over SQL text through [`QueryEngine`] and get back a tabular
//! [`QueryOutput`] plus execution statistics. The production implementation
//! lives in `boreal-athena`; tests drive the same contract through
//! [`DeterministicQueryEngine`].

pub mod constants;
pub mod deterministic;
pub mod engine;

pub use deterministic::DeterministicQueryEngine;
pub use engine::validate_query_text;
pub use engine::validate_request;
pub use engine::CellValue;
pub use engine::ColumnInfo;
pub use engine::EngineError;
pub use engine::QueryEngine;
pub use engine::QueryOutput;
pub use engine::QueryRequest;
pub use engine::QueryStats;
pub use engine::Row;
