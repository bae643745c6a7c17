//! Resource bounds for query execution.
//!
//! All limits are fixed at compile time. Engine implementations enforce
//! them before any work is submitted, so an oversized request fails as a
//! typed error instead of a remote rejection.

/// Maximum SQL statement size in bytes (256 KiB).
///
/// Athena rejects larger statements at submission time; checking locally
/// turns that into a typed error before a network round trip.
pub const MAX_QUERY_TEXT_BYTES: u32 = 256 * 1024;

/// Maximum number of positional execution parameters per statement.
pub const MAX_EXECUTION_PARAMS: u32 = 100;

/// Largest result page a fetch may request.
///
/// Athena caps `GetQueryResults` at 1000 rows per call, and the leading
/// header row counts against the page.
pub const MAX_RESULT_PAGE_SIZE: u32 = 1_000;

/// Default delay between execution-status polls in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// Default number of status polls before an execution is declared stuck.
///
/// 240 polls at the default interval bound the wait to one minute.
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 240;
