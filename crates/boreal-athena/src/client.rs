//! The Athena-backed query engine.

use async_trait::async_trait;
use aws_sdk_athena::types::QueryExecution;
use aws_sdk_athena::types::QueryExecutionContext;
use aws_sdk_athena::types::QueryExecutionState;
use aws_sdk_athena::types::ResultConfiguration;
use aws_sdk_athena::types::ResultSet;
use aws_sdk_athena::types::Row as ResultRow;
use aws_sdk_athena::Client;
use tracing::debug;
use tracing::info;
use tracing::warn;

use boreal_core::validate_query_text;
use boreal_core::validate_request;
use boreal_core::CellValue;
use boreal_core::ColumnInfo;
use boreal_core::EngineError;
use boreal_core::QueryEngine;
use boreal_core::QueryOutput;
use boreal_core::QueryRequest;
use boreal_core::QueryStats;

use crate::config::AthenaConfig;

/// Query engine backed by Amazon Athena.
///
/// Holds one SDK client and the engine settings; safe to share across
/// concurrent callers.
pub struct AthenaQueryEngine {
    client: Client,
    config: AthenaConfig,
}

impl AthenaQueryEngine {
    /// Wrap an existing SDK client with engine settings.
    pub fn new(client: Client, config: AthenaConfig) -> Self {
        Self { client, config }
    }

    /// Build a client from the ambient AWS environment (region, role).
    pub async fn from_env(config: AthenaConfig) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await;
        Self::new(Client::new(&sdk_config), config)
    }

    async fn start(&self, request: &QueryRequest) -> Result<String, EngineError> {
        let context = QueryExecutionContext::builder()
            .database(&self.config.database)
            .build();

        let mut start = self
            .client
            .start_query_execution()
            .query_string(&request.query)
            .query_execution_context(context);
        if let Some(workgroup) = &self.config.workgroup {
            start = start.work_group(workgroup);
        }
        if let Some(location) = &self.config.output_location {
            start = start.result_configuration(
                ResultConfiguration::builder()
                    .output_location(location)
                    .build(),
            );
        }
        if !request.params.is_empty() {
            start = start.set_execution_parameters(Some(request.params.clone()));
        }

        let started = start.send().await.map_err(|error| EngineError::SubmitFailed {
            reason: error.to_string(),
        })?;
        started
            .query_execution_id()
            .map(str::to_string)
            .ok_or(EngineError::MissingQueryId)
    }

    async fn wait_until_finished(&self, query_id: &str) -> Result<QueryStats, EngineError> {
        for _ in 0..self.config.max_poll_attempts {
            let status = self
                .client
                .get_query_execution()
                .query_execution_id(query_id)
                .send()
                .await
                .map_err(|error| EngineError::StatusPoll {
                    reason: error.to_string(),
                })?;

            let execution = status.query_execution();
            let state = execution.and_then(|e| e.status()).and_then(|s| s.state());
            match state {
                Some(QueryExecutionState::Succeeded) => return Ok(stats_from(execution)),
                Some(QueryExecutionState::Failed) | Some(QueryExecutionState::Cancelled) => {
                    return Err(execution_failure(execution, state));
                }
                // Queued, Running, or a state this SDK version does not
                // know yet: keep waiting.
                _ => tokio::time::sleep(self.config.poll_interval).await,
            }
        }

        let waited_ms =
            u64::from(self.config.max_poll_attempts) * self.config.poll_interval.as_millis() as u64;
        Err(EngineError::Timeout { waited_ms })
    }

    async fn fetch_results(
        &self,
        query_id: &str,
        max_rows: Option<u32>,
    ) -> Result<(Vec<ColumnInfo>, Vec<Vec<CellValue>>), EngineError> {
        // One page is the whole fetch: keyed lookups return zero or one
        // row.
        let page_size = result_page(max_rows, self.config.result_page_size);

        let fetched = self
            .client
            .get_query_results()
            .query_execution_id(query_id)
            .max_results(page_size as i32)
            .send()
            .await
            .map_err(|error| EngineError::ResultFetch {
                reason: error.to_string(),
            })?;

        if fetched.next_token().is_some() {
            warn!(%query_id, "result set continues past the first page; ignoring the rest");
        }

        let result_set = fetched.result_set().ok_or_else(|| EngineError::ResultFetch {
            reason: "response carried no result set".to_string(),
        })?;

        let (columns, column_types) = column_layout(result_set);
        let mut rows = Vec::new();
        for (index, row) in result_set.rows().iter().enumerate() {
            if index == 0 && is_header_row(row, &columns) {
                continue;
            }
            rows.push(convert_row(row, &column_types));
        }
        if let Some(cap) = max_rows {
            rows.truncate(cap as usize);
        }

        Ok((columns, rows))
    }
}

#[async_trait]
impl QueryEngine for AthenaQueryEngine {
    async fn execute(&self, request: QueryRequest) -> Result<QueryOutput, EngineError> {
        validate_request(&request)?;
        validate_query_text(&request.query)?;

        let query_id = self.start(&request).await?;
        debug!(%query_id, "query execution started");

        let stats = self.wait_until_finished(&query_id).await?;
        let (columns, rows) = self.fetch_results(&query_id, request.max_rows).await?;
        info!(
            %query_id,
            rows = rows.len(),
            execution_time_ms = stats.execution_time_ms,
            data_scanned_bytes = stats.data_scanned_bytes,
            "query execution finished"
        );

        Ok(QueryOutput {
            columns,
            rows,
            stats,
        })
    }
}

/// Rows to request for one results page.
///
/// The leading header row occupies one slot, so a caller cap is widened
/// by one. The configured page size bounds the request; the result is
/// never zero, whatever the configuration holds.
fn result_page(max_rows: Option<u32>, configured: u32) -> u32 {
    max_rows
        .map(|rows| rows.saturating_add(1))
        .unwrap_or(configured)
        .min(configured)
        .max(1)
}

/// Output columns and their declared engine types, in projection order.
fn column_layout(result_set: &ResultSet) -> (Vec<ColumnInfo>, Vec<String>) {
    let infos = result_set
        .result_set_metadata()
        .map(|metadata| metadata.column_info())
        .unwrap_or_default();
    let columns = infos
        .iter()
        .map(|info| ColumnInfo::new(info.name()))
        .collect();
    let types = infos.iter().map(|info| info.r#type().to_string()).collect();
    (columns, types)
}

/// Athena prepends a row whose datums repeat the column labels.
fn is_header_row(row: &ResultRow, columns: &[ColumnInfo]) -> bool {
    let data = row.data();
    !columns.is_empty()
        && data.len() == columns.len()
        && data
            .iter()
            .zip(columns)
            .all(|(datum, column)| datum.var_char_value() == Some(column.name.as_str()))
}

fn convert_row(row: &ResultRow, column_types: &[String]) -> Vec<CellValue> {
    (0..column_types.len())
        .map(|index| {
            let datum = row.data().get(index).and_then(|d| d.var_char_value());
            cell_from_datum(&column_types[index], datum)
        })
        .collect()
}

/// Map one engine datum to a typed cell using the column's declared type.
///
/// Every datum arrives as a string. Json columns are printed canonically
/// by the engine, so a string-valued cell (the cast of a varchar, which
/// is how the plugins payload and its `NaN` sentinel travel) keeps its
/// raw rendering as text; only structured values become
/// [`CellValue::Json`]. A json datum that does not parse and an
/// unparseable numeric both fall back to text rather than failing the
/// fetch; an absent datum is a null, which is how the engine encodes
/// both SQL nulls and failed `TRY(CAST(...))` projections.
fn cell_from_datum(column_type: &str, datum: Option<&str>) -> CellValue {
    let Some(text) = datum else {
        return CellValue::Null;
    };
    match column_type {
        // A string-valued json cell keeps the raw rendering, escape
        // layers intact, so downstream unescaping sees exactly what the
        // engine printed.
        "json" => match serde_json::from_str::<serde_json::Value>(text) {
            Ok(serde_json::Value::String(_)) | Err(_) => CellValue::Text(text.to_string()),
            Ok(value) => CellValue::Json(value),
        },
        "tinyint" | "smallint" | "integer" | "int" | "bigint" => text
            .parse()
            .map(CellValue::Integer)
            .unwrap_or_else(|_| CellValue::Text(text.to_string())),
        "float" | "real" | "double" | "decimal" => text
            .parse()
            .map(CellValue::Real)
            .unwrap_or_else(|_| CellValue::Text(text.to_string())),
        "boolean" => match text {
            "true" => CellValue::Boolean(true),
            "false" => CellValue::Boolean(false),
            _ => CellValue::Text(text.to_string()),
        },
        _ => CellValue::Text(text.to_string()),
    }
}

fn stats_from(execution: Option<&QueryExecution>) -> QueryStats {
    let statistics = execution.and_then(|e| e.statistics());
    QueryStats {
        execution_time_ms: non_negative(
            statistics.and_then(|s| s.engine_execution_time_in_millis()),
        ),
        data_scanned_bytes: non_negative(statistics.and_then(|s| s.data_scanned_in_bytes())),
    }
}

fn non_negative(value: Option<i64>) -> u64 {
    value.and_then(|v| u64::try_from(v).ok()).unwrap_or(0)
}

fn execution_failure(
    execution: Option<&QueryExecution>,
    state: Option<&QueryExecutionState>,
) -> EngineError {
    let reason = execution
        .and_then(|e| e.status())
        .and_then(|s| s.state_change_reason())
        .unwrap_or("no reason given")
        .to_string();
    EngineError::ExecutionFailed {
        state: state
            .map(|s| s.as_str().to_string())
            .unwrap_or_else(|| "UNKNOWN".to_string()),
        reason,
    }
}
