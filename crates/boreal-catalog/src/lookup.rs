//! The record-lookup operation: build, execute, normalize, respond.

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::info;

use boreal_core::QueryEngine;
use boreal_core::QueryRequest;

use crate::error::LookupError;
use crate::projection::build_record_query;
use crate::projection::Language;
use crate::record::LookupResponse;
use crate::record::MetadataRecord;

/// Invocation envelope: a record identifier plus a language preference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct LookupRequest {
    /// Opaque record identifier matched against `features_properties_id`.
    pub id: String,
    /// `"fr"` selects the French column variants; anything else, absence
    /// included, selects English.
    #[serde(default)]
    pub lang: String,
}

/// Single-record lookup over an injected query engine.
///
/// Stateless across calls; the engine handle is the only thing held, so
/// one instance serves concurrent invocations.
pub struct RecordLookup {
    engine: Arc<dyn QueryEngine>,
}

impl RecordLookup {
    pub fn new(engine: Arc<dyn QueryEngine>) -> Self {
        Self { engine }
    }

    /// Fetch one record and republish it as the fixed-shape response.
    ///
    /// Zero matching rows is a [`LookupError::NotFound`]; rows past the
    /// first are ignored. Any failure along the way fails the whole call
    /// with no partial response.
    pub async fn fetch(&self, request: &LookupRequest) -> Result<LookupResponse, LookupError> {
        let language = Language::from_tag(&request.lang);
        let sql = build_record_query(&request.id, language);
        debug!(id = %request.id, ?language, "executing record lookup");

        let output = self.engine.execute(QueryRequest::from_sql(sql)).await?;
        info!(
            id = %request.id,
            rows = output.row_count(),
            execution_time_ms = output.stats.execution_time_ms,
            data_scanned_bytes = output.stats.data_scanned_bytes,
            "record query finished"
        );

        let row = output.first_row().ok_or_else(|| LookupError::NotFound {
            id: request.id.clone(),
        })?;
        let record = MetadataRecord::from_row(&row)?;

        Ok(LookupResponse {
            items: vec![record],
        })
    }
}
