//! Deterministic in-memory query engine for tests.
//!
//! Responses are programmed up front and served in FIFO order; every
//! request received is recorded for later assertions. Nothing here talks
//! to a network, so tests stay fast and reproducible.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::engine::EngineError;
use crate::engine::QueryEngine;
use crate::engine::QueryOutput;
use crate::engine::QueryRequest;

/// Programmable [`QueryEngine`] with canned responses.
///
/// When the response queue runs dry the engine fails the call instead of
/// inventing a result, so a test that issues more queries than it
/// programmed fails loudly.
pub struct DeterministicQueryEngine {
    responses: Mutex<VecDeque<Result<QueryOutput, EngineError>>>,
    requests: Mutex<Vec<QueryRequest>>,
}

impl DeterministicQueryEngine {
    /// Create an empty engine wrapped in `Arc`, ready for programming.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a successful result for the next unanswered request.
    pub async fn push_output(&self, output: QueryOutput) {
        self.responses.lock().await.push_back(Ok(output));
    }

    /// Queue a failure for the next unanswered request.
    pub async fn push_error(&self, error: EngineError) {
        self.responses.lock().await.push_back(Err(error));
    }

    /// All requests received so far, in arrival order.
    pub async fn requests(&self) -> Vec<QueryRequest> {
        self.requests.lock().await.clone()
    }
}

impl Default for DeterministicQueryEngine {
    fn default() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl QueryEngine for DeterministicQueryEngine {
    async fn execute(&self, request: QueryRequest) -> Result<QueryOutput, EngineError> {
        self.requests.lock().await.push(request);
        self.responses.lock().await.pop_front().unwrap_or_else(|| {
            Err(EngineError::SubmitFailed {
                reason: "no programmed response".to_string(),
            })
        })
    }
}
