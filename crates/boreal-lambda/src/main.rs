//! Lambda entry point for the record-lookup service.
//!
//! Wires the environment configuration, the Athena engine, and the
//! catalog lookup into one handler. The invocation payload is the
//! `{id, lang}` envelope; the response is the `Items` envelope. Any
//! failure becomes an invocation error, never a partial response.

use std::sync::Arc;

use lambda_runtime::service_fn;
use lambda_runtime::Error;
use lambda_runtime::LambdaEvent;
use tracing::info;

use boreal_athena::AthenaConfig;
use boreal_athena::AthenaQueryEngine;
use boreal_catalog::LookupRequest;
use boreal_catalog::LookupResponse;
use boreal_catalog::RecordLookup;

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        // CloudWatch stamps every line already.
        .without_time()
        .compact()
        .init();
}

async fn handle(
    event: LambdaEvent<LookupRequest>,
    lookup: &RecordLookup,
) -> Result<LookupResponse, Error> {
    let (request, context) = event.into_parts();
    info!(
        request_id = %context.request_id,
        id = %request.id,
        lang = %request.lang,
        "record lookup invoked"
    );
    Ok(lookup.fetch(&request).await?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let config = AthenaConfig::from_env()?;
    let engine = AthenaQueryEngine::from_env(config).await;
    let lookup = RecordLookup::new(Arc::new(engine));

    lambda_runtime::run(service_fn(|event| handle(event, &lookup))).await
}
