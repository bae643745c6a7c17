//! Amazon Athena implementation of the Boreal query engine.
//!
//! One [`boreal_core::QueryEngine`] call maps to the Athena lifecycle:
//! start the execution, poll its status to a terminal state, fetch the
//! first results page, and map the string datums into typed cells. The
//! polling cadence, result page size, and catalog location all come from
//! [`AthenaConfig`], which reads the `ATHENA_*` environment at startup.

pub mod client;
pub mod config;

pub use client::AthenaQueryEngine;
pub use config::AthenaConfig;
pub use config::ConfigError;
