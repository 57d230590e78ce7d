//! This crate contains the code that makes a run of the tools observable:
//! initialization of logging and of the metrics registry that RPC
//! instrumentation reports into.
pub mod config;
pub mod metrics;
pub mod tracing;

pub use config::Config;
