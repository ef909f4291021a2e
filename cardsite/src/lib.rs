//! Expose cardsite's pipeline for integration tests and benchmarks. The
//! binary is the supported interface; this API follows whatever the CLI needs.
pub mod cli;
pub mod pipeline;
