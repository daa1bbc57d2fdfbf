#![forbid(unsafe_code)]
//! rowflow-exec: hosting executor for operation pipelines.
//!
//! Runs a chain of operations on the calling thread: prepare, pull the last
//! stream to completion, gather deferred errors, dispose, and emit a
//! `RunManifest`.

pub mod metrics;
pub mod runtime;

pub use runtime::{ExecError, SingleThreadedExecutor};
