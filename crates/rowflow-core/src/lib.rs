#![forbid(unsafe_code)]
//! rowflow-core: records, composite keys, configuration, and run manifests.
//!
//! Design intent:
//! - Pure data and small helpers; no IO and no operator logic here.
//! - Everything that crosses an operator boundary (`Record`, `Value`, errors)
//!   lives in this crate so operators and executors agree on one vocabulary.

pub mod config;
pub mod context;
pub mod error;
pub mod hash;
pub mod id;
pub mod key;
pub mod manifest;
pub mod prelude;
pub mod record;
pub mod value;

/// Crate version recorded in run manifests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
