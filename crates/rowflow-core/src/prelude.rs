//! Convenient re-exports for downstream crates.

pub use crate::config::PipelineConfig;
pub use crate::context::ExecutorContext;
pub use crate::error::{Error, Result};
pub use crate::id::RunId;
pub use crate::key::GroupKey;
pub use crate::manifest::RunManifest;
pub use crate::record::Record;
pub use crate::value::Value;
