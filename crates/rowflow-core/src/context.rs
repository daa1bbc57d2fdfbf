//! Executor context handed to operations before they run.

use crate::config::PipelineConfig;
use crate::id::RunId;

/// The environment an operation tree runs under. One context per run; child
/// operations receive the same context as their parent.
#[derive(Debug, Clone)]
pub struct ExecutorContext {
    pub run_id: RunId,
    pub config: PipelineConfig,
}

impl ExecutorContext {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            run_id: RunId::new(),
            config,
        }
    }
}

impl Default for ExecutorContext {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
