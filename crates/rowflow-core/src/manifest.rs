//! Run manifest emitted by an executor after a pipeline run.

use serde::{Deserialize, Serialize};

use crate::hash::Hash256;
use crate::id::RunId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub id: RunId,

    /// Pipeline name from the run's config.
    pub pipeline: String,

    /// Version string for provenance.
    pub engine_version: String,

    /// Hash of the `PipelineConfig` the run was started with.
    pub config_hash: Hash256,

    /// Rows pulled out of the last operation.
    pub rows_out: u64,

    /// Digest of the output rows, when enabled.
    pub outputs_digest: Option<Hash256>,

    /// Milliseconds since Unix epoch (UTC).
    pub started_ms: u64,
    pub finished_ms: u64,
}

impl RunManifest {
    pub fn new(
        id: RunId,
        pipeline: impl Into<String>,
        config_hash: Hash256,
        started_ms: u64,
    ) -> Self {
        Self {
            id,
            pipeline: pipeline.into(),
            engine_version: crate::VERSION.to_string(),
            config_hash,
            rows_out: 0,
            outputs_digest: None,
            started_ms,
            finished_ms: started_ms,
        }
    }

    pub fn finish(mut self, finished_ms: u64, rows_out: u64, outputs_digest: Option<Hash256>) -> Self {
        self.finished_ms = finished_ms;
        self.rows_out = rows_out;
        self.outputs_digest = outputs_digest;
        self
    }
}
