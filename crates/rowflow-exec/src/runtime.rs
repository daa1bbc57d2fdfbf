//! Runtime: drive a chain of operations on the calling thread.
//!
//! Behavior:
//! - Prepares every operation with one shared `ExecutorContext`.
//! - Chains `execute`: the first operation gets no input, each later one gets
//!   the previous operation's stream.
//! - Pulls the final stream to completion; the first row error stops the pull.
//! - Gathers every operation's deferred errors, then disposes all operations,
//!   including after a failure.
//! - Emits a `RunManifest` with the row count and an optional output digest.

use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use rowflow_core::config::PipelineConfig;
use rowflow_core::context::ExecutorContext;
use rowflow_core::hash::{hash_serde, Hash256, StreamDigest};
use rowflow_core::manifest::RunManifest;

use rowflow_operators::traits::{OpError, Operation, RowStream};

use crate::metrics::emit_span;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("operation failed: {0}")]
    Operation(#[from] OpError),
    #[error("pipeline has no operations")]
    Empty,
    #[error("pipeline '{pipeline}' finished with {count} error(s)")]
    Failed { pipeline: String, count: usize },
    #[error("hashing error: {0}")]
    Hash(String),
}

pub struct SingleThreadedExecutor {
    ctx: ExecutorContext,
    errors: Vec<OpError>,
}

impl SingleThreadedExecutor {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            ctx: ExecutorContext::new(config),
            errors: Vec::new(),
        }
    }

    pub fn context(&self) -> &ExecutorContext {
        &self.ctx
    }

    /// Errors gathered by the last `run`: the row error that stopped the
    /// pull (if any) followed by deferred errors from the operations.
    pub fn errors(&self) -> &[OpError] {
        &self.errors
    }

    /// Execute `operations` as one pipeline and return a manifest.
    pub fn run(&mut self, operations: &mut [Box<dyn Operation>]) -> Result<RunManifest, ExecError> {
        if operations.is_empty() {
            return Err(ExecError::Empty);
        }
        self.errors.clear();
        self.ctx.run_id = rowflow_core::id::RunId::new();

        let pipeline = self.ctx.config.name.clone();
        let config_hash =
            hash_serde(&self.ctx.config).map_err(|e| ExecError::Hash(e.to_string()))?;
        let started_ms = now_ms();
        emit_span(
            "run_start",
            &[
                ("pipeline", pipeline.clone()),
                ("run_id", self.ctx.run_id.to_string()),
                ("operations", operations.len().to_string()),
                ("config_hash", config_hash.to_hex()),
            ],
        );

        let outcome = self.drive(operations);

        for op in operations.iter() {
            for err in op.collect_errors() {
                if !self.errors.contains(err) {
                    self.errors.push(err.clone());
                }
            }
        }
        for op in operations.iter_mut() {
            op.dispose();
        }

        let (rows_out, digest) = outcome?;
        let finished_ms = now_ms();
        emit_span(
            "run_finish",
            &[
                ("pipeline", pipeline.clone()),
                ("rows_out", rows_out.to_string()),
                ("errors", self.errors.len().to_string()),
            ],
        );

        if !self.errors.is_empty() {
            return Err(ExecError::Failed {
                pipeline,
                count: self.errors.len(),
            });
        }

        Ok(RunManifest::new(self.ctx.run_id, pipeline, config_hash, started_ms)
            .finish(finished_ms, rows_out, digest))
    }

    fn drive(&mut self, operations: &mut [Box<dyn Operation>]) -> Result<(u64, Option<Hash256>), ExecError> {
        for op in operations.iter_mut() {
            op.prepare_for_execution(&self.ctx)?;
        }

        let mut stream: Option<RowStream<'_>> = None;
        for op in operations.iter_mut() {
            stream = Some(op.execute(stream.take())?);
        }
        let stream = stream.ok_or(ExecError::Empty)?;

        let mut digest = self.ctx.config.digest_outputs.then(StreamDigest::new);
        let mut rows_out = 0u64;
        for row in stream {
            match row {
                Ok(row) => {
                    rows_out += 1;
                    if let Some(d) = digest.as_mut() {
                        d.update(&row).map_err(|e| ExecError::Hash(e.to_string()))?;
                    }
                }
                Err(err) => {
                    emit_span("row_failed", &[("error", err.to_string())]);
                    self.errors.push(err);
                    break;
                }
            }
        }

        Ok((rows_out, digest.map(|d| d.finish())))
    }
}

impl Default for SingleThreadedExecutor {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
