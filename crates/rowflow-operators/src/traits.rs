//! Operation trait + common interfaces.
//!
//! A hosting executor drives every operation through the same lifecycle:
//! `prepare_for_execution` → `execute` (returns a lazy stream, no rows pulled
//! yet) → the stream is consumed or dropped early → `dispose`.

use std::fmt;

use rowflow_core::context::ExecutorContext;
use rowflow_core::record::Record;

use thiserror::Error;

/// A lazily-produced sequence of rows. Pulling the next element is the only
/// point at which an operator does row work.
pub type RowStream<'a> = Box<dyn Iterator<Item = Result<Record, OpError>> + 'a>;

/// Which input of a two-input operator a branch feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OpError {
    /// Precondition violation detected before any row is pulled.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("execution error: {0}")]
    Exec(String),

    /// Malformed row (missing column, wrong type).
    #[error("data error: {0}")]
    Data(#[from] rowflow_core::error::Error),

    #[error("{side} branch: {source}")]
    Branch {
        side: Side,
        #[source]
        source: Box<OpError>,
    },
}

impl OpError {
    pub fn is_config(&self) -> bool {
        match self {
            OpError::Config(_) => true,
            OpError::Branch { source, .. } => source.is_config(),
            _ => false,
        }
    }
}

/// Trait that all operations must implement.
///
/// Invariants:
/// - `execute` performs setup only; row work happens when the stream is pulled.
/// - The returned stream borrows the operation, so at most one traversal can
///   be in flight per instance.
/// - `dispose` is idempotent and valid whether or not `execute` ran.
pub trait Operation {
    /// Human-readable operation name (stable).
    fn name(&self) -> &str;

    /// Receive the executor context before any rows flow. Two-input operators
    /// forward it to their children.
    fn prepare_for_execution(&mut self, _ctx: &ExecutorContext) -> Result<(), OpError> {
        Ok(())
    }

    /// Start a traversal. `input` is the upstream stream for single-input
    /// operations; sources and two-input operators ignore it.
    fn execute<'a>(&'a mut self, input: Option<RowStream<'a>>) -> Result<RowStream<'a>, OpError>;

    /// Release resources held by this operation and its children.
    fn dispose(&mut self) {}

    /// Deferred errors gathered while running, for diagnostics after the run.
    fn collect_errors(&self) -> Box<dyn Iterator<Item = &OpError> + '_> {
        Box::new(std::iter::empty())
    }
}

impl<T: Operation + ?Sized> Operation for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn prepare_for_execution(&mut self, ctx: &ExecutorContext) -> Result<(), OpError> {
        (**self).prepare_for_execution(ctx)
    }

    fn execute<'a>(&'a mut self, input: Option<RowStream<'a>>) -> Result<RowStream<'a>, OpError> {
        (**self).execute(input)
    }

    fn dispose(&mut self) {
        (**self).dispose()
    }

    fn collect_errors(&self) -> Box<dyn Iterator<Item = &OpError> + '_> {
        (**self).collect_errors()
    }
}
