#![forbid(unsafe_code)]
//! rowflow: lazy, pull-driven ETL operators.
//!
//! Facade over the workspace crates:
//! - `rowflow-core`: `Record`, `Value`, `GroupKey`, config, manifests.
//! - `rowflow-operators`: the `Operation` contract, branch adapters,
//!   `StreamingAggregation`, `StreamingMergeJoin`.
//! - `rowflow-exec`: `SingleThreadedExecutor`.

pub use rowflow_core;
pub use rowflow_exec;
pub use rowflow_operators;

pub mod prelude {
    pub use rowflow_core::prelude::{
        ExecutorContext, GroupKey, PipelineConfig, Record, RunId, RunManifest, Value,
    };
    pub use rowflow_exec::{ExecError, SingleThreadedExecutor};
    pub use rowflow_operators::{
        AggregationStrategy, Branch, EnumerableOperation, FnAggregation, JoinStrategy, OpError,
        Operation, OperationStatistics, RowObserver, RowStream, Side, StreamingAggregation,
        StreamingMergeJoin,
    };
}
