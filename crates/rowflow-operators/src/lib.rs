#![forbid(unsafe_code)]
//! rowflow-operators: pull-driven row operators.
//!
//! Design intent:
//! - Every operator turns zero, one, or two lazily-produced row streams into
//!   another lazily-produced stream. No operator materializes its input.
//! - Operators are synchronous and single-threaded; a consumer cancels by
//!   dropping the stream and releases resources with `Operation::dispose`.
//! - Strategy hooks (aggregation, join matching) are injected as trait objects
//!   or closures rather than subclasses.

pub mod branch;
pub mod enumerable;
pub mod stats;
pub mod traits;

pub mod aggregate;
pub mod join;

pub use aggregate::{AggregationStrategy, FnAggregation, StreamingAggregation};
pub use branch::Branch;
pub use enumerable::EnumerableOperation;
pub use join::{JoinStrategy, StreamingMergeJoin};
pub use stats::{OperationStatistics, RowObserver};
pub use traits::{OpError, Operation, RowStream, Side};
