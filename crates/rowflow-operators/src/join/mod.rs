//! Two-input joins.

pub mod merge;

pub use merge::StreamingMergeJoin;

use rowflow_core::record::Record;

use crate::traits::OpError;

/// Hooks that define one join.
pub trait JoinStrategy {
    /// Called once at the start of every traversal, before any row is pulled.
    fn initialize(&mut self) -> Result<(), OpError> {
        Ok(())
    }

    fn match_join_condition(&mut self, left: &Record, right: &Record) -> Result<bool, OpError>;

    /// Only called for pairs that satisfy `match_join_condition`.
    fn merge_rows(&mut self, left: &Record, right: &Record) -> Result<Record, OpError>;

    /// Extension point for rows filtered by the join condition (e.g. for
    /// logging). The lock-step merge loop does not call it.
    fn left_orphan_row(&mut self, _row: &Record) {}

    /// See `left_orphan_row`.
    fn right_orphan_row(&mut self, _row: &Record) {}
}
