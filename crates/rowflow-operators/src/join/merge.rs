//! Streaming merge join over two branches.
//!
//! Precondition: both branches produce rows sorted on the join key and
//! aligned one-to-one by position. The loop compares the rows currently under
//! each cursor and then advances *both* cursors, whether or not they matched.
//! It never catches up a lagging side and never expands duplicate keys.
//! When one branch runs out first, the remaining rows of the other branch are
//! drained without being compared.

use rowflow_core::context::ExecutorContext;
use rowflow_core::record::Record;

use crate::branch::Branch;
use crate::join::JoinStrategy;
use crate::stats::{OperationStatistics, RowObserver};
use crate::traits::{OpError, Operation, RowStream, Side};

pub struct StreamingMergeJoin<J> {
    name: String,
    strategy: J,
    left: Branch,
    right: Branch,
}

impl<J: JoinStrategy> StreamingMergeJoin<J> {
    pub fn new(name: impl Into<String>, strategy: J) -> Self {
        Self {
            name: name.into(),
            strategy,
            left: Branch::new(Side::Left),
            right: Branch::new(Side::Right),
        }
    }

    /// Set the left input, replacing any previous one.
    pub fn left(&mut self, operation: impl Operation + 'static) -> &mut Self {
        self.left.register(Box::new(operation));
        self
    }

    /// Set the right input, replacing any previous one.
    pub fn right(&mut self, operation: impl Operation + 'static) -> &mut Self {
        self.right.register(Box::new(operation));
        self
    }

    pub fn on_left_row(&mut self, observer: impl RowObserver + 'static) -> &mut Self {
        self.left.subscribe(observer);
        self
    }

    pub fn on_right_row(&mut self, observer: impl RowObserver + 'static) -> &mut Self {
        self.right.subscribe(observer);
        self
    }

    pub fn left_statistics(&self) -> &OperationStatistics {
        self.left.statistics()
    }

    pub fn right_statistics(&self) -> &OperationStatistics {
        self.right.statistics()
    }

    pub fn strategy(&self) -> &J {
        &self.strategy
    }
}

impl<J: JoinStrategy> Operation for StreamingMergeJoin<J> {
    fn name(&self) -> &str {
        &self.name
    }

    /// Both branches are prepared even if the left one fails; the first
    /// error is returned.
    fn prepare_for_execution(&mut self, ctx: &ExecutorContext) -> Result<(), OpError> {
        let left = self.left.prepare_for_execution(ctx);
        let right = self.right.prepare_for_execution(ctx);
        left.and(right)
    }

    fn execute<'a>(&'a mut self, _input: Option<RowStream<'a>>) -> Result<RowStream<'a>, OpError> {
        self.strategy.initialize()?;

        if !self.left.is_registered() {
            return Err(OpError::Config("left branch of a join cannot be empty".into()));
        }
        if !self.right.is_registered() {
            return Err(OpError::Config("right branch of a join cannot be empty".into()));
        }

        let StreamingMergeJoin {
            name,
            strategy,
            left,
            right,
        } = self;

        let left = Cursor::new(left.execute(None)?);
        let right = Cursor::new(right.execute(None)?);

        Ok(Box::new(LockStep {
            name,
            strategy,
            left,
            right,
            needs_advance: true,
            merged: 0,
            done: false,
        }))
    }

    fn dispose(&mut self) {
        self.left.dispose();
        self.right.dispose();
    }

    fn collect_errors(&self) -> Box<dyn Iterator<Item = &OpError> + '_> {
        Box::new(self.left.collect_errors().chain(self.right.collect_errors()))
    }
}

impl<J> Drop for StreamingMergeJoin<J> {
    fn drop(&mut self) {
        self.left.dispose();
        self.right.dispose();
    }
}

/// Forward-only position over one branch stream.
struct Cursor<'a> {
    stream: RowStream<'a>,
    current: Option<Record>,
    exhausted: bool,
}

impl<'a> Cursor<'a> {
    fn new(stream: RowStream<'a>) -> Self {
        Self {
            stream,
            current: None,
            exhausted: false,
        }
    }

    fn advance(&mut self) -> Result<(), OpError> {
        self.current = None;
        if self.exhausted {
            return Ok(());
        }
        match self.stream.next() {
            Some(row) => self.current = Some(row?),
            None => self.exhausted = true,
        }
        Ok(())
    }
}

struct LockStep<'a, J> {
    name: &'a str,
    strategy: &'a mut J,
    left: Cursor<'a>,
    right: Cursor<'a>,
    /// Cursors move on the pull after a row is yielded, not before it.
    needs_advance: bool,
    merged: u64,
    done: bool,
}

impl<J: JoinStrategy> LockStep<'_, J> {
    fn advance(&mut self) -> Result<Option<Record>, OpError> {
        loop {
            if self.needs_advance {
                self.left.advance()?;
                self.right.advance()?;
            }
            self.needs_advance = true;

            match (&self.left.current, &self.right.current) {
                (None, None) => {
                    tracing::debug!(operation = %self.name, merged = self.merged, "merge join finished");
                    return Ok(None);
                }
                (Some(l), Some(r)) => {
                    if self.strategy.match_join_condition(l, r)? {
                        let merged = self.strategy.merge_rows(l, r)?;
                        self.merged += 1;
                        return Ok(Some(merged));
                    }
                }
                _ => {}
            }
        }
    }
}

impl<J: JoinStrategy> Iterator for LockStep<'_, J> {
    type Item = Result<Record, OpError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
