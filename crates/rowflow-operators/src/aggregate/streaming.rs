//! Streaming, non-blocking group aggregation.
//!
//! Precondition: rows of the same group arrive contiguously (sorted or
//! otherwise pre-grouped by the group columns). The operator keeps one
//! in-progress aggregate and emits it once the key changes or input ends, so
//! output is always one group behind input. A key that reappears after a
//! different key starts a new group; it is never merged with the earlier run.

use rowflow_core::key::GroupKey;
use rowflow_core::record::Record;

use crate::aggregate::AggregationStrategy;
use crate::traits::{OpError, Operation, RowStream};

pub struct StreamingAggregation<S> {
    name: String,
    strategy: S,
}

impl<S: AggregationStrategy> StreamingAggregation<S> {
    pub fn new(name: impl Into<String>, strategy: S) -> Self {
        Self {
            name: name.into(),
            strategy,
        }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn strategy_mut(&mut self) -> &mut S {
        &mut self.strategy
    }
}

impl<S: AggregationStrategy> Operation for StreamingAggregation<S> {
    fn name(&self) -> &str {
        &self.name
    }

    /// `group_columns` is read here, not on the first pull, so its error is
    /// returned from `execute` before any row is read.
    fn execute<'a>(&'a mut self, input: Option<RowStream<'a>>) -> Result<RowStream<'a>, OpError> {
        let input = input.ok_or_else(|| {
            OpError::Config(format!("aggregation '{}' requires an input stream", self.name))
        })?;
        let columns = self.strategy.group_columns()?;
        tracing::debug!(operation = %self.name, group_by = ?columns, "aggregation started");

        Ok(Box::new(GroupRuns {
            name: &self.name,
            input,
            strategy: &mut self.strategy,
            columns,
            current: None,
            pending: None,
            done: false,
        }))
    }
}

/// The aggregate being built and the key it was started for.
struct Group {
    key: GroupKey,
    aggregate: Record,
    rows: u64,
}

struct GroupRuns<'a, S> {
    name: &'a str,
    input: RowStream<'a>,
    strategy: &'a mut S,
    columns: Vec<String>,
    current: Option<Group>,
    /// First row of the next group, read before the previous group was emitted.
    pending: Option<(GroupKey, Record)>,
    done: bool,
}

impl<S: AggregationStrategy> GroupRuns<'_, S> {
    fn start_group(&mut self, key: GroupKey, row: Record) -> Result<(), OpError> {
        let mut aggregate = Record::new();
        aggregate.copy_columns_from(&row, &self.columns);
        self.strategy.accumulate(&row, &mut aggregate)?;
        self.current = Some(Group {
            key,
            aggregate,
            rows: 1,
        });
        Ok(())
    }

    fn finish(&mut self, mut group: Group) -> Result<Record, OpError> {
        self.strategy.finish_aggregation(&mut group.aggregate)?;
        tracing::debug!(
            operation = %self.name,
            key = %group.key,
            rows = group.rows,
            "group aggregated"
        );
        Ok(group.aggregate)
    }

    fn advance(&mut self) -> Result<Option<Record>, OpError> {
        if let Some((key, row)) = self.pending.take() {
            self.start_group(key, row)?;
        }

        while let Some(row) = self.input.next() {
            let row = row?;
            let key = GroupKey::from_record(&self.columns, &row);

            if let Some(group) = self.current.as_mut() {
                if group.key == key {
                    self.strategy.accumulate(&row, &mut group.aggregate)?;
                    group.rows += 1;
                    continue;
                }
            }

            match self.current.take() {
                Some(finished) => {
                    self.pending = Some((key, row));
                    return self.finish(finished).map(Some);
                }
                None => self.start_group(key, row)?,
            }
        }

        match self.current.take() {
            Some(last) => self.finish(last).map(Some),
            None => Ok(None),
        }
    }
}

impl<S: AggregationStrategy> Iterator for GroupRuns<'_, S> {
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
