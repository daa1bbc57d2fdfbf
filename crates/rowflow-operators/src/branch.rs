//! Branch adapter: one input of a two-input operator.
//!
//! Wraps a child operation, forwards the lifecycle calls to it, and decorates
//! its stream so every row updates the branch statistics and notifies
//! subscribed observers. Errors flowing out of the child stream are recorded
//! (up to the configured cap) and forwarded unchanged.

use rowflow_core::context::ExecutorContext;
use rowflow_core::record::Record;

use crate::stats::{OperationStatistics, RowObserver};
use crate::traits::{OpError, Operation, RowStream, Side};

const DEFAULT_ERROR_CAP: usize = 100;

pub struct Branch {
    side: Side,
    operation: Option<Box<dyn Operation>>,
    observers: Vec<Box<dyn RowObserver>>,
    statistics: OperationStatistics,
    errors: Vec<OpError>,
    error_cap: usize,
    trace_rows: bool,
    disposed: bool,
}

impl Branch {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            operation: None,
            observers: Vec::new(),
            statistics: OperationStatistics::default(),
            errors: Vec::new(),
            error_cap: DEFAULT_ERROR_CAP,
            trace_rows: false,
            disposed: false,
        }
    }

    /// Register the child operation, replacing (and disposing) any previous one.
    pub fn register(&mut self, operation: Box<dyn Operation>) {
        if let Some(mut previous) = self.operation.take() {
            if !self.disposed {
                previous.dispose();
            }
            tracing::debug!(side = %self.side, replaced = previous.name(), "branch child replaced");
        }
        self.operation = Some(operation);
        self.disposed = false;
    }

    pub fn is_registered(&self) -> bool {
        self.operation.is_some()
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn statistics(&self) -> &OperationStatistics {
        &self.statistics
    }

    pub fn subscribe(&mut self, observer: impl RowObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Operation for Branch {
    fn name(&self) -> &str {
        self.operation
            .as_ref()
            .map(|op| op.name())
            .unwrap_or("unregistered branch")
    }

    fn prepare_for_execution(&mut self, ctx: &ExecutorContext) -> Result<(), OpError> {
        self.trace_rows = ctx.config.trace_rows;
        self.error_cap = ctx.config.max_collected_errors;
        match self.operation.as_mut() {
            Some(op) => op.prepare_for_execution(ctx).map_err(|e| OpError::Branch {
                side: self.side,
                source: Box::new(e),
            }),
            None => Ok(()),
        }
    }

    fn execute<'a>(&'a mut self, _input: Option<RowStream<'a>>) -> Result<RowStream<'a>, OpError> {
        let Branch {
            side,
            operation,
            observers,
            statistics,
            errors,
            error_cap,
            trace_rows,
            ..
        } = self;
        let side = *side;

        let op = operation.as_mut().ok_or_else(|| {
            OpError::Config(format!("{side} branch of a join cannot be empty"))
        })?;
        let name = op.name().to_string();

        statistics.reset();
        errors.clear();

        let inner = op
            .execute(None)
            .map_err(|e| OpError::Branch {
                side,
                source: Box::new(e),
            })?;

        Ok(Box::new(NotifyingStream {
            side,
            name,
            inner,
            observers,
            statistics,
            errors,
            error_cap: *error_cap,
            trace_rows: *trace_rows,
            finished: false,
        }))
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        if let Some(op) = self.operation.as_mut() {
            op.dispose();
            tracing::debug!(side = %self.side, operation = op.name(), "branch disposed");
        }
        self.disposed = true;
    }

    fn collect_errors(&self) -> Box<dyn Iterator<Item = &OpError> + '_> {
        let child = self.operation.iter().flat_map(|op| op.collect_errors());
        Box::new(self.errors.iter().chain(child))
    }
}

struct NotifyingStream<'a> {
    side: Side,
    name: String,
    inner: RowStream<'a>,
    observers: &'a mut Vec<Box<dyn RowObserver>>,
    statistics: &'a mut OperationStatistics,
    errors: &'a mut Vec<OpError>,
    error_cap: usize,
    trace_rows: bool,
    finished: bool,
}

impl NotifyingStream<'_> {
    fn on_row(&mut self, row: &Record) {
        self.statistics.add_row();
        if self.trace_rows {
            tracing::trace!(
                side = %self.side,
                operation = %self.name,
                row = self.statistics.rows(),
                "row processed"
            );
        }
        for observer in self.observers.iter_mut() {
            observer.on_row_processed(&self.name, row);
        }
    }

    fn on_error(&mut self, err: &OpError) {
        tracing::warn!(side = %self.side, operation = %self.name, error = %err, "branch row failed");
        if self.errors.len() < self.error_cap {
            self.errors.push(err.clone());
        }
    }

    fn on_finished(&mut self) {
        self.finished = true;
        self.statistics.mark_finished();
        tracing::debug!(
            side = %self.side,
            operation = %self.name,
            rows = self.statistics.rows(),
            "branch exhausted"
        );
        for observer in self.observers.iter_mut() {
            observer.on_finished_processing(&self.name);
        }
    }
}

impl Iterator for NotifyingStream<'_> {
    type Item = Result<Record, OpError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        self.statistics.mark_started();
        match self.inner.next() {
            Some(Ok(row)) => {
                self.on_row(&row);
                Some(Ok(row))
            }
            Some(Err(err)) => {
                self.on_error(&err);
                Some(Err(err))
            }
            None => {
                self.on_finished();
                None
            }
        }
    }
}
