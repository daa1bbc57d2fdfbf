//! Per-branch row statistics and progress observers.

use std::time::{Duration, Instant};

use rowflow_core::record::Record;

/// Counters a branch adapter keeps while its child stream is pulled.
#[derive(Debug, Clone, Default)]
pub struct OperationStatistics {
    rows: u64,
    started: Option<Instant>,
    finished: Option<Instant>,
}

impl OperationStatistics {
    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn is_finished(&self) -> bool {
        self.finished.is_some()
    }

    /// Time from the first pull to exhaustion, or to now while still running.
    pub fn duration(&self) -> Option<Duration> {
        let started = self.started?;
        Some(self.finished.unwrap_or_else(Instant::now) - started)
    }

    pub(crate) fn mark_started(&mut self) {
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
    }

    pub(crate) fn add_row(&mut self) {
        self.rows += 1;
    }

    pub(crate) fn mark_finished(&mut self) {
        self.finished = Some(Instant::now());
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Progress notifications raised by a branch adapter for its child.
pub trait RowObserver {
    fn on_row_processed(&mut self, _operation: &str, _row: &Record) {}

    fn on_finished_processing(&mut self, _operation: &str) {}
}

impl<F> RowObserver for F
where
    F: FnMut(&str, &Record),
{
    fn on_row_processed(&mut self, operation: &str, row: &Record) {
        self(operation, row)
    }
}
