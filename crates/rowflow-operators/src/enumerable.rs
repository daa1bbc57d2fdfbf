//! Source operation over an in-memory list of rows.

use rowflow_core::record::Record;

use crate::traits::{OpError, Operation, RowStream};

/// Replays an owned list of rows each time it is executed. Ignores its input.
pub struct EnumerableOperation {
    name: String,
    rows: Vec<Record>,
}

impl EnumerableOperation {
    pub fn new(name: impl Into<String>, rows: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }
}

impl Operation for EnumerableOperation {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute<'a>(&'a mut self, _input: Option<RowStream<'a>>) -> Result<RowStream<'a>, OpError> {
        Ok(Box::new(self.rows.iter().cloned().map(Ok)))
    }
}
