//! Grouping aggregation over pre-grouped input.

pub mod streaming;

pub use streaming::StreamingAggregation;

use rowflow_core::record::Record;

use crate::traits::OpError;

/// Hooks that define one aggregation.
///
/// `accumulate` runs once per input row, including the first row of a group
/// (after the aggregate has been seeded with that row's group columns).
/// `finish_aggregation` runs exactly once per group, right before the group
/// is emitted.
pub trait AggregationStrategy {
    /// Grouping key definition, read once per traversal.
    fn group_columns(&self) -> Result<Vec<String>, OpError>;

    fn accumulate(&mut self, row: &Record, aggregate: &mut Record) -> Result<(), OpError>;

    fn finish_aggregation(&mut self, _aggregate: &mut Record) -> Result<(), OpError> {
        Ok(())
    }
}

/// Strategy assembled from closures.
pub struct FnAggregation<A, F = fn(&mut Record) -> Result<(), OpError>> {
    columns: Vec<String>,
    accumulate: A,
    finish: Option<F>,
}

impl<A> FnAggregation<A>
where
    A: FnMut(&Record, &mut Record) -> Result<(), OpError>,
{
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>, accumulate: A) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            accumulate,
            finish: None,
        }
    }
}

impl<A, F> FnAggregation<A, F>
where
    A: FnMut(&Record, &mut Record) -> Result<(), OpError>,
    F: FnMut(&mut Record) -> Result<(), OpError>,
{
    pub fn with_finish<G>(self, finish: G) -> FnAggregation<A, G>
    where
        G: FnMut(&mut Record) -> Result<(), OpError>,
    {
        FnAggregation {
            columns: self.columns,
            accumulate: self.accumulate,
            finish: Some(finish),
        }
    }
}

impl<A, F> AggregationStrategy for FnAggregation<A, F>
where
    A: FnMut(&Record, &mut Record) -> Result<(), OpError>,
    F: FnMut(&mut Record) -> Result<(), OpError>,
{
    fn group_columns(&self) -> Result<Vec<String>, OpError> {
        Ok(self.columns.clone())
    }

    fn accumulate(&mut self, row: &Record, aggregate: &mut Record) -> Result<(), OpError> {
        (self.accumulate)(row, aggregate)
    }

    fn finish_aggregation(&mut self, aggregate: &mut Record) -> Result<(), OpError> {
        match self.finish.as_mut() {
            Some(finish) => finish(aggregate),
            None => Ok(()),
        }
    }
}
