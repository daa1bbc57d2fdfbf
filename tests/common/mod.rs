//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rowflow::prelude::*;

pub type Log = Rc<RefCell<Vec<String>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

pub fn colors(colors: &[&str]) -> Vec<Record> {
    colors
        .iter()
        .map(|c| Record::new().with("color", *c))
        .collect()
}

pub fn stream(rows: Vec<Record>) -> RowStream<'static> {
    Box::new(rows.into_iter().map(Ok))
}

/// Counts rows per group into a `count` column.
pub struct RowCountBy {
    columns: Vec<String>,
}

impl RowCountBy {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl AggregationStrategy for RowCountBy {
    fn group_columns(&self) -> Result<Vec<String>, OpError> {
        Ok(self.columns.clone())
    }

    fn accumulate(&mut self, _row: &Record, aggregate: &mut Record) -> Result<(), OpError> {
        if aggregate.get("count").is_none() {
            aggregate.set("count", 0_i64);
        }
        let count = aggregate.require_i64("count")?;
        aggregate.set("count", count + 1);
        Ok(())
    }
}

pub fn count_of(row: &Record) -> i64 {
    row.require_i64("count").unwrap()
}

pub fn str_of<'r>(row: &'r Record, column: &str) -> &'r str {
    row.require_str(column).unwrap()
}

pub fn user(id: i64, name: &str, email: &str) -> Record {
    Record::new()
        .with("id", id)
        .with("name", name)
        .with("email", email)
}

pub fn person(id: i64, email: &str) -> Record {
    Record::new().with("id", id).with("email", email)
}

/// Joins users to people on email; the merged row is the user plus `person_id`.
#[derive(Default)]
pub struct UsersToPeopleByEmail {
    pub initialized: usize,
    pub compared: usize,
    pub orphans: usize,
}

impl JoinStrategy for UsersToPeopleByEmail {
    fn initialize(&mut self) -> Result<(), OpError> {
        self.initialized += 1;
        Ok(())
    }

    fn match_join_condition(&mut self, left: &Record, right: &Record) -> Result<bool, OpError> {
        self.compared += 1;
        Ok(left.get("email") == right.get("email"))
    }

    fn merge_rows(&mut self, left: &Record, right: &Record) -> Result<Record, OpError> {
        let mut row = Record::new();
        row.copy_from(left);
        row.set("person_id", right.require("id")?.clone());
        Ok(row)
    }

    fn left_orphan_row(&mut self, _row: &Record) {
        self.orphans += 1;
    }

    fn right_orphan_row(&mut self, _row: &Record) {
        self.orphans += 1;
    }
}

/// Source operation that logs its lifecycle calls and counts pulled rows.
pub struct Probe {
    name: String,
    rows: Vec<Result<Record, OpError>>,
    errors: Vec<OpError>,
    prepare_error: Option<OpError>,
    log: Log,
    pulled: Rc<Cell<usize>>,
}

impl Probe {
    pub fn new(name: &str, rows: Vec<Record>, log: &Log) -> Self {
        Self {
            name: name.to_string(),
            rows: rows.into_iter().map(Ok).collect(),
            errors: Vec::new(),
            prepare_error: None,
            log: log.clone(),
            pulled: Rc::new(Cell::new(0)),
        }
    }

    /// Append a row that fails when pulled.
    pub fn failing_with(mut self, err: OpError) -> Self {
        self.rows.push(Err(err));
        self
    }

    /// Error returned from `prepare_for_execution`.
    pub fn failing_prepare(mut self, err: OpError) -> Self {
        self.prepare_error = Some(err);
        self
    }

    /// Errors reported through `collect_errors`.
    pub fn collected(mut self, errors: Vec<OpError>) -> Self {
        self.errors = errors;
        self
    }

    pub fn pulled(&self) -> Rc<Cell<usize>> {
        self.pulled.clone()
    }
}

impl Operation for Probe {
    fn name(&self) -> &str {
        &self.name
    }

    fn prepare_for_execution(&mut self, _ctx: &ExecutorContext) -> Result<(), OpError> {
        self.log.borrow_mut().push(format!("prepare {}", self.name));
        match self.prepare_error.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn execute<'a>(&'a mut self, _input: Option<RowStream<'a>>) -> Result<RowStream<'a>, OpError> {
        self.log.borrow_mut().push(format!("execute {}", self.name));
        let pulled = self.pulled.clone();
        Ok(Box::new(self.rows.iter().cloned().inspect(move |_| {
            pulled.set(pulled.get() + 1);
        })))
    }

    fn dispose(&mut self) {
        self.log.borrow_mut().push(format!("dispose {}", self.name));
    }

    fn collect_errors(&self) -> Box<dyn Iterator<Item = &OpError> + '_> {
        Box::new(self.errors.iter())
    }
}
