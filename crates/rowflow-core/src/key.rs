//! Composite group keys.
//!
//! A `GroupKey` is a snapshot of an ordered list of column values taken from
//! one record. Two keys are equal iff every value is equal pairwise; a NaN
//! float equals another NaN of the same width, so NaN rows still group.
//! Absent columns contribute `Value::Null`.

use serde::{Deserialize, Serialize};

use crate::record::Record;
use crate::value::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupKey {
    values: Vec<Value>,
}

impl GroupKey {
    pub fn from_record(columns: &[String], record: &Record) -> Self {
        let values = columns
            .iter()
            .map(|name| record.get(name).cloned().unwrap_or(Value::Null))
            .collect();
        Self { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| key_value_eq(a, b))
    }
}

impl Eq for GroupKey {}

fn key_value_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::F32(x), Value::F32(y)) => x == y || (x.is_nan() && y.is_nan()),
        (Value::F64(x), Value::F64(y)) => x == y || (x.is_nan() && y.is_nan()),
        _ => a == b,
    }
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, ")")
    }
}
