//! `Record`: one row flowing through a pipeline.
//!
//! Columns keep first-insertion order. Reading a column that was never set
//! returns `None`, which is distinct from a column explicitly set to
//! `Value::Null`; aggregation hooks rely on that to detect first touch.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::value::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    columns: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `set`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// `None` when the column was never set.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.columns.get_mut(name)
    }

    /// Insert or overwrite. Overwriting keeps the column's original position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.columns.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.columns.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Copy every column of `other` into `self`, overwriting shared names.
    pub fn copy_from(&mut self, other: &Record) {
        for (name, value) in &other.columns {
            self.columns.insert(name.clone(), value.clone());
        }
    }

    /// Copy only the named columns of `other`; absent ones are copied as `Null`.
    pub fn copy_columns_from(&mut self, other: &Record, names: &[String]) {
        for name in names {
            let value = other.get(name).cloned().unwrap_or(Value::Null);
            self.columns.insert(name.clone(), value);
        }
    }

    pub fn require(&self, name: &str) -> Result<&Value> {
        self.get(name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    pub fn require_i64(&self, name: &str) -> Result<i64> {
        let value = self.require(name)?;
        value.as_i64().ok_or_else(|| mismatch(name, "integer", value))
    }

    pub fn require_f64(&self, name: &str) -> Result<f64> {
        let value = self.require(name)?;
        value.as_f64().ok_or_else(|| mismatch(name, "number", value))
    }

    pub fn require_str(&self, name: &str) -> Result<&str> {
        let value = self.require(name)?;
        value.as_str().ok_or_else(|| mismatch(name, "string", value))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

fn mismatch(column: &str, expected: &'static str, found: &Value) -> Error {
    Error::TypeMismatch {
        column: column.to_string(),
        expected,
        found: found.type_name(),
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.set(k, v);
        }
        record
    }
}
