//! Records: flat field-name to value mappings

use crate::error::{DatapointError, DatapointResult};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};

/// One data point
///
/// Fields are kept in name order so equality and debug output do not depend
/// on insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, Value>);

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Record(BTreeMap::new())
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Insert or replace a field, returning the previous value
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    /// Remove a field
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    /// Look up a field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Look up a field, treating `Null` as absent
    pub fn get_present(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|v| !v.is_null())
    }

    /// Whether the field is present with a non-null value
    pub fn has(&self, field: &str) -> bool {
        self.get_present(field).is_some()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over field names
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate over fields
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Keep only fields for which `keep` returns true
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &Value) -> bool) {
        self.0.retain(|k, v| keep(k, v));
    }

    /// Copy of this record restricted to the given field names
    pub fn project<S: AsRef<str>>(&self, fields: &[S]) -> Record {
        let mut out = Record::new();
        for field in fields {
            if let Some(value) = self.0.get(field.as_ref()) {
                out.0.insert(field.as_ref().to_string(), value.clone());
            }
        }
        out
    }

    /// Build a record from a JSON object
    ///
    /// Fails with a schema error if the input is not an object or any field
    /// holds a collection.
    pub fn from_json(value: serde_json::Value) -> DatapointResult<Self> {
        match value {
            serde_json::Value::Object(map) => {
                let mut record = Record::new();
                for (field, v) in map {
                    let v = Value::from_json(v).map_err(|e| {
                        DatapointError::schema(format!("field '{field}': {e}"))
                    })?;
                    record.0.insert(field, v);
                }
                Ok(record)
            }
            other => Err(DatapointError::schema(format!(
                "a record must be a JSON object, got {other}"
            ))),
        }
    }

    /// Render as a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl TryFrom<serde_json::Value> for Record {
    type Error = DatapointError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Record::from_json(value)
    }
}
