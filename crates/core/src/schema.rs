//! Field schema and record validation
//!
//! A [`Schema`] names the fields a store recognizes:
//!
//! - an optional timestamp field, which enables time-range queries and
//!   time-ordered replay
//! - an optional object-id field, which enables object-id filtering
//! - an optional list of other fields
//!
//! When a list of other fields is configured the field set is closed and the
//! [`UnknownFieldPolicy`] decides what happens to anything else. Without such
//! a list every field is accepted.
//!
//! Configuration is checked once, in [`Schema::configure`].

use crate::error::{DatapointError, DatapointResult};
use crate::record::Record;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// What to do with fields outside a closed field list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFieldPolicy {
    /// Silently remove unrecognized fields (default)
    #[default]
    Drop,
    /// Fail the write with a schema error
    Reject,
}

/// Recognized field names for a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    timestamp_field: Option<String>,
    object_id_field: Option<String>,
    other_fields: Option<Vec<String>>,
    unknown_fields: UnknownFieldPolicy,
}

impl Schema {
    /// Validate and build a schema
    ///
    /// # Errors
    ///
    /// `Config` if a name is empty, if the timestamp and object-id fields
    /// share a name, if an other field reuses either of them, or if an other
    /// field is listed twice.
    pub fn configure(
        timestamp_field: Option<&str>,
        object_id_field: Option<&str>,
        other_fields: Option<Vec<String>>,
    ) -> DatapointResult<Self> {
        validate_configuration(timestamp_field, object_id_field, other_fields.as_deref())?;
        Ok(Schema {
            timestamp_field: timestamp_field.map(str::to_string),
            object_id_field: object_id_field.map(str::to_string),
            other_fields,
            unknown_fields: UnknownFieldPolicy::default(),
        })
    }

    /// Start building a schema
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Set the unknown-field policy
    pub fn with_unknown_field_policy(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_fields = policy;
        self
    }

    /// The designated timestamp field
    pub fn timestamp_field(&self) -> Option<&str> {
        self.timestamp_field.as_deref()
    }

    /// The designated object-id field
    pub fn object_id_field(&self) -> Option<&str> {
        self.object_id_field.as_deref()
    }

    /// The configured other fields, `None` when the field set is open
    pub fn other_fields(&self) -> Option<&[String]> {
        self.other_fields.as_deref()
    }

    /// The unknown-field policy
    pub fn unknown_field_policy(&self) -> UnknownFieldPolicy {
        self.unknown_fields
    }

    /// Whether time-range queries and time ordering are available
    pub fn is_time_series(&self) -> bool {
        self.timestamp_field.is_some()
    }

    /// Whether object-id filtering is available
    pub fn is_object_series(&self) -> bool {
        self.object_id_field.is_some()
    }

    /// Whether the field list is closed
    pub fn is_closed(&self) -> bool {
        self.other_fields.is_some()
    }

    /// All configured field names: timestamp, object id, then the others
    pub fn field_names(&self) -> Vec<String> {
        self.timestamp_field
            .iter()
            .chain(self.object_id_field.iter())
            .chain(self.other_fields.iter().flatten())
            .cloned()
            .collect()
    }

    /// Whether a field name is accepted by this schema
    pub fn is_recognized(&self, field: &str) -> bool {
        match &self.other_fields {
            None => true,
            Some(others) => {
                self.timestamp_field.as_deref() == Some(field)
                    || self.object_id_field.as_deref() == Some(field)
                    || others.iter().any(|f| f == field)
            }
        }
    }

    /// The timestamp field, or `UnsupportedQuery` naming the operation
    pub fn require_timestamp_field(&self, operation: &str) -> DatapointResult<&str> {
        self.timestamp_field().ok_or_else(|| {
            DatapointError::unsupported_query(format!(
                "{operation} requires a timestamp field, but none is configured"
            ))
        })
    }

    /// The object-id field, or `UnsupportedQuery` naming the operation
    pub fn require_object_id_field(&self, operation: &str) -> DatapointResult<&str> {
        self.object_id_field().ok_or_else(|| {
            DatapointError::unsupported_query(format!(
                "{operation} requires an object ID field, but none is configured"
            ))
        })
    }

    /// Check a record against the schema and normalize it
    ///
    /// A string timestamp is parsed into `Value::Timestamp`. Under
    /// [`UnknownFieldPolicy::Drop`] unrecognized fields are removed from the
    /// returned record.
    ///
    /// # Errors
    ///
    /// - `Schema` if the timestamp or object-id field is missing or null
    /// - `Schema` if an unrecognized field is present under `Reject`
    /// - `InvalidTimestamp` if the timestamp value cannot be parsed
    pub fn validate(&self, mut record: Record) -> DatapointResult<Record> {
        if let Some(field) = self.timestamp_field.as_deref() {
            let ts = match record.get_present(field) {
                Some(value) => value.to_timestamp()?,
                None => {
                    return Err(DatapointError::schema(format!(
                        "record is missing timestamp field '{field}'"
                    )))
                }
            };
            record.insert(field, Value::Timestamp(ts));
        }

        if let Some(field) = self.object_id_field.as_deref() {
            if !record.has(field) {
                return Err(DatapointError::schema(format!(
                    "record is missing object ID field '{field}'"
                )));
            }
        }

        if self.is_closed() {
            match self.unknown_fields {
                UnknownFieldPolicy::Drop => record.retain(|name, _| self.is_recognized(name)),
                UnknownFieldPolicy::Reject => {
                    let unknown: Vec<&str> = record
                        .field_names()
                        .filter(|name| !self.is_recognized(name))
                        .collect();
                    if !unknown.is_empty() {
                        return Err(DatapointError::schema(format!(
                            "unrecognized fields: {}",
                            unknown.join(", ")
                        )));
                    }
                }
            }
        }

        Ok(record)
    }
}

/// Builder for [`Schema`]
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    timestamp_field: Option<String>,
    object_id_field: Option<String>,
    other_fields: Option<Vec<String>>,
    unknown_fields: UnknownFieldPolicy,
}

impl SchemaBuilder {
    /// Designate the timestamp field
    pub fn timestamp_field(mut self, name: impl Into<String>) -> Self {
        self.timestamp_field = Some(name.into());
        self
    }

    /// Designate the object-id field
    pub fn object_id_field(mut self, name: impl Into<String>) -> Self {
        self.object_id_field = Some(name.into());
        self
    }

    /// Close the field set with these other fields
    pub fn other_fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.other_fields = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Set the unknown-field policy
    pub fn unknown_fields(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_fields = policy;
        self
    }

    /// Validate and build
    pub fn build(self) -> DatapointResult<Schema> {
        Ok(Schema::configure(
            self.timestamp_field.as_deref(),
            self.object_id_field.as_deref(),
            self.other_fields,
        )?
        .with_unknown_field_policy(self.unknown_fields))
    }
}

fn validate_configuration(
    timestamp_field: Option<&str>,
    object_id_field: Option<&str>,
    other_fields: Option<&[String]>,
) -> DatapointResult<()> {
    let reserved: Vec<&str> = timestamp_field.into_iter().chain(object_id_field).collect();

    if reserved.iter().any(|name| name.is_empty()) {
        return Err(DatapointError::config("field names must not be empty"));
    }
    if let (Some(ts), Some(id)) = (timestamp_field, object_id_field) {
        if ts == id {
            return Err(DatapointError::config(format!(
                "timestamp field and object ID field cannot both be named '{ts}'"
            )));
        }
    }

    let mut seen = HashSet::new();
    for name in other_fields.unwrap_or_default() {
        if name.is_empty() {
            return Err(DatapointError::config("field names must not be empty"));
        }
        if reserved.contains(&name.as_str()) {
            return Err(DatapointError::config(format!(
                "field name '{name}' is reserved"
            )));
        }
        if !seen.insert(name.as_str()) {
            return Err(DatapointError::config(format!(
                "field name '{name}' is listed more than once"
            )));
        }
    }

    Ok(())
}
