//! Fetch and delete queries
//!
//! Both backends share the same predicate: a record matches when
//!
//! ```text
//! (no start or ts >= start) AND (no end or ts <= end) AND (no ids or id in ids)
//! ```
//!
//! Queries carry raw timestamp strings; [`FetchQuery::resolve`] parses them
//! against a [`Schema`] and checks that the filters are supported, producing a
//! [`RecordFilter`] the store applies row by row.

use crate::error::{DatapointError, DatapointResult};
use crate::record::Record;
use crate::schema::Schema;
use crate::timestamp::Timestamp;
use crate::value::Value;

/// Filter and projection arguments for `fetch`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchQuery {
    /// Inclusive lower time bound
    pub start_time: Option<String>,
    /// Inclusive upper time bound
    pub end_time: Option<String>,
    /// Object IDs to include
    pub object_ids: Option<Vec<Value>>,
    /// Fields to return
    pub fields: Option<Vec<String>>,
}

impl FetchQuery {
    /// A query matching every record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the inclusive start time
    pub fn start_time(mut self, ts: impl Into<String>) -> Self {
        self.start_time = Some(ts.into());
        self
    }

    /// Set the inclusive end time
    pub fn end_time(mut self, ts: impl Into<String>) -> Self {
        self.end_time = Some(ts.into());
        self
    }

    /// Restrict to these object IDs
    pub fn object_ids<I, V>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.object_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Return only these fields
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Parse bounds and check the filters against the schema
    ///
    /// # Errors
    ///
    /// - `UnsupportedQuery` if a time bound is given without a timestamp
    ///   field, or object IDs without an object-id field
    /// - `InvalidTimestamp` if a bound cannot be parsed
    pub fn resolve(&self, schema: &Schema) -> DatapointResult<RecordFilter> {
        let mut filter = RecordFilter::default();

        if self.start_time.is_some() || self.end_time.is_some() {
            let field = schema.require_timestamp_field("filtering by time")?;
            filter.timestamp_field = Some(field.to_string());
            filter.start = self.start_time.as_deref().map(Timestamp::parse).transpose()?;
            filter.end = self.end_time.as_deref().map(Timestamp::parse).transpose()?;
        }

        if let Some(ids) = &self.object_ids {
            let field = schema.require_object_id_field("filtering by object ID")?;
            filter.object_id_field = Some(field.to_string());
            filter.object_ids = Some(ids.clone());
        }

        filter.fields = self.fields.clone();
        Ok(filter)
    }
}

/// Arguments for `delete`; every argument is mandatory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteQuery {
    /// Inclusive lower time bound
    pub start_time: Option<String>,
    /// Inclusive upper time bound
    pub end_time: Option<String>,
    /// Object IDs to delete
    pub object_ids: Option<Vec<Value>>,
}

impl DeleteQuery {
    /// Build a complete delete query
    pub fn new<I, V>(start_time: impl Into<String>, end_time: impl Into<String>, object_ids: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        DeleteQuery {
            start_time: Some(start_time.into()),
            end_time: Some(end_time.into()),
            object_ids: Some(object_ids.into_iter().map(Into::into).collect()),
        }
    }

    /// Check arguments and schema, producing the deletion predicate
    ///
    /// # Errors
    ///
    /// - `Validation` if any argument is missing
    /// - `UnsupportedQuery` if the schema lacks a timestamp or object-id field
    /// - `InvalidTimestamp` if a bound cannot be parsed
    pub fn resolve(&self, schema: &Schema) -> DatapointResult<RecordFilter> {
        let (Some(start), Some(end), Some(ids)) =
            (&self.start_time, &self.end_time, &self.object_ids)
        else {
            let missing: Vec<&str> = [
                ("start_time", self.start_time.is_none()),
                ("end_time", self.end_time.is_none()),
                ("object_ids", self.object_ids.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect();
            return Err(DatapointError::validation(format!(
                "delete requires start_time, end_time and object_ids (missing: {})",
                missing.join(", ")
            )));
        };

        let timestamp_field = schema.require_timestamp_field("delete")?;
        let object_id_field = schema.require_object_id_field("delete")?;

        Ok(RecordFilter {
            timestamp_field: Some(timestamp_field.to_string()),
            start: Some(Timestamp::parse(start)?),
            end: Some(Timestamp::parse(end)?),
            object_id_field: Some(object_id_field.to_string()),
            object_ids: Some(ids.clone()),
            fields: None,
        })
    }
}

/// A resolved, schema-checked predicate plus optional projection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    timestamp_field: Option<String>,
    start: Option<Timestamp>,
    end: Option<Timestamp>,
    object_id_field: Option<String>,
    object_ids: Option<Vec<Value>>,
    fields: Option<Vec<String>>,
}

impl RecordFilter {
    /// Whether the filter matches every record
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none() && self.object_ids.is_none()
    }

    /// Evaluate the predicate
    ///
    /// A record whose timestamp is missing or unparseable never matches a
    /// time bound; a record without an object ID never matches an ID set.
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(field) = &self.timestamp_field {
            if self.start.is_some() || self.end.is_some() {
                let Some(ts) = record
                    .get_present(field)
                    .and_then(|v| v.to_timestamp().ok())
                else {
                    return false;
                };
                if self.start.is_some_and(|start| ts < start) {
                    return false;
                }
                if self.end.is_some_and(|end| ts > end) {
                    return false;
                }
            }
        }

        if let (Some(field), Some(ids)) = (&self.object_id_field, &self.object_ids) {
            match record.get_present(field) {
                Some(id) if ids.contains(id) => {}
                _ => return false,
            }
        }

        true
    }

    /// Apply the projection, if any
    pub fn project(&self, record: Record) -> Record {
        match &self.fields {
            Some(fields) => record.project(fields),
            None => record,
        }
    }

    /// Filter then project a single record
    pub fn apply(&self, record: Record) -> Option<Record> {
        self.matches(&record).then(|| self.project(record))
    }
}
