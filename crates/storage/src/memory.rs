//! In-memory record store
//!
//! Holds records in a `Vec` in insertion order. Every fetch is a linear scan,
//! which is fine for tests and prototyping but not for large data sets.

use crate::store::RecordStore;
use datapoint_core::{DatapointResult, DeleteQuery, FetchQuery, Record, Schema};
use tracing::debug;

/// Record store backed by process memory
#[derive(Debug, Clone)]
pub struct MemoryStore {
    schema: Schema,
    records: Vec<Record>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            records: Vec::new(),
        }
    }

    /// Number of stored records
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn write_batch(&mut self, records: Vec<Record>) -> DatapointResult<()> {
        let mut written = 0usize;
        for record in records {
            let before = record.len();
            let record = self.schema.validate(record)?;
            if record.len() < before {
                debug!(
                    target: "datapoint::storage",
                    dropped = before - record.len(),
                    "Dropped unrecognized fields"
                );
            }
            self.records.push(record);
            written += 1;
        }
        debug!(target: "datapoint::storage", written, total = self.records.len(), "Memory write");
        Ok(())
    }

    fn fetch(&self, query: &FetchQuery) -> DatapointResult<Vec<Record>> {
        let filter = query.resolve(&self.schema)?;
        let results: Vec<Record> = self
            .records
            .iter()
            .filter(|r| filter.matches(r))
            .map(|r| filter.project(r.clone()))
            .collect();
        debug!(
            target: "datapoint::storage",
            scanned = self.records.len(),
            matched = results.len(),
            "Memory fetch"
        );
        Ok(results)
    }

    fn delete(&mut self, query: &DeleteQuery) -> DatapointResult<usize> {
        let filter = query.resolve(&self.schema)?;
        let before = self.records.len();
        self.records.retain(|r| !filter.matches(r));
        let removed = before - self.records.len();
        debug!(target: "datapoint::storage", removed, "Memory delete");
        Ok(removed)
    }
}
