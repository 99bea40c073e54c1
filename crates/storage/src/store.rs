//! The record store contract
//!
//! Every backend implements [`RecordStore`]; callers are expected to depend on
//! `dyn RecordStore` rather than a concrete backend.
//!
//! ## Error Handling
//!
//! | Condition | Error |
//! |-----------|-------|
//! | Record missing timestamp / object-id field | `Schema` |
//! | Unrecognized field under `Reject` | `Schema` |
//! | Time bound without a timestamp field | `UnsupportedQuery` |
//! | Object IDs without an object-id field | `UnsupportedQuery` |
//! | Time ordering without a timestamp field | `UnsupportedQuery` |
//! | Delete argument omitted | `Validation` |
//! | Unparseable timestamp | `InvalidTimestamp` |
//!
//! ## Concurrency
//!
//! Stores are single-writer. Mutating operations take `&mut self`; sharing a
//! store across threads requires the caller to wrap it in a mutex.

use datapoint_core::{
    DatapointResult, DeleteQuery, FetchQuery, Record, Schema, TimeOrderedQueue,
};

/// Storage-agnostic record store
pub trait RecordStore {
    /// Schema the store validates against
    fn schema(&self) -> &Schema;

    /// Validate and append a batch of records
    ///
    /// Records are validated one at a time. The first invalid record stops the
    /// batch and its error is returned; records before it in the same batch
    /// remain written.
    fn write_batch(&mut self, records: Vec<Record>) -> DatapointResult<()>;

    /// Validate and append a single record
    fn write(&mut self, record: Record) -> DatapointResult<()> {
        self.write_batch(vec![record])
    }

    /// Return every record matching the query
    ///
    /// Time bounds are inclusive. When `fields` is set each result holds only
    /// the requested fields it actually has. Result order is the store's native
    /// order and is not guaranteed.
    fn fetch(&self, query: &FetchQuery) -> DatapointResult<Vec<Record>>;

    /// Fetch with `query` and replay the result in timestamp order
    ///
    /// The queue is a snapshot: later writes are not visible through it.
    fn to_time_ordered_queue(&self, query: &FetchQuery) -> DatapointResult<TimeOrderedQueue> {
        let timestamp_field = self
            .schema()
            .require_timestamp_field("time-ordered iteration")?
            .to_string();
        let records = self.fetch(query)?;
        TimeOrderedQueue::new(records, &timestamp_field)
    }

    /// Delete records with `start <= timestamp <= end` and an object ID in the set
    ///
    /// Only available on stores with both a timestamp and an object-id field.
    /// Returns the number of records removed.
    fn delete(&mut self, query: &DeleteQuery) -> DatapointResult<usize>;
}
