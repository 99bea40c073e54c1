//! Public types for the Datapoint API.
//!
//! This module re-exports types from the internal crates with a single
//! import path.

// ============================================================================
// Data model
// ============================================================================

pub use datapoint_core::Record;
pub use datapoint_core::Value;
pub use datapoint_core::Timestamp;
pub use datapoint_core::{format_timestamp, parse_timestamp};

// Schema and validation
pub use datapoint_core::{Schema, SchemaBuilder, UnknownFieldPolicy};

// Queries and replay
pub use datapoint_core::{DeleteQuery, FetchQuery, RecordFilter};
pub use datapoint_core::{QueueState, TimeOrderedQueue};

// Errors
pub use datapoint_core::{DatapointError, DatapointResult};

// ============================================================================
// Stores
// ============================================================================

pub use datapoint_storage::RecordStore;
pub use datapoint_storage::MemoryStore;
pub use datapoint_storage::{CsvStore, CsvStoreOptions, FieldCodec};
pub use datapoint_storage::{OBJECT_ID_FIELD, TIMESTAMP_FIELD};
