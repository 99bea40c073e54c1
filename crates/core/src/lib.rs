//! Core types for Datapoint
//!
//! This crate defines everything a record store needs that does not depend
//! on the storage medium:
//! - Value / Record: flat, scalar-valued data points
//! - Timestamp: UTC-normalized instants with canonical string form
//! - Schema: recognized fields and write-time validation
//! - FetchQuery / DeleteQuery: filters shared by every backend
//! - TimeOrderedQueue: single-pass replay in timestamp order

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod query;
pub mod queue;
pub mod record;
pub mod schema;
pub mod timestamp;
pub mod value;

pub use error::{DatapointError, DatapointResult};
pub use query::{DeleteQuery, FetchQuery, RecordFilter};
pub use queue::{QueueState, TimeOrderedQueue};
pub use record::Record;
pub use schema::{Schema, SchemaBuilder, UnknownFieldPolicy};
pub use timestamp::{format_timestamp, parse_timestamp, Timestamp};
pub use value::Value;
