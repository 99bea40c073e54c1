//! Record stores for Datapoint
//!
//! This crate implements the [`RecordStore`] contract for two media:
//! - MemoryStore: records in a process-local `Vec`
//! - CsvStore: records in a single append-only CSV file
//!
//! Both share the schema validation, filter predicate and time-ordered
//! replay defined in `datapoint-core`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod csv_store;
pub mod memory;
pub mod store;

pub use codec::FieldCodec;
pub use csv_store::{CsvStore, CsvStoreOptions, OBJECT_ID_FIELD, TIMESTAMP_FIELD};
pub use memory::MemoryStore;
pub use store::RecordStore;
