//! Datapoint: record timestamped, object-tagged data points and replay them
//! in time order.
//!
//! ```ignore
//! use datapoint::{FetchQuery, MemoryStore, Record, RecordStore, Schema};
//!
//! let schema = Schema::configure(Some("timestamp"), Some("object_id"), None)?;
//! let mut store = MemoryStore::new(schema);
//! store.write(
//!     Record::new()
//!         .with("timestamp", "2024-01-02T00:00:00Z")
//!         .with("object_id", "sensor-1")
//!         .with("temperature", 21.5),
//! )?;
//!
//! for record in store.to_time_ordered_queue(&FetchQuery::new().object_ids(["sensor-1"]))? {
//!     println!("{}", record.to_json());
//! }
//! ```
//!
//! Stores can also be described in TOML and opened through [`open_store`],
//! which hands back a `Box<dyn RecordStore>`.

#![warn(missing_docs)]

pub mod config;
mod types;

pub use config::{open_store, StoreConfig};
pub use types::*;
