//! Store configuration
//!
//! A [`StoreConfig`] describes which backend to open and with which fields.
//! It deserializes from TOML:
//!
//! ```toml
//! backend = "csv"
//! path = "readings.csv"
//! time_series = true
//! object_series = true
//! fields = ["temperature", "humidity"]
//! unknown_fields = "drop"
//! ```
//!
//! ```toml
//! backend = "memory"
//! timestamp_field = "ts"
//! object_id_field = "device"
//! ```
//!
//! Field codecs cannot be expressed in TOML; build a [`CsvStore`] directly
//! with [`CsvStoreOptions`] when they are needed.

use datapoint_core::{DatapointError, DatapointResult, Schema, UnknownFieldPolicy};
use datapoint_storage::{CsvStore, CsvStoreOptions, MemoryStore, RecordStore};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Backend selection and schema settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Records held in process memory
    Memory {
        /// Name of the timestamp field, if any
        #[serde(default)]
        timestamp_field: Option<String>,
        /// Name of the object-id field, if any
        #[serde(default)]
        object_id_field: Option<String>,
        /// Closed list of other fields; omit to accept any field
        #[serde(default)]
        fields: Option<Vec<String>>,
        /// Handling of fields outside a closed list
        #[serde(default)]
        unknown_fields: UnknownFieldPolicy,
    },
    /// Records in a CSV file
    Csv {
        /// Path of the backing file
        path: PathBuf,
        /// Include the `timestamp` column
        #[serde(default = "default_true")]
        time_series: bool,
        /// Include the `object_id` column
        #[serde(default = "default_true")]
        object_series: bool,
        /// Data columns after `timestamp` and `object_id`
        #[serde(default)]
        fields: Vec<String>,
        /// Handling of fields without a column
        #[serde(default)]
        unknown_fields: UnknownFieldPolicy,
    },
}

fn default_true() -> bool {
    true
}

impl StoreConfig {
    /// Parse a TOML document
    pub fn from_toml_str(s: &str) -> DatapointResult<Self> {
        toml::from_str(s).map_err(|e| DatapointError::config(format!("invalid store config: {e}")))
    }

    /// Read and parse a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> DatapointResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DatapointError::io(format!("reading {}", path.display()), e))?;
        Self::from_toml_str(&contents)
    }

    /// Open the described store
    pub fn open(&self) -> DatapointResult<Box<dyn RecordStore>> {
        match self {
            StoreConfig::Memory {
                timestamp_field,
                object_id_field,
                fields,
                unknown_fields,
            } => {
                let schema = Schema::configure(
                    timestamp_field.as_deref(),
                    object_id_field.as_deref(),
                    fields.clone(),
                )?
                .with_unknown_field_policy(*unknown_fields);
                info!(target: "datapoint", fields = ?schema.field_names(), "Opening memory store");
                Ok(Box::new(MemoryStore::new(schema)))
            }
            StoreConfig::Csv {
                path,
                time_series,
                object_series,
                fields,
                unknown_fields,
            } => {
                let options = CsvStoreOptions::new()
                    .time_series(*time_series)
                    .object_series(*object_series)
                    .data_fields(fields.iter().cloned())
                    .unknown_fields(*unknown_fields);
                info!(target: "datapoint", path = %path.display(), "Opening CSV store");
                Ok(Box::new(CsvStore::open(path, options)?))
            }
        }
    }
}

/// Open the store described by `config`
pub fn open_store(config: &StoreConfig) -> DatapointResult<Box<dyn RecordStore>> {
    config.open()
}
