//! Shared fixtures for the conformance suite

use datapoint::{
    CsvStore, CsvStoreOptions, FieldCodec, MemoryStore, Record, RecordStore, Schema, Value,
};
use tempfile::TempDir;

/// Install a test-friendly subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// A store plus whatever must outlive it
pub struct Fixture {
    pub name: &'static str,
    pub store: Box<dyn RecordStore>,
    _dir: Option<TempDir>,
}

pub fn memory_store() -> Fixture {
    let schema = Schema::configure(
        Some("timestamp"),
        Some("object_id"),
        Some(vec!["value".to_string()]),
    )
    .unwrap();
    Fixture {
        name: "memory",
        store: Box::new(MemoryStore::new(schema)),
        _dir: None,
    }
}

pub fn csv_options() -> CsvStoreOptions {
    CsvStoreOptions::new()
        .data_fields(["value"])
        .codec("value", FieldCodec::integer())
}

pub fn csv_store() -> Fixture {
    let dir = TempDir::new().unwrap();
    let store = CsvStore::open(dir.path().join("points.csv"), csv_options()).unwrap();
    Fixture {
        name: "csv",
        store: Box::new(store),
        _dir: Some(dir),
    }
}

/// One fresh store per backend
pub fn all_stores() -> Vec<Fixture> {
    init_tracing();
    vec![memory_store(), csv_store()]
}

pub fn ts(hour: u32) -> String {
    format!("2024-01-01T{hour:02}:00:00Z")
}

pub fn point(timestamp: &str, object_id: &str, value: i64) -> Record {
    Record::new()
        .with("timestamp", timestamp)
        .with("object_id", object_id)
        .with("value", value)
}

pub fn value_of(record: &Record) -> i64 {
    record.get("value").and_then(Value::as_i64).unwrap()
}

pub fn sorted_values(records: &[Record]) -> Vec<i64> {
    let mut values: Vec<i64> = records.iter().map(value_of).collect();
    values.sort_unstable();
    values
}
