//! CSV stores survive close and reopen

use crate::test_utils::*;
use chrono::{TimeZone, Utc};
use datapoint::{
    CsvStore, CsvStoreOptions, DatapointError, FetchQuery, FieldCodec, Record, RecordStore,
    Timestamp, Value,
};
use tempfile::TempDir;

fn options() -> CsvStoreOptions {
    CsvStoreOptions::new()
        .data_fields(["temperature", "count", "online", "label"])
        .codec("temperature", FieldCodec::float())
        .codec("count", FieldCodec::integer())
        .codec("online", FieldCodec::boolean())
}

#[test]
fn three_records_survive_reopen() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("durable.csv");

    let records = vec![
        Record::new()
            .with("timestamp", "2024-01-01T00:00:00.123456Z")
            .with("object_id", "sensor-1")
            .with("temperature", 0.1 + 0.2)
            .with("count", i64::MAX)
            .with("online", true)
            .with("label", "comma, \"quoted\"\nnewline"),
        Record::new()
            .with("timestamp", "2024-01-02T08:30:00+08:00")
            .with("object_id", "sensor-2")
            .with("temperature", -273.15)
            .with("count", -1i64)
            .with("online", false)
            .with("label", "ünïcødé"),
        Record::new()
            .with("timestamp", "2024-01-03")
            .with("object_id", "sensor-1")
            .with("temperature", 1e-10)
            .with("count", 0i64),
    ];

    {
        let mut store = CsvStore::open(&path, options()).unwrap();
        store.write_batch(records.clone()).unwrap();
    }

    let store = CsvStore::open(&path, options()).unwrap();
    let mut got = store.fetch(&FetchQuery::new()).unwrap();
    got.sort_by_key(|r| r.get("timestamp").unwrap().to_timestamp().unwrap());

    let expected: Vec<Record> = records
        .into_iter()
        .map(|r| store.schema().validate(r).unwrap())
        .collect();
    assert_eq!(got, expected);

    assert_eq!(
        got[1].get("timestamp"),
        Some(&Value::Timestamp(Timestamp::from_datetime(
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 30, 0).unwrap()
        )))
    );
    assert_eq!(got[0].get("temperature"), Some(&Value::Float(0.1 + 0.2)));
}

#[test]
fn appends_across_sessions() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sessions.csv");

    for hour in 0..3 {
        let mut store = CsvStore::open(&path, csv_options()).unwrap();
        store.write(point(&ts(hour), "a", hour as i64)).unwrap();
    }

    let store = CsvStore::open(&path, csv_options()).unwrap();
    let got = store.fetch(&FetchQuery::new()).unwrap();
    assert_eq!(sorted_values(&got), vec![0, 1, 2]);
}

#[test]
fn reopening_with_another_layout_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("layout.csv");
    CsvStore::open(&path, csv_options()).unwrap();

    let err = CsvStore::open(&path, csv_options().object_series(false)).unwrap_err();
    match err {
        DatapointError::SchemaMismatch {
            expected, found, ..
        } => {
            assert_eq!(expected, vec!["timestamp", "value"]);
            assert_eq!(found, vec!["timestamp", "object_id", "value"]);
        }
        other => panic!("expected SchemaMismatch, got {other:?}"),
    }
}

#[test]
fn hand_written_file_is_readable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("manual.csv");
    std::fs::write(
        &path,
        "timestamp,object_id,value\n2024-01-01T00:00:00,a,1\n2024-01-01 01:00:00+01:00,b,\n",
    )
    .unwrap();

    let store = CsvStore::open(&path, csv_options()).unwrap();
    let got = store.fetch(&FetchQuery::new()).unwrap();
    assert_eq!(got.len(), 2);
    // Both rows are at midnight UTC
    let midnight = Timestamp::parse("2024-01-01T00:00:00Z").unwrap();
    for record in &got {
        assert_eq!(record.get("timestamp"), Some(&Value::Timestamp(midnight)));
    }
    assert!(got[1].get("value").is_none());
}
