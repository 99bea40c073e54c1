//! Write-time validation is identical across backends

use crate::test_utils::*;
use datapoint::{DatapointError, FetchQuery, Record, Value};

#[test]
fn missing_timestamp_is_rejected() {
    for mut f in all_stores() {
        let err = f
            .store
            .write(Record::new().with("object_id", "a").with("value", 1i64))
            .unwrap_err();
        assert!(matches!(err, DatapointError::Schema { .. }), "{}", f.name);
        assert!(f.store.fetch(&FetchQuery::new()).unwrap().is_empty());
    }
}

#[test]
fn missing_object_id_is_rejected() {
    for mut f in all_stores() {
        let err = f
            .store
            .write(Record::new().with("timestamp", ts(0)).with("value", 1i64))
            .unwrap_err();
        assert!(matches!(err, DatapointError::Schema { .. }), "{}", f.name);
    }
}

#[test]
fn null_timestamp_counts_as_missing() {
    for mut f in all_stores() {
        let err = f
            .store
            .write(
                Record::new()
                    .with("timestamp", Value::Null)
                    .with("object_id", "a"),
            )
            .unwrap_err();
        assert!(matches!(err, DatapointError::Schema { .. }), "{}", f.name);
    }
}

#[test]
fn unparseable_timestamp_is_rejected() {
    for mut f in all_stores() {
        let err = f.store.write(point("half past nine", "a", 0)).unwrap_err();
        assert!(
            matches!(err, DatapointError::InvalidTimestamp { .. }),
            "{}",
            f.name
        );
    }
}

#[test]
fn batch_failure_leaves_earlier_records_written() {
    for mut f in all_stores() {
        let err = f
            .store
            .write_batch(vec![
                point(&ts(0), "a", 0),
                point(&ts(1), "a", 1),
                Record::new().with("timestamp", ts(2)),
                point(&ts(3), "a", 3),
            ])
            .unwrap_err();
        assert!(matches!(err, DatapointError::Schema { .. }));

        let got = f.store.fetch(&FetchQuery::new()).unwrap();
        assert_eq!(sorted_values(&got), vec![0, 1], "{}", f.name);
    }
}

#[test]
fn unrecognized_fields_are_dropped() {
    for mut f in all_stores() {
        f.store
            .write(point(&ts(0), "a", 0).with("colour", "blue"))
            .unwrap();
        let got = f.store.fetch(&FetchQuery::new()).unwrap();
        assert!(got[0].get("colour").is_none(), "{}", f.name);
    }
}

#[test]
fn json_input_with_collections_is_rejected() {
    let err = Record::from_json(serde_json::json!({
        "timestamp": "2024-01-01T00:00:00Z",
        "object_id": "a",
        "value": [1, 2, 3]
    }))
    .unwrap_err();
    assert!(matches!(err, DatapointError::Schema { .. }));
}

#[test]
fn json_input_round_trips_through_store() {
    for mut f in all_stores() {
        let record = Record::from_json(serde_json::json!({
            "timestamp": "2024-01-01T00:00:00",
            "object_id": "a",
            "value": 9
        }))
        .unwrap();
        f.store.write(record).unwrap();
        let got = f.store.fetch(&FetchQuery::new()).unwrap();
        assert_eq!(
            got[0].to_json(),
            serde_json::json!({
                "timestamp": "2024-01-01T00:00:00Z",
                "object_id": "a",
                "value": 9
            }),
            "{}",
            f.name
        );
    }
}
