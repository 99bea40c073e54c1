//! delete removes exactly the records inside the interval with a listed ID

use crate::test_utils::*;
use datapoint::{DatapointError, DeleteQuery, FetchQuery, Value};

#[test]
fn delete_removes_only_matching_record() {
    for mut f in all_stores() {
        f.store
            .write_batch(vec![
                point("2024-01-01T00:00:00Z", "a", 1),
                point("2024-01-02T00:00:00Z", "b", 2),
            ])
            .unwrap();

        let removed = f
            .store
            .delete(&DeleteQuery::new(
                "2024-01-01T00:00:00Z",
                "2024-01-01T23:59:59Z",
                ["a"],
            ))
            .unwrap();
        assert_eq!(removed, 1, "{}", f.name);

        let rest = f.store.fetch(&FetchQuery::new()).unwrap();
        assert_eq!(rest.len(), 1, "{}", f.name);
        assert_eq!(rest[0].get("object_id"), Some(&Value::from("b")));
        assert_eq!(value_of(&rest[0]), 2);
    }
}

#[test]
fn delete_keeps_other_ids_inside_interval_and_same_id_outside() {
    for mut f in all_stores() {
        f.store
            .write_batch(vec![
                point(&ts(1), "a", 0),
                point(&ts(2), "b", 1),
                point(&ts(3), "a", 2),
                point(&ts(8), "a", 3),
                point(&ts(0), "a", 4),
            ])
            .unwrap();

        let removed = f
            .store
            .delete(&DeleteQuery::new(ts(1), ts(3), ["a"]))
            .unwrap();
        assert_eq!(removed, 2, "{}", f.name);

        let rest = f.store.fetch(&FetchQuery::new()).unwrap();
        assert_eq!(sorted_values(&rest), vec![1, 3, 4], "{}", f.name);
    }
}

#[test]
fn delete_with_no_matches_changes_nothing() {
    for mut f in all_stores() {
        f.store.write(point(&ts(5), "a", 0)).unwrap();
        let removed = f
            .store
            .delete(&DeleteQuery::new(ts(6), ts(7), ["a"]))
            .unwrap();
        assert_eq!(removed, 0);
        assert_eq!(f.store.fetch(&FetchQuery::new()).unwrap().len(), 1);
    }
}

#[test]
fn delete_requires_every_argument() {
    for mut f in all_stores() {
        let mut query = DeleteQuery::new(ts(0), ts(1), ["a"]);
        query.object_ids = None;
        let err = f.store.delete(&query).unwrap_err();
        assert!(matches!(err, DatapointError::Validation { .. }), "{}", f.name);

        let err = f.store.delete(&DeleteQuery::default()).unwrap_err();
        assert!(matches!(err, DatapointError::Validation { .. }), "{}", f.name);
    }
}

#[test]
fn store_is_writable_after_delete() {
    for mut f in all_stores() {
        f.store.write(point(&ts(0), "a", 0)).unwrap();
        f.store
            .delete(&DeleteQuery::new(ts(0), ts(0), ["a"]))
            .unwrap();
        f.store.write(point(&ts(1), "b", 1)).unwrap();
        let rest = f.store.fetch(&FetchQuery::new()).unwrap();
        assert_eq!(sorted_values(&rest), vec![1], "{}", f.name);
    }
}
