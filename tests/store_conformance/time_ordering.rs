//! Time-ordered replay through the store contract

use crate::test_utils::*;
use datapoint::{DatapointError, FetchQuery, QueueState, Timestamp};

#[test]
fn queue_yields_ascending_with_stable_ties() {
    for mut f in all_stores() {
        f.store
            .write_batch(vec![
                point(&ts(5), "a", 0),
                point(&ts(2), "b", 1),
                point(&ts(5), "c", 2),
                point(&ts(1), "a", 3),
                point(&ts(2), "a", 4),
            ])
            .unwrap();

        let order: Vec<i64> = f
            .store
            .to_time_ordered_queue(&FetchQuery::new())
            .unwrap()
            .map(|r| value_of(&r))
            .collect();
        assert_eq!(order, vec![3, 1, 4, 0, 2], "{}", f.name);
    }
}

#[test]
fn queue_respects_filters() {
    for mut f in all_stores() {
        f.store
            .write_batch(vec![
                point(&ts(4), "a", 0),
                point(&ts(3), "b", 1),
                point(&ts(2), "a", 2),
                point(&ts(9), "a", 3),
            ])
            .unwrap();

        let order: Vec<i64> = f
            .store
            .to_time_ordered_queue(&FetchQuery::new().end_time(ts(5)).object_ids(["a"]))
            .unwrap()
            .map(|r| value_of(&r))
            .collect();
        assert_eq!(order, vec![2, 0], "{}", f.name);
    }
}

#[test]
fn exhausted_queue_stays_exhausted() {
    for mut f in all_stores() {
        f.store
            .write_batch((0..3).map(|h| point(&ts(h), "a", h as i64)).collect())
            .unwrap();

        let mut queue = f.store.to_time_ordered_queue(&FetchQuery::new()).unwrap();
        for _ in 0..3 {
            assert!(queue.next().is_some(), "{}", f.name);
        }
        assert_eq!(queue.state(), QueueState::Exhausted);
        for _ in 0..10 {
            assert!(queue.next().is_none(), "{}", f.name);
        }
    }
}

#[test]
fn queue_does_not_see_later_writes() {
    for mut f in all_stores() {
        f.store.write(point(&ts(1), "a", 1)).unwrap();
        let queue = f.store.to_time_ordered_queue(&FetchQuery::new()).unwrap();
        f.store.write(point(&ts(0), "a", 0)).unwrap();

        let order: Vec<i64> = queue.map(|r| value_of(&r)).collect();
        assert_eq!(order, vec![1], "{}", f.name);
    }
}

#[test]
fn projection_without_timestamp_cannot_be_ordered() {
    for mut f in all_stores() {
        f.store.write(point(&ts(1), "a", 1)).unwrap();
        let err = f
            .store
            .to_time_ordered_queue(&FetchQuery::new().fields(["value"]))
            .unwrap_err();
        assert!(matches!(err, DatapointError::Schema { .. }), "{}", f.name);
    }
}

#[test]
fn peek_reports_next_timestamp() {
    for mut f in all_stores() {
        f.store
            .write_batch(vec![point(&ts(7), "a", 0), point(&ts(6), "a", 1)])
            .unwrap();
        let queue = f.store.to_time_ordered_queue(&FetchQuery::new()).unwrap();
        assert_eq!(queue.peek_timestamp(), Some(Timestamp::parse(&ts(6)).unwrap()));
    }
}
