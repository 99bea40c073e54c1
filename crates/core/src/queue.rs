//! Time-ordered replay of a record snapshot
//!
//! A [`TimeOrderedQueue`] takes ownership of a finite set of records, sorts
//! them once by timestamp and hands them out one at a time.
//!
//! ```text
//! [new] --> Active --(last record taken)--> Exhausted
//! ```
//!
//! `Exhausted` is terminal: every further `next()` returns `None`. The queue
//! cannot be rewound and never sees writes made to its source after it was
//! built.

use crate::error::{DatapointError, DatapointResult};
use crate::record::Record;
use crate::timestamp::Timestamp;
use std::collections::VecDeque;
use std::iter::FusedIterator;

/// Queue lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    /// Records remain
    Active,
    /// All records have been returned
    Exhausted,
}

/// Forward-only, single-pass sequence of records in timestamp order
#[derive(Debug)]
pub struct TimeOrderedQueue {
    timestamp_field: String,
    entries: VecDeque<(Timestamp, Record)>,
    consumed: usize,
}

impl TimeOrderedQueue {
    /// Sort `records` by `timestamp_field` and wrap them in a queue
    ///
    /// The sort is stable: records with equal timestamps keep their relative
    /// input order.
    ///
    /// # Errors
    ///
    /// - `Schema` if a record lacks the timestamp field
    /// - `InvalidTimestamp` if a string timestamp cannot be parsed
    pub fn new(records: Vec<Record>, timestamp_field: &str) -> DatapointResult<Self> {
        let mut entries = records
            .into_iter()
            .map(|record| {
                let ts = record
                    .get_present(timestamp_field)
                    .ok_or_else(|| {
                        DatapointError::schema(format!(
                            "record is missing timestamp field '{timestamp_field}' required for time ordering"
                        ))
                    })?
                    .to_timestamp()?;
                Ok((ts, record))
            })
            .collect::<DatapointResult<Vec<_>>>()?;

        // slice::sort_by_key is stable
        entries.sort_by_key(|(ts, _)| *ts);

        Ok(TimeOrderedQueue {
            timestamp_field: timestamp_field.to_string(),
            entries: entries.into(),
            consumed: 0,
        })
    }

    /// Name of the field the queue is ordered by
    pub fn timestamp_field(&self) -> &str {
        &self.timestamp_field
    }

    /// Current lifecycle state
    pub fn state(&self) -> QueueState {
        if self.entries.is_empty() {
            QueueState::Exhausted
        } else {
            QueueState::Active
        }
    }

    /// Whether every record has been returned
    pub fn is_exhausted(&self) -> bool {
        self.state() == QueueState::Exhausted
    }

    /// Records not yet returned
    pub fn remaining(&self) -> usize {
        self.entries.len()
    }

    /// Records already returned
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Timestamp of the record the next call to `next()` will return
    pub fn peek_timestamp(&self) -> Option<Timestamp> {
        self.entries.front().map(|(ts, _)| *ts)
    }
}

impl Iterator for TimeOrderedQueue {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        let (_, record) = self.entries.pop_front()?;
        self.consumed += 1;
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.entries.len(), Some(self.entries.len()))
    }
}

impl ExactSizeIterator for TimeOrderedQueue {}

impl FusedIterator for TimeOrderedQueue {}
