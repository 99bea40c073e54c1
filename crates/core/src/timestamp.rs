//! Timestamp parsing and formatting
//!
//! All comparisons in the workspace happen on [`Timestamp`], a UTC-normalized
//! instant. Strings are accepted in the common ISO-8601 shapes:
//!
//! - RFC 3339 with an offset: `2024-01-01T12:00:00+02:00`, `...Z`
//! - offsets without a colon: `2024-01-01T12:00:00+0200`
//! - naive date-times (treated as UTC), `T` or space separated, optional
//!   fractional seconds: `2024-01-01 12:00:00.250`
//! - bare dates (midnight UTC): `2024-01-01`
//!
//! The canonical string form is RFC 3339 in UTC with a `Z` suffix and only as
//! many fractional digits as needed, so `format(parse(s))` is a fixed point
//! after one pass.

use crate::error::{DatapointError, DatapointResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A UTC-normalized point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Parse an ISO-8601 string; naive inputs are taken as UTC
    pub fn parse(input: &str) -> DatapointResult<Self> {
        let s = input.trim();
        if s.is_empty() {
            return Err(DatapointError::invalid_timestamp(input));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Timestamp(dt.with_timezone(&Utc)));
        }
        for fmt in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
                return Ok(Timestamp(dt.with_timezone(&Utc)));
            }
        }
        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(Timestamp(naive.and_utc()));
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                return Ok(Timestamp(naive.and_utc()));
            }
        }

        Err(DatapointError::invalid_timestamp(input))
    }

    /// Wrap a chrono UTC datetime
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Timestamp(dt)
    }

    /// The underlying chrono datetime
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Canonical RFC 3339 representation (`Z` suffix)
    pub fn to_canonical_string(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

/// Parse a timestamp string into a comparable instant
pub fn parse_timestamp(input: &str) -> DatapointResult<Timestamp> {
    Timestamp::parse(input)
}

/// Format an instant as its canonical string
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.to_canonical_string()
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp(dt)
    }
}

impl FromStr for Timestamp {
    type Err = DatapointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timestamp::parse(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_canonical_string())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Timestamp::parse(&s).map_err(serde::de::Error::custom)
    }
}
