//! Millisecond instants with a browser-compatible range.
//!
//! Cookie events carry timestamps from the browser clock, which represents
//! instants as milliseconds since the Unix epoch within ±8.64e15 ms.
//! `OffsetDateTime` cannot hold the far ends of that range, so instants are
//! kept as plain milliseconds and converted on demand.

use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Milliseconds in one day.
pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// An instant in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub struct Timestamp(i64);

impl Timestamp {
    /// Earliest representable instant.
    pub const MIN: Timestamp = Timestamp(-8_640_000_000_000_000);
    /// Latest representable instant. Also used as "no expiry known".
    pub const MAX: Timestamp = Timestamp(8_640_000_000_000_000);
    /// The Unix epoch.
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Create a timestamp from milliseconds, clamped to [`MIN`](Self::MIN)..=[`MAX`](Self::MAX).
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis).clamp_to_range()
    }

    /// Create a timestamp from fractional milliseconds (as found in browser events).
    ///
    /// The fraction is truncated. NaN maps to the epoch.
    pub fn from_millis_f64(millis: f64) -> Self {
        if millis.is_nan() {
            return Self::EPOCH;
        }
        // `as` saturates for out-of-range floats.
        Self::from_millis(millis.trunc() as i64)
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        Self::from_datetime(OffsetDateTime::now_utc())
    }

    /// Convert from an `OffsetDateTime`.
    pub fn from_datetime(datetime: OffsetDateTime) -> Self {
        let millis = datetime.unix_timestamp_nanos() / 1_000_000;
        Self::from_millis(i64::try_from(millis).unwrap_or(if millis < 0 { i64::MIN } else { i64::MAX }))
    }

    /// Convert to an `OffsetDateTime`, if the instant fits its range.
    pub fn to_datetime(self) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(self.0) * 1_000_000).ok()
    }

    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Add a signed number of milliseconds, saturating at the range bounds.
    pub fn saturating_add_millis(self, millis: i64) -> Self {
        Self::from_millis(self.0.saturating_add(millis))
    }

    /// Signed distance `self - earlier` in milliseconds.
    pub fn millis_since(self, earlier: Timestamp) -> i64 {
        self.0.saturating_sub(earlier.0)
    }

    fn clamp_to_range(self) -> Self {
        Timestamp(self.0.clamp(Self::MIN.0, Self::MAX.0))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt),
            None => write!(f, "{}ms", self.0),
        }
    }
}

/// Deserialized values are clamped like [`Timestamp::from_millis`].
impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Self::from_millis(millis)
    }
}

impl From<Timestamp> for i64 {
    fn from(timestamp: Timestamp) -> Self {
        timestamp.0
    }
}

impl From<OffsetDateTime> for Timestamp {
    fn from(datetime: OffsetDateTime) -> Self {
        Self::from_datetime(datetime)
    }
}
