//! Half-open reservation window.
//!
//! Windows are [start, end): the start instant is booked, the end instant is
//! not. Two back-to-back windows sharing an endpoint therefore do not
//! overlap, which is what lets consecutive bookings sit flush against each
//! other.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A half-open time interval [start, end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Build a window, rejecting empty or inverted ranges.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Half-open intersection test: `a` and `b` overlap iff
    /// `a.start < b.end && b.start < a.end`.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }
}
