use std::fmt::{Debug, Formatter};

use chrono::{NaiveDateTime, TimeDelta};

#[derive(Copy, Clone, Eq, PartialEq)]
#[must_use]
pub struct Interval {
    /// Inclusive.
    pub start: NaiveDateTime,

    /// Exclusive.
    pub end: NaiveDateTime,
}

impl Debug for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}

impl Interval {
    pub const fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn duration(self) -> TimeDelta {
        self.end - self.start
    }

    /// Move the interval by the specified time delta, preserving its duration.
    pub fn shift(self, by: TimeDelta) -> Self {
        Self { start: self.start + by, end: self.end + by }
    }
}
