use std::ops::Range;

use chrono::{NaiveDateTime, TimeDelta};

use crate::{
    core::scheduler::Weighted,
    quantity::{cost::Cost, rate::KilowattHourRate},
};

/// Preheat, cutoff and recovery windows of equal length, back to back.
#[must_use]
#[derive(Clone, Debug)]
pub struct Candidate {
    /// Timeline slot indices of the preheat window.
    pub preheat: Range<usize>,

    /// Timeline slot indices of the cutoff window.
    pub cutoff: Range<usize>,

    /// Timeline slot indices of the recovery window.
    pub recovery: Range<usize>,

    pub preheat_start: NaiveDateTime,
    pub cutoff_start: NaiveDateTime,
    pub recovery_start: NaiveDateTime,
    pub recovery_end: NaiveDateTime,

    pub cutoff_duration: TimeDelta,

    /// Projected cost of the whole span when the cutoff is executed.
    pub cost_with: Cost,

    /// Projected cost of the whole span under normal operation.
    pub cost_without: Cost,

    /// Average cutoff rate minus the multiplier-weighted average rate of preheat and recovery.
    pub price_difference: KilowattHourRate,

    /// Minimal price difference scaled to the cutoff duration.
    pub adjusted_threshold: KilowattHourRate,
}

impl Candidate {
    pub fn saving(&self) -> Cost {
        self.cost_without - self.cost_with
    }

    /// Saving relative to the normal operation cost, zero when the latter is not positive.
    #[must_use]
    pub fn saving_ratio(&self) -> f64 {
        if self.cost_without > Cost::ZERO { self.saving().0 / self.cost_without.0 } else { 0.0 }
    }

    /// Timeline slots occupied by all three phases.
    #[must_use]
    pub const fn span(&self) -> Range<usize> {
        self.preheat.start..self.recovery.end
    }
}

impl Weighted for Candidate {
    fn span(&self) -> Range<usize> {
        Self::span(self)
    }

    fn weight(&self) -> Cost {
        self.saving().round_to_mills()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_weight_is_saving_rounded_to_mills() {
        let start = NaiveDate::from_ymd_opt(2025, 10, 3).unwrap().and_hms_opt(16, 0, 0).unwrap();
        let candidate = Candidate {
            preheat: 0..4,
            cutoff: 4..8,
            recovery: 8..12,
            preheat_start: start,
            cutoff_start: start + TimeDelta::hours(1),
            recovery_start: start + TimeDelta::hours(2),
            recovery_end: start + TimeDelta::hours(3),
            cutoff_duration: TimeDelta::hours(1),
            cost_with: Cost::from(1.0),
            cost_without: Cost::from(3.123_456),
            price_difference: KilowattHourRate::from(5.0),
            adjusted_threshold: KilowattHourRate::from(3.0),
        };
        assert_abs_diff_eq!(candidate.saving().0, 2.123_456, epsilon = 1e-12);
        assert_abs_diff_eq!(candidate.weight().0, 2.123);
        assert_eq!(Weighted::span(&candidate), 0..12);
    }
}
