use chrono::TimeDelta;

use crate::quantity::rate::KilowattHourRate;

/// Planning parameters, fixed for the whole run.
#[must_use]
#[derive(Copy, Clone, Debug, bon::Builder)]
pub struct Policy {
    /// Target slot duration of the normalized timeline.
    #[builder(default = TimeDelta::minutes(15))]
    pub granularity: TimeDelta,

    /// Longest allowed cutoff, in hours.
    #[builder(default = 5.0)]
    pub max_cutoff_hours: f64,

    /// Shortest allowed cutoff, in timeline slots.
    #[builder(default = 2)]
    pub min_cutoff_slots: usize,

    /// Minimal price difference between the cutoff and its surroundings for a reference-long cutoff.
    #[builder(default = KilowattHourRate::from(3.0))]
    pub min_price_difference: KilowattHourRate,

    /// Cutoff duration at which [`Policy::min_price_difference`] applies as is.
    #[builder(default = TimeDelta::hours(1))]
    pub reference_duration: TimeDelta,

    /// Consumption multiplier while preheating.
    #[builder(default = 1.5)]
    pub preheat_multiplier: f64,

    /// Consumption multiplier while recovering.
    #[builder(default = 1.2)]
    pub recovery_multiplier: f64,

    /// Maximum number of scheduled cutoffs.
    #[builder(default = 6)]
    pub max_periods: usize,

    /// Safety cap on the number of evaluated candidates.
    #[builder(default = 50_000)]
    pub scan_budget: usize,

    /// Cutoffs may not start before this timeline slot.
    #[builder(default)]
    pub start_offset: usize,

    /// Minimal number of price records for the first day.
    #[builder(default = 4)]
    pub min_today_slots: usize,
}

impl Default for Policy {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Policy {
    /// Longest allowed cutoff in whole timeline slots.
    #[must_use]
    pub fn max_cutoff_slots(&self) -> usize {
        let slot_hours = self.granularity.as_seconds_f64() / 3600.0;
        if slot_hours <= 0.0 {
            return 0;
        }
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n_slots = (self.max_cutoff_hours / slot_hours).max(0.0) as usize;
        n_slots
    }

    /// Shortest allowed cutoff in time.
    #[must_use]
    pub fn min_cutoff_duration(&self) -> TimeDelta {
        i32::try_from(self.min_cutoff_slots)
            .ok()
            .and_then(|n_slots| self.granularity.checked_mul(n_slots))
            .unwrap_or(TimeDelta::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_cutoff_slots() {
        assert_eq!(Policy::default().max_cutoff_slots(), 20);
        assert_eq!(Policy::builder().max_cutoff_hours(0.6).build().max_cutoff_slots(), 2);
        assert_eq!(Policy::builder().max_cutoff_hours(-1.0).build().max_cutoff_slots(), 0);
    }

    #[test]
    fn test_min_cutoff_duration() {
        assert_eq!(Policy::default().min_cutoff_duration(), TimeDelta::minutes(30));
    }
}
