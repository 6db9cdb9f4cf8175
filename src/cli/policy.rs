use chrono::TimeDelta;
use clap::Parser;

use crate::{core::policy::Policy, prelude::*, quantity::rate::KilowattHourRate};

#[derive(Parser)]
pub struct PolicyArgs {
    /// Longest cutoff, in hours.
    #[clap(long, default_value = "5.0", env = "MAX_CUTOFF_HOURS")]
    pub max_cutoff_hours: f64,

    /// Shortest cutoff, in timeline slots.
    #[clap(long, default_value = "2", env = "MIN_CUTOFF_SLOTS")]
    pub min_cutoff_slots: usize,

    /// Minimal price difference between a reference-long cutoff and its surroundings, per kWh.
    #[clap(long, default_value = "3.0", env = "MIN_PRICE_DIFFERENCE")]
    pub min_price_difference: KilowattHourRate,

    /// Cutoff duration at which the minimal price difference applies as is, in hours.
    #[clap(long, default_value = "1.0", env = "REFERENCE_DURATION_HOURS")]
    pub reference_duration_hours: f64,

    /// Consumption multiplier while preheating.
    #[clap(long, default_value = "1.5", env = "PREHEAT_MULTIPLIER")]
    pub preheat_multiplier: f64,

    /// Consumption multiplier while recovering.
    #[clap(long, default_value = "1.2", env = "RECOVERY_MULTIPLIER")]
    pub recovery_multiplier: f64,

    /// Maximum number of published periods.
    #[clap(long, default_value = "6", env = "MAX_PERIODS")]
    pub max_periods: usize,

    /// Maximum number of evaluated candidates.
    #[clap(long, default_value = "50000", env = "SCAN_BUDGET")]
    pub scan_budget: usize,

    /// Do not schedule cutoffs before this many leading timeline slots.
    #[clap(long, default_value = "0", env = "START_OFFSET_SLOTS")]
    pub start_offset_slots: usize,

    /// Normalized timeline slot duration, in minutes.
    #[clap(long, default_value = "15", env = "GRANULARITY_MINUTES")]
    pub granularity_minutes: u16,

    /// Minimal number of today's price records to plan at all.
    #[clap(long, default_value = "4", env = "MIN_TODAY_SLOTS")]
    pub min_today_slots: usize,
}

impl PolicyArgs {
    pub fn try_into_policy(&self) -> Result<Policy> {
        ensure!(self.granularity_minutes > 0, "the granularity must be positive");
        ensure!(self.preheat_multiplier >= 1.0, "the preheat multiplier must be at least 1.0");
        ensure!(self.recovery_multiplier >= 1.0, "the recovery multiplier must be at least 1.0");
        ensure!(self.reference_duration_hours > 0.0, "the reference duration must be positive");
        ensure!(self.max_cutoff_hours.is_finite(), "the maximum cutoff must be finite");

        #[expect(clippy::cast_possible_truncation)]
        let reference_duration =
            TimeDelta::seconds((self.reference_duration_hours * 3600.0).round() as i64);

        Ok(Policy::builder()
            .granularity(TimeDelta::minutes(self.granularity_minutes.into()))
            .max_cutoff_hours(self.max_cutoff_hours)
            .min_cutoff_slots(self.min_cutoff_slots)
            .min_price_difference(self.min_price_difference)
            .reference_duration(reference_duration)
            .preheat_multiplier(self.preheat_multiplier)
            .recovery_multiplier(self.recovery_multiplier)
            .max_periods(self.max_periods)
            .scan_budget(self.scan_budget)
            .start_offset(self.start_offset_slots)
            .min_today_slots(self.min_today_slots)
            .build())
    }
}
