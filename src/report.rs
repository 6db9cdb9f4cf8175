//! Result object published to the host.

use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

use crate::{
    core::{candidate::Candidate, planner::Plan, policy::Policy},
    fmt::FormattedDuration,
    quantity::{cost::Cost, rate::KilowattHourRate},
};

const FRIENDLY_NAME: &str = "Nordpool Cutoff Periods";

#[must_use]
#[derive(Serialize)]
pub struct Report {
    pub periods: Vec<Period>,
    pub friendly_name: &'static str,
    pub icon: &'static str,
    pub unit_of_measurement: &'static str,
    pub data_resolution: String,
    pub today_slot_minutes: Option<i64>,
    pub tomorrow_slot_minutes: Option<i64>,
    pub optimization_method: &'static str,
    pub candidates_scanned: usize,
    pub results_found: usize,
    pub scan_truncated: bool,
    pub total_cost_saving: Cost,
    pub min_slots: usize,
    pub max_slots: usize,
    pub max_cutoff_hours: f64,
    pub min_price_difference: KilowattHourRate,
    pub preheat_multiplier: f64,
    pub recovery_multiplier: f64,
    pub max_periods: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
}

impl Report {
    pub fn new(plan: &Plan, policy: &Policy) -> Self {
        let granularity_minutes = policy.granularity.num_minutes();
        let is_resampled = [plan.diagnostics.today_slot_minutes, plan.diagnostics.tomorrow_slot_minutes]
            .into_iter()
            .flatten()
            .any(|minutes| minutes != granularity_minutes);
        Self {
            periods: plan.schedule.items.iter().map(Period::from).collect(),
            friendly_name: FRIENDLY_NAME,
            icon: "mdi:lightning-bolt",
            unit_of_measurement: "periods",
            data_resolution: if is_resampled {
                format!("mixed→{granularity_minutes}min")
            } else {
                format!("{granularity_minutes}min (normalized)")
            },
            today_slot_minutes: plan.diagnostics.today_slot_minutes,
            tomorrow_slot_minutes: plan.diagnostics.tomorrow_slot_minutes,
            optimization_method: "DP (full window), robust slots",
            candidates_scanned: plan.diagnostics.n_scanned,
            results_found: plan.diagnostics.n_candidates,
            scan_truncated: plan.diagnostics.is_truncated,
            total_cost_saving: plan.schedule.total_weight.round_to_mills(),
            min_slots: policy.min_cutoff_slots,
            max_slots: policy.max_cutoff_slots(),
            max_cutoff_hours: policy.max_cutoff_hours,
            min_price_difference: policy.min_price_difference,
            preheat_multiplier: policy.preheat_multiplier,
            recovery_multiplier: policy.recovery_multiplier,
            max_periods: policy.max_periods,
            warning: plan.warning,
        }
    }

    /// Entity state: the number of scheduled periods.
    #[must_use]
    pub fn state(&self) -> String {
        self.periods.len().to_string()
    }
}

#[must_use]
#[derive(Serialize)]
pub struct Period {
    pub preheat_start: NaiveDateTime,
    pub shutdown_start: NaiveDateTime,
    pub recovery_start: NaiveDateTime,
    pub recovery_end: NaiveDateTime,
    pub cost_saving: Cost,
    pub cost_saving_percent: f64,
    pub shutdown_duration_hours: f64,
    pub shutdown_duration_text: String,
    pub details: Details,
}

#[must_use]
#[derive(Serialize)]
pub struct Details {
    pub total_cost_with_shutdown: Cost,
    pub total_cost_without_shutdown: Cost,
    pub price_difference: KilowattHourRate,
    pub adjusted_min_price_diff: KilowattHourRate,
}

impl From<&Candidate> for Period {
    fn from(candidate: &Candidate) -> Self {
        Self {
            preheat_start: candidate.preheat_start,
            shutdown_start: candidate.cutoff_start,
            recovery_start: candidate.recovery_start,
            recovery_end: candidate.recovery_end,
            cost_saving: candidate.saving().round_to_mills(),
            cost_saving_percent: round(candidate.saving_ratio() * 100.0, 1),
            shutdown_duration_hours: round(hours(candidate.cutoff_duration), 2),
            shutdown_duration_text: FormattedDuration(candidate.cutoff_duration).to_string(),
            details: Details {
                total_cost_with_shutdown: candidate.cost_with.round_to_mills(),
                total_cost_without_shutdown: candidate.cost_without.round_to_mills(),
                price_difference: KilowattHourRate::from(round(candidate.price_difference.0, 3)),
                adjusted_min_price_diff: KilowattHourRate::from(round(
                    candidate.adjusted_threshold.0,
                    3,
                )),
            },
        }
    }
}

/// Attributes of the error state, published when there is nothing to plan from.
#[must_use]
#[derive(Serialize)]
pub struct ErrorReport {
    pub friendly_name: &'static str,
    pub error: String,
}

impl ErrorReport {
    pub const fn new(error: String) -> Self {
        Self { friendly_name: FRIENDLY_NAME, error }
    }
}

fn hours(time_delta: TimeDelta) -> f64 {
    time_delta.as_seconds_f64() / 3600.0
}

fn round(value: f64, n_decimals: i32) -> f64 {
    let scale = 10_f64.powi(n_decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;
    use serde_json::{Value, json};

    use super::*;
    use crate::{
        core::{planner::Planner, slot::RawSlot},
        prelude::*,
    };

    fn hourly(values: &[f64]) -> Vec<RawSlot> {
        values
            .iter()
            .enumerate()
            .map(|(hour, value)| RawSlot {
                start: Some(format!("2025-10-03T{hour:02}:00:00+03:00")),
                end: Some(format!("2025-10-03T{:02}:00:00+03:00", (hour + 1) % 24)),
                value: KilowattHourRate::from(*value),
            })
            .collect()
    }

    #[test]
    fn test_period_from_candidate() {
        let start = NaiveDate::from_ymd_opt(2025, 10, 3).unwrap().and_hms_opt(16, 0, 0).unwrap();
        let candidate = Candidate {
            preheat: 0..10,
            cutoff: 10..20,
            recovery: 20..30,
            preheat_start: start,
            cutoff_start: start + TimeDelta::minutes(150),
            recovery_start: start + TimeDelta::minutes(300),
            recovery_end: start + TimeDelta::minutes(450),
            cutoff_duration: TimeDelta::minutes(150),
            cost_with: Cost::from(10.0),
            cost_without: Cost::from(30.0),
            price_difference: KilowattHourRate::from(4.123_456),
            adjusted_threshold: KilowattHourRate::from(1.2),
        };
        let period = Period::from(&candidate);
        assert_abs_diff_eq!(period.cost_saving.0, 20.0);
        assert_abs_diff_eq!(period.cost_saving_percent, 66.7);
        assert_abs_diff_eq!(period.shutdown_duration_hours, 2.5);
        assert_eq!(period.shutdown_duration_text, "2h 30min");
        assert_abs_diff_eq!(period.details.price_difference.0, 4.123);
    }

    #[test]
    fn test_report_json() -> Result {
        let mut rates = vec![5.0; 24];
        rates[17..19].fill(40.0);
        let today = hourly(&rates);
        let policy = Policy::builder().max_cutoff_hours(2.0).build();
        let plan = Planner::builder().policy(&policy).today(&today).plan();
        let report = Report::new(&plan, &policy);
        assert_eq!(report.state(), "1");

        let json = serde_json::to_value(&report)?;
        assert_eq!(json["data_resolution"], json!("mixed→15min"));
        assert_eq!(json["today_slot_minutes"], json!(60));
        assert_eq!(json["tomorrow_slot_minutes"], Value::Null);
        assert_eq!(json["max_slots"], json!(8));
        assert_eq!(json["periods"][0]["shutdown_start"], json!("2025-10-03T17:00:00"));
        assert_eq!(json["periods"][0]["recovery_end"], json!("2025-10-03T21:00:00"));
        assert_eq!(json["periods"][0]["shutdown_duration_text"], json!("2h"));
        assert!(json.get("warning").is_none());
        Ok(())
    }

    #[test]
    fn test_data_resolution_follows_granularity() {
        let today = hourly(&[5.0; 24]);
        let policy = Policy::builder().granularity(TimeDelta::minutes(30)).build();
        let plan = Planner::builder().policy(&policy).today(&today).plan();
        let report = Report::new(&plan, &policy);
        assert_eq!(report.data_resolution, "mixed→30min");
        assert_eq!(report.today_slot_minutes, Some(60));

        let policy = Policy::builder().granularity(TimeDelta::hours(1)).build();
        let plan = Planner::builder().policy(&policy).today(&today).plan();
        assert_eq!(Report::new(&plan, &policy).data_resolution, "60min (normalized)");
    }

    #[test]
    fn test_report_insufficient() -> Result {
        let policy = Policy::default();
        let plan = Planner::builder().policy(&policy).today(&[]).plan();
        let report = Report::new(&plan, &policy);
        assert_eq!(report.state(), "0");
        let json = serde_json::to_value(&report)?;
        assert_eq!(json["warning"], json!("Insufficient today data"));
        assert_eq!(json["periods"], json!([]));
        assert_eq!(json["data_resolution"], json!("15min (normalized)"));
        Ok(())
    }
}
