use chrono::TimeDelta;
use serde::Deserialize;

use crate::{
    core::interval::Interval,
    quantity::{cost::Cost, rate::KilowattHourRate},
};

/// Price record as published by the host, before any parsing.
///
/// Timestamps stay raw here: a malformed one must not fail the whole series.
#[derive(Clone, Debug, Deserialize)]
pub struct RawSlot {
    #[serde(default)]
    pub start: Option<String>,

    #[serde(default)]
    pub end: Option<String>,

    pub value: KilowattHourRate,
}

/// One interval of the normalized forecast.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PriceSlot {
    pub interval: Interval,
    pub rate: KilowattHourRate,
}

impl PriceSlot {
    pub const fn new(interval: Interval, rate: KilowattHourRate) -> Self {
        Self { interval, rate }
    }

    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.interval.duration()
    }

    /// Cost of running a one-kilowatt load throughout the slot.
    #[must_use]
    pub fn cost(&self) -> Cost {
        self.rate * self.duration()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    use super::*;
    use crate::prelude::*;

    #[test]
    fn test_cost_uses_actual_duration() {
        let start = NaiveDate::from_ymd_opt(2025, 10, 3).unwrap().and_hms_opt(16, 0, 0).unwrap();
        let slot = PriceSlot::new(
            Interval::new(start, start + TimeDelta::minutes(45)),
            KilowattHourRate::from(8.0),
        );
        assert_abs_diff_eq!(slot.cost().0, 6.0);
    }

    #[test]
    fn test_deserialize_raw_slot_ok() -> Result {
        // language=JSON
        const RECORD: &str = r#"{"start": "2025-10-03T16:00:00+03:00", "end": "2025-10-03T17:00:00+03:00", "value": 5.2}"#;
        let slot = serde_json::from_str::<RawSlot>(RECORD)?;
        assert_eq!(slot.start.as_deref(), Some("2025-10-03T16:00:00+03:00"));
        assert_abs_diff_eq!(slot.value.0, 5.2);
        Ok(())
    }

    #[test]
    fn test_deserialize_raw_slot_without_end_ok() -> Result {
        let slot = serde_json::from_str::<RawSlot>(r#"{"start": "2025-10-03T16:00:00", "value": 1}"#)?;
        assert!(slot.end.is_none());
        Ok(())
    }
}
