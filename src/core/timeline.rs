use std::ops::Range;

use chrono::TimeDelta;

use crate::{core::slot::PriceSlot, quantity::cost::Cost};

/// Gapless, chronologically ordered price slots spanning the whole forecast horizon.
#[must_use]
#[derive(Clone, Debug, Default, derive_more::Deref)]
pub struct Timeline(Vec<PriceSlot>);

impl Timeline {
    pub const fn new(slots: Vec<PriceSlot>) -> Self {
        Self(slots)
    }

    /// Total cost and duration of the slot range.
    ///
    /// # Panics
    ///
    /// When the range is out of the timeline bounds.
    #[must_use]
    pub fn cost(&self, range: Range<usize>) -> (Cost, TimeDelta) {
        self.0[range]
            .iter()
            .fold((Cost::ZERO, TimeDelta::zero()), |(cost, duration), slot| {
                (cost + slot.cost(), duration + slot.duration())
            })
    }

    /// Check that each slot ends exactly where the next one starts.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.0.windows(2).all(|pair| pair[0].interval.end == pair[1].interval.start)
    }
}

#[cfg(test)]
impl Timeline {
    /// Build a quarter-hourly timeline starting at the timestamp.
    pub fn from_quarter_rates(start: chrono::NaiveDateTime, rates: &[f64]) -> Self {
        use crate::{core::interval::Interval, quantity::rate::KilowattHourRate};

        let slots = rates
            .iter()
            .zip(0..)
            .map(|(rate, index)| {
                let start = start + TimeDelta::minutes(15 * index);
                PriceSlot::new(
                    Interval::new(start, start + TimeDelta::minutes(15)),
                    KilowattHourRate::from(*rate),
                )
            })
            .collect();
        Self::new(slots)
    }
}
