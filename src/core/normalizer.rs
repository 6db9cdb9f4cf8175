use chrono::{NaiveDateTime, TimeDelta};
use itertools::Itertools;

use crate::{
    core::{
        interval::Interval,
        slot::{PriceSlot, RawSlot},
        timeline::Timeline,
        timestamp,
    },
    prelude::*,
    quantity::rate::KilowattHourRate,
};

/// Number of leading slots sampled to detect the series resolution.
const N_RESOLUTION_SAMPLES: usize = 5;

/// Normalized single-day series.
#[must_use]
pub struct Normalized {
    pub slots: Vec<PriceSlot>,

    /// Detected resolution of the source series, `None` for an empty series.
    pub source_minutes: Option<i64>,
}

/// Raw record with its timestamps parsed, if they could be.
struct Record {
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    rate: KilowattHourRate,
}

/// Converts raw price series into fixed-granularity slots.
#[must_use]
#[derive(Copy, Clone)]
pub struct Normalizer {
    granularity: TimeDelta,
}

impl Normalizer {
    pub const fn new(granularity: TimeDelta) -> Self {
        Self { granularity }
    }

    /// Normalize each day and stitch them together into a single timeline.
    #[instrument(skip_all, fields(n_days = days.len()))]
    pub fn normalize_days(self, days: &[&[RawSlot]]) -> (Timeline, Vec<Option<i64>>) {
        let mut slots: Vec<PriceSlot> = Vec::new();
        let mut source_minutes = Vec::with_capacity(days.len());
        for day in days {
            let normalized = self.normalize(day);
            source_minutes.push(normalized.source_minutes);
            self.stitch(&mut slots, normalized.slots);
        }
        info!(n_slots = slots.len(), ?source_minutes, "normalized");
        (Timeline::new(slots), source_minutes)
    }

    /// Normalize a single series.
    pub fn normalize(self, raw: &[RawSlot]) -> Normalized {
        let records = raw
            .iter()
            .map(|record| Record {
                start: record.start.as_deref().and_then(timestamp::parse),
                end: record.end.as_deref().and_then(timestamp::parse),
                rate: record.value,
            })
            .collect_vec();
        let source_minutes = (!records.is_empty()).then(|| self.detect_minutes(&records));
        let resolution = source_minutes.map_or(self.granularity, TimeDelta::minutes);
        let slots = Self::parse(&records, resolution)
            .into_iter()
            .flat_map(|slot| self.resample(slot))
            .collect();
        Normalized { slots, source_minutes }
    }

    /// Turn the records into gapless slots, recovering malformed timestamps locally.
    ///
    /// A missing or unparsable start continues from the previous slot's end.
    /// A missing, unparsable, or non-positive end is taken from the next record's start,
    /// or else the slot lasts for the detected resolution.
    /// A hole left by a dropped record is filled with the preceding rate,
    /// and an overlapping slot is clipped to begin where the previous one ends.
    fn parse(records: &[Record], resolution: TimeDelta) -> Vec<PriceSlot> {
        let mut slots: Vec<PriceSlot> = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let previous = slots.last().copied();
            let Some(mut start) = record.start.or_else(|| previous.map(|slot| slot.interval.end))
            else {
                warn!(index, "skipped a slot without a usable start");
                continue;
            };
            let next_start = records.get(index + 1).and_then(|next| next.start);
            let end = record
                .end
                .and_then(|end| timestamp::minutes_between(start, end))
                .map(|minutes| start + TimeDelta::minutes(minutes))
                .or_else(|| next_start.filter(|next_start| *next_start > start))
                .unwrap_or(start + resolution);

            if let Some(previous) = previous {
                if start > previous.interval.end {
                    warn!(index, from = ?previous.interval.end, until = ?start, "filled a gap");
                    slots.push(PriceSlot::new(
                        Interval::new(previous.interval.end, start),
                        previous.rate,
                    ));
                } else if start < previous.interval.end {
                    warn!(index, ?start, previous_end = ?previous.interval.end, "clipped an overlap");
                    start = previous.interval.end;
                    if end <= start {
                        continue;
                    }
                }
            }
            slots.push(PriceSlot::new(Interval::new(start, end), record.rate));
        }
        slots
    }

    /// Detect the typical slot duration from the leading well-formed records, rounded to the granularity.
    fn detect_minutes(self, records: &[Record]) -> i64 {
        let granularity = self.granularity.num_minutes();
        let samples = records
            .iter()
            .filter_map(|record| {
                let (start, end) = record.start.zip(record.end)?;
                timestamp::minutes_between(start, end)
            })
            .take(N_RESOLUTION_SAMPLES)
            .collect_vec();
        if samples.is_empty() || granularity <= 0 {
            return granularity;
        }
        #[expect(clippy::cast_precision_loss)]
        let average = samples.iter().sum::<i64>() as f64 / samples.len() as f64;
        #[expect(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
        let n_granules = (average / granularity as f64).round() as i64;
        n_granules.max(1) * granularity
    }

    /// Split the slot into granularity-long sub-slots of the same rate.
    ///
    /// Slots which are not a multiple of the granularity are passed through as is,
    /// the cost math uses their actual duration.
    fn resample(self, slot: PriceSlot) -> Vec<PriceSlot> {
        let minutes = slot.duration().num_minutes();
        let granularity = self.granularity.num_minutes();
        if granularity <= 0 || minutes % granularity != 0 {
            debug!(?slot.interval, minutes, "irregular slot");
            return vec![slot];
        }
        (0..minutes / granularity)
            .map(|k| {
                let start = slot.interval.start + TimeDelta::minutes(granularity * k);
                PriceSlot::new(Interval::new(start, start + self.granularity), slot.rate)
            })
            .collect()
    }

    /// Append the next day, shifting it by whole days if it starts before the previous day ends,
    /// and filling the hole with the last known rate if it starts later.
    fn stitch(self, slots: &mut Vec<PriceSlot>, mut next_day: Vec<PriceSlot>) {
        if let (Some(last), Some(first)) = (slots.last(), next_day.first())
            && first.interval.start < last.interval.end
        {
            let mut shift = TimeDelta::days(1);
            while first.interval.start + shift < last.interval.end {
                shift += TimeDelta::days(1);
            }
            warn!(
                previous_end = ?last.interval.end,
                next_start = ?first.interval.start,
                n_days = shift.num_days(),
                "shifting the next day to keep the timeline monotonic",
            );
            for slot in &mut next_day {
                slot.interval = slot.interval.shift(shift);
            }
        }
        if let (Some(last), Some(first)) = (slots.last().copied(), next_day.first())
            && first.interval.start > last.interval.end
        {
            warn!(
                from = ?last.interval.end,
                until = ?first.interval.start,
                "filled a gap between the days",
            );
            slots.extend(self.resample(PriceSlot::new(
                Interval::new(last.interval.end, first.interval.start),
                last.rate,
            )));
        }
        slots.extend(next_day);
    }
}
