use bon::Builder;
use chrono::TimeDelta;

use crate::{
    core::{candidate::Candidate, policy::Policy, timeline::Timeline},
    prelude::*,
    quantity::rate::KilowattHourRate,
};

/// Result of the candidate scan.
#[must_use]
pub struct Scan {
    pub candidates: Vec<Candidate>,

    /// Number of visited (position, length) pairs, one past the budget when truncated.
    pub n_scanned: usize,

    /// Whether the scan budget was exhausted before the whole timeline was covered.
    pub is_truncated: bool,
}

/// Enumerates the feasible cutoff candidates over the timeline.
#[derive(Builder)]
#[builder(finish_fn(vis = ""))]
pub struct Generator<'a> {
    timeline: &'a Timeline,
    policy: &'a Policy,
}

impl<S: generator_builder::IsComplete> GeneratorBuilder<'_, S> {
    pub fn scan(self) -> Scan {
        self.build().scan()
    }
}

impl Generator<'_> {
    #[instrument(
        skip_all,
        fields(
            n_slots = self.timeline.len(),
            max_cutoff_slots = self.policy.max_cutoff_slots(),
            budget = self.policy.scan_budget,
        ),
    )]
    fn scan(self) -> Scan {
        let n_slots = self.timeline.len();
        let max_cutoff_slots = self.policy.max_cutoff_slots();
        let min_cutoff_slots = self.policy.min_cutoff_slots.max(1);

        let mut candidates = Vec::new();
        let mut n_scanned = 0;
        let mut is_truncated = false;

        'positions: for start in self.policy.start_offset..n_slots {
            // The preheat window must fit before the cutoff, the cutoff and recovery – after it:
            let Some(room_after) = n_slots.checked_sub(start + 2 * min_cutoff_slots) else {
                continue;
            };
            let max_len = max_cutoff_slots.min(start).min(room_after);
            if max_len < min_cutoff_slots {
                continue;
            }
            for len in min_cutoff_slots..=max_len {
                // The pair that exceeds the budget is counted but not evaluated:
                n_scanned += 1;
                if n_scanned > self.policy.scan_budget {
                    warn!(n_scanned, budget = self.policy.scan_budget, "candidate scan budget reached");
                    is_truncated = true;
                    break 'positions;
                }
                if start + 2 * len > n_slots {
                    continue;
                }
                match self.evaluate(start, len) {
                    Ok(Some(candidate)) => candidates.push(candidate),
                    Ok(None) => {}
                    Err(error) => warn!(start, len, "dropped the candidate: {error:#}"),
                }
            }
        }

        info!(n_scanned, n_candidates = candidates.len(), is_truncated, "scanned");
        Scan { candidates, n_scanned, is_truncated }
    }

    /// Evaluate the cutoff starting at the timeline slot with the given length.
    ///
    /// # Returns
    ///
    /// The candidate if it passes the acceptance test, `None` otherwise.
    fn evaluate(&self, start: usize, len: usize) -> Result<Option<Candidate>> {
        let preheat = (start - len)..start;
        let cutoff = start..(start + len);
        let recovery = (start + len)..(start + 2 * len);

        let (preheat_cost, preheat_duration) = self.timeline.cost(preheat.clone());
        let (cutoff_cost, cutoff_duration) = self.timeline.cost(cutoff.clone());
        let (recovery_cost, recovery_duration) = self.timeline.cost(recovery.clone());
        ensure!(cutoff_duration > TimeDelta::zero(), "zero-length cutoff window");

        // The cutoff itself consumes nothing, the surrounding phases consume more:
        let cost_with = preheat_cost * self.policy.preheat_multiplier
            + recovery_cost * self.policy.recovery_multiplier;
        let cost_without = preheat_cost + cutoff_cost + recovery_cost;

        let weighted_hours = hours(preheat_duration) * self.policy.preheat_multiplier
            + hours(recovery_duration) * self.policy.recovery_multiplier;
        ensure!(weighted_hours > 0.0, "zero-weight preheat and recovery windows");
        let price_difference =
            cutoff_cost / cutoff_duration - KilowattHourRate::from(cost_with.0 / weighted_hours);

        // Longer cutoffs are held to a proportionally lower bar:
        let adjusted_threshold = self.policy.min_price_difference
            * (hours(self.policy.reference_duration) / hours(cutoff_duration));

        let is_accepted = cutoff_duration >= self.policy.min_cutoff_duration()
            && cost_with < cost_without
            && price_difference >= adjusted_threshold;
        if !is_accepted {
            return Ok(None);
        }

        Ok(Some(Candidate {
            preheat_start: self.timeline[preheat.start].interval.start,
            cutoff_start: self.timeline[cutoff.start].interval.start,
            recovery_start: self.timeline[recovery.start].interval.start,
            recovery_end: self.timeline[recovery.end - 1].interval.end,
            preheat,
            cutoff,
            recovery,
            cutoff_duration,
            cost_with,
            cost_without,
            price_difference,
            adjusted_threshold,
        }))
    }
}

fn hours(time_delta: TimeDelta) -> f64 {
    time_delta.as_seconds_f64() / 3600.0
}
