use bon::Builder;

use crate::{
    core::{
        candidate::Candidate,
        generator::Generator,
        normalizer::Normalizer,
        policy::Policy,
        scheduler::{Schedule, schedule},
        slot::RawSlot,
        timeline::Timeline,
    },
    prelude::*,
};

/// Run diagnostics.
#[must_use]
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    /// Detected resolution of the first day, in minutes.
    pub today_slot_minutes: Option<i64>,

    /// Detected resolution of the second day, in minutes.
    pub tomorrow_slot_minutes: Option<i64>,

    pub n_scanned: usize,
    pub n_candidates: usize,
    pub is_truncated: bool,
}

/// Final result of a planning run.
#[must_use]
pub struct Plan {
    pub timeline: Timeline,
    pub schedule: Schedule<Candidate>,
    pub diagnostics: Diagnostics,

    /// Why nothing was planned, if the input was not sufficient.
    pub warning: Option<&'static str>,
}

impl Plan {
    fn insufficient(warning: &'static str, diagnostics: Diagnostics) -> Self {
        warn!(warning, "nothing to plan");
        Self {
            timeline: Timeline::default(),
            schedule: Schedule::default(),
            diagnostics,
            warning: Some(warning),
        }
    }
}

/// Normalizes the price series, enumerates the candidates, and schedules the best of them.
#[derive(Builder)]
#[builder(finish_fn(vis = ""))]
pub struct Planner<'a> {
    policy: &'a Policy,
    today: &'a [RawSlot],

    #[builder(default)]
    tomorrow: &'a [RawSlot],
}

impl<S: planner_builder::IsComplete> PlannerBuilder<'_, S> {
    pub fn plan(self) -> Plan {
        self.build().plan()
    }
}

impl Planner<'_> {
    #[instrument(skip_all, fields(n_today = self.today.len(), n_tomorrow = self.tomorrow.len()))]
    fn plan(self) -> Plan {
        if self.today.len() < self.policy.min_today_slots {
            return Plan::insufficient("Insufficient today data", Diagnostics::default());
        }

        let (timeline, source_minutes) =
            Normalizer::new(self.policy.granularity).normalize_days(&[self.today, self.tomorrow]);
        let mut diagnostics = Diagnostics {
            today_slot_minutes: source_minutes[0],
            tomorrow_slot_minutes: source_minutes[1],
            ..Diagnostics::default()
        };
        if timeline.is_empty() {
            return Plan::insufficient("No normalized slots available", diagnostics);
        }

        let scan = Generator::builder().timeline(&timeline).policy(self.policy).scan();
        diagnostics.n_scanned = scan.n_scanned;
        diagnostics.n_candidates = scan.candidates.len();
        diagnostics.is_truncated = scan.is_truncated;

        let schedule = schedule(scan.candidates, self.policy.max_periods);
        info!(
            n_periods = schedule.items.len(),
            total_saving = %schedule.total_weight,
            "planned",
        );
        Plan { timeline, schedule, diagnostics, warning: None }
    }
}
