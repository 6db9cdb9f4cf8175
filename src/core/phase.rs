use comfy_table::Color;

use crate::core::candidate::Candidate;

/// What the heat pump does during a timeline slot.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, derive_more::Display)]
pub enum Phase {
    #[default]
    Normal,
    Preheat,
    Cutoff,
    Recovery,
}

impl Phase {
    /// Map every timeline slot to its phase under the scheduled periods.
    #[must_use]
    pub fn assign(n_slots: usize, periods: &[Candidate]) -> Vec<Self> {
        let mut phases = vec![Self::Normal; n_slots];
        for period in periods {
            for (range, phase) in [
                (period.preheat.clone(), Self::Preheat),
                (period.cutoff.clone(), Self::Cutoff),
                (period.recovery.clone(), Self::Recovery),
            ] {
                phases[range].fill(phase);
            }
        }
        phases
    }

    pub const fn color(self) -> Color {
        match self {
            Self::Normal => Color::Reset,
            Self::Preheat => Color::DarkYellow,
            Self::Cutoff => Color::Green,
            Self::Recovery => Color::Magenta,
        }
    }
}
