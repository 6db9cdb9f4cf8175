use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{candidate::Candidate, phase::Phase, timeline::Timeline},
    fmt::{FormattedDuration, FormattedPercentage},
    quantity::rate::KilowattHourRate,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

pub fn build_periods_table(periods: &[Candidate]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Date", "Preheat", "Cutoff", "Recovery", "End", "Duration", "Without", "With", "Saving",
        "Δ rate", "Threshold",
    ]);
    for period in periods {
        table.add_row(vec![
            Cell::new(period.preheat_start.format("%b %d")).add_attribute(Attribute::Dim),
            Cell::new(period.preheat_start.format("%H:%M")).fg(Phase::Preheat.color()),
            Cell::new(period.cutoff_start.format("%H:%M")).fg(Phase::Cutoff.color()),
            Cell::new(period.recovery_start.format("%H:%M")).fg(Phase::Recovery.color()),
            Cell::new(period.recovery_end.format("%H:%M")).add_attribute(Attribute::Dim),
            Cell::new(FormattedDuration(period.cutoff_duration)).set_alignment(CellAlignment::Right),
            Cell::new(period.cost_without).set_alignment(CellAlignment::Right),
            Cell::new(period.cost_with).set_alignment(CellAlignment::Right),
            Cell::new(FormattedPercentage(period.saving_ratio()))
                .set_alignment(CellAlignment::Right)
                .fg(Color::Green),
            Cell::new(period.price_difference).set_alignment(CellAlignment::Right),
            Cell::new(period.adjusted_threshold)
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
        ]);
    }
    table
}

pub fn build_timeline_table(timeline: &Timeline, phases: &[Phase]) -> Table {
    let mean_rate = if timeline.is_empty() {
        KilowattHourRate::ZERO
    } else {
        #[expect(clippy::cast_precision_loss)]
        let n_slots = timeline.len() as f64;
        timeline.iter().map(|slot| slot.rate).sum::<KilowattHourRate>() / n_slots
    };

    let mut table = new_table();
    table.set_header(vec!["Date", "Start", "End", "Rate", "Phase"]);
    for (slot, phase) in timeline.iter().zip(phases) {
        table.add_row(vec![
            Cell::new(slot.interval.start.format("%b %d")).add_attribute(Attribute::Dim),
            Cell::new(slot.interval.start.format("%H:%M")),
            Cell::new(slot.interval.end.format("%H:%M")).add_attribute(Attribute::Dim),
            Cell::new(slot.rate)
                .set_alignment(CellAlignment::Right)
                .fg(if slot.rate >= mean_rate { Color::Red } else { Color::Green }),
            Cell::new(phase).fg(phase.color()),
        ]);
    }
    table
}
