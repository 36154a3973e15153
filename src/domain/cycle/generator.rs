//! Milestone generation from treatment templates.
//!
//! Expands a cycle's template (plus the donor overlay when applicable) into
//! concrete dated milestones. Generation is pure and deterministic: the same
//! cycle and template always produce the same titles, kinds and dates.

use chrono::{Duration, NaiveDate};

use crate::domain::template::{donor_overlay, StageTemplateEntry, TemplateDefinition};

use super::{Cycle, PatientMilestone};

/// Maps a template day offset onto a calendar date.
///
/// Day 1 is the cycle start date, so positive offsets shift by `offset - 1`.
/// Zero and negative offsets count back from the start date directly, which
/// makes day 0 and day 1 both land on the start date.
pub fn materialize_date(start_date: NaiveDate, day_offset: i32) -> NaiveDate {
    let delta = if day_offset >= 1 {
        i64::from(day_offset) - 1
    } else {
        i64::from(day_offset)
    };
    start_date + Duration::days(delta)
}

/// Expands a cycle's template into pending milestones.
///
/// For donor conception cycles the donor preparation overlay is emitted
/// first; its negative day offsets date those milestones before the cycle
/// start. Within each source the template's day ordering is preserved.
pub fn expand_milestones(cycle: &Cycle, template: &TemplateDefinition) -> Vec<PatientMilestone> {
    let mut milestones = Vec::with_capacity(
        template.stage_count() + if cycle.donor_conception() { donor_overlay().len() } else { 0 },
    );

    if cycle.donor_conception() {
        for entry in donor_overlay() {
            milestones.push(milestone_from_entry(cycle, entry));
        }
    }

    for entry in template.stages() {
        milestones.push(milestone_from_entry(cycle, entry));
    }

    milestones
}

fn milestone_from_entry(cycle: &Cycle, entry: &StageTemplateEntry) -> PatientMilestone {
    PatientMilestone::new(
        cycle.id(),
        entry.kind().clone(),
        entry.stage_name(),
        materialize_date(cycle.start_date(), entry.day_start()),
    )
}
