//! Cycle progress calculation.
//!
//! Progress is the ratio of completed milestones to generated milestones,
//! floored to a whole percent. When a cycle has no milestones at all the
//! calculator falls back to elapsed time against the protocol's expected
//! length. In both modes 100% is reserved for a fully completed, still
//! active cycle; anything short of that caps at 99%.

use chrono::NaiveDate;

use crate::domain::foundation::{MilestoneStatus, Percentage};
use crate::domain::template::TemplateDefinition;

use super::{Cycle, PatientMilestone};

/// Assumed protocol length when no template is available for the
/// day-ratio fallback.
pub const DEFAULT_ASSUMED_LENGTH_DAYS: i32 = 28;

/// Upcoming milestone summary within a progress snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct NextMilestone {
    title: String,
    date: NaiveDate,
    days_until: i64,
}

impl NextMilestone {
    /// Returns the milestone title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the scheduled date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns whole days from the reference date to the milestone.
    pub fn days_until(&self) -> i64 {
        self.days_until
    }
}

/// A read-only snapshot of how far through a cycle the patient is.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleProgress {
    cycle_day: i64,
    percent: Percentage,
    completed_count: usize,
    total_count: usize,
    next_milestone: Option<NextMilestone>,
}

impl CycleProgress {
    /// Computes progress for a cycle as of a reference date.
    ///
    /// `assumed_length_days` is only consulted for the day-ratio fallback
    /// when the cycle has no milestones and no template is available.
    pub fn compute(
        cycle: &Cycle,
        milestones: &[PatientMilestone],
        template: Option<&TemplateDefinition>,
        as_of: NaiveDate,
        assumed_length_days: i32,
    ) -> Self {
        let cycle_day = cycle.cycle_day_on(as_of);
        let completed_count = milestones
            .iter()
            .filter(|m| m.status().is_completed())
            .count();
        let total_count = milestones.len();

        let raw = if total_count == 0 {
            day_ratio_percent(cycle_day, template, assumed_length_days)
        } else {
            Percentage::from_ratio(completed_count, total_count)
        };

        let fully_complete = total_count > 0 && completed_count == total_count;
        let percent = if raw == Percentage::HUNDRED && !(fully_complete && cycle.status().is_mutable())
        {
            Percentage::new(99)
        } else {
            raw
        };

        Self {
            cycle_day,
            percent,
            completed_count,
            total_count,
            next_milestone: find_next_milestone(milestones, as_of),
        }
    }

    /// Returns the 1-based cycle day (zero or negative before the start).
    pub fn cycle_day(&self) -> i64 {
        self.cycle_day
    }

    /// Returns the completion percentage.
    pub fn percent(&self) -> Percentage {
        self.percent
    }

    /// Returns how many milestones are completed.
    pub fn completed_count(&self) -> usize {
        self.completed_count
    }

    /// Returns how many milestones the cycle has.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Returns the next expected milestone, if one is still ahead.
    pub fn next_milestone(&self) -> Option<&NextMilestone> {
        self.next_milestone.as_ref()
    }
}

/// Elapsed-time percentage for cycles without milestones.
fn day_ratio_percent(
    cycle_day: i64,
    template: Option<&TemplateDefinition>,
    assumed_length_days: i32,
) -> Percentage {
    let length = template
        .map(|t| t.total_duration_days())
        .unwrap_or(assumed_length_days)
        .max(1) as i64;
    let elapsed = cycle_day.clamp(0, length) as usize;
    Percentage::from_ratio(elapsed, length as usize)
}

/// Earliest pending milestone on or after the reference date.
fn find_next_milestone(milestones: &[PatientMilestone], as_of: NaiveDate) -> Option<NextMilestone> {
    milestones
        .iter()
        .filter(|m| m.status() == MilestoneStatus::Pending && m.date() >= as_of)
        .min_by_key(|m| m.date())
        .map(|m| NextMilestone {
            title: m.title().to_string(),
            date: m.date(),
            days_until: (m.date() - as_of).num_days(),
        })
}
