//! Three-tier stage detection.
//!
//! Where is the patient in their treatment right now? The detector answers
//! from the strongest available signal:
//!
//! 1. an explicitly active milestone (high confidence),
//! 2. otherwise the most recently completed milestone inside a recency
//!    window (medium confidence, reported with how many days ago it was),
//! 3. otherwise the stage whose expected day range covers today's cycle
//!    day (low confidence).
//!
//! If none of the tiers produce a stage the detector returns `None` and the
//! caller decides how to present "we don't know".

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::cycle::PatientMilestone;
use crate::domain::foundation::MilestoneStatus;

use super::{StageReferenceRow, StageReferenceSet};

/// Default recency window for tier-2 fallback matching.
pub const DEFAULT_FALLBACK_WINDOW_DAYS: i64 = 7;

/// Which tier produced a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSource {
    CurrentMilestone,
    FallbackMilestone,
    DayBased,
}

/// How much to trust a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionConfidence {
    High,
    Medium,
    Low,
}

/// The completed milestone a tier-2 detection leaned on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackMilestone {
    pub title: String,
    pub days_ago: i64,
}

/// A resolved stage with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageDetection {
    pub stage_id: String,
    pub stage_name: String,
    pub description: String,
    pub source: DetectionSource,
    pub confidence: DetectionConfidence,
    pub fallback_milestone: Option<FallbackMilestone>,
}

impl StageDetection {
    fn from_row(
        row: &StageReferenceRow,
        source: DetectionSource,
        confidence: DetectionConfidence,
        fallback_milestone: Option<FallbackMilestone>,
    ) -> Self {
        Self {
            stage_id: row.stage_id().to_string(),
            stage_name: row.stage_name().to_string(),
            description: row.details().to_string(),
            source,
            confidence,
            fallback_milestone,
        }
    }
}

/// Stage detector with a configurable tier-2 recency window.
#[derive(Debug, Clone)]
pub struct StageDetector {
    fallback_window_days: i64,
}

impl Default for StageDetector {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK_WINDOW_DAYS)
    }
}

impl StageDetector {
    /// Creates a detector with the given tier-2 window in days.
    pub fn new(fallback_window_days: i64) -> Self {
        Self {
            fallback_window_days: fallback_window_days.max(0),
        }
    }

    /// Returns the configured tier-2 window.
    pub fn fallback_window_days(&self) -> i64 {
        self.fallback_window_days
    }

    /// Detects the current stage from milestones and the reference table.
    ///
    /// `cycle_day` is the 1-based day corresponding to `as_of`; zero and
    /// negative values are valid and match pre-cycle reference rows.
    pub fn detect(
        &self,
        milestones: &[PatientMilestone],
        reference: &StageReferenceSet,
        cycle_day: i64,
        as_of: NaiveDate,
    ) -> Option<StageDetection> {
        if let Some(detection) = self.detect_from_active(milestones, reference) {
            return Some(detection);
        }
        if let Some(detection) = self.detect_from_recent_completion(milestones, reference, as_of) {
            return Some(detection);
        }
        self.detect_from_cycle_day(reference, cycle_day)
    }

    /// Tier 1: the latest active milestone, if it resolves to a stage.
    fn detect_from_active(
        &self,
        milestones: &[PatientMilestone],
        reference: &StageReferenceSet,
    ) -> Option<StageDetection> {
        let active = milestones
            .iter()
            .filter(|m| m.status() == MilestoneStatus::Active)
            .max_by_key(|m| m.date())?;

        reference.row_for_kind(active.kind()).map(|row| {
            StageDetection::from_row(
                row,
                DetectionSource::CurrentMilestone,
                DetectionConfidence::High,
                None,
            )
        })
    }

    /// Tier 2: the most recently completed milestone within the window.
    ///
    /// Only the single most recent completion is consulted; if it does not
    /// resolve to a stage the detector moves on to day-based matching
    /// rather than scanning older completions.
    fn detect_from_recent_completion(
        &self,
        milestones: &[PatientMilestone],
        reference: &StageReferenceSet,
        as_of: NaiveDate,
    ) -> Option<StageDetection> {
        let recent = milestones
            .iter()
            .filter(|m| m.status().is_completed())
            .filter(|m| {
                let days_ago = (as_of - m.date()).num_days();
                (0..=self.fallback_window_days).contains(&days_ago)
            })
            .max_by_key(|m| m.date())?;

        reference.row_for_kind(recent.kind()).map(|row| {
            let days_ago = (as_of - recent.date()).num_days();
            StageDetection::from_row(
                row,
                DetectionSource::FallbackMilestone,
                DetectionConfidence::Medium,
                Some(FallbackMilestone {
                    title: recent.title().to_string(),
                    days_ago,
                }),
            )
        })
    }

    /// Tier 3: the stage whose expected day range covers the cycle day.
    fn detect_from_cycle_day(
        &self,
        reference: &StageReferenceSet,
        cycle_day: i64,
    ) -> Option<StageDetection> {
        reference.row_for_day(cycle_day).map(|row| {
            StageDetection::from_row(
                row,
                DetectionSource::DayBased,
                DetectionConfidence::Low,
                None,
            )
        })
    }
}
