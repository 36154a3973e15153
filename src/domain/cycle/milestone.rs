//! PatientMilestone entity - A dated clinical event within a cycle.

use chrono::NaiveDate;

use crate::domain::foundation::{
    CycleId, DomainError, ErrorCode, MilestoneId, MilestoneKind, MilestoneStatus, Timestamp,
};

/// A single dated milestone belonging to a treatment cycle.
///
/// Milestones are generated from the cycle's template when the cycle is
/// created and then updated by the patient as treatment progresses.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientMilestone {
    id: MilestoneId,
    cycle_id: CycleId,
    kind: MilestoneKind,
    title: String,
    date: NaiveDate,
    status: MilestoneStatus,
    notes: Option<String>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl PatientMilestone {
    /// Creates a new pending milestone.
    pub fn new(
        cycle_id: CycleId,
        kind: MilestoneKind,
        title: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: MilestoneId::new(),
            cycle_id,
            kind,
            title: title.into(),
            date,
            status: MilestoneStatus::Pending,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitutes a milestone from persisted data.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: MilestoneId,
        cycle_id: CycleId,
        kind: MilestoneKind,
        title: String,
        date: NaiveDate,
        status: MilestoneStatus,
        notes: Option<String>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            cycle_id,
            kind,
            title,
            date,
            status,
            notes,
            created_at,
            updated_at,
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Accessors
    // ───────────────────────────────────────────────────────────────

    /// Returns the milestone ID.
    pub fn id(&self) -> MilestoneId {
        self.id
    }

    /// Returns the cycle this milestone belongs to.
    pub fn cycle_id(&self) -> CycleId {
        self.cycle_id
    }

    /// Returns the canonical milestone kind.
    pub fn kind(&self) -> &MilestoneKind {
        &self.kind
    }

    /// Returns the patient-facing title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the scheduled (or recorded) date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the milestone status.
    pub fn status(&self) -> MilestoneStatus {
        self.status
    }

    /// Returns patient notes, if any.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns when this milestone was created.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when this milestone was last updated.
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    // ───────────────────────────────────────────────────────────────
    // Mutations
    // ───────────────────────────────────────────────────────────────

    /// Transitions the milestone to a new status.
    ///
    /// Setting the current status again is a no-op.
    pub fn set_status(&mut self, target: MilestoneStatus) -> Result<(), DomainError> {
        if self.status == target {
            return Ok(());
        }
        if !self.status.can_transition_to(&target) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Cannot transition milestone from {} to {}",
                    self.status, target
                ),
            )
            .with_detail("milestone_id", self.id.to_string()));
        }
        self.status = target;
        self.touch();
        Ok(())
    }

    /// Replaces the patient notes.
    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
        self.touch();
    }

    /// Moves the milestone to a different date.
    pub fn reschedule(&mut self, date: NaiveDate) {
        self.date = date;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}
