//! UpdateMilestoneHandler - Command handler for patient milestone edits.
//!
//! Patients mark milestones active, completed or skipped, reschedule them,
//! and keep notes. Edits are only allowed while the owning cycle is still
//! active; status changes go through the milestone's own transition rules.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::cycle::PatientMilestone;
use crate::domain::foundation::{CycleId, DomainError, MilestoneId, MilestoneStatus};
use crate::ports::{CycleRepository, MilestoneRepository};

/// Command to update a single milestone.
///
/// Absent fields are left untouched, so a command usually carries just the
/// one change the patient made.
#[derive(Debug, Clone)]
pub struct UpdateMilestoneCommand {
    /// The milestone to update.
    pub milestone_id: MilestoneId,
    /// New status, when the patient changes it.
    pub status: Option<MilestoneStatus>,
    /// Replacement notes; `Some(None)` clears them.
    pub notes: Option<Option<String>>,
    /// New date, when the milestone is rescheduled.
    pub date: Option<NaiveDate>,
}

/// Result of successfully updating a milestone.
#[derive(Debug, Clone)]
pub struct UpdateMilestoneResult {
    /// The milestone after the edit.
    pub milestone: PatientMilestone,
}

/// Error type for milestone updates.
#[derive(Debug, Clone)]
pub enum UpdateMilestoneError {
    /// Milestone not found.
    MilestoneNotFound(MilestoneId),
    /// The owning cycle record is missing.
    CycleNotFound(CycleId),
    /// Domain error (closed cycle, invalid transition, persistence).
    Domain(DomainError),
}

impl std::fmt::Display for UpdateMilestoneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateMilestoneError::MilestoneNotFound(id) => {
                write!(f, "Milestone not found: {}", id)
            }
            UpdateMilestoneError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            UpdateMilestoneError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for UpdateMilestoneError {}

impl From<DomainError> for UpdateMilestoneError {
    fn from(err: DomainError) -> Self {
        UpdateMilestoneError::Domain(err)
    }
}

/// Handler for patient milestone edits.
pub struct UpdateMilestoneHandler {
    cycle_repository: Arc<dyn CycleRepository>,
    milestone_repository: Arc<dyn MilestoneRepository>,
}

impl UpdateMilestoneHandler {
    pub fn new(
        cycle_repository: Arc<dyn CycleRepository>,
        milestone_repository: Arc<dyn MilestoneRepository>,
    ) -> Self {
        Self {
            cycle_repository,
            milestone_repository,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdateMilestoneCommand,
    ) -> Result<UpdateMilestoneResult, UpdateMilestoneError> {
        // 1. Find the milestone
        let mut milestone = self
            .milestone_repository
            .find_by_id(&cmd.milestone_id)
            .await?
            .ok_or(UpdateMilestoneError::MilestoneNotFound(cmd.milestone_id))?;

        // 2. The owning cycle must still be active
        let cycle = self
            .cycle_repository
            .find_by_id(&milestone.cycle_id())
            .await?
            .ok_or(UpdateMilestoneError::CycleNotFound(milestone.cycle_id()))?;
        cycle.ensure_mutable()?;

        // 3. Apply the edit (status transitions validated by the domain)
        if let Some(status) = cmd.status {
            milestone.set_status(status)?;
        }
        if let Some(notes) = cmd.notes {
            milestone.set_notes(notes);
        }
        if let Some(date) = cmd.date {
            milestone.reschedule(date);
        }

        // 4. Persist
        self.milestone_repository.update(&milestone).await?;

        Ok(UpdateMilestoneResult { milestone })
    }
}
