//! CreateCycleHandler - Command handler for starting a treatment cycle.
//!
//! Creates the cycle record and expands its treatment template into dated
//! patient milestones. Callers may supply the cycle ID (client-generated),
//! which makes a retried request detectable: if milestones already exist for
//! that cycle the handler returns the existing set instead of generating a
//! duplicate schedule.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::cycle::{expand_milestones, Cycle, PatientMilestone};
use crate::domain::foundation::{CycleId, DomainError, ErrorCode, PatientId, TreatmentType};
use crate::ports::{CycleRepository, MilestoneRepository, TemplateStore};

/// Command to start a new treatment cycle.
#[derive(Debug, Clone)]
pub struct CreateCycleCommand {
    /// Client-generated cycle ID; supplying the same ID on retry makes the
    /// operation idempotent. `None` lets the handler mint one.
    pub cycle_id: Option<CycleId>,
    /// The patient the cycle belongs to.
    pub patient_id: PatientId,
    /// The treatment protocol to follow.
    pub treatment_type: TreatmentType,
    /// Day 1 of the cycle.
    pub start_date: NaiveDate,
    /// Whether this is a donor conception cycle (adds the donor
    /// preparation milestones ahead of the protocol).
    pub donor_conception: bool,
}

/// Result of successfully creating a cycle.
#[derive(Debug, Clone)]
pub struct CreateCycleResult {
    /// The created (or pre-existing) cycle.
    pub cycle: Cycle,
    /// The cycle's milestone schedule, ordered by date.
    pub milestones: Vec<PatientMilestone>,
    /// True when a retried request found the schedule already generated.
    pub already_existed: bool,
}

/// Error type for cycle creation.
#[derive(Debug, Clone)]
pub enum CreateCycleError {
    /// No usable template exists for the treatment type.
    TemplateNotFound(TreatmentType),
    /// Domain error (validation, persistence).
    Domain(DomainError),
}

impl std::fmt::Display for CreateCycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateCycleError::TemplateNotFound(t) => {
                write!(f, "No template for treatment type: {}", t.key())
            }
            CreateCycleError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CreateCycleError {}

impl From<DomainError> for CreateCycleError {
    fn from(err: DomainError) -> Self {
        CreateCycleError::Domain(err)
    }
}

/// Handler for creating cycles and generating their milestone schedule.
pub struct CreateCycleHandler {
    cycle_repository: Arc<dyn CycleRepository>,
    milestone_repository: Arc<dyn MilestoneRepository>,
    template_store: Arc<dyn TemplateStore>,
}

impl CreateCycleHandler {
    pub fn new(
        cycle_repository: Arc<dyn CycleRepository>,
        milestone_repository: Arc<dyn MilestoneRepository>,
        template_store: Arc<dyn TemplateStore>,
    ) -> Self {
        Self {
            cycle_repository,
            milestone_repository,
            template_store,
        }
    }

    pub async fn handle(&self, cmd: CreateCycleCommand) -> Result<CreateCycleResult, CreateCycleError> {
        // 1. A retried request carries the same cycle ID; if that cycle
        //    already has milestones the schedule was fully generated before.
        let existing = match cmd.cycle_id {
            Some(id) => self.cycle_repository.find_by_id(&id).await?,
            None => None,
        };
        if let Some(cycle) = &existing {
            if self.milestone_repository.count_by_cycle(&cycle.id()).await? > 0 {
                let milestones = self.milestone_repository.list_by_cycle(&cycle.id()).await?;
                return Ok(CreateCycleResult {
                    cycle: cycle.clone(),
                    milestones,
                    already_existed: true,
                });
            }
        }

        // 2. Resolve the treatment template.
        let template = self
            .template_store
            .definition(&cmd.treatment_type)
            .await
            .map_err(|err| match err.code {
                ErrorCode::TemplateNotFound => {
                    CreateCycleError::TemplateNotFound(cmd.treatment_type.clone())
                }
                _ => CreateCycleError::Domain(err),
            })?;

        // 3. Build (or reuse) the cycle record.
        let is_new = existing.is_none();
        let cycle = match existing {
            Some(cycle) => cycle,
            None => match cmd.cycle_id {
                Some(id) => Cycle::with_id(
                    id,
                    cmd.patient_id,
                    cmd.treatment_type,
                    cmd.start_date,
                    cmd.donor_conception,
                ),
                None => Cycle::new(
                    cmd.patient_id,
                    cmd.treatment_type,
                    cmd.start_date,
                    cmd.donor_conception,
                ),
            },
        };

        // 4. Expand the template into dated pending milestones.
        let milestones = expand_milestones(&cycle, &template);

        // 5. Persist the cycle, then the schedule.
        if is_new {
            self.cycle_repository.save(&cycle).await?;
        }
        if let Err(err) = self.milestone_repository.insert_batch(&milestones).await {
            // A retry must start from a blank slate.
            if let Err(cleanup_err) = self.milestone_repository.delete_by_cycle(&cycle.id()).await {
                tracing::warn!(
                    cycle_id = %cycle.id(),
                    error = %cleanup_err,
                    "cleanup after failed milestone insert also failed"
                );
            }
            return Err(err.into());
        }

        tracing::debug!(
            cycle_id = %cycle.id(),
            treatment = cycle.treatment_type().key(),
            milestones = milestones.len(),
            "cycle created"
        );

        Ok(CreateCycleResult {
            cycle,
            milestones,
            already_existed: false,
        })
    }
}
