//! DeleteCycleHandler - Command handler for deleting a cycle.
//!
//! Deletion cascades: the milestone schedule goes first, then the cycle
//! record, so a failure partway never leaves orphaned milestones behind.

use std::sync::Arc;

use crate::domain::foundation::{CycleId, DomainError};
use crate::ports::{CycleRepository, MilestoneRepository};

/// Command to delete a cycle and its milestones.
#[derive(Debug, Clone)]
pub struct DeleteCycleCommand {
    /// The cycle to delete.
    pub cycle_id: CycleId,
}

/// Result of successfully deleting a cycle.
#[derive(Debug, Clone)]
pub struct DeleteCycleResult {
    /// How many milestones were removed with the cycle.
    pub milestones_removed: u64,
}

/// Error type for deleting a cycle.
#[derive(Debug, Clone)]
pub enum DeleteCycleError {
    /// Cycle not found.
    CycleNotFound(CycleId),
    /// Domain error (persistence).
    Domain(DomainError),
}

impl std::fmt::Display for DeleteCycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteCycleError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            DeleteCycleError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DeleteCycleError {}

impl From<DomainError> for DeleteCycleError {
    fn from(err: DomainError) -> Self {
        DeleteCycleError::Domain(err)
    }
}

/// Handler for deleting cycles.
pub struct DeleteCycleHandler {
    cycle_repository: Arc<dyn CycleRepository>,
    milestone_repository: Arc<dyn MilestoneRepository>,
}

impl DeleteCycleHandler {
    pub fn new(
        cycle_repository: Arc<dyn CycleRepository>,
        milestone_repository: Arc<dyn MilestoneRepository>,
    ) -> Self {
        Self {
            cycle_repository,
            milestone_repository,
        }
    }

    pub async fn handle(&self, cmd: DeleteCycleCommand) -> Result<DeleteCycleResult, DeleteCycleError> {
        // 1. The cycle must exist
        self.cycle_repository
            .find_by_id(&cmd.cycle_id)
            .await?
            .ok_or(DeleteCycleError::CycleNotFound(cmd.cycle_id))?;

        // 2. Milestones first, then the cycle
        let milestones_removed = self
            .milestone_repository
            .delete_by_cycle(&cmd.cycle_id)
            .await?;
        self.cycle_repository.delete(&cmd.cycle_id).await?;

        tracing::debug!(
            cycle_id = %cmd.cycle_id,
            milestones_removed,
            "cycle deleted"
        );

        Ok(DeleteCycleResult { milestones_removed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::{InMemoryCycleRepository, InMemoryMilestoneRepository};
    use crate::domain::cycle::{Cycle, PatientMilestone};
    use crate::domain::foundation::{MilestoneKind, PatientId, TreatmentType};
    use chrono::NaiveDate;

    // ─────────────────────────────────────────────────────────────────────
    // Test helpers
    // ─────────────────────────────────────────────────────────────────────

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_cycle() -> Cycle {
        Cycle::new(
            PatientId::new("patient-1").unwrap(),
            TreatmentType::EggFreezing,
            date(2025, 2, 1),
            false,
        )
    }

    async fn seed() -> (
        Arc<InMemoryCycleRepository>,
        Arc<InMemoryMilestoneRepository>,
        Cycle,
    ) {
        let cycles = Arc::new(InMemoryCycleRepository::new());
        let milestones = Arc::new(InMemoryMilestoneRepository::new());

        let cycle = test_cycle();
        cycles.save(&cycle).await.unwrap();
        let schedule = vec![
            PatientMilestone::new(
                cycle.id(),
                MilestoneKind::TreatmentStart,
                "Treatment start",
                date(2025, 2, 1),
            ),
            PatientMilestone::new(
                cycle.id(),
                MilestoneKind::EggRetrieval,
                "Egg retrieval",
                date(2025, 2, 13),
            ),
        ];
        milestones.insert_batch(&schedule).await.unwrap();
        (cycles, milestones, cycle)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tests
    // ─────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn deletes_cycle_and_cascades_to_milestones() {
        let (cycles, milestones, cycle) = seed().await;
        let handler = DeleteCycleHandler::new(cycles.clone(), milestones.clone());

        let result = handler
            .handle(DeleteCycleCommand { cycle_id: cycle.id() })
            .await
            .unwrap();

        assert_eq!(result.milestones_removed, 2);
        assert!(cycles.find_by_id(&cycle.id()).await.unwrap().is_none());
        assert_eq!(milestones.count_by_cycle(&cycle.id()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn deleting_a_cycle_without_milestones_reports_zero() {
        let cycles = Arc::new(InMemoryCycleRepository::new());
        let milestones = Arc::new(InMemoryMilestoneRepository::new());
        let cycle = test_cycle();
        cycles.save(&cycle).await.unwrap();

        let handler = DeleteCycleHandler::new(cycles, milestones);
        let result = handler
            .handle(DeleteCycleCommand { cycle_id: cycle.id() })
            .await
            .unwrap();

        assert_eq!(result.milestones_removed, 0);
    }

    #[tokio::test]
    async fn fails_when_cycle_not_found() {
        let (cycles, milestones, _cycle) = seed().await;
        let handler = DeleteCycleHandler::new(cycles, milestones.clone());

        let result = handler
            .handle(DeleteCycleCommand {
                cycle_id: CycleId::new(),
            })
            .await;

        assert!(matches!(result, Err(DeleteCycleError::CycleNotFound(_))));
        // Nothing was touched.
        assert_eq!(milestones.count().await, 2);
    }
}
