//! CompleteCycleHandler - Command handler for completing a cycle.
//!
//! Completing a cycle transitions its status from Active to Completed and
//! records the end date. Milestones keep whatever status the patient left
//! them in; progress reporting is clamped separately for closed cycles.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::cycle::Cycle;
use crate::domain::foundation::{CycleId, DomainError, Timestamp};
use crate::ports::CycleRepository;

/// Command to complete a cycle.
#[derive(Debug, Clone)]
pub struct CompleteCycleCommand {
    /// The cycle to complete.
    pub cycle_id: CycleId,
    /// End date to record; defaults to today (UTC).
    pub end_date: Option<NaiveDate>,
}

/// Result of successfully completing a cycle.
#[derive(Debug, Clone)]
pub struct CompleteCycleResult {
    /// The completed cycle.
    pub cycle: Cycle,
}

/// Error type for completing a cycle.
#[derive(Debug, Clone)]
pub enum CompleteCycleError {
    /// Cycle not found.
    CycleNotFound(CycleId),
    /// Domain error (e.g. the cycle is already closed).
    Domain(DomainError),
}

impl std::fmt::Display for CompleteCycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompleteCycleError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            CompleteCycleError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CompleteCycleError {}

impl From<DomainError> for CompleteCycleError {
    fn from(err: DomainError) -> Self {
        CompleteCycleError::Domain(err)
    }
}

/// Handler for completing cycles.
pub struct CompleteCycleHandler {
    cycle_repository: Arc<dyn CycleRepository>,
}

impl CompleteCycleHandler {
    pub fn new(cycle_repository: Arc<dyn CycleRepository>) -> Self {
        Self { cycle_repository }
    }

    pub async fn handle(
        &self,
        cmd: CompleteCycleCommand,
    ) -> Result<CompleteCycleResult, CompleteCycleError> {
        // 1. Find the cycle
        let mut cycle = self
            .cycle_repository
            .find_by_id(&cmd.cycle_id)
            .await?
            .ok_or(CompleteCycleError::CycleNotFound(cmd.cycle_id))?;

        // 2. Transition (domain validates Active -> Completed)
        let end_date = cmd.end_date.unwrap_or_else(Timestamp::today_utc);
        cycle.complete(end_date)?;

        // 3. Persist
        self.cycle_repository.update(&cycle).await?;

        Ok(CompleteCycleResult { cycle })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryCycleRepository;
    use crate::domain::foundation::{CycleStatus, ErrorCode, PatientId, TreatmentType};

    // ─────────────────────────────────────────────────────────────────────
    // Test helpers
    // ─────────────────────────────────────────────────────────────────────

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_cycle() -> Cycle {
        Cycle::new(
            PatientId::new("patient-1").unwrap(),
            TreatmentType::IvfFresh,
            date(2025, 1, 1),
            false,
        )
    }

    async fn seeded_handler(cycle: &Cycle) -> (Arc<InMemoryCycleRepository>, CompleteCycleHandler) {
        let cycles = Arc::new(InMemoryCycleRepository::new());
        cycles.save(cycle).await.unwrap();
        let handler = CompleteCycleHandler::new(cycles.clone());
        (cycles, handler)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tests
    // ─────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn completes_active_cycle_with_end_date() {
        let cycle = test_cycle();
        let (cycles, handler) = seeded_handler(&cycle).await;

        let result = handler
            .handle(CompleteCycleCommand {
                cycle_id: cycle.id(),
                end_date: Some(date(2025, 1, 28)),
            })
            .await
            .unwrap();

        assert_eq!(result.cycle.status(), CycleStatus::Completed);
        assert_eq!(result.cycle.end_date(), Some(date(2025, 1, 28)));

        let stored = cycles.find_by_id(&cycle.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), CycleStatus::Completed);
    }

    #[tokio::test]
    async fn end_date_defaults_to_today() {
        let cycle = test_cycle();
        let (_cycles, handler) = seeded_handler(&cycle).await;

        let result = handler
            .handle(CompleteCycleCommand {
                cycle_id: cycle.id(),
                end_date: None,
            })
            .await
            .unwrap();

        assert_eq!(result.cycle.end_date(), Some(Timestamp::today_utc()));
    }

    #[tokio::test]
    async fn completing_twice_is_rejected() {
        let cycle = test_cycle();
        let (_cycles, handler) = seeded_handler(&cycle).await;

        let cmd = CompleteCycleCommand {
            cycle_id: cycle.id(),
            end_date: Some(date(2025, 1, 28)),
        };
        handler.handle(cmd.clone()).await.unwrap();
        let result = handler.handle(cmd).await;

        match result {
            Err(CompleteCycleError::Domain(err)) => {
                assert_eq!(err.code, ErrorCode::InvalidStateTransition);
            }
            other => panic!("expected InvalidStateTransition, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn fails_when_cycle_not_found() {
        let cycle = test_cycle();
        let (_cycles, handler) = seeded_handler(&cycle).await;

        let result = handler
            .handle(CompleteCycleCommand {
                cycle_id: CycleId::new(),
                end_date: None,
            })
            .await;
        assert!(matches!(result, Err(CompleteCycleError::CycleNotFound(_))));
    }
}
