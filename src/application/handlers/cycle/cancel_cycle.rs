//! CancelCycleHandler - Command handler for cancelling a cycle.
//!
//! Cancellation is the patient or clinic abandoning the cycle partway:
//! status moves from Active to Cancelled with an end date. The milestone
//! schedule is kept for the patient's history.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::cycle::Cycle;
use crate::domain::foundation::{CycleId, DomainError, Timestamp};
use crate::ports::CycleRepository;

/// Command to cancel a cycle.
#[derive(Debug, Clone)]
pub struct CancelCycleCommand {
    /// The cycle to cancel.
    pub cycle_id: CycleId,
    /// End date to record; defaults to today (UTC).
    pub end_date: Option<NaiveDate>,
}

/// Result of successfully cancelling a cycle.
#[derive(Debug, Clone)]
pub struct CancelCycleResult {
    /// The cancelled cycle.
    pub cycle: Cycle,
}

/// Error type for cancelling a cycle.
#[derive(Debug, Clone)]
pub enum CancelCycleError {
    /// Cycle not found.
    CycleNotFound(CycleId),
    /// Domain error (e.g. the cycle is already closed).
    Domain(DomainError),
}

impl std::fmt::Display for CancelCycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancelCycleError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            CancelCycleError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CancelCycleError {}

impl From<DomainError> for CancelCycleError {
    fn from(err: DomainError) -> Self {
        CancelCycleError::Domain(err)
    }
}

/// Handler for cancelling cycles.
pub struct CancelCycleHandler {
    cycle_repository: Arc<dyn CycleRepository>,
}

impl CancelCycleHandler {
    pub fn new(cycle_repository: Arc<dyn CycleRepository>) -> Self {
        Self { cycle_repository }
    }

    pub async fn handle(&self, cmd: CancelCycleCommand) -> Result<CancelCycleResult, CancelCycleError> {
        // 1. Find the cycle
        let mut cycle = self
            .cycle_repository
            .find_by_id(&cmd.cycle_id)
            .await?
            .ok_or(CancelCycleError::CycleNotFound(cmd.cycle_id))?;

        // 2. Transition (domain validates Active -> Cancelled)
        let end_date = cmd.end_date.unwrap_or_else(Timestamp::today_utc);
        cycle.cancel(end_date)?;

        // 3. Persist
        self.cycle_repository.update(&cycle).await?;

        Ok(CancelCycleResult { cycle })
    }
}
