//! DetectStageHandler - Query handler for the patient's current stage.
//!
//! Loads the cycle's milestone signals and reference rows, then runs the
//! three-tier detector. `Ok(None)` is an expected outcome (closed cycle, or
//! no tier matched) and callers render it as "pending stage information".

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::foundation::{CycleId, DomainError, Timestamp};
use crate::domain::stage::{StageDetection, StageDetector};
use crate::ports::{CycleRepository, MilestoneRepository, StageReferenceTable};

/// Query for the current stage of a cycle.
#[derive(Debug, Clone)]
pub struct DetectStageQuery {
    /// The cycle to inspect.
    pub cycle_id: CycleId,
    /// Reference date for deterministic reads; defaults to today (UTC).
    pub as_of: Option<NaiveDate>,
}

/// Result of a stage detection query.
///
/// `None` means no stage could be determined, which the caller presents as
/// a neutral pending state rather than an error.
pub type DetectStageResult = Option<StageDetection>;

/// Error type for stage detection queries.
#[derive(Debug, Clone)]
pub enum DetectStageError {
    /// Cycle not found.
    CycleNotFound(CycleId),
    /// Domain error (persistence, reference data).
    Domain(DomainError),
}

impl std::fmt::Display for DetectStageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectStageError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            DetectStageError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DetectStageError {}

impl From<DomainError> for DetectStageError {
    fn from(err: DomainError) -> Self {
        DetectStageError::Domain(err)
    }
}

/// Handler for stage detection queries.
pub struct DetectStageHandler {
    cycle_repository: Arc<dyn CycleRepository>,
    milestone_repository: Arc<dyn MilestoneRepository>,
    stage_table: Arc<dyn StageReferenceTable>,
    detector: StageDetector,
}

impl DetectStageHandler {
    pub fn new(
        cycle_repository: Arc<dyn CycleRepository>,
        milestone_repository: Arc<dyn MilestoneRepository>,
        stage_table: Arc<dyn StageReferenceTable>,
        detector: StageDetector,
    ) -> Self {
        Self {
            cycle_repository,
            milestone_repository,
            stage_table,
            detector,
        }
    }

    pub async fn handle(&self, query: DetectStageQuery) -> Result<DetectStageResult, DetectStageError> {
        // 1. Find the cycle
        let cycle = self
            .cycle_repository
            .find_by_id(&query.cycle_id)
            .await?
            .ok_or(DetectStageError::CycleNotFound(query.cycle_id))?;

        // 2. Only active cycles have a current stage
        if !cycle.status().is_mutable() {
            return Ok(None);
        }

        // 3. Gather signals and reference rows
        let milestones = self.milestone_repository.list_by_cycle(&cycle.id()).await?;
        let reference = self.stage_table.rows_for(cycle.treatment_type()).await?;

        // 4. Run the tiered detector
        let as_of = query.as_of.unwrap_or_else(Timestamp::today_utc);
        let detection =
            self.detector
                .detect(&milestones, &reference, cycle.cycle_day_on(as_of), as_of);

        Ok(detection)
    }
}
