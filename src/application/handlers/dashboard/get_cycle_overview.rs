//! GetCycleOverviewHandler - Query handler for the cycle dashboard.
//!
//! One read returning everything the dashboard renders for a cycle: the
//! cycle itself, its milestone schedule, the detected stage, and progress.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::cycle::{Cycle, CycleProgress, PatientMilestone};
use crate::domain::foundation::{
    CycleId, CycleStatus, DomainError, ErrorCode, MilestoneId, MilestoneKind, MilestoneStatus,
    Timestamp, TreatmentType,
};
use crate::domain::stage::{StageDetection, StageDetector};
use crate::ports::{CycleRepository, MilestoneRepository, StageReferenceTable, TemplateStore};

use super::get_cycle_progress::CycleProgressView;

/// Query for a cycle's dashboard overview.
#[derive(Debug, Clone)]
pub struct GetCycleOverviewQuery {
    /// The cycle to render.
    pub cycle_id: CycleId,
    /// Reference date for deterministic reads; defaults to today (UTC).
    pub as_of: Option<NaiveDate>,
}

/// Cycle header data for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleView {
    pub id: CycleId,
    pub patient_id: String,
    pub treatment_type: TreatmentType,
    pub treatment_display_name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: CycleStatus,
    pub donor_conception: bool,
}

impl CycleView {
    fn from_cycle(cycle: &Cycle, display_name: String) -> Self {
        Self {
            id: cycle.id(),
            patient_id: cycle.patient_id().to_string(),
            treatment_type: cycle.treatment_type().clone(),
            treatment_display_name: display_name,
            start_date: cycle.start_date(),
            end_date: cycle.end_date(),
            status: cycle.status(),
            donor_conception: cycle.donor_conception(),
        }
    }
}

/// One milestone row for the dashboard schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneView {
    pub id: MilestoneId,
    pub kind: MilestoneKind,
    pub title: String,
    pub date: NaiveDate,
    pub status: MilestoneStatus,
    pub notes: Option<String>,
}

impl MilestoneView {
    fn from_milestone(milestone: &PatientMilestone) -> Self {
        Self {
            id: milestone.id(),
            kind: milestone.kind().clone(),
            title: milestone.title().to_string(),
            date: milestone.date(),
            status: milestone.status(),
            notes: milestone.notes().map(str::to_string),
        }
    }
}

/// Everything the dashboard needs for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleOverviewView {
    pub cycle: CycleView,
    /// The schedule, ordered by date.
    pub milestones: Vec<MilestoneView>,
    /// Detected stage; `None` for closed cycles or when no tier matched.
    pub stage: Option<StageDetection>,
    pub progress: CycleProgressView,
}

/// Error type for overview queries.
#[derive(Debug, Clone)]
pub enum GetCycleOverviewError {
    /// Cycle not found.
    CycleNotFound(CycleId),
    /// Domain error (persistence, reference data).
    Domain(DomainError),
}

impl std::fmt::Display for GetCycleOverviewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetCycleOverviewError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            GetCycleOverviewError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for GetCycleOverviewError {}

impl From<DomainError> for GetCycleOverviewError {
    fn from(err: DomainError) -> Self {
        GetCycleOverviewError::Domain(err)
    }
}

/// Handler for dashboard overview queries.
pub struct GetCycleOverviewHandler {
    cycle_repository: Arc<dyn CycleRepository>,
    milestone_repository: Arc<dyn MilestoneRepository>,
    stage_table: Arc<dyn StageReferenceTable>,
    template_store: Arc<dyn TemplateStore>,
    detector: StageDetector,
    assumed_length_days: i32,
}

impl GetCycleOverviewHandler {
    pub fn new(
        cycle_repository: Arc<dyn CycleRepository>,
        milestone_repository: Arc<dyn MilestoneRepository>,
        stage_table: Arc<dyn StageReferenceTable>,
        template_store: Arc<dyn TemplateStore>,
        detector: StageDetector,
        assumed_length_days: i32,
    ) -> Self {
        Self {
            cycle_repository,
            milestone_repository,
            stage_table,
            template_store,
            detector,
            assumed_length_days,
        }
    }

    pub async fn handle(
        &self,
        query: GetCycleOverviewQuery,
    ) -> Result<CycleOverviewView, GetCycleOverviewError> {
        // 1. Find the cycle and its schedule
        let cycle = self
            .cycle_repository
            .find_by_id(&query.cycle_id)
            .await?
            .ok_or(GetCycleOverviewError::CycleNotFound(query.cycle_id))?;
        let milestones = self.milestone_repository.list_by_cycle(&cycle.id()).await?;

        let as_of = query.as_of.unwrap_or_else(Timestamp::today_utc);

        // 2. Stage detection, for active cycles only
        let stage = if cycle.status().is_mutable() {
            let reference = self.stage_table.rows_for(cycle.treatment_type()).await?;
            self.detector
                .detect(&milestones, &reference, cycle.cycle_day_on(as_of), as_of)
        } else {
            None
        };

        // 3. Progress, with the template length as day-ratio fallback
        let template = match self.template_store.definition(cycle.treatment_type()).await {
            Ok(template) => Some(template),
            Err(err) if err.code == ErrorCode::TemplateNotFound => None,
            Err(err) => return Err(err.into()),
        };
        let progress = CycleProgress::compute(
            &cycle,
            &milestones,
            template.as_deref(),
            as_of,
            self.assumed_length_days,
        );

        // 4. Compose
        let display_name = template
            .as_ref()
            .map(|t| t.display_name().to_string())
            .unwrap_or_else(|| cycle.treatment_type().display_name());
        Ok(CycleOverviewView {
            cycle: CycleView::from_cycle(&cycle, display_name),
            milestones: milestones.iter().map(MilestoneView::from_milestone).collect(),
            stage,
            progress: CycleProgressView::from_progress(&progress),
        })
    }
}
