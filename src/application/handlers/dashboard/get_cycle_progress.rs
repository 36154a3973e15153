//! GetCycleProgressHandler - Query handler for cycle progress.
//!
//! Returns how far through the cycle the patient is: cycle day, percent
//! complete, completed/total milestone counts, and the next milestone ahead.
//! Percent comes from the completed-milestone ratio, or from elapsed days
//! against the protocol length when the cycle has no milestones; 100% is
//! reserved for a fully completed schedule on a still-active cycle.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::cycle::CycleProgress;
use crate::domain::foundation::{CycleId, DomainError, ErrorCode, Timestamp};
use crate::ports::{CycleRepository, MilestoneRepository, TemplateStore};

/// Query for the progress of a cycle.
#[derive(Debug, Clone)]
pub struct GetCycleProgressQuery {
    /// The cycle to inspect.
    pub cycle_id: CycleId,
    /// Reference date for deterministic reads; defaults to today (UTC).
    pub as_of: Option<NaiveDate>,
}

/// Upcoming milestone within a progress view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextMilestoneView {
    pub title: String,
    pub date: NaiveDate,
    pub days_until: i64,
}

/// Progress of a cycle, shaped for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleProgressView {
    /// 1-based cycle day (zero or negative before the start date).
    pub cycle_day: i64,
    /// Whole-percent completion, 0..=100.
    pub percent_complete: u8,
    pub milestones_completed: usize,
    pub milestones_total: usize,
    /// The earliest pending milestone still ahead, if any.
    pub next_milestone: Option<NextMilestoneView>,
}

impl CycleProgressView {
    pub(crate) fn from_progress(progress: &CycleProgress) -> Self {
        Self {
            cycle_day: progress.cycle_day(),
            percent_complete: progress.percent().value(),
            milestones_completed: progress.completed_count(),
            milestones_total: progress.total_count(),
            next_milestone: progress.next_milestone().map(|next| NextMilestoneView {
                title: next.title().to_string(),
                date: next.date(),
                days_until: next.days_until(),
            }),
        }
    }
}

/// Error type for progress queries.
#[derive(Debug, Clone)]
pub enum GetCycleProgressError {
    /// Cycle not found.
    CycleNotFound(CycleId),
    /// Domain error (persistence, reference data).
    Domain(DomainError),
}

impl std::fmt::Display for GetCycleProgressError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetCycleProgressError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            GetCycleProgressError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for GetCycleProgressError {}

impl From<DomainError> for GetCycleProgressError {
    fn from(err: DomainError) -> Self {
        GetCycleProgressError::Domain(err)
    }
}

/// Handler for cycle progress queries.
pub struct GetCycleProgressHandler {
    cycle_repository: Arc<dyn CycleRepository>,
    milestone_repository: Arc<dyn MilestoneRepository>,
    template_store: Arc<dyn TemplateStore>,
    assumed_length_days: i32,
}

impl GetCycleProgressHandler {
    pub fn new(
        cycle_repository: Arc<dyn CycleRepository>,
        milestone_repository: Arc<dyn MilestoneRepository>,
        template_store: Arc<dyn TemplateStore>,
        assumed_length_days: i32,
    ) -> Self {
        Self {
            cycle_repository,
            milestone_repository,
            template_store,
            assumed_length_days,
        }
    }

    pub async fn handle(
        &self,
        query: GetCycleProgressQuery,
    ) -> Result<CycleProgressView, GetCycleProgressError> {
        // 1. Find the cycle
        let cycle = self
            .cycle_repository
            .find_by_id(&query.cycle_id)
            .await?
            .ok_or(GetCycleProgressError::CycleNotFound(query.cycle_id))?;

        // 2. Load the schedule
        let milestones = self.milestone_repository.list_by_cycle(&cycle.id()).await?;

        // 3. The template only matters for the day-ratio fallback, so a
        //    missing one degrades to the assumed protocol length.
        let template = match self.template_store.definition(cycle.treatment_type()).await {
            Ok(template) => Some(template),
            Err(err) if err.code == ErrorCode::TemplateNotFound => None,
            Err(err) => return Err(err.into()),
        };

        // 4. Compute
        let as_of = query.as_of.unwrap_or_else(Timestamp::today_utc);
        let progress = CycleProgress::compute(
            &cycle,
            &milestones,
            template.as_deref(),
            as_of,
            self.assumed_length_days,
        );

        Ok(CycleProgressView::from_progress(&progress))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::{InMemoryCycleRepository, InMemoryMilestoneRepository};
    use crate::domain::cycle::{Cycle, PatientMilestone};
    use crate::domain::foundation::{
        MilestoneKind, MilestoneStatus, PatientId, TreatmentType,
    };
    use crate::domain::template::TemplateDefinition;
    use crate::ports::ReloadSummary;
    use async_trait::async_trait;

    // ─────────────────────────────────────────────────────────────────────
    // Mock implementations
    // ─────────────────────────────────────────────────────────────────────

    struct MockTemplateStore {
        template: Option<Arc<TemplateDefinition>>,
    }

    impl MockTemplateStore {
        fn empty() -> Self {
            Self { template: None }
        }

        fn with_duration(days: i32) -> Self {
            let template = TemplateDefinition::new(
                TreatmentType::IvfFresh,
                "IVF (fresh transfer)",
                "Fresh IVF protocol",
                days,
                vec![],
            )
            .unwrap();
            Self {
                template: Some(Arc::new(template)),
            }
        }
    }

    #[async_trait]
    impl TemplateStore for MockTemplateStore {
        async fn definition(
            &self,
            treatment_type: &TreatmentType,
        ) -> Result<Arc<TemplateDefinition>, DomainError> {
            self.template.clone().ok_or_else(|| {
                DomainError::new(ErrorCode::TemplateNotFound, "No template")
                    .with_detail("treatment_type", treatment_type.key())
            })
        }

        async fn refresh(&self) -> Result<ReloadSummary, DomainError> {
            Ok(ReloadSummary::default())
        }
    }

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

    fn milestone(cycle: &Cycle, title: &str, day: u32, status: MilestoneStatus) -> PatientMilestone {
        let mut m = PatientMilestone::new(
            cycle.id(),
            MilestoneKind::classify(title),
            title,
            date(2025, 1, day),
        );
        m.set_status(status).unwrap();
        m
    }

    async fn handler_for(
        cycle: &Cycle,
        milestones: Vec<PatientMilestone>,
        store: MockTemplateStore,
    ) -> GetCycleProgressHandler {
        let cycles = Arc::new(InMemoryCycleRepository::new());
        cycles.save(cycle).await.unwrap();
        let milestone_repo = Arc::new(InMemoryMilestoneRepository::new());
        milestone_repo.insert_batch(&milestones).await.unwrap();

        GetCycleProgressHandler::new(cycles, milestone_repo, Arc::new(store), 28)
    }

    fn query(cycle_id: CycleId, as_of: NaiveDate) -> GetCycleProgressQuery {
        GetCycleProgressQuery {
            cycle_id,
            as_of: Some(as_of),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tests
    // ─────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn percent_is_completed_milestone_ratio() {
        let cycle = test_cycle();
        let ms = vec![
            milestone(&cycle, "Baseline scan", 2, MilestoneStatus::Completed),
            milestone(&cycle, "Trigger shot", 11, MilestoneStatus::Completed),
            milestone(&cycle, "Egg retrieval", 13, MilestoneStatus::Pending),
        ];
        let handler = handler_for(&cycle, ms, MockTemplateStore::empty()).await;

        let view = handler
            .handle(query(cycle.id(), date(2025, 1, 12)))
            .await
            .unwrap();

        assert_eq!(view.cycle_day, 12);
        assert_eq!(view.percent_complete, 66);
        assert_eq!(view.milestones_completed, 2);
        assert_eq!(view.milestones_total, 3);
    }

    #[tokio::test]
    async fn next_milestone_is_projected() {
        let cycle = test_cycle();
        let ms = vec![
            milestone(&cycle, "Baseline scan", 2, MilestoneStatus::Completed),
            milestone(&cycle, "Egg retrieval", 13, MilestoneStatus::Pending),
        ];
        let handler = handler_for(&cycle, ms, MockTemplateStore::empty()).await;

        let view = handler
            .handle(query(cycle.id(), date(2025, 1, 10)))
            .await
            .unwrap();

        let next = view.next_milestone.unwrap();
        assert_eq!(next.title, "Egg retrieval");
        assert_eq!(next.date, date(2025, 1, 13));
        assert_eq!(next.days_until, 3);
    }

    #[tokio::test]
    async fn no_milestones_uses_template_day_ratio() {
        let cycle = test_cycle();
        let handler = handler_for(&cycle, vec![], MockTemplateStore::with_duration(14)).await;

        let view = handler
            .handle(query(cycle.id(), date(2025, 1, 7)))
            .await
            .unwrap();

        assert_eq!(view.cycle_day, 7);
        assert_eq!(view.percent_complete, 50);
        assert_eq!(view.milestones_total, 0);
    }

    #[tokio::test]
    async fn missing_template_degrades_to_assumed_length() {
        let cycle = test_cycle();
        let handler = handler_for(&cycle, vec![], MockTemplateStore::empty()).await;

        let view = handler
            .handle(query(cycle.id(), date(2025, 1, 14)))
            .await
            .unwrap();

        // 14 of the assumed 28 days.
        assert_eq!(view.percent_complete, 50);
    }

    #[tokio::test]
    async fn closed_cycle_never_reports_one_hundred() {
        let mut cycle = test_cycle();
        let ms: Vec<_> = (1..=10)
            .map(|i| milestone(&cycle, &format!("Step {}", i), i as u32, MilestoneStatus::Completed))
            .collect();
        cycle.complete(date(2025, 1, 28)).unwrap();
        let handler = handler_for(&cycle, ms, MockTemplateStore::empty()).await;

        let view = handler
            .handle(query(cycle.id(), date(2025, 2, 1)))
            .await
            .unwrap();

        assert_eq!(view.percent_complete, 99);
    }

    #[tokio::test]
    async fn serializes_camel_case() {
        let cycle = test_cycle();
        let ms = vec![milestone(&cycle, "Egg retrieval", 13, MilestoneStatus::Pending)];
        let handler = handler_for(&cycle, ms, MockTemplateStore::empty()).await;

        let view = handler
            .handle(query(cycle.id(), date(2025, 1, 10)))
            .await
            .unwrap();
        let json = serde_json::to_value(&view).unwrap();

        assert!(json.get("percentComplete").is_some());
        assert!(json.get("nextMilestone").is_some());
        assert_eq!(json["nextMilestone"]["daysUntil"], 3);
    }

    #[tokio::test]
    async fn fails_when_cycle_not_found() {
        let cycle = test_cycle();
        let handler = handler_for(&cycle, vec![], MockTemplateStore::empty()).await;

        let result = handler.handle(query(CycleId::new(), date(2025, 1, 5))).await;
        assert!(matches!(result, Err(GetCycleProgressError::CycleNotFound(_))));
    }
}
