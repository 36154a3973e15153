//! GetDailyInsightsHandler - Query handler for today's educational content.
//!
//! Runs stage detection, then resolves the detected stage to an authored
//! content block: the driving milestone title first, then the stage name,
//! then the stage's canonical kind. Templates and content blocks are
//! authored independently, so an unmatched stage falls back to the template
//! stage's own embedded text before degrading to the neutral pending state.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::content::ContentBlock;
use crate::domain::foundation::{
    CycleId, DomainError, ErrorCode, MilestoneKind, Timestamp, TreatmentType,
};
use crate::domain::stage::{StageDetection, StageDetector};
use crate::domain::template::StageTemplateEntry;
use crate::ports::{
    ContentCatalog, CycleRepository, MilestoneRepository, StageReferenceTable, TemplateStore,
};

/// Query for the insights shown on a cycle's daily view.
#[derive(Debug, Clone)]
pub struct GetDailyInsightsQuery {
    /// The cycle to inspect.
    pub cycle_id: CycleId,
    /// Reference date for deterministic reads; defaults to today (UTC).
    pub as_of: Option<NaiveDate>,
}

/// Where the insight text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightsOrigin {
    /// An authored content block matched the stage.
    ContentBlock,
    /// No block matched; the template stage's embedded text was used.
    TemplateStage,
    /// Nothing matched; the caller renders the neutral pending state.
    Pending,
}

/// Stage-specific education for the daily view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyInsightsView {
    /// The detection driving the content, when a stage was found.
    pub stage: Option<StageDetection>,
    /// Display headline for the content card.
    pub headline: Option<String>,
    pub medical_information: Option<String>,
    pub what_to_expect: Option<String>,
    pub todays_tips: Option<String>,
    pub origin: InsightsOrigin,
}

impl DailyInsightsView {
    fn pending(stage: Option<StageDetection>) -> Self {
        Self {
            stage,
            headline: None,
            medical_information: None,
            what_to_expect: None,
            todays_tips: None,
            origin: InsightsOrigin::Pending,
        }
    }

    fn from_block(stage: StageDetection, block: &ContentBlock) -> Self {
        let headline = block
            .notification_title()
            .unwrap_or(&stage.stage_name)
            .to_string();
        Self {
            stage: Some(stage),
            headline: Some(headline),
            medical_information: block.medical_information().map(str::to_string),
            what_to_expect: block.what_to_expect().map(str::to_string),
            todays_tips: block.todays_tips().map(str::to_string),
            origin: InsightsOrigin::ContentBlock,
        }
    }

    fn from_template_entry(stage: StageDetection, entry: &StageTemplateEntry) -> Self {
        Self {
            headline: Some(entry.stage_name().to_string()),
            stage: Some(stage),
            medical_information: entry.medical_details().map(str::to_string),
            what_to_expect: entry.monitoring_procedures().map(str::to_string),
            todays_tips: entry.patient_insights().map(str::to_string),
            origin: InsightsOrigin::TemplateStage,
        }
    }
}

/// Error type for daily insight queries.
#[derive(Debug, Clone)]
pub enum GetDailyInsightsError {
    /// Cycle not found.
    CycleNotFound(CycleId),
    /// Domain error (persistence, reference data).
    Domain(DomainError),
}

impl std::fmt::Display for GetDailyInsightsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetDailyInsightsError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            GetDailyInsightsError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for GetDailyInsightsError {}

impl From<DomainError> for GetDailyInsightsError {
    fn from(err: DomainError) -> Self {
        GetDailyInsightsError::Domain(err)
    }
}

/// Handler for daily insight queries.
pub struct GetDailyInsightsHandler {
    cycle_repository: Arc<dyn CycleRepository>,
    milestone_repository: Arc<dyn MilestoneRepository>,
    stage_table: Arc<dyn StageReferenceTable>,
    content_catalog: Arc<dyn ContentCatalog>,
    template_store: Arc<dyn TemplateStore>,
    detector: StageDetector,
}

impl GetDailyInsightsHandler {
    pub fn new(
        cycle_repository: Arc<dyn CycleRepository>,
        milestone_repository: Arc<dyn MilestoneRepository>,
        stage_table: Arc<dyn StageReferenceTable>,
        content_catalog: Arc<dyn ContentCatalog>,
        template_store: Arc<dyn TemplateStore>,
        detector: StageDetector,
    ) -> Self {
        Self {
            cycle_repository,
            milestone_repository,
            stage_table,
            content_catalog,
            template_store,
            detector,
        }
    }

    pub async fn handle(
        &self,
        query: GetDailyInsightsQuery,
    ) -> Result<DailyInsightsView, GetDailyInsightsError> {
        // 1. Find the cycle; closed cycles have no daily view
        let cycle = self
            .cycle_repository
            .find_by_id(&query.cycle_id)
            .await?
            .ok_or(GetDailyInsightsError::CycleNotFound(query.cycle_id))?;
        if !cycle.status().is_mutable() {
            return Ok(DailyInsightsView::pending(None));
        }

        // 2. Detect the current stage
        let milestones = self.milestone_repository.list_by_cycle(&cycle.id()).await?;
        let reference = self.stage_table.rows_for(cycle.treatment_type()).await?;
        let as_of = query.as_of.unwrap_or_else(Timestamp::today_utc);
        let detection =
            self.detector
                .detect(&milestones, &reference, cycle.cycle_day_on(as_of), as_of);

        let detection = match detection {
            Some(detection) => detection,
            None => return Ok(DailyInsightsView::pending(None)),
        };

        // The reference row that produced the detection carries the
        // canonical kind used for kind-level matching.
        let driving_kind = reference
            .rows()
            .iter()
            .find(|row| row.stage_id() == detection.stage_id)
            .map(|row| row.start_milestone().clone());

        // 3. Resolve an authored content block: driving milestone title
        //    first, then the stage name, then the canonical kind
        let index = self.content_catalog.index_for(cycle.treatment_type()).await?;
        let block = detection
            .fallback_milestone
            .as_ref()
            .and_then(|fallback| index.resolve(&fallback.title))
            .or_else(|| index.resolve(&detection.stage_name))
            .or_else(|| {
                driving_kind
                    .as_ref()
                    .and_then(|kind| index.resolve_kind(kind))
            });
        if let Some(block) = block {
            return Ok(DailyInsightsView::from_block(detection, block));
        }

        // 4. No block matched: fall back to the template stage's own text
        if let Some(entry) = self
            .template_entry_for(cycle.treatment_type(), driving_kind.as_ref())
            .await?
        {
            if entry.medical_details().is_some()
                || entry.monitoring_procedures().is_some()
                || entry.patient_insights().is_some()
            {
                return Ok(DailyInsightsView::from_template_entry(detection, &entry));
            }
        }

        // 5. Neither source had anything to show
        Ok(DailyInsightsView::pending(Some(detection)))
    }

    async fn template_entry_for(
        &self,
        treatment_type: &TreatmentType,
        kind: Option<&MilestoneKind>,
    ) -> Result<Option<StageTemplateEntry>, DomainError> {
        let kind = match kind {
            Some(kind) => kind,
            None => return Ok(None),
        };
        match self.template_store.definition(treatment_type).await {
            Ok(template) => Ok(template.stage_for_kind(kind).cloned()),
            Err(err) if err.code == ErrorCode::TemplateNotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::{InMemoryCycleRepository, InMemoryMilestoneRepository};
    use crate::domain::content::ContentIndex;
    use crate::domain::cycle::{Cycle, PatientMilestone};
    use crate::domain::foundation::{MilestoneStatus, PatientId, TreatmentType};
    use crate::domain::stage::{StageReferenceRow, StageReferenceSet};
    use crate::domain::template::TemplateDefinition;
    use crate::ports::ReloadSummary;
    use async_trait::async_trait;

    // ─────────────────────────────────────────────────────────────────────
    // Mock implementations
    // ─────────────────────────────────────────────────────────────────────

    struct MockStageReferenceTable {
        set: Arc<StageReferenceSet>,
    }

    #[async_trait]
    impl StageReferenceTable for MockStageReferenceTable {
        async fn rows_for(
            &self,
            _treatment_type: &TreatmentType,
        ) -> Result<Arc<StageReferenceSet>, DomainError> {
            Ok(self.set.clone())
        }

        async fn refresh(&self) -> Result<ReloadSummary, DomainError> {
            Ok(ReloadSummary::default())
        }
    }

    struct MockContentCatalog {
        index: Arc<ContentIndex>,
    }

    #[async_trait]
    impl ContentCatalog for MockContentCatalog {
        async fn index_for(
            &self,
            _treatment_type: &TreatmentType,
        ) -> Result<Arc<ContentIndex>, DomainError> {
            Ok(self.index.clone())
        }

        async fn refresh(&self) -> Result<ReloadSummary, DomainError> {
            Ok(ReloadSummary::default())
        }
    }

    struct MockTemplateStore {
        template: Option<Arc<TemplateDefinition>>,
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

    fn reference_rows() -> Vec<StageReferenceRow> {
        let row = |id: &str, name: &str, start: MilestoneKind, days: (i32, i32)| {
            StageReferenceRow::new(
                id,
                TreatmentType::IvfFresh,
                name,
                start,
                None,
                days.0,
                days.1,
                1,
                format!("{} details", name),
            )
            .unwrap()
        };
        vec![
            row("trigger", "Trigger", MilestoneKind::TriggerShot, (11, 12)),
            row("retrieval", "Egg retrieval", MilestoneKind::EggRetrieval, (13, 13)),
        ]
    }

    fn block(
        name: &str,
        title: Option<&str>,
        tips: &str,
    ) -> ContentBlock {
        ContentBlock::new(
            format!("blk-{}", name),
            TreatmentType::IvfFresh,
            name,
            match MilestoneKind::resolve(name) {
                MilestoneKind::Custom(_) => None,
                kind => Some(kind),
            },
            title.map(str::to_string),
            Some(format!("{} medical text", name)),
            Some(format!("{} expectations", name)),
            Some(tips.to_string()),
            1,
            None,
        )
        .unwrap()
    }

    fn milestone(
        cycle: &Cycle,
        title: &str,
        kind: MilestoneKind,
        on: NaiveDate,
        status: MilestoneStatus,
    ) -> PatientMilestone {
        let mut m = PatientMilestone::new(cycle.id(), kind, title, on);
        m.set_status(status).unwrap();
        m
    }

    async fn handler_for(
        cycle: &Cycle,
        milestones: Vec<PatientMilestone>,
        blocks: Vec<ContentBlock>,
        template: Option<TemplateDefinition>,
    ) -> GetDailyInsightsHandler {
        let cycles = Arc::new(InMemoryCycleRepository::new());
        cycles.save(cycle).await.unwrap();
        let milestone_repo = Arc::new(InMemoryMilestoneRepository::new());
        milestone_repo.insert_batch(&milestones).await.unwrap();

        GetDailyInsightsHandler::new(
            cycles,
            milestone_repo,
            Arc::new(MockStageReferenceTable {
                set: Arc::new(StageReferenceSet::new(reference_rows())),
            }),
            Arc::new(MockContentCatalog {
                index: Arc::new(ContentIndex::new(blocks)),
            }),
            Arc::new(MockTemplateStore {
                template: template.map(Arc::new),
            }),
            StageDetector::default(),
        )
    }

    fn query(cycle_id: CycleId, as_of: NaiveDate) -> GetDailyInsightsQuery {
        GetDailyInsightsQuery {
            cycle_id,
            as_of: Some(as_of),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tests
    // ─────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn fallback_milestone_title_matches_drifted_block_spelling() {
        let cycle = test_cycle();
        let ms = vec![milestone(
            &cycle,
            "Egg Retrieval",
            MilestoneKind::EggRetrieval,
            date(2025, 1, 13),
            MilestoneStatus::Completed,
        )];
        // Authored with a hyphenated lowercase name; normalized equality
        // bridges the drift.
        let blocks = vec![block("egg-retrieval", Some("Retrieval day"), "Rest today")];
        let handler = handler_for(&cycle, ms, blocks, None).await;

        let view = handler
            .handle(query(cycle.id(), date(2025, 1, 15)))
            .await
            .unwrap();

        assert_eq!(view.origin, InsightsOrigin::ContentBlock);
        assert_eq!(view.headline.as_deref(), Some("Retrieval day"));
        assert_eq!(view.todays_tips.as_deref(), Some("Rest today"));
        assert!(view.stage.is_some());
    }

    #[tokio::test]
    async fn day_based_stage_name_matches_block() {
        let cycle = test_cycle();
        let blocks = vec![block("Egg_Retrieval", None, "Arrange a lift home")];
        let handler = handler_for(&cycle, vec![], blocks, None).await;

        let view = handler
            .handle(query(cycle.id(), date(2025, 1, 13)))
            .await
            .unwrap();

        assert_eq!(view.origin, InsightsOrigin::ContentBlock);
        // No notification title authored; the stage name stands in.
        assert_eq!(view.headline.as_deref(), Some("Egg retrieval"));
    }

    #[tokio::test]
    async fn kind_equality_matches_when_names_disagree() {
        let cycle = test_cycle();
        // "Retrieval morning" normalizes differently from both the milestone
        // title and the stage name, but classifies to the same kind.
        let blocks = vec![block("Retrieval morning", None, "No breakfast beforehand")];
        let handler = handler_for(&cycle, vec![], blocks, None).await;

        let view = handler
            .handle(query(cycle.id(), date(2025, 1, 13)))
            .await
            .unwrap();

        assert_eq!(view.origin, InsightsOrigin::ContentBlock);
        assert_eq!(view.todays_tips.as_deref(), Some("No breakfast beforehand"));
    }

    #[tokio::test]
    async fn unmatched_stage_falls_back_to_template_text() {
        let cycle = test_cycle();
        let entry = StageTemplateEntry::new(
            TreatmentType::IvfFresh,
            MilestoneKind::EggRetrieval,
            "Egg retrieval",
            "Day 13",
            13,
            None,
            Some("Performed under sedation".to_string()),
            Some("A scan beforehand".to_string()),
            Some("Plan a quiet day".to_string()),
        )
        .unwrap();
        let template = TemplateDefinition::new(
            TreatmentType::IvfFresh,
            "IVF (fresh transfer)",
            "Fresh IVF protocol",
            28,
            vec![entry],
        )
        .unwrap();
        let handler = handler_for(&cycle, vec![], vec![], Some(template)).await;

        let view = handler
            .handle(query(cycle.id(), date(2025, 1, 13)))
            .await
            .unwrap();

        assert_eq!(view.origin, InsightsOrigin::TemplateStage);
        assert_eq!(view.headline.as_deref(), Some("Egg retrieval"));
        assert_eq!(
            view.medical_information.as_deref(),
            Some("Performed under sedation")
        );
        assert_eq!(view.what_to_expect.as_deref(), Some("A scan beforehand"));
        assert_eq!(view.todays_tips.as_deref(), Some("Plan a quiet day"));
    }

    #[tokio::test]
    async fn stage_without_any_content_degrades_to_pending() {
        let cycle = test_cycle();
        let handler = handler_for(&cycle, vec![], vec![], None).await;

        let view = handler
            .handle(query(cycle.id(), date(2025, 1, 13)))
            .await
            .unwrap();

        assert_eq!(view.origin, InsightsOrigin::Pending);
        // The stage was still detected; only the content is missing.
        assert!(view.stage.is_some());
        assert!(view.todays_tips.is_none());
    }

    #[tokio::test]
    async fn no_detection_yields_pending_without_stage() {
        let cycle = test_cycle();
        let handler = handler_for(&cycle, vec![], vec![], None).await;

        // Day 25 is not covered by any reference row.
        let view = handler
            .handle(query(cycle.id(), date(2025, 1, 25)))
            .await
            .unwrap();

        assert_eq!(view.origin, InsightsOrigin::Pending);
        assert!(view.stage.is_none());
    }

    #[tokio::test]
    async fn closed_cycle_yields_pending() {
        let mut cycle = test_cycle();
        cycle.cancel(date(2025, 1, 10)).unwrap();
        let handler = handler_for(&cycle, vec![], vec![], None).await;

        let view = handler
            .handle(query(cycle.id(), date(2025, 1, 13)))
            .await
            .unwrap();
        assert_eq!(view.origin, InsightsOrigin::Pending);
        assert!(view.stage.is_none());
    }

    #[tokio::test]
    async fn serializes_camel_case_with_snake_case_origin() {
        let cycle = test_cycle();
        let blocks = vec![block("egg-retrieval", Some("Retrieval day"), "Rest")];
        let handler = handler_for(&cycle, vec![], blocks, None).await;

        let view = handler
            .handle(query(cycle.id(), date(2025, 1, 13)))
            .await
            .unwrap();
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["origin"], "content_block");
        assert!(json.get("todaysTips").is_some());
        assert_eq!(json["stage"]["source"], "day_based");
    }

    #[tokio::test]
    async fn fails_when_cycle_not_found() {
        let cycle = test_cycle();
        let handler = handler_for(&cycle, vec![], vec![], None).await;

        let result = handler.handle(query(CycleId::new(), date(2025, 1, 13))).await;
        assert!(matches!(result, Err(GetDailyInsightsError::CycleNotFound(_))));
    }
}
