//! Seed-backed stage reference table.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::schema::{parse_day_label, RawStageRow, StageSeedFile};
use super::source::SeedSource;
use crate::config::ReferenceConfig;
use crate::domain::foundation::{DomainError, ErrorCode, MilestoneKind, TreatmentType};
use crate::domain::stage::{StageReferenceRow, StageReferenceSet};
use crate::ports::{ReloadSummary, StageReferenceTable};

const BUILTIN_STAGE_REFERENCE: &str = include_str!("../../../seeds/stage_reference.yaml");

type StageMap = HashMap<TreatmentType, Arc<StageReferenceSet>>;

/// Stage reference rows loaded from a YAML seed.
///
/// Rows are grouped per treatment type; each group becomes a
/// [`StageReferenceSet`] with its lookup ambiguities resolved at build
/// time. Refresh follows the same build-then-swap discipline as the
/// template store.
pub struct SeedStageReferenceTable {
    source: SeedSource,
    cache: RwLock<Option<Arc<StageMap>>>,
}

impl SeedStageReferenceTable {
    /// Creates a table over the seed compiled into the binary.
    pub fn builtin() -> Self {
        Self::with_source(SeedSource::Builtin(BUILTIN_STAGE_REFERENCE))
    }

    /// Creates a table over a seed file on disk.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::with_source(SeedSource::Path(path.into()))
    }

    /// Creates a table from reference configuration.
    pub fn from_config(reference: &ReferenceConfig) -> Self {
        match &reference.stage_reference_path {
            Some(path) => Self::from_path(path.clone()),
            None => Self::builtin(),
        }
    }

    fn with_source(source: SeedSource) -> Self {
        Self {
            source,
            cache: RwLock::new(None),
        }
    }

    async fn snapshot(&self) -> Result<Arc<StageMap>, DomainError> {
        if let Some(map) = self.cache.read().await.as_ref() {
            return Ok(Arc::clone(map));
        }

        let mut guard = self.cache.write().await;
        if let Some(map) = guard.as_ref() {
            return Ok(Arc::clone(map));
        }

        let (map, summary) = self.load().await?;
        tracing::info!(
            source = %self.source,
            loaded = summary.loaded,
            skipped = summary.skipped,
            "stage reference rows loaded"
        );
        let map = Arc::new(map);
        *guard = Some(Arc::clone(&map));
        Ok(map)
    }

    async fn load(&self) -> Result<(StageMap, ReloadSummary), DomainError> {
        let text = self.source.read().await?;
        let file: StageSeedFile = serde_yaml::from_str(&text).map_err(|e| {
            DomainError::new(
                ErrorCode::MalformedReferenceData,
                format!("Invalid stage reference seed: {}", e),
            )
            .with_detail("source", self.source.to_string())
        })?;

        // Grouping preserves file order, which is the tiebreak for rows
        // sharing a ui_priority.
        let mut grouped: HashMap<TreatmentType, Vec<StageReferenceRow>> = HashMap::new();
        let mut summary = ReloadSummary::default();
        for raw in file.rows {
            match build_row(raw) {
                Ok(row) => {
                    summary.loaded += 1;
                    grouped.entry(row.treatment_type().clone()).or_default().push(row);
                }
                Err(reason) => {
                    summary.skipped += 1;
                    tracing::warn!(source = %self.source, %reason, "skipping stage reference row");
                }
            }
        }

        let map = grouped
            .into_iter()
            .map(|(treatment, rows)| (treatment, Arc::new(StageReferenceSet::new(rows))))
            .collect();

        Ok((map, summary))
    }
}

#[async_trait]
impl StageReferenceTable for SeedStageReferenceTable {
    async fn rows_for(
        &self,
        treatment_type: &TreatmentType,
    ) -> Result<Arc<StageReferenceSet>, DomainError> {
        let snapshot = self.snapshot().await?;
        Ok(snapshot
            .get(treatment_type)
            .cloned()
            .unwrap_or_else(|| Arc::new(StageReferenceSet::empty())))
    }

    async fn refresh(&self) -> Result<ReloadSummary, DomainError> {
        let (map, summary) = self.load().await?;
        *self.cache.write().await = Some(Arc::new(map));
        tracing::info!(
            source = %self.source,
            loaded = summary.loaded,
            skipped = summary.skipped,
            "stage reference rows refreshed"
        );
        Ok(summary)
    }
}

fn build_row(raw: RawStageRow) -> Result<StageReferenceRow, String> {
    let (day_start, day_end) =
        parse_day_label(&raw.days).map_err(|e| format!("row '{}': {}", raw.stage_id, e))?;
    let start_milestone = MilestoneKind::resolve(&raw.start_milestone);
    let end_milestone = raw.end_milestone.as_deref().map(MilestoneKind::resolve);

    StageReferenceRow::new(
        raw.stage_id,
        TreatmentType::parse(&raw.treatment_type),
        raw.stage_name,
        start_milestone,
        end_milestone,
        day_start,
        day_end.unwrap_or(day_start),
        raw.ui_priority,
        raw.details,
    )
    .map_err(|e| e.to_string())
}
