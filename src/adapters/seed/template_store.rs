//! Seed-backed template store.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::schema::{parse_day_label, RawTemplate, RawTemplateStage, TemplateSeedFile};
use super::source::SeedSource;
use crate::config::ReferenceConfig;
use crate::domain::foundation::{DomainError, ErrorCode, MilestoneKind, TreatmentType};
use crate::domain::template::{StageTemplateEntry, TemplateDefinition};
use crate::ports::{ReloadSummary, TemplateStore};

const BUILTIN_TEMPLATES: &str = include_str!("../../../seeds/templates.yaml");

type TemplateMap = HashMap<TreatmentType, Arc<TemplateDefinition>>;

/// Treatment templates loaded from a YAML seed.
///
/// The dataset is parsed once on first access and served from memory.
/// `refresh` rebuilds a complete replacement snapshot before swapping it
/// in, so concurrent readers always see a coherent dataset.
pub struct SeedTemplateStore {
    source: SeedSource,
    cache: RwLock<Option<Arc<TemplateMap>>>,
}

impl SeedTemplateStore {
    /// Creates a store over the seed compiled into the binary.
    pub fn builtin() -> Self {
        Self::with_source(SeedSource::Builtin(BUILTIN_TEMPLATES))
    }

    /// Creates a store over a seed file on disk.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::with_source(SeedSource::Path(path.into()))
    }

    /// Creates a store from reference configuration.
    pub fn from_config(reference: &ReferenceConfig) -> Self {
        match &reference.templates_path {
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

    async fn snapshot(&self) -> Result<Arc<TemplateMap>, DomainError> {
        if let Some(map) = self.cache.read().await.as_ref() {
            return Ok(Arc::clone(map));
        }

        let mut guard = self.cache.write().await;
        // Another task may have loaded while we waited for the write lock.
        if let Some(map) = guard.as_ref() {
            return Ok(Arc::clone(map));
        }

        let (map, summary) = self.load().await?;
        tracing::info!(
            source = %self.source,
            loaded = summary.loaded,
            skipped = summary.skipped,
            "treatment templates loaded"
        );
        let map = Arc::new(map);
        *guard = Some(Arc::clone(&map));
        Ok(map)
    }

    async fn load(&self) -> Result<(TemplateMap, ReloadSummary), DomainError> {
        let text = self.source.read().await?;
        let file: TemplateSeedFile = serde_yaml::from_str(&text).map_err(|e| {
            DomainError::new(
                ErrorCode::MalformedReferenceData,
                format!("Invalid template seed: {}", e),
            )
            .with_detail("source", self.source.to_string())
        })?;

        let mut map = TemplateMap::new();
        let mut summary = ReloadSummary::default();
        for raw in file.templates {
            let treatment_type = TreatmentType::parse(&raw.treatment_type);
            match build_template(treatment_type.clone(), raw, &mut summary) {
                Ok(definition) => {
                    summary.loaded += 1;
                    map.insert(treatment_type, Arc::new(definition));
                }
                Err(reason) => {
                    summary.skipped += 1;
                    tracing::warn!(
                        source = %self.source,
                        treatment = treatment_type.key(),
                        %reason,
                        "skipping malformed treatment template"
                    );
                }
            }
        }

        Ok((map, summary))
    }
}

#[async_trait]
impl TemplateStore for SeedTemplateStore {
    async fn definition(
        &self,
        treatment_type: &TreatmentType,
    ) -> Result<Arc<TemplateDefinition>, DomainError> {
        let snapshot = self.snapshot().await?;
        snapshot.get(treatment_type).cloned().ok_or_else(|| {
            DomainError::new(
                ErrorCode::TemplateNotFound,
                format!("No template for treatment type: {}", treatment_type.key()),
            )
            .with_detail("treatment_type", treatment_type.key())
        })
    }

    async fn refresh(&self) -> Result<ReloadSummary, DomainError> {
        let (map, summary) = self.load().await?;
        *self.cache.write().await = Some(Arc::new(map));
        tracing::info!(
            source = %self.source,
            loaded = summary.loaded,
            skipped = summary.skipped,
            "treatment templates refreshed"
        );
        Ok(summary)
    }
}

/// Converts one raw template, skipping (and counting) malformed stages.
fn build_template(
    treatment_type: TreatmentType,
    raw: RawTemplate,
    summary: &mut ReloadSummary,
) -> Result<TemplateDefinition, String> {
    let mut stages = Vec::with_capacity(raw.stages.len());
    for stage in raw.stages {
        match build_stage(&treatment_type, stage) {
            Ok(entry) => stages.push(entry),
            Err(reason) => {
                summary.skipped += 1;
                tracing::warn!(treatment = treatment_type.key(), %reason, "skipping template stage");
            }
        }
    }

    TemplateDefinition::new(
        treatment_type,
        raw.display_name,
        raw.description.unwrap_or_default(),
        raw.total_duration_days,
        stages,
    )
    .map_err(|e| e.to_string())
}

fn build_stage(
    treatment_type: &TreatmentType,
    raw: RawTemplateStage,
) -> Result<StageTemplateEntry, String> {
    let (day_start, day_end) =
        parse_day_label(&raw.day).map_err(|e| format!("stage '{}': {}", raw.name, e))?;
    let kind = MilestoneKind::resolve(&raw.name);
    StageTemplateEntry::new(
        treatment_type.clone(),
        kind,
        raw.name,
        raw.day,
        day_start,
        day_end,
        raw.medical_details,
        raw.monitoring_procedures,
        raw.patient_insights,
    )
    .map_err(|e| e.to_string())
}
