//! Seed-backed content catalog.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::schema::{ContentSeedFile, RawContentBlock};
use super::source::SeedSource;
use crate::config::ReferenceConfig;
use crate::domain::content::{ContentBlock, ContentIndex};
use crate::domain::foundation::{DomainError, ErrorCode, MilestoneKind, TreatmentType};
use crate::ports::{ContentCatalog, ReloadSummary};

const BUILTIN_CONTENT_BLOCKS: &str = include_str!("../../../seeds/content_blocks.yaml");

type ContentMap = HashMap<TreatmentType, Arc<ContentIndex>>;

/// Educational content blocks loaded from a YAML seed.
///
/// Blocks are grouped per treatment type and indexed for normalized
/// lookup at build time.
pub struct SeedContentCatalog {
    source: SeedSource,
    cache: RwLock<Option<Arc<ContentMap>>>,
}

impl SeedContentCatalog {
    /// Creates a catalog over the seed compiled into the binary.
    pub fn builtin() -> Self {
        Self::with_source(SeedSource::Builtin(BUILTIN_CONTENT_BLOCKS))
    }

    /// Creates a catalog over a seed file on disk.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::with_source(SeedSource::Path(path.into()))
    }

    /// Creates a catalog from reference configuration.
    pub fn from_config(reference: &ReferenceConfig) -> Self {
        match &reference.content_blocks_path {
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

    async fn snapshot(&self) -> Result<Arc<ContentMap>, DomainError> {
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
            "content blocks loaded"
        );
        let map = Arc::new(map);
        *guard = Some(Arc::clone(&map));
        Ok(map)
    }

    async fn load(&self) -> Result<(ContentMap, ReloadSummary), DomainError> {
        let text = self.source.read().await?;
        let file: ContentSeedFile = serde_yaml::from_str(&text).map_err(|e| {
            DomainError::new(
                ErrorCode::MalformedReferenceData,
                format!("Invalid content block seed: {}", e),
            )
            .with_detail("source", self.source.to_string())
        })?;

        // Authoring order within each group is the collision tiebreak.
        let mut grouped: HashMap<TreatmentType, Vec<ContentBlock>> = HashMap::new();
        let mut summary = ReloadSummary::default();
        for raw in file.blocks {
            match build_block(raw) {
                Ok(block) => {
                    summary.loaded += 1;
                    grouped.entry(block.treatment_type().clone()).or_default().push(block);
                }
                Err(reason) => {
                    summary.skipped += 1;
                    tracing::warn!(source = %self.source, %reason, "skipping content block");
                }
            }
        }

        let map = grouped
            .into_iter()
            .map(|(treatment, blocks)| (treatment, Arc::new(ContentIndex::new(blocks))))
            .collect();

        Ok((map, summary))
    }
}

#[async_trait]
impl ContentCatalog for SeedContentCatalog {
    async fn index_for(
        &self,
        treatment_type: &TreatmentType,
    ) -> Result<Arc<ContentIndex>, DomainError> {
        let snapshot = self.snapshot().await?;
        Ok(snapshot
            .get(treatment_type)
            .cloned()
            .unwrap_or_else(|| Arc::new(ContentIndex::default())))
    }

    async fn refresh(&self) -> Result<ReloadSummary, DomainError> {
        let (map, summary) = self.load().await?;
        *self.cache.write().await = Some(Arc::new(map));
        tracing::info!(
            source = %self.source,
            loaded = summary.loaded,
            skipped = summary.skipped,
            "content blocks refreshed"
        );
        Ok(summary)
    }
}

fn build_block(raw: RawContentBlock) -> Result<ContentBlock, String> {
    // Free-form names stay reachable by label; only canonical kinds join
    // the kind index.
    let kind = match MilestoneKind::resolve(&raw.milestone_name) {
        MilestoneKind::Custom(_) => None,
        kind => Some(kind),
    };

    ContentBlock::new(
        raw.id,
        TreatmentType::parse(&raw.treatment_type),
        raw.milestone_name,
        kind,
        raw.notification_title,
        raw.medical_information,
        raw.what_to_expect,
        raw.todays_tips,
        raw.order,
        raw.day_offset,
    )
    .map_err(|e| e.to_string())
}
