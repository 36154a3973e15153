//! RefreshReferenceDataHandler - Command handler for reference data reloads.
//!
//! Re-reads templates, stage reference rows, and the content catalog from
//! their backing sources. Stores keep serving their previous snapshot when
//! a reload fails, so a refresh never leaves readers without data.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::ports::{ContentCatalog, ReloadSummary, StageReferenceTable, TemplateStore};

/// Result of a reference data refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshReferenceDataResult {
    /// Template reload counts.
    pub templates: ReloadSummary,
    /// Stage reference reload counts.
    pub stages: ReloadSummary,
    /// Content catalog reload counts.
    pub content: ReloadSummary,
}

impl RefreshReferenceDataResult {
    /// Total rows skipped across all three sources.
    pub fn total_skipped(&self) -> usize {
        self.templates.skipped + self.stages.skipped + self.content.skipped
    }
}

/// Handler for reference data refreshes.
pub struct RefreshReferenceDataHandler {
    template_store: Arc<dyn TemplateStore>,
    stage_table: Arc<dyn StageReferenceTable>,
    content_catalog: Arc<dyn ContentCatalog>,
}

impl RefreshReferenceDataHandler {
    pub fn new(
        template_store: Arc<dyn TemplateStore>,
        stage_table: Arc<dyn StageReferenceTable>,
        content_catalog: Arc<dyn ContentCatalog>,
    ) -> Self {
        Self {
            template_store,
            stage_table,
            content_catalog,
        }
    }

    pub async fn handle(&self) -> Result<RefreshReferenceDataResult, DomainError> {
        // 1. Reload all three sources
        let (templates, stages, content) = futures::try_join!(
            self.template_store.refresh(),
            self.stage_table.refresh(),
            self.content_catalog.refresh(),
        )?;

        tracing::debug!(
            templates_loaded = templates.loaded,
            stages_loaded = stages.loaded,
            content_loaded = content.loaded,
            skipped = templates.skipped + stages.skipped + content.skipped,
            "Reference data refreshed"
        );

        Ok(RefreshReferenceDataResult {
            templates,
            stages,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::content::ContentIndex;
    use crate::domain::foundation::{ErrorCode, TreatmentType};
    use crate::domain::stage::StageReferenceSet;
    use crate::domain::template::TemplateDefinition;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ─────────────────────────────────────────────────────────────────────
    // Mock implementations
    // ─────────────────────────────────────────────────────────────────────

    struct CountingTemplateStore {
        refreshes: AtomicUsize,
        summary: ReloadSummary,
    }

    impl CountingTemplateStore {
        fn new(loaded: usize, skipped: usize) -> Self {
            Self {
                refreshes: AtomicUsize::new(0),
                summary: ReloadSummary { loaded, skipped },
            }
        }
    }

    #[async_trait]
    impl TemplateStore for CountingTemplateStore {
        async fn definition(
            &self,
            _treatment_type: &TreatmentType,
        ) -> Result<Arc<TemplateDefinition>, DomainError> {
            Err(DomainError::new(ErrorCode::TemplateNotFound, "no templates"))
        }

        async fn refresh(&self) -> Result<ReloadSummary, DomainError> {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            Ok(self.summary)
        }
    }

    struct CountingStageTable {
        summary: ReloadSummary,
    }

    #[async_trait]
    impl StageReferenceTable for CountingStageTable {
        async fn rows_for(
            &self,
            _treatment_type: &TreatmentType,
        ) -> Result<Arc<StageReferenceSet>, DomainError> {
            Ok(Arc::new(StageReferenceSet::empty()))
        }

        async fn refresh(&self) -> Result<ReloadSummary, DomainError> {
            Ok(self.summary)
        }
    }

    struct CountingContentCatalog {
        summary: ReloadSummary,
    }

    #[async_trait]
    impl ContentCatalog for CountingContentCatalog {
        async fn index_for(
            &self,
            _treatment_type: &TreatmentType,
        ) -> Result<Arc<ContentIndex>, DomainError> {
            Ok(Arc::new(ContentIndex::default()))
        }

        async fn refresh(&self) -> Result<ReloadSummary, DomainError> {
            Ok(self.summary)
        }
    }

    struct FailingStageTable;

    #[async_trait]
    impl StageReferenceTable for FailingStageTable {
        async fn rows_for(
            &self,
            _treatment_type: &TreatmentType,
        ) -> Result<Arc<StageReferenceSet>, DomainError> {
            Ok(Arc::new(StageReferenceSet::empty()))
        }

        async fn refresh(&self) -> Result<ReloadSummary, DomainError> {
            Err(DomainError::new(
                ErrorCode::MalformedReferenceData,
                "stage rows failed validation",
            ))
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tests
    // ─────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn refresh_reports_counts_from_all_sources() {
        let templates = Arc::new(CountingTemplateStore::new(4, 0));
        let handler = RefreshReferenceDataHandler::new(
            templates.clone(),
            Arc::new(CountingStageTable {
                summary: ReloadSummary {
                    loaded: 12,
                    skipped: 1,
                },
            }),
            Arc::new(CountingContentCatalog {
                summary: ReloadSummary {
                    loaded: 30,
                    skipped: 2,
                },
            }),
        );

        let result = handler.handle().await.unwrap();

        assert_eq!(result.templates.loaded, 4);
        assert_eq!(result.stages.loaded, 12);
        assert_eq!(result.content.loaded, 30);
        assert_eq!(result.total_skipped(), 3);
        assert_eq!(templates.refreshes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failing_source_propagates_its_error() {
        let handler = RefreshReferenceDataHandler::new(
            Arc::new(CountingTemplateStore::new(4, 0)),
            Arc::new(FailingStageTable),
            Arc::new(CountingContentCatalog {
                summary: ReloadSummary::default(),
            }),
        );

        let err = handler.handle().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedReferenceData);
    }
}
