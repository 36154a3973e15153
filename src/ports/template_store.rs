//! Template store port.
//!
//! Read access to treatment templates. Implementations load reference
//! datasets at startup, serve them from memory, and rebuild atomically on
//! refresh so readers never observe a half-loaded dataset.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, TreatmentType};
use crate::domain::template::TemplateDefinition;
use async_trait::async_trait;

/// Outcome of reloading one reference dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReloadSummary {
    /// Rows accepted into the new snapshot.
    pub loaded: usize,
    /// Malformed rows skipped (and logged) during conversion.
    pub skipped: usize,
}

/// Port for treatment template lookup.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Returns the template for a treatment type.
    ///
    /// # Errors
    ///
    /// - `TemplateNotFound` if no usable template exists for the type
    /// - `MalformedReferenceData` if the backing dataset cannot be read
    async fn definition(
        &self,
        treatment_type: &TreatmentType,
    ) -> Result<Arc<TemplateDefinition>, DomainError>;

    /// Rebuilds the in-memory snapshot from the backing dataset.
    ///
    /// The previous snapshot keeps serving readers until the new one is
    /// fully built; on failure the previous snapshot stays in place.
    async fn refresh(&self) -> Result<ReloadSummary, DomainError>;
}
