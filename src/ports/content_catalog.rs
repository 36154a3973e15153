//! Content catalog port.
//!
//! Read access to educational content blocks, pre-indexed for normalized
//! lookup.

use std::sync::Arc;

use crate::domain::content::ContentIndex;
use crate::domain::foundation::{DomainError, TreatmentType};
use async_trait::async_trait;

use super::ReloadSummary;

/// Port for educational content lookup.
#[async_trait]
pub trait ContentCatalog: Send + Sync {
    /// Returns the content index for a treatment type.
    ///
    /// Unknown treatment types yield an empty index.
    ///
    /// # Errors
    ///
    /// - `MalformedReferenceData` if the backing dataset cannot be read
    async fn index_for(
        &self,
        treatment_type: &TreatmentType,
    ) -> Result<Arc<ContentIndex>, DomainError>;

    /// Rebuilds the in-memory snapshot from the backing dataset.
    async fn refresh(&self) -> Result<ReloadSummary, DomainError>;
}
