//! Stage reference table port.
//!
//! Read access to the stage reference rows used by stage detection.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, TreatmentType};
use crate::domain::stage::StageReferenceSet;
use async_trait::async_trait;

use super::ReloadSummary;

/// Port for stage reference row lookup.
#[async_trait]
pub trait StageReferenceTable: Send + Sync {
    /// Returns the reference rows for a treatment type.
    ///
    /// Unknown treatment types yield an empty set; detection then simply
    /// finds no stage.
    ///
    /// # Errors
    ///
    /// - `MalformedReferenceData` if the backing dataset cannot be read
    async fn rows_for(
        &self,
        treatment_type: &TreatmentType,
    ) -> Result<Arc<StageReferenceSet>, DomainError>;

    /// Rebuilds the in-memory snapshot from the backing dataset.
    async fn refresh(&self) -> Result<ReloadSummary, DomainError>;
}
