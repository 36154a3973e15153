//! Cycle repository port (write side).
//!
//! Defines the contract for persisting and retrieving Cycle aggregates.
//! Implementations handle the actual database operations.

use crate::domain::cycle::Cycle;
use crate::domain::foundation::{CycleId, DomainError, PatientId};
use async_trait::async_trait;

/// Repository port for Cycle aggregate persistence.
#[async_trait]
pub trait CycleRepository: Send + Sync {
    /// Save a new cycle.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, cycle: &Cycle) -> Result<(), DomainError>;

    /// Update an existing cycle.
    ///
    /// # Errors
    ///
    /// - `CycleNotFound` if cycle doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, cycle: &Cycle) -> Result<(), DomainError>;

    /// Find a cycle by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &CycleId) -> Result<Option<Cycle>, DomainError>;

    /// Find the active cycle for a patient, if one exists.
    ///
    /// Patients run one cycle at a time; where historical data contains
    /// several active cycles, the most recently started wins.
    async fn find_active_by_patient(
        &self,
        patient_id: &PatientId,
    ) -> Result<Option<Cycle>, DomainError>;

    /// Find all cycles belonging to a patient.
    ///
    /// Returns cycles ordered by start date descending.
    async fn find_by_patient(&self, patient_id: &PatientId) -> Result<Vec<Cycle>, DomainError>;

    /// Delete a cycle.
    ///
    /// # Errors
    ///
    /// - `CycleNotFound` if cycle doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn delete(&self, id: &CycleId) -> Result<(), DomainError>;
}
