//! Milestone repository port.
//!
//! Persistence contract for patient milestones. Milestones are written in
//! batches at cycle creation and updated individually afterwards.

use crate::domain::cycle::PatientMilestone;
use crate::domain::foundation::{CycleId, DomainError, MilestoneId};
use async_trait::async_trait;

/// Repository port for PatientMilestone persistence.
#[async_trait]
pub trait MilestoneRepository: Send + Sync {
    /// Insert a batch of milestones.
    ///
    /// Implementations backed by a transactional store should make the
    /// batch atomic; callers still clean up on partial failure for stores
    /// that cannot.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn insert_batch(&self, milestones: &[PatientMilestone]) -> Result<(), DomainError>;

    /// Find a milestone by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &MilestoneId) -> Result<Option<PatientMilestone>, DomainError>;

    /// List all milestones for a cycle, ordered by date ascending.
    ///
    /// Milestones sharing a date keep their insertion order.
    async fn list_by_cycle(&self, cycle_id: &CycleId) -> Result<Vec<PatientMilestone>, DomainError>;

    /// Count milestones for a cycle.
    async fn count_by_cycle(&self, cycle_id: &CycleId) -> Result<u32, DomainError>;

    /// Update an existing milestone.
    ///
    /// # Errors
    ///
    /// - `MilestoneNotFound` if the milestone doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, milestone: &PatientMilestone) -> Result<(), DomainError>;

    /// Delete all milestones for a cycle, returning how many were removed.
    async fn delete_by_cycle(&self, cycle_id: &CycleId) -> Result<u64, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn milestone_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn MilestoneRepository) {}
    }
}
