//! In-Memory Milestone Repository Adapter
//!
//! Stores patient milestones in memory, grouped per cycle so that
//! insertion order survives for same-date milestones.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::cycle::PatientMilestone;
use crate::domain::foundation::{CycleId, DomainError, ErrorCode, MilestoneId};
use crate::ports::MilestoneRepository;

#[derive(Debug, Default)]
struct MilestoneState {
    by_cycle: HashMap<CycleId, Vec<PatientMilestone>>,
    cycle_of: HashMap<MilestoneId, CycleId>,
}

/// In-memory storage for patient milestones
#[derive(Debug, Clone, Default)]
pub struct InMemoryMilestoneRepository {
    state: Arc<RwLock<MilestoneState>>,
}

impl InMemoryMilestoneRepository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.by_cycle.clear();
        state.cycle_of.clear();
    }

    /// Get the number of stored milestones
    pub async fn count(&self) -> usize {
        self.state.read().await.cycle_of.len()
    }
}

#[async_trait]
impl MilestoneRepository for InMemoryMilestoneRepository {
    async fn insert_batch(&self, milestones: &[PatientMilestone]) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        for milestone in milestones {
            state
                .by_cycle
                .entry(milestone.cycle_id())
                .or_default()
                .push(milestone.clone());
            state.cycle_of.insert(milestone.id(), milestone.cycle_id());
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &MilestoneId) -> Result<Option<PatientMilestone>, DomainError> {
        let state = self.state.read().await;
        let Some(cycle_id) = state.cycle_of.get(id) else {
            return Ok(None);
        };
        Ok(state
            .by_cycle
            .get(cycle_id)
            .and_then(|ms| ms.iter().find(|m| m.id() == *id))
            .cloned())
    }

    async fn list_by_cycle(&self, cycle_id: &CycleId) -> Result<Vec<PatientMilestone>, DomainError> {
        let state = self.state.read().await;
        let mut milestones = state.by_cycle.get(cycle_id).cloned().unwrap_or_default();
        // Stable sort keeps insertion order for same-date milestones.
        milestones.sort_by_key(|m| m.date());
        Ok(milestones)
    }

    async fn count_by_cycle(&self, cycle_id: &CycleId) -> Result<u32, DomainError> {
        let state = self.state.read().await;
        Ok(state.by_cycle.get(cycle_id).map_or(0, |ms| ms.len() as u32))
    }

    async fn update(&self, milestone: &PatientMilestone) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let slot = state
            .by_cycle
            .get_mut(&milestone.cycle_id())
            .and_then(|ms| ms.iter_mut().find(|m| m.id() == milestone.id()));
        match slot {
            Some(stored) => {
                *stored = milestone.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::MilestoneNotFound,
                format!("Milestone not found: {}", milestone.id()),
            )),
        }
    }

    async fn delete_by_cycle(&self, cycle_id: &CycleId) -> Result<u64, DomainError> {
        let mut state = self.state.write().await;
        let removed = state.by_cycle.remove(cycle_id).unwrap_or_default();
        for milestone in &removed {
            state.cycle_of.remove(&milestone.id());
        }
        Ok(removed.len() as u64)
    }
}
