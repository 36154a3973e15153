//! In-Memory Cycle Repository Adapter
//!
//! Stores cycle aggregates in memory. Useful for testing and for
//! single-process deployments that don't need durable storage.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::cycle::Cycle;
use crate::domain::foundation::{CycleId, DomainError, ErrorCode, PatientId};
use crate::ports::CycleRepository;

/// In-memory storage for cycles
#[derive(Debug, Clone, Default)]
pub struct InMemoryCycleRepository {
    cycles: Arc<RwLock<HashMap<CycleId, Cycle>>>,
}

impl InMemoryCycleRepository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.cycles.write().await.clear();
    }

    /// Get the number of stored cycles
    pub async fn count(&self) -> usize {
        self.cycles.read().await.len()
    }
}

#[async_trait]
impl CycleRepository for InMemoryCycleRepository {
    async fn save(&self, cycle: &Cycle) -> Result<(), DomainError> {
        let mut cycles = self.cycles.write().await;
        cycles.insert(cycle.id(), cycle.clone());
        Ok(())
    }

    async fn update(&self, cycle: &Cycle) -> Result<(), DomainError> {
        let mut cycles = self.cycles.write().await;
        if !cycles.contains_key(&cycle.id()) {
            return Err(DomainError::new(
                ErrorCode::CycleNotFound,
                format!("Cycle not found: {}", cycle.id()),
            ));
        }
        cycles.insert(cycle.id(), cycle.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &CycleId) -> Result<Option<Cycle>, DomainError> {
        let cycles = self.cycles.read().await;
        Ok(cycles.get(id).cloned())
    }

    async fn find_active_by_patient(
        &self,
        patient_id: &PatientId,
    ) -> Result<Option<Cycle>, DomainError> {
        let cycles = self.cycles.read().await;
        // Map iteration order is arbitrary; pick the most recently
        // started, breaking date ties on creation time.
        Ok(cycles
            .values()
            .filter(|c| c.patient_id() == patient_id && c.status().is_mutable())
            .max_by_key(|c| (c.start_date(), c.created_at()))
            .cloned())
    }

    async fn find_by_patient(&self, patient_id: &PatientId) -> Result<Vec<Cycle>, DomainError> {
        let cycles = self.cycles.read().await;
        let mut found: Vec<Cycle> = cycles
            .values()
            .filter(|c| c.patient_id() == patient_id)
            .cloned()
            .collect();
        found.sort_by_key(|c| std::cmp::Reverse((c.start_date(), c.created_at())));
        Ok(found)
    }

    async fn delete(&self, id: &CycleId) -> Result<(), DomainError> {
        let mut cycles = self.cycles.write().await;
        if cycles.remove(id).is_none() {
            return Err(DomainError::new(
                ErrorCode::CycleNotFound,
                format!("Cycle not found: {}", id),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::TreatmentType;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn cycle(patient: &str, start: NaiveDate) -> Cycle {
        Cycle::new(
            PatientId::new(patient).unwrap(),
            TreatmentType::IvfFresh,
            start,
            false,
        )
    }

    #[tokio::test]
    async fn save_and_find_round_trip() {
        let repo = InMemoryCycleRepository::new();
        let cycle = cycle("patient-1", date(2025, 1, 1));

        repo.save(&cycle).await.unwrap();

        let found = repo.find_by_id(&cycle.id()).await.unwrap().unwrap();
        assert_eq!(found.id(), cycle.id());
        assert_eq!(found.start_date(), date(2025, 1, 1));
    }

    #[tokio::test]
    async fn find_missing_returns_none() {
        let repo = InMemoryCycleRepository::new();
        assert!(repo.find_by_id(&CycleId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_missing_cycle_fails() {
        let repo = InMemoryCycleRepository::new();
        let cycle = cycle("patient-1", date(2025, 1, 1));

        let err = repo.update(&cycle).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CycleNotFound);
    }

    #[tokio::test]
    async fn update_replaces_stored_cycle() {
        let repo = InMemoryCycleRepository::new();
        let mut cycle = cycle("patient-1", date(2025, 1, 1));
        repo.save(&cycle).await.unwrap();

        cycle.complete(date(2025, 1, 28)).unwrap();
        repo.update(&cycle).await.unwrap();

        let found = repo.find_by_id(&cycle.id()).await.unwrap().unwrap();
        assert!(found.status().is_closed());
        assert_eq!(found.end_date(), Some(date(2025, 1, 28)));
    }

    #[tokio::test]
    async fn active_lookup_prefers_most_recent_start() {
        let repo = InMemoryCycleRepository::new();
        let earlier = cycle("patient-1", date(2024, 10, 1));
        let later = cycle("patient-1", date(2025, 1, 1));
        repo.save(&earlier).await.unwrap();
        repo.save(&later).await.unwrap();

        let patient = PatientId::new("patient-1").unwrap();
        let active = repo.find_active_by_patient(&patient).await.unwrap().unwrap();
        assert_eq!(active.id(), later.id());
    }

    #[tokio::test]
    async fn active_lookup_skips_closed_cycles() {
        let repo = InMemoryCycleRepository::new();
        let mut closed = cycle("patient-1", date(2025, 1, 1));
        closed.cancel(date(2025, 1, 10)).unwrap();
        repo.save(&closed).await.unwrap();

        let patient = PatientId::new("patient-1").unwrap();
        assert!(repo.find_active_by_patient(&patient).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_by_patient_orders_newest_first() {
        let repo = InMemoryCycleRepository::new();
        let a = cycle("patient-1", date(2024, 6, 1));
        let b = cycle("patient-1", date(2025, 1, 1));
        let other = cycle("patient-2", date(2025, 2, 1));
        repo.save(&a).await.unwrap();
        repo.save(&b).await.unwrap();
        repo.save(&other).await.unwrap();

        let patient = PatientId::new("patient-1").unwrap();
        let found = repo.find_by_patient(&patient).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id(), b.id());
        assert_eq!(found[1].id(), a.id());
    }

    #[tokio::test]
    async fn delete_removes_cycle() {
        let repo = InMemoryCycleRepository::new();
        let cycle = cycle("patient-1", date(2025, 1, 1));
        repo.save(&cycle).await.unwrap();

        repo.delete(&cycle.id()).await.unwrap();
        assert_eq!(repo.count().await, 0);

        let err = repo.delete(&cycle.id()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CycleNotFound);
    }
}
