//! PostgreSQL implementation of MilestoneRepository.
//!
//! Milestone batches are written inside one transaction, so a cycle never
//! ends up with a partial schedule. The `seq` column preserves insertion
//! order for milestones sharing a date.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::cycle::PatientMilestone;
use crate::domain::foundation::{
    CycleId, DomainError, ErrorCode, MilestoneId, MilestoneKind, MilestoneStatus, Timestamp,
};
use crate::ports::MilestoneRepository;

/// PostgreSQL implementation of MilestoneRepository.
#[derive(Clone)]
pub struct PostgresMilestoneRepository {
    pool: PgPool,
}

impl PostgresMilestoneRepository {
    /// Creates a new PostgresMilestoneRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const MILESTONE_COLUMNS: &str =
    "id, cycle_id, kind, title, milestone_date, status, notes, created_at, updated_at";

#[async_trait]
impl MilestoneRepository for PostgresMilestoneRepository {
    async fn insert_batch(&self, milestones: &[PatientMilestone]) -> Result<(), DomainError> {
        if milestones.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to begin transaction: {}", e),
            )
        })?;

        for milestone in milestones {
            sqlx::query(
                r#"
                INSERT INTO milestones (
                    id, cycle_id, kind, title, milestone_date, status, notes,
                    created_at, updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(milestone.id().as_uuid())
            .bind(milestone.cycle_id().as_uuid())
            .bind(milestone.kind().token())
            .bind(milestone.title())
            .bind(milestone.date())
            .bind(milestone_status_to_str(milestone.status()))
            .bind(milestone.notes())
            .bind(milestone.created_at().as_datetime())
            .bind(milestone.updated_at().as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to insert milestone: {}", e),
                )
            })?;
        }

        tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit transaction: {}", e),
            )
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &MilestoneId) -> Result<Option<PatientMilestone>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM milestones WHERE id = $1",
            MILESTONE_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch milestone: {}", e),
            )
        })?;

        row.map(row_to_milestone).transpose()
    }

    async fn list_by_cycle(&self, cycle_id: &CycleId) -> Result<Vec<PatientMilestone>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM milestones
            WHERE cycle_id = $1
            ORDER BY milestone_date ASC, seq ASC
            "#,
            MILESTONE_COLUMNS
        ))
        .bind(cycle_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list milestones: {}", e),
            )
        })?;

        rows.into_iter().map(row_to_milestone).collect()
    }

    async fn count_by_cycle(&self, cycle_id: &CycleId) -> Result<u32, DomainError> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM milestones WHERE cycle_id = $1")
            .bind(cycle_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to count milestones: {}", e),
                )
            })?;

        Ok(result.0 as u32)
    }

    async fn update(&self, milestone: &PatientMilestone) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE milestones SET
                milestone_date = $2,
                status = $3,
                notes = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(milestone.id().as_uuid())
        .bind(milestone.date())
        .bind(milestone_status_to_str(milestone.status()))
        .bind(milestone.notes())
        .bind(milestone.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update milestone: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::MilestoneNotFound,
                format!("Milestone not found: {}", milestone.id()),
            ));
        }

        Ok(())
    }

    async fn delete_by_cycle(&self, cycle_id: &CycleId) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM milestones WHERE cycle_id = $1")
            .bind(cycle_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to delete milestones: {}", e),
                )
            })?;

        Ok(result.rows_affected())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Helper Functions
// ════════════════════════════════════════════════════════════════════════════════

fn row_to_milestone(row: sqlx::postgres::PgRow) -> Result<PatientMilestone, DomainError> {
    let id: Uuid = row.get("id");
    let cycle_id: Uuid = row.get("cycle_id");
    let kind: String = row.get("kind");
    let title: String = row.get("title");
    let milestone_date: chrono::NaiveDate = row.get("milestone_date");
    let status: String = row.get("status");
    let notes: Option<String> = row.get("notes");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    Ok(PatientMilestone::reconstitute(
        MilestoneId::from_uuid(id),
        CycleId::from_uuid(cycle_id),
        // Canonical tokens resolve exactly; custom slugs stay custom.
        MilestoneKind::resolve(&kind),
        title,
        milestone_date,
        str_to_milestone_status(&status)?,
        notes,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}

// ════════════════════════════════════════════════════════════════════════════════
// Type Conversions
// ════════════════════════════════════════════════════════════════════════════════

pub(super) fn milestone_status_to_str(status: MilestoneStatus) -> &'static str {
    match status {
        MilestoneStatus::Pending => "pending",
        MilestoneStatus::Active => "active",
        MilestoneStatus::Completed => "completed",
        MilestoneStatus::Skipped => "skipped",
    }
}

pub(super) fn str_to_milestone_status(s: &str) -> Result<MilestoneStatus, DomainError> {
    match s {
        "pending" => Ok(MilestoneStatus::Pending),
        "active" => Ok(MilestoneStatus::Active),
        "completed" => Ok(MilestoneStatus::Completed),
        "skipped" => Ok(MilestoneStatus::Skipped),
        _ => Err(DomainError::new(
            ErrorCode::InvalidFormat,
            format!("Invalid milestone status: {}", s),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn milestone_status_round_trips() {
        let statuses = [
            MilestoneStatus::Pending,
            MilestoneStatus::Active,
            MilestoneStatus::Completed,
            MilestoneStatus::Skipped,
        ];
        for status in statuses {
            let s = milestone_status_to_str(status);
            let back = str_to_milestone_status(s).unwrap();
            assert_eq!(status, back);
        }
    }

    #[test]
    fn invalid_milestone_status_returns_error() {
        let result = str_to_milestone_status("done");
        assert!(result.is_err());
    }

    #[test]
    fn canonical_kind_tokens_round_trip() {
        let kinds = [
            MilestoneKind::EggRetrieval,
            MilestoneKind::TriggerShot,
            MilestoneKind::FrozenTransfer,
            MilestoneKind::DonorCounselling,
        ];
        for kind in kinds {
            let back = MilestoneKind::resolve(kind.token());
            assert_eq!(kind, back);
        }
    }
}
