//! PostgreSQL implementation of CycleRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::cycle::Cycle;
use crate::domain::foundation::{
    CycleId, CycleStatus, DomainError, ErrorCode, PatientId, Timestamp, TreatmentType,
};
use crate::ports::CycleRepository;

/// PostgreSQL implementation of CycleRepository.
#[derive(Clone)]
pub struct PostgresCycleRepository {
    pool: PgPool,
}

impl PostgresCycleRepository {
    /// Creates a new PostgresCycleRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CYCLE_COLUMNS: &str = "id, patient_id, treatment_type, start_date, end_date, status, \
                             donor_conception, created_at, updated_at";

#[async_trait]
impl CycleRepository for PostgresCycleRepository {
    async fn save(&self, cycle: &Cycle) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO cycles (
                id, patient_id, treatment_type, start_date, end_date, status,
                donor_conception, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(cycle.id().as_uuid())
        .bind(cycle.patient_id().as_str())
        .bind(cycle.treatment_type().key())
        .bind(cycle.start_date())
        .bind(cycle.end_date())
        .bind(cycle_status_to_str(cycle.status()))
        .bind(cycle.donor_conception())
        .bind(cycle.created_at().as_datetime())
        .bind(cycle.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to insert cycle: {}", e))
        })?;

        Ok(())
    }

    async fn update(&self, cycle: &Cycle) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE cycles SET
                end_date = $2,
                status = $3,
                updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(cycle.id().as_uuid())
        .bind(cycle.end_date())
        .bind(cycle_status_to_str(cycle.status()))
        .bind(cycle.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to update cycle: {}", e))
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::CycleNotFound,
                format!("Cycle not found: {}", cycle.id()),
            ));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &CycleId) -> Result<Option<Cycle>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM cycles WHERE id = $1", CYCLE_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Failed to fetch cycle: {}", e))
            })?;

        row.map(row_to_cycle).transpose()
    }

    async fn find_active_by_patient(
        &self,
        patient_id: &PatientId,
    ) -> Result<Option<Cycle>, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {} FROM cycles
            WHERE patient_id = $1 AND status = 'active'
            ORDER BY start_date DESC, created_at DESC
            LIMIT 1
            "#,
            CYCLE_COLUMNS
        ))
        .bind(patient_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch active cycle: {}", e),
            )
        })?;

        row.map(row_to_cycle).transpose()
    }

    async fn find_by_patient(&self, patient_id: &PatientId) -> Result<Vec<Cycle>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM cycles
            WHERE patient_id = $1
            ORDER BY start_date DESC, created_at DESC
            "#,
            CYCLE_COLUMNS
        ))
        .bind(patient_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to fetch cycles: {}", e))
        })?;

        rows.into_iter().map(row_to_cycle).collect()
    }

    async fn delete(&self, id: &CycleId) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to begin transaction: {}", e),
            )
        })?;

        // Delete milestones first (foreign key constraint)
        sqlx::query("DELETE FROM milestones WHERE cycle_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to delete milestones: {}", e),
                )
            })?;

        let result = sqlx::query("DELETE FROM cycles WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Failed to delete cycle: {}", e))
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::CycleNotFound,
                format!("Cycle not found: {}", id),
            ));
        }

        tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit transaction: {}", e),
            )
        })?;

        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Helper Functions
// ════════════════════════════════════════════════════════════════════════════════

fn row_to_cycle(row: sqlx::postgres::PgRow) -> Result<Cycle, DomainError> {
    let id: Uuid = row.get("id");
    let patient_id: String = row.get("patient_id");
    let treatment_type: String = row.get("treatment_type");
    let start_date: chrono::NaiveDate = row.get("start_date");
    let end_date: Option<chrono::NaiveDate> = row.get("end_date");
    let status: String = row.get("status");
    let donor_conception: bool = row.get("donor_conception");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    Ok(Cycle::reconstitute(
        CycleId::from_uuid(id),
        PatientId::new(patient_id)?,
        TreatmentType::parse(&treatment_type),
        start_date,
        end_date,
        str_to_cycle_status(&status)?,
        donor_conception,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}

// ════════════════════════════════════════════════════════════════════════════════
// Type Conversions
// ════════════════════════════════════════════════════════════════════════════════

pub(super) fn cycle_status_to_str(status: CycleStatus) -> &'static str {
    match status {
        CycleStatus::Active => "active",
        CycleStatus::Completed => "completed",
        CycleStatus::Cancelled => "cancelled",
    }
}

pub(super) fn str_to_cycle_status(s: &str) -> Result<CycleStatus, DomainError> {
    match s {
        "active" => Ok(CycleStatus::Active),
        "completed" => Ok(CycleStatus::Completed),
        "cancelled" => Ok(CycleStatus::Cancelled),
        _ => Err(DomainError::new(
            ErrorCode::InvalidFormat,
            format!("Invalid cycle status: {}", s),
        )),
    }
}
