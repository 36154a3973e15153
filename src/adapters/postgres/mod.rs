//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresCycleRepository` - Cycle aggregate persistence
//! - `PostgresMilestoneRepository` - Milestone schedules with stable ordering
//!
//! [`connect`] builds the shared pool from [`DatabaseConfig`] and
//! optionally runs the bundled migrations.

mod cycle_repository;
mod milestone_repository;

pub use cycle_repository::PostgresCycleRepository;
pub use milestone_repository::PostgresMilestoneRepository;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Connects a pool using the configured limits and timeouts.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DomainError> {
    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .connect(&config.url)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to connect to database: {}", e),
            )
        })?;

    if config.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Migration failed: {}", e))
        })?;
        tracing::info!("database migrations applied");
    }

    Ok(pool)
}
