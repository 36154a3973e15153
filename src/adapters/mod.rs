//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `seed` - Reference data loaded from YAML seeds (builtin or on disk)
//! - `storage` - In-memory repositories for tests and single-process use
//! - `postgres` - PostgreSQL-backed repositories

pub mod postgres;
pub mod seed;
pub mod storage;

pub use seed::{SeedContentCatalog, SeedStageReferenceTable, SeedTemplateStore};
pub use storage::{InMemoryCycleRepository, InMemoryMilestoneRepository};
