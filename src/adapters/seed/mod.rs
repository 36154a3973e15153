//! Seed Data Adapters
//!
//! Implementations of the reference-data ports backed by YAML seed files.
//! Each adapter ships with a dataset compiled into the binary and accepts
//! a file override via [`crate::config::ReferenceConfig`].
//!
//! Loading is lazy and cached; `refresh` rebuilds a complete snapshot
//! before swapping it in, so readers never observe partial data.
//! Malformed rows are skipped with a warning, malformed files fail the
//! whole load.

mod content_catalog;
mod schema;
mod source;
mod stage_table;
mod template_store;

pub use content_catalog::SeedContentCatalog;
pub use stage_table::SeedStageReferenceTable;
pub use template_store::SeedTemplateStore;
