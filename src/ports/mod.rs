//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `CycleRepository` - Cycle aggregate persistence
//! - `MilestoneRepository` - Patient milestone persistence
//!
//! ## Reference Data Ports
//!
//! - `TemplateStore` - Treatment template lookup
//! - `StageReferenceTable` - Stage reference rows for detection
//! - `ContentCatalog` - Educational content, pre-indexed for matching

mod content_catalog;
mod cycle_repository;
mod milestone_repository;
mod stage_reference_table;
mod template_store;

pub use content_catalog::ContentCatalog;
pub use cycle_repository::CycleRepository;
pub use milestone_repository::MilestoneRepository;
pub use stage_reference_table::StageReferenceTable;
pub use template_store::{ReloadSummary, TemplateStore};
