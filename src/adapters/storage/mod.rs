//! Storage Adapters
//!
//! In-memory implementations of the repository ports.
//!
//! ## Available Adapters
//!
//! - **InMemoryCycleRepository** - Cycle aggregates in a shared map
//! - **InMemoryMilestoneRepository** - Milestones grouped per cycle
//!
//! Both are `Clone` over shared state, so handlers and tests can hold
//! independent handles onto the same data.

mod in_memory_cycle_repository;
mod in_memory_milestone_repository;

pub use in_memory_cycle_repository::InMemoryCycleRepository;
pub use in_memory_milestone_repository::InMemoryMilestoneRepository;
