//! Cycle command handlers.
//!
//! Handlers for cycle lifecycle operations: creation with milestone
//! expansion, milestone edits, and closing or removing a cycle.

// Command handlers
mod cancel_cycle;
mod complete_cycle;
mod create_cycle;
mod delete_cycle;
mod update_milestone;

pub use cancel_cycle::{
    CancelCycleCommand, CancelCycleError, CancelCycleHandler, CancelCycleResult,
};
pub use complete_cycle::{
    CompleteCycleCommand, CompleteCycleError, CompleteCycleHandler, CompleteCycleResult,
};
pub use create_cycle::{
    CreateCycleCommand, CreateCycleError, CreateCycleHandler, CreateCycleResult,
};
pub use delete_cycle::{
    DeleteCycleCommand, DeleteCycleError, DeleteCycleHandler, DeleteCycleResult,
};
pub use update_milestone::{
    UpdateMilestoneCommand, UpdateMilestoneError, UpdateMilestoneHandler, UpdateMilestoneResult,
};
