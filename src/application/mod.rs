//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::cycle::{
    // Cycle lifecycle
    CancelCycleCommand, CancelCycleHandler, CancelCycleResult,
    CompleteCycleCommand, CompleteCycleHandler, CompleteCycleResult,
    CreateCycleCommand, CreateCycleHandler, CreateCycleResult,
    DeleteCycleCommand, DeleteCycleHandler, DeleteCycleResult,
    UpdateMilestoneCommand, UpdateMilestoneHandler, UpdateMilestoneResult,
};
pub use handlers::dashboard::{
    // Dashboard reads
    CycleOverviewView, DailyInsightsView,
    DetectStageHandler, DetectStageQuery, DetectStageResult,
    GetCycleOverviewHandler, GetCycleOverviewQuery,
    GetCycleProgressHandler, GetCycleProgressQuery,
    GetDailyInsightsHandler, GetDailyInsightsQuery,
};
pub use handlers::reference::{RefreshReferenceDataHandler, RefreshReferenceDataResult};
