//! Dashboard query handlers.
//!
//! Read-side handlers composing stage detection, progress, and daily
//! content for a patient's cycle dashboard.

mod detect_stage;
mod get_cycle_overview;
mod get_cycle_progress;
mod get_daily_insights;

pub use detect_stage::{DetectStageError, DetectStageHandler, DetectStageQuery, DetectStageResult};
pub use get_cycle_overview::{
    CycleOverviewView, CycleView, GetCycleOverviewError, GetCycleOverviewHandler,
    GetCycleOverviewQuery, MilestoneView,
};
pub use get_cycle_progress::{
    CycleProgressView, GetCycleProgressError, GetCycleProgressHandler, GetCycleProgressQuery,
    NextMilestoneView,
};
pub use get_daily_insights::{
    DailyInsightsView, GetDailyInsightsError, GetDailyInsightsHandler, GetDailyInsightsQuery,
    InsightsOrigin,
};
