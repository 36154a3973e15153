//! MilestoneStatus enum for tracking individual milestone state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a single patient milestone.
///
/// `Active` marks the milestone the patient is currently at; at most one
/// milestone per cycle should normally be active, but this is not enforced
/// here since patients record progress out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    #[default]
    Pending,
    Active,
    Completed,
    Skipped,
}

impl MilestoneStatus {
    /// Returns true if the milestone has been completed.
    pub fn is_completed(&self) -> bool {
        matches!(self, MilestoneStatus::Completed)
    }

    /// Returns true if the milestone is the patient's current position.
    pub fn is_active(&self) -> bool {
        matches!(self, MilestoneStatus::Active)
    }

    /// Validates a transition from this status to another.
    ///
    /// Valid transitions:
    /// - Pending -> Active | Completed | Skipped
    /// - Active -> Completed | Skipped
    /// - Completed -> Pending (undo)
    /// - Skipped -> Pending (undo)
    pub fn can_transition_to(&self, target: &MilestoneStatus) -> bool {
        use MilestoneStatus::*;
        matches!(
            (self, target),
            (Pending, Active)
                | (Pending, Completed)
                | (Pending, Skipped)
                | (Active, Completed)
                | (Active, Skipped)
                | (Completed, Pending)
                | (Skipped, Pending)
        )
    }
}

impl fmt::Display for MilestoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MilestoneStatus::Pending => "Pending",
            MilestoneStatus::Active => "Active",
            MilestoneStatus::Completed => "Completed",
            MilestoneStatus::Skipped => "Skipped",
        };
        write!(f, "{}", s)
    }
}
