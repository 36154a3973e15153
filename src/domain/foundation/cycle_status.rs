//! CycleStatus enum for tracking lifecycle of treatment cycles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a treatment cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CycleStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

impl CycleStatus {
    /// Returns true if the cycle can be modified.
    pub fn is_mutable(&self) -> bool {
        matches!(self, CycleStatus::Active)
    }

    /// Returns true if the cycle is finished (completed or cancelled).
    pub fn is_closed(&self) -> bool {
        matches!(self, CycleStatus::Completed | CycleStatus::Cancelled)
    }

    /// Validates a transition from this status to another.
    ///
    /// Valid transitions:
    /// - Active -> Completed
    /// - Active -> Cancelled
    pub fn can_transition_to(&self, target: &CycleStatus) -> bool {
        use CycleStatus::*;
        matches!((self, target), (Active, Completed) | (Active, Cancelled))
    }
}

impl fmt::Display for CycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CycleStatus::Active => "Active",
            CycleStatus::Completed => "Completed",
            CycleStatus::Cancelled => "Cancelled",
        };
        write!(f, "{}", s)
    }
}
