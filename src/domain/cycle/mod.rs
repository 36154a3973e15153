//! Cycle module - Treatment cycle aggregate and milestone lifecycle.
//!
//! A Cycle represents one run of a treatment protocol for one patient.
//! Its milestones are generated from the protocol's template and updated
//! by the patient as treatment progresses.

mod aggregate;
mod generator;
mod milestone;
mod progress;

pub use aggregate::Cycle;
pub use generator::{expand_milestones, materialize_date};
pub use milestone::PatientMilestone;
pub use progress::{CycleProgress, NextMilestone, DEFAULT_ASSUMED_LENGTH_DAYS};
