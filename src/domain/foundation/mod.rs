//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the Carepath domain.

mod ids;
mod timestamp;
mod percentage;
mod treatment_type;
mod milestone_kind;
mod milestone_status;
mod cycle_status;
mod errors;

pub use ids::{CycleId, MilestoneId, PatientId};
pub use timestamp::Timestamp;
pub use percentage::Percentage;
pub use treatment_type::TreatmentType;
pub use milestone_kind::MilestoneKind;
pub use milestone_status::MilestoneStatus;
pub use cycle_status::CycleStatus;
pub use errors::{DomainError, ErrorCode, ValidationError};
