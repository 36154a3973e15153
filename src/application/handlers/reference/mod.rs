//! Reference data handlers.
//!
//! Operational handlers for the template, stage, and content stores.

mod refresh_reference_data;

pub use refresh_reference_data::{RefreshReferenceDataHandler, RefreshReferenceDataResult};
