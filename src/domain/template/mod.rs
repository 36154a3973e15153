//! Template module - Treatment protocol reference data.

mod definition;
mod donor_overlay;

pub use definition::{StageTemplateEntry, TemplateDefinition};
pub use donor_overlay::donor_overlay;
