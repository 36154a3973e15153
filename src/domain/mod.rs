//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `cycle` - Treatment cycle aggregate, milestones, generation and progress
//! - `template` - Treatment protocol templates and the donor overlay
//! - `stage` - Stage reference table and three-tier stage detection
//! - `content` - Educational content blocks and normalized matching

pub mod content;
pub mod cycle;
pub mod foundation;
pub mod stage;
pub mod template;
