//! Content module - Stage-specific patient education.

mod block;
mod matcher;

pub use block::ContentBlock;
pub use matcher::{normalize_match_key, ContentIndex};
