//! Normalized content matching.
//!
//! Content authors and template authors never agree on spelling:
//! "Egg-Retrieval", "egg retrieval" and "Egg Retrieval" all mean the same
//! milestone. The index normalizes both sides to a canonical key (lowercase,
//! with hyphens, underscores and whitespace stripped) and matches on exact
//! key equality only; a label never matches part of another label.

use std::collections::HashMap;
use std::hash::Hash;

use super::ContentBlock;
use crate::domain::foundation::MilestoneKind;

/// Collapses a label to its match key.
pub fn normalize_match_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Content blocks for one treatment, indexed for normalized lookup.
///
/// Keys are resolved when the index is built: if two blocks normalize to
/// the same key, the block with the lower `order` wins (ties fall back to
/// authoring order), and every later lookup sees that single winner.
#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    blocks: Vec<ContentBlock>,
    by_name: HashMap<String, usize>,
    by_title: HashMap<String, usize>,
    by_kind: HashMap<MilestoneKind, usize>,
}

impl ContentIndex {
    /// Builds an index from authored blocks, preserving their order.
    pub fn new(blocks: Vec<ContentBlock>) -> Self {
        let mut by_name: HashMap<String, usize> = HashMap::new();
        let mut by_title: HashMap<String, usize> = HashMap::new();
        let mut by_kind: HashMap<MilestoneKind, usize> = HashMap::new();

        for (idx, block) in blocks.iter().enumerate() {
            let name_key = normalize_match_key(block.milestone_name());
            if !name_key.is_empty() {
                record(&mut by_name, &blocks, name_key, idx);
            }
            if let Some(title) = block.notification_title() {
                let title_key = normalize_match_key(title);
                if !title_key.is_empty() {
                    record(&mut by_title, &blocks, title_key, idx);
                }
            }
            if let Some(kind) = block.milestone_kind() {
                record(&mut by_kind, &blocks, kind.clone(), idx);
            }
        }

        Self {
            blocks,
            by_name,
            by_title,
            by_kind,
        }
    }

    /// Resolves a milestone label to its content block.
    ///
    /// The milestone-name index is consulted first; the notification-title
    /// index only answers when no name matches.
    pub fn resolve(&self, label: &str) -> Option<&ContentBlock> {
        let key = normalize_match_key(label);
        if key.is_empty() {
            return None;
        }
        self.by_name
            .get(&key)
            .or_else(|| self.by_title.get(&key))
            .map(|&idx| &self.blocks[idx])
    }

    /// Resolves a canonical milestone kind to its content block.
    ///
    /// Only blocks whose authored name maps onto a canonical kind take
    /// part; free-form blocks are reachable by label alone.
    pub fn resolve_kind(&self, kind: &MilestoneKind) -> Option<&ContentBlock> {
        self.by_kind.get(kind).map(|&idx| &self.blocks[idx])
    }

    /// Returns all blocks in authored order.
    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    /// Returns the number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns true if the index holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Records `idx` under `key` unless an already-recorded block outranks it.
fn record<K: Eq + Hash>(
    index: &mut HashMap<K, usize>,
    blocks: &[ContentBlock],
    key: K,
    idx: usize,
) {
    match index.get(&key) {
        Some(&existing) if rank(blocks, existing) <= rank(blocks, idx) => {}
        _ => {
            index.insert(key, idx);
        }
    }
}

fn rank(blocks: &[ContentBlock], idx: usize) -> (u32, usize) {
    (blocks[idx].order(), idx)
}
