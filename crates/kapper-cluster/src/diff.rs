//! Compare two rendered layers so a map can update markers in place.
//!
//! Layers are recomputed from scratch on every change; the diff tells the
//! rendering side which markers to add, which to drop, and which are the
//! same marker as before.

use std::collections::HashSet;

use serde::Serialize;

use crate::types::RenderItem;

/// Stable identity of a marker across recomputations.
///
/// A cluster is identified by its ordered member ids, so a cluster that
/// gains or loses a member counts as a different marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarkerKey {
    Point { id: String },
    Cluster { members: Vec<String> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayerDiff {
    /// In `next` order.
    pub added: Vec<MarkerKey>,
    /// In `previous` order.
    pub removed: Vec<MarkerKey>,
    /// In `next` order.
    pub retained: Vec<MarkerKey>,
}

impl LayerDiff {
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[must_use]
pub fn diff_layers(previous: &[RenderItem<'_>], next: &[RenderItem<'_>]) -> LayerDiff {
    let previous_keys: Vec<MarkerKey> = previous.iter().map(RenderItem::key).collect();
    let next_keys: Vec<MarkerKey> = next.iter().map(RenderItem::key).collect();

    let previous_set: HashSet<&MarkerKey> = previous_keys.iter().collect();
    let next_set: HashSet<&MarkerKey> = next_keys.iter().collect();

    let (retained, added): (Vec<MarkerKey>, Vec<MarkerKey>) = next_keys
        .iter()
        .cloned()
        .partition(|key| previous_set.contains(key));

    let removed = previous_keys
        .iter()
        .filter(|key| !next_set.contains(key))
        .cloned()
        .collect();

    LayerDiff {
        added,
        removed,
        retained,
    }
}
