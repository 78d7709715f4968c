//! The closed catalog of reversible layer mutations.
//!
//! Every variant embeds value snapshots rather than references, so an action
//! can be inverted without looking at the current collection and later edits
//! to live layers never leak into recorded history.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::layer::{Layer, LayerId};

/// One recorded, self-invertible layer-collection mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// A layer was appended
    NewLayer { layer: Layer },
    /// A layer was removed from `old_index`
    #[serde(rename_all = "camelCase")]
    DeleteLayer { layer: Layer, old_index: usize },
    PinLayer { layer: Layer },
    UnpinLayer { layer: Layer },
    HideLayer { layer: Layer },
    UnhideLayer { layer: Layer },
    /// A layer was moved (remove then insert) from `old_index` to `new_index`
    #[serde(rename_all = "camelCase")]
    ReorderLayer { old_index: usize, new_index: usize },
}

impl Action {
    /// Wire name of the variant
    pub fn name(&self) -> &'static str {
        match self {
            Action::NewLayer { .. } => "NEW_LAYER",
            Action::DeleteLayer { .. } => "DELETE_LAYER",
            Action::PinLayer { .. } => "PIN_LAYER",
            Action::UnpinLayer { .. } => "UNPIN_LAYER",
            Action::HideLayer { .. } => "HIDE_LAYER",
            Action::UnhideLayer { .. } => "UNHIDE_LAYER",
            Action::ReorderLayer { .. } => "REORDER_LAYER",
        }
    }

    /// The layer snapshot carried by this action, if any
    pub fn layer(&self) -> Option<&Layer> {
        match self {
            Action::NewLayer { layer }
            | Action::DeleteLayer { layer, .. }
            | Action::PinLayer { layer }
            | Action::UnpinLayer { layer }
            | Action::HideLayer { layer }
            | Action::UnhideLayer { layer } => Some(layer),
            Action::ReorderLayer { .. } => None,
        }
    }

    pub fn layer_id(&self) -> Option<LayerId> {
        self.layer().map(|l| l.uuid)
    }

    /// History row text, e.g. `NEW_LAYER - 1a2b3` or `REORDER_LAYER - 0 to 2`
    pub fn label(&self) -> String {
        match self {
            Action::ReorderLayer { old_index, new_index } => {
                format!("{} - {} to {}", self.name(), old_index, new_index)
            }
            _ => match self.layer() {
                Some(layer) => format!("{} - {}", self.name(), layer.uuid.short()),
                None => self.name().to_string(),
            },
        }
    }

    /// Rewrite the embedded snapshot's uuid through `ids`, minting a fresh id
    /// for any uuid not seen yet.
    pub(crate) fn remap_ids(&mut self, ids: &mut HashMap<LayerId, LayerId>) {
        if let Some(layer) = self.layer_mut() {
            layer.uuid = *ids.entry(layer.uuid).or_default();
        }
    }

    fn layer_mut(&mut self) -> Option<&mut Layer> {
        match self {
            Action::NewLayer { layer }
            | Action::DeleteLayer { layer, .. }
            | Action::PinLayer { layer }
            | Action::UnpinLayer { layer }
            | Action::HideLayer { layer }
            | Action::UnhideLayer { layer } => Some(layer),
            Action::ReorderLayer { .. } => None,
        }
    }
}
