//! The layer collection controller - the only writer of a slide's layers.
//!
//! Every user-intent mutation is applied to the collection and paired with
//! exactly one push onto the slide's history. Undo/redo replay reads the
//! history and applies the inverse or forward mutation without pushing.

use std::collections::{HashMap, HashSet};

use anyhow::{Result, bail};
use mapslides_geometry::DistanceMeasure;

use crate::action::Action;
use crate::history::HistoryStack;
use crate::layer::{Layer, LayerId, LayerKind};

/// Result of replaying one action against the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// The action names a layer that is not in the collection
    MissingLayer(LayerId),
    /// The action would insert a layer whose uuid is already present
    AlreadyPresent(LayerId),
    /// The action names a position outside the collection
    IndexOutOfRange { index: usize, len: usize },
}

impl ApplyOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ApplyOutcome::Applied)
    }
}

/// An action taken from history together with how its replay went.
/// The history cursor has moved regardless of the outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Replay {
    pub action: Action,
    pub outcome: ApplyOutcome,
}

/// Ordered layer collection plus the history that can rebuild it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerController {
    layers: Vec<Layer>,
    history: HistoryStack,
}

impl LayerController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a controller from stored parts. Fails if two layers share a
    /// uuid. Cached `order` fields are recomputed from position.
    pub fn from_parts(layers: Vec<Layer>, history: HistoryStack) -> Result<Self> {
        let mut seen = HashSet::with_capacity(layers.len());
        for layer in &layers {
            if !seen.insert(layer.uuid) {
                bail!("duplicate layer uuid {}", layer.uuid);
            }
        }
        let mut controller = Self { layers, history };
        controller.renumber();
        Ok(controller)
    }

    pub fn into_parts(self) -> (Vec<Layer>, HistoryStack) {
        (self.layers, self.history)
    }

    // --- Read access ---

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn find(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.uuid == id)
    }

    pub fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.uuid == id)
    }

    // --- User-intent mutations ---

    /// Append a new layer with a fresh uuid and cached metrics.
    pub fn create_layer(&mut self, kind: LayerKind, measure: &impl DistanceMeasure) -> LayerId {
        let mut layer = Layer::new(kind, measure);
        layer.order = self.layers.len();
        let id = layer.uuid;
        tracing::debug!(%id, kind = layer.kind.name(), "Create layer");

        self.history.push(Action::NewLayer { layer: layer.clone() });
        self.layers.push(layer);
        id
    }

    /// Remove the layer at `index`. Out-of-range indices are a no-op.
    pub fn delete_layer(&mut self, index: usize) -> Option<Layer> {
        if index >= self.layers.len() {
            tracing::debug!(index, len = self.layers.len(), "Delete ignored: index out of range");
            return None;
        }
        let layer = self.layers.remove(index);
        self.renumber();

        self.history.push(Action::DeleteLayer {
            layer: layer.clone(),
            old_index: index,
        });
        Some(layer)
    }

    /// Flip the pinned flag at `index`, returning the new value.
    pub fn toggle_pin(&mut self, index: usize) -> Option<bool> {
        let layer = self.layers.get_mut(index)?;
        let snapshot = layer.clone();
        layer.is_pinned = !layer.is_pinned;
        let pinned = layer.is_pinned;

        self.history.push(if snapshot.is_pinned {
            Action::UnpinLayer { layer: snapshot }
        } else {
            Action::PinLayer { layer: snapshot }
        });
        Some(pinned)
    }

    /// Flip the hidden flag at `index`, returning the new value.
    pub fn toggle_hide(&mut self, index: usize) -> Option<bool> {
        let layer = self.layers.get_mut(index)?;
        let snapshot = layer.clone();
        layer.is_hidden = !layer.is_hidden;
        let hidden = layer.is_hidden;

        self.history.push(if snapshot.is_hidden {
            Action::UnhideLayer { layer: snapshot }
        } else {
            Action::HideLayer { layer: snapshot }
        });
        Some(hidden)
    }

    /// Move the layer at `old_index` to `new_index`, shifting the layers in
    /// between. Returns `false` (and records nothing) when either index is out
    /// of range or they are equal.
    pub fn reorder(&mut self, old_index: usize, new_index: usize) -> bool {
        if old_index == new_index || !self.move_layer(old_index, new_index).is_applied() {
            tracing::debug!(old_index, new_index, "Reorder ignored");
            return false;
        }
        self.history.push(Action::ReorderLayer { old_index, new_index });
        true
    }

    // --- History replay ---

    /// Undo the present action. `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<Replay> {
        let action = self.history.undo()?.clone();
        let outcome = self.apply_undo(&action);
        Some(Replay { action, outcome })
    }

    /// Redo the next action. `None` when the future is empty.
    pub fn redo(&mut self) -> Option<Replay> {
        let action = self.history.redo()?.clone();
        let outcome = self.apply_redo(&action);
        Some(Replay { action, outcome })
    }

    /// Walk the cursor one step at a time until `target` is the present
    /// action, replaying every intermediate state. `None` targets the state
    /// before the first action. Returns the number of steps taken.
    pub fn jump_to(&mut self, target: Option<usize>) -> usize {
        if target.is_some_and(|t| t >= self.history.len()) {
            tracing::debug!(?target, len = self.history.len(), "Jump ignored: target out of range");
            return 0;
        }
        let current = self.history.current_index().map_or(-1, |i| i as i64);
        let target = target.map_or(-1, |t| t as i64);
        let diff = target - current;

        for _ in 0..diff.max(0) {
            self.redo();
        }
        for _ in 0..(-diff).max(0) {
            self.undo();
        }
        diff.unsigned_abs() as usize
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Apply the structural inverse of `action`.
    pub fn apply_undo(&mut self, action: &Action) -> ApplyOutcome {
        let outcome = match action {
            Action::NewLayer { layer } => self.remove_by_id(layer.uuid),
            Action::DeleteLayer { layer, old_index } => self.insert_at(*old_index, layer),
            Action::PinLayer { layer } => self.set_flag(layer.uuid, |l| l.is_pinned = false),
            Action::UnpinLayer { layer } => self.set_flag(layer.uuid, |l| l.is_pinned = true),
            Action::HideLayer { layer } => self.set_flag(layer.uuid, |l| l.is_hidden = false),
            Action::UnhideLayer { layer } => self.set_flag(layer.uuid, |l| l.is_hidden = true),
            Action::ReorderLayer { old_index, new_index } => self.move_layer(*new_index, *old_index),
        };
        report("undo", action, outcome);
        outcome
    }

    /// Apply the forward effect of `action`.
    pub fn apply_redo(&mut self, action: &Action) -> ApplyOutcome {
        let outcome = match action {
            Action::NewLayer { layer } => self.insert_at(self.layers.len(), layer),
            Action::DeleteLayer { layer, .. } => self.remove_by_id(layer.uuid),
            Action::PinLayer { layer } => self.set_flag(layer.uuid, |l| l.is_pinned = true),
            Action::UnpinLayer { layer } => self.set_flag(layer.uuid, |l| l.is_pinned = false),
            Action::HideLayer { layer } => self.set_flag(layer.uuid, |l| l.is_hidden = true),
            Action::UnhideLayer { layer } => self.set_flag(layer.uuid, |l| l.is_hidden = false),
            Action::ReorderLayer { old_index, new_index } => self.move_layer(*old_index, *new_index),
        };
        report("redo", action, outcome);
        outcome
    }

    /// Deep copy with every uuid, in the collection and in history
    /// snapshots, replaced through one consistent mapping.
    pub fn with_fresh_ids(&self) -> Self {
        let mut copy = self.clone();
        let mut ids: HashMap<LayerId, LayerId> = HashMap::new();
        for layer in &mut copy.layers {
            layer.uuid = *ids.entry(layer.uuid).or_default();
        }
        for action in copy.history.actions_mut() {
            action.remap_ids(&mut ids);
        }
        copy
    }

    // --- Primitive mutations shared by user intent and replay ---

    fn remove_by_id(&mut self, id: LayerId) -> ApplyOutcome {
        let Some(index) = self.index_of(id) else {
            return ApplyOutcome::MissingLayer(id);
        };
        self.layers.remove(index);
        self.renumber();
        ApplyOutcome::Applied
    }

    fn insert_at(&mut self, index: usize, layer: &Layer) -> ApplyOutcome {
        if index > self.layers.len() {
            return ApplyOutcome::IndexOutOfRange { index, len: self.layers.len() };
        }
        if self.index_of(layer.uuid).is_some() {
            return ApplyOutcome::AlreadyPresent(layer.uuid);
        }
        self.layers.insert(index, layer.clone());
        self.renumber();
        ApplyOutcome::Applied
    }

    fn set_flag(&mut self, id: LayerId, set: impl FnOnce(&mut Layer)) -> ApplyOutcome {
        match self.layers.iter_mut().find(|l| l.uuid == id) {
            Some(layer) => {
                set(layer);
                ApplyOutcome::Applied
            }
            None => ApplyOutcome::MissingLayer(id),
        }
    }

    fn move_layer(&mut self, from: usize, to: usize) -> ApplyOutcome {
        let len = self.layers.len();
        for index in [from, to] {
            if index >= len {
                return ApplyOutcome::IndexOutOfRange { index, len };
            }
        }
        let layer = self.layers.remove(from);
        self.layers.insert(to, layer);
        self.renumber();
        ApplyOutcome::Applied
    }

    fn renumber(&mut self) {
        for (i, layer) in self.layers.iter_mut().enumerate() {
            layer.order = i;
        }
    }
}

fn report(direction: &'static str, action: &Action, outcome: ApplyOutcome) {
    if !outcome.is_applied() {
        tracing::warn!(direction, action = %action.label(), ?outcome, "History replay skipped: collection out of sync");
    }
}
