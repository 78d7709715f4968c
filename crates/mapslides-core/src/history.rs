//! Linear undo/redo log of reversible actions with a cursor.
//!
//! Unlike a two-stack design, the log keeps every action in one `Vec` and a
//! cursor separates the applied past from the redoable future. Pushing while
//! the cursor is behind the end discards that future for good.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::action::Action;

/// Where a history entry sits relative to the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeline {
    Past,
    Present,
    Future,
}

/// Per-slide action log. `Clone` yields an independent copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HistoryRecord", into = "HistoryRecord")]
pub struct HistoryStack {
    actions: Vec<Action>,
    /// Number of applied actions; the current index is `applied - 1`
    applied: usize,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new present, discarding any redo tail.
    pub fn push(&mut self, action: Action) {
        let discarded = self.actions.len() - self.applied;
        self.actions.truncate(self.applied);
        tracing::debug!(action = action.name(), discarded, "History push");
        self.actions.push(action);
        self.applied = self.actions.len();
    }

    /// Step the cursor back, returning the action that was at the present.
    /// Returns `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<&Action> {
        if self.applied == 0 {
            return None;
        }
        self.applied -= 1;
        let action = &self.actions[self.applied];
        tracing::debug!(action = action.name(), current = ?self.current_index(), "Undo");
        Some(action)
    }

    /// Step the cursor forward, returning the action now at the present.
    /// Returns `None` when the future is empty.
    pub fn redo(&mut self) -> Option<&Action> {
        if self.applied >= self.actions.len() {
            return None;
        }
        self.applied += 1;
        let action = &self.actions[self.applied - 1];
        tracing::debug!(action = action.name(), current = ?self.current_index(), "Redo");
        Some(action)
    }

    /// Drop all history
    pub fn clear(&mut self) {
        self.actions.clear();
        self.applied = 0;
    }

    /// Index of the present action, `None` before the first action
    pub fn current_index(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    pub fn can_redo(&self) -> bool {
        self.applied < self.actions.len()
    }

    /// Iterate entries with their position relative to the cursor, for a
    /// history list view
    pub fn entries(&self) -> impl Iterator<Item = (usize, &Action, Timeline)> {
        let current = self.current_index();
        self.actions.iter().enumerate().map(move |(i, action)| {
            let timeline = match current {
                Some(c) if i < c => Timeline::Past,
                Some(c) if i == c => Timeline::Present,
                _ => Timeline::Future,
            };
            (i, action, timeline)
        })
    }

    pub(crate) fn actions_mut(&mut self) -> &mut [Action] {
        &mut self.actions
    }
}

/// Plain record shape: `{ "actions": [...], "currentIndex": -1 }`
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryRecord {
    actions: Vec<Action>,
    current_index: i64,
}

impl TryFrom<HistoryRecord> for HistoryStack {
    type Error = anyhow::Error;

    fn try_from(record: HistoryRecord) -> Result<Self> {
        let len = record.actions.len() as i64;
        if record.current_index < -1 || record.current_index >= len {
            bail!(
                "history cursor {} out of range for {} actions",
                record.current_index,
                len
            );
        }
        Ok(Self {
            actions: record.actions,
            applied: (record.current_index + 1) as usize,
        })
    }
}

impl From<HistoryStack> for HistoryRecord {
    fn from(stack: HistoryStack) -> Self {
        Self {
            current_index: stack.applied as i64 - 1,
            actions: stack.actions,
        }
    }
}
