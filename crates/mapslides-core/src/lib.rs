//! Core types for mapslides: layers, reversible actions and undo history.
//!
//! [`LayerController`] is the only writer of a slide's layer collection. Each
//! mutation it performs pushes one [`Action`] onto the slide's
//! [`HistoryStack`]; undo and redo replay those actions without pushing.

pub mod action;
pub mod controller;
pub mod gesture;
pub mod history;
pub mod layer;

pub use action::Action;
pub use controller::{ApplyOutcome, LayerController, Replay};
pub use gesture::{DrawingStyle, Gesture, Tool};
pub use history::{HistoryStack, Timeline};
pub use layer::{Layer, LayerId, LayerKind, PathOptions};
