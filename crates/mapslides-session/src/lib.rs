//! Slide-level state for mapslides.
//!
//! A [`SlideRegistry`] holds the deck: independent [`Slide`]s, each with its
//! own layer collection and undo history, one of them active at a time. It
//! also carries the transient UI state that is reset on every slide switch
//! (the inspected layer and the presentation cursor) and the JSON
//! export/import of slides and decks.

pub mod defaults;
pub mod presentation;
pub mod record;
pub mod registry;
pub mod slide;

pub use defaults::SessionDefaults;
pub use presentation::Presentation;
pub use record::{DeckRecord, SlideRecord};
pub use registry::SlideRegistry;
pub use slide::Slide;
