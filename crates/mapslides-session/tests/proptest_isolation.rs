//! Property tests for slide isolation and import.
//!
//! 1. Editing a duplicated slide never changes its source slide.
//! 2. Any sequence of edits and switches keeps at least one slide and a valid
//!    active index.
//! 3. An imported slide has the same layers and cursor as its export, under
//!    uuids that are new to the deck.

use std::collections::HashSet;

use mapslides_core::{LayerKind, PathOptions};
use mapslides_geometry::LatLng;
use mapslides_session::SlideRegistry;
use proptest::prelude::*;

fn measure(a: LatLng, b: LatLng) -> f64 {
    ((a.lat - b.lat).powi(2) + (a.lng - b.lng).powi(2)).sqrt()
}

#[derive(Debug, Clone)]
enum Edit {
    Create(u8),
    Delete(usize),
    Pin(usize),
    Hide(usize),
    Reorder(usize, usize),
    Undo,
    Redo,
}

#[derive(Debug, Clone)]
enum DeckOp {
    Edit(Edit),
    Switch(usize),
    Duplicate(usize),
    Remove(usize),
}

fn arrow(n: u8) -> LayerKind {
    let x = f64::from(n);
    LayerKind::Arrow {
        start: LatLng::new(0.0, 0.0),
        end: LatLng::new(x, -x),
        path_options: PathOptions::stroke("#0000ff", 3.0),
    }
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        3 => any::<u8>().prop_map(Edit::Create),
        1 => (0usize..6).prop_map(Edit::Delete),
        1 => (0usize..6).prop_map(Edit::Pin),
        1 => (0usize..6).prop_map(Edit::Hide),
        1 => (0usize..6, 0usize..6).prop_map(|(a, b)| Edit::Reorder(a, b)),
        1 => Just(Edit::Undo),
        1 => Just(Edit::Redo),
    ]
}

fn deck_strategy() -> impl Strategy<Value = DeckOp> {
    prop_oneof![
        4 => edit_strategy().prop_map(DeckOp::Edit),
        1 => (0usize..5).prop_map(DeckOp::Switch),
        1 => (0usize..5).prop_map(DeckOp::Duplicate),
        1 => (0usize..5).prop_map(DeckOp::Remove),
    ]
}

fn edit(registry: &mut SlideRegistry, edit: &Edit) {
    match *edit {
        Edit::Create(n) => {
            registry.create_layer(arrow(n), &measure);
        }
        Edit::Delete(i) => {
            registry.delete_layer(i);
        }
        Edit::Pin(i) => {
            registry.toggle_pin(i);
        }
        Edit::Hide(i) => {
            registry.toggle_hide(i);
        }
        Edit::Reorder(a, b) => {
            registry.reorder(a, b);
        }
        Edit::Undo => {
            registry.undo();
        }
        Edit::Redo => {
            registry.redo();
        }
    }
}

proptest! {
    #[test]
    fn duplicate_is_isolated(
        setup in prop::collection::vec(edit_strategy(), 0..15),
        later in prop::collection::vec(edit_strategy(), 1..25),
    ) {
        let mut registry = SlideRegistry::default();
        for e in &setup {
            edit(&mut registry, e);
        }
        let source = registry.active().clone();

        let copy = registry.duplicate(0).unwrap();
        registry.switch_to(copy);
        for e in &later {
            edit(&mut registry, e);
        }

        prop_assert_eq!(registry.get(0).unwrap(), &source);
    }

    #[test]
    fn deck_always_has_an_active_slide(ops in prop::collection::vec(deck_strategy(), 0..60)) {
        let mut registry = SlideRegistry::default();
        for op in &ops {
            match op {
                DeckOp::Edit(e) => edit(&mut registry, e),
                DeckOp::Switch(i) => {
                    registry.switch_to(*i);
                }
                DeckOp::Duplicate(i) => {
                    registry.duplicate(*i);
                }
                DeckOp::Remove(i) => {
                    registry.remove(*i);
                }
            }
            prop_assert!(!registry.is_empty());
            prop_assert!(registry.active_index() < registry.len());
            if let Some(previous) = registry.previous_index() {
                prop_assert!(previous < registry.len());
            }
        }

        let mut seen = HashSet::new();
        for slide in registry.slides() {
            for layer in slide.layers.layers() {
                prop_assert!(seen.insert(layer.uuid), "uuid shared across slides");
            }
        }
    }

    #[test]
    fn import_matches_export(edits in prop::collection::vec(edit_strategy(), 0..25)) {
        let mut registry = SlideRegistry::default();
        for e in &edits {
            edit(&mut registry, e);
        }
        let json = registry.export_slide(0).unwrap();
        let index = registry.import_slide(&json).unwrap();

        let source = registry.get(0).unwrap();
        let imported = registry.get(index).unwrap();
        prop_assert_eq!(source.layers.len(), imported.layers.len());
        prop_assert_eq!(
            source.layers.history().current_index(),
            imported.layers.history().current_index()
        );
        prop_assert_eq!(source.layers.history().len(), imported.layers.history().len());

        let existing: HashSet<_> = source.layers.layers().iter().map(|l| l.uuid).collect();
        for (a, b) in source.layers.layers().iter().zip(imported.layers.layers()) {
            prop_assert_eq!(&a.kind, &b.kind);
            prop_assert_eq!(a.is_pinned, b.is_pinned);
            prop_assert_eq!(a.is_hidden, b.is_hidden);
            prop_assert!(!existing.contains(&b.uuid));
        }
    }
}
