//! Property-based invariant tests for the history engine and layer controller.
//!
//! 1. Undoing every recorded mutation restores the starting collection.
//! 2. Undo K then redo K restores the collection from before the undos.
//! 3. The history cursor stays in range for any call sequence.
//! 4. No two layers ever share a uuid.
//! 5. A push after an undo leaves no redoable future.

use std::collections::HashSet;

use mapslides_core::{LayerController, LayerKind, PathOptions};
use mapslides_geometry::{LatLng, LatLngBounds};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn measure(a: LatLng, b: LatLng) -> f64 {
    ((a.lat - b.lat).powi(2) + (a.lng - b.lng).powi(2)).sqrt()
}

#[derive(Debug, Clone)]
enum Op {
    Create(u8),
    Delete(usize),
    Pin(usize),
    Hide(usize),
    Reorder(usize, usize),
    Undo,
    Redo,
}

fn kind(n: u8) -> LayerKind {
    let x = f64::from(n);
    match n % 3 {
        0 => LayerKind::Rectangle {
            bounds: LatLngBounds::new(LatLng::new(x, x), LatLng::new(x + 1.0, x + 1.0)),
            path_options: PathOptions::filled("#000000", "#000000", 0.5),
        },
        1 => LayerKind::Circle {
            center: LatLng::new(x, x),
            radius: x + 1.0,
            path_options: PathOptions::filled("#ff0000", "#ff0000", 0.5),
        },
        _ => LayerKind::Arrow {
            start: LatLng::new(0.0, 0.0),
            end: LatLng::new(x, x),
            path_options: PathOptions::stroke("#0000ff", 3.0),
        },
    }
}

fn mutation_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u8>().prop_map(Op::Create),
        (0usize..8).prop_map(Op::Delete),
        (0usize..8).prop_map(Op::Pin),
        (0usize..8).prop_map(Op::Hide),
        (0usize..8, 0usize..8).prop_map(|(a, b)| Op::Reorder(a, b)),
    ]
}

fn any_op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => mutation_strategy(),
        1 => Just(Op::Undo),
        1 => Just(Op::Redo),
    ]
}

fn apply(c: &mut LayerController, op: &Op) {
    match *op {
        Op::Create(n) => {
            c.create_layer(kind(n), &measure);
        }
        Op::Delete(i) => {
            c.delete_layer(i);
        }
        Op::Pin(i) => {
            c.toggle_pin(i);
        }
        Op::Hide(i) => {
            c.toggle_hide(i);
        }
        Op::Reorder(a, b) => {
            c.reorder(a, b);
        }
        Op::Undo => {
            c.undo();
        }
        Op::Redo => {
            c.redo();
        }
    }
}

fn seeded(n: u8) -> LayerController {
    let mut c = LayerController::new();
    for i in 0..n {
        c.create_layer(kind(i), &measure);
    }
    c
}

fn cursor_in_range(c: &LayerController) -> bool {
    c.history().current_index().is_none_or(|i| i < c.history().len())
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Undo symmetry
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn undo_all_restores_start(seed in 0u8..5, ops in prop::collection::vec(mutation_strategy(), 0..40)) {
        let mut c = seeded(seed);
        let start = c.layers().to_vec();
        let pushes_before = c.history().len();

        for op in &ops {
            apply(&mut c, op);
        }
        let pushes = c.history().len() - pushes_before;

        for _ in 0..pushes {
            let replay = c.undo();
            prop_assert!(replay.is_some_and(|r| r.outcome.is_applied()));
        }
        prop_assert_eq!(c.layers(), &start[..]);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Redo replays forward identically
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn undo_then_redo_is_identity(
        ops in prop::collection::vec(mutation_strategy(), 1..40),
        back in 0usize..40,
    ) {
        let mut c = seeded(3);
        for op in &ops {
            apply(&mut c, op);
        }
        let before = c.layers().to_vec();
        let steps = back.min(c.history().len());

        for _ in 0..steps {
            c.undo();
        }
        for _ in 0..steps {
            let replay = c.redo();
            prop_assert!(replay.is_some_and(|r| r.outcome.is_applied()));
        }
        prop_assert_eq!(c.layers(), &before[..]);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Cursor invariant and 4. uuid uniqueness under arbitrary sequences
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn invariants_hold_after_every_call(ops in prop::collection::vec(any_op_strategy(), 0..80)) {
        let mut c = LayerController::new();
        for op in &ops {
            apply(&mut c, op);
            prop_assert!(cursor_in_range(&c), "cursor out of range after {:?}", op);

            let ids: HashSet<_> = c.layers().iter().map(|l| l.uuid).collect();
            prop_assert_eq!(ids.len(), c.len(), "duplicate uuid after {:?}", op);

            let orders: Vec<usize> = c.layers().iter().map(|l| l.order).collect();
            prop_assert_eq!(orders, (0..c.len()).collect::<Vec<_>>());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Branch discarding
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn push_after_undo_discards_future(
        ops in prop::collection::vec(mutation_strategy(), 1..20),
        back in 1usize..20,
        n in any::<u8>(),
    ) {
        let mut c = seeded(2);
        for op in &ops {
            apply(&mut c, op);
        }
        for _ in 0..back.min(c.history().len()) {
            c.undo();
        }
        c.create_layer(kind(n), &measure);

        prop_assert_eq!(c.history().current_index(), Some(c.history().len() - 1));
        prop_assert!(c.redo().is_none());
    }
}
