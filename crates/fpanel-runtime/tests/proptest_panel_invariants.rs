//! Property-based invariant tests for the panel registry.
//!
//! These tests verify structural invariants of `PanelRegistry` under arbitrary
//! operation sequences:
//!
//! 1. At most one panel per (owner, kind)
//! 2. At most one active group
//! 3. After promote(x), x's panels are in the active band and nobody else's are
//! 4. Stack orders are dense, opening never moves existing panels, and closing
//!    preserves the relative order of the survivors
//! 5. remove_all(x) empties x and vacates the front if x held it
//! 6. Layout queries are pure and repeatable

use fpanel_core::{CanvasPoint, PanelKind};
use fpanel_layout::PanelGeometry;
use fpanel_runtime::{ACTIVE_BASE, OpenOutcome, PanelRegistry};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

const OWNERS: [&str; 4] = ["n1", "n2", "n3", "ghost"];

#[derive(Debug, Clone)]
enum Op {
    Open(usize, PanelKind),
    Close(usize, PanelKind),
    Toggle(usize, PanelKind),
    Promote(usize),
    RemoveAll(usize),
}

fn kind_strategy() -> impl Strategy<Value = PanelKind> {
    (0..PanelKind::COUNT).prop_map(|i| PanelKind::ALL[i])
}

fn owner_strategy() -> impl Strategy<Value = usize> {
    0..OWNERS.len()
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (owner_strategy(), kind_strategy()).prop_map(|(o, k)| Op::Open(o, k)),
        3 => (owner_strategy(), kind_strategy()).prop_map(|(o, k)| Op::Close(o, k)),
        1 => (owner_strategy(), kind_strategy()).prop_map(|(o, k)| Op::Toggle(o, k)),
        2 => owner_strategy().prop_map(Op::Promote),
        1 => owner_strategy().prop_map(Op::RemoveAll),
    ]
}

fn apply(reg: &mut PanelRegistry, op: &Op) {
    match *op {
        Op::Open(o, k) => {
            reg.open(OWNERS[o], k);
        }
        Op::Close(o, k) => {
            reg.close(OWNERS[o], k);
        }
        Op::Toggle(o, k) => {
            reg.toggle(OWNERS[o], k);
        }
        Op::Promote(o) => {
            reg.promote(OWNERS[o]);
        }
        Op::RemoveAll(o) => {
            reg.remove_all(OWNERS[o]);
        }
    }
}

fn kinds_in_order(reg: &PanelRegistry, owner: &str) -> Vec<PanelKind> {
    reg.panels_of(owner).iter().map(|p| p.kind()).collect()
}

// ═══════════════════════════════════════════════════════════════════════
// 1 + 2. Uniqueness and single active group, after every step
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn structural_invariants_hold_after_every_op(
        ops in prop::collection::vec(op_strategy(), 0..200),
    ) {
        let mut reg = PanelRegistry::new();
        for op in &ops {
            apply(&mut reg, op);

            let report = reg.invariant_report();
            prop_assert!(!report.has_errors(), "after {:?}: {}", op, report);

            let active = reg.groups().filter(|g| g.is_active()).count();
            prop_assert!(active <= 1, "{} active groups", active);

            for owner in OWNERS {
                let kinds = kinds_in_order(&reg, owner);
                for (i, k) in kinds.iter().enumerate() {
                    prop_assert!(
                        !kinds[i + 1..].contains(k),
                        "duplicate {} for {}", k, owner
                    );
                }
            }
        }
    }

    #[test]
    fn duplicate_open_changes_nothing(
        ops in prop::collection::vec(op_strategy(), 0..80),
        owner in owner_strategy(),
        kind in kind_strategy(),
    ) {
        let mut reg = PanelRegistry::new();
        for op in &ops {
            apply(&mut reg, op);
        }
        reg.open(OWNERS[owner], kind);
        let before = reg.snapshot();
        prop_assert_eq!(reg.open(OWNERS[owner], kind), OpenOutcome::AlreadyOpen);
        prop_assert_eq!(reg.snapshot(), before);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Promotion bands
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn promoted_owner_is_above_everyone_else(
        ops in prop::collection::vec(op_strategy(), 0..120),
        target in owner_strategy(),
    ) {
        let mut reg = PanelRegistry::new();
        for op in &ops {
            apply(&mut reg, op);
        }
        let target = OWNERS[target];
        reg.promote(target);

        prop_assert_eq!(reg.active_owner().map(|o| o.as_str()), Some(target));
        for panel in reg.entries() {
            if panel.owner() == target {
                prop_assert!(panel.z_index() >= ACTIVE_BASE, "{:?}", panel);
            } else {
                prop_assert!(panel.z_index() < ACTIVE_BASE, "{:?}", panel);
            }
        }
    }

    #[test]
    fn repromoting_active_owner_leaves_others_untouched(
        ops in prop::collection::vec(op_strategy(), 0..120),
        target in owner_strategy(),
    ) {
        let mut reg = PanelRegistry::new();
        for op in &ops {
            apply(&mut reg, op);
        }
        let target = OWNERS[target];
        reg.promote(target);
        let mut others_before: Vec<_> = reg.entries().filter(|p| p.owner() != target).cloned().collect();

        let promotion = reg.promote(target);
        prop_assert!(!promotion.changed);
        let mut others_after: Vec<_> = reg.entries().filter(|p| p.owner() != target).cloned().collect();
        others_before.sort_by(|a, b| (a.owner(), a.kind()).cmp(&(b.owner(), b.kind())));
        others_after.sort_by(|a, b| (a.owner(), a.kind()).cmp(&(b.owner(), b.kind())));
        prop_assert_eq!(others_after, others_before);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Stack order
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn stack_orders_are_a_dense_permutation(
        ops in prop::collection::vec(op_strategy(), 0..200),
    ) {
        let mut reg = PanelRegistry::new();
        for op in &ops {
            apply(&mut reg, op);
        }
        for owner in OWNERS {
            let mut orders: Vec<usize> = reg.panels_of(owner).iter().map(|p| p.stack_order()).collect();
            orders.sort_unstable();
            let expected: Vec<usize> = (0..orders.len()).collect();
            prop_assert_eq!(orders, expected, "owner {}", owner);
        }
    }

    #[test]
    fn opening_never_moves_existing_panels(
        ops in prop::collection::vec(op_strategy(), 0..120),
        owner in owner_strategy(),
        kind in kind_strategy(),
    ) {
        let mut reg = PanelRegistry::new();
        for op in &ops {
            apply(&mut reg, op);
        }
        let owner = OWNERS[owner];
        let before: Vec<(PanelKind, usize)> =
            reg.panels_of(owner).iter().map(|p| (p.kind(), p.stack_order())).collect();
        reg.open(owner, kind);
        for (k, order) in before {
            prop_assert_eq!(reg.panel(owner, k).map(|p| p.stack_order()), Some(order));
        }
    }

    #[test]
    fn closing_preserves_relative_order_of_survivors(
        ops in prop::collection::vec(op_strategy(), 0..120),
        owner in owner_strategy(),
        kind in kind_strategy(),
    ) {
        let mut reg = PanelRegistry::new();
        for op in &ops {
            apply(&mut reg, op);
        }
        let owner = OWNERS[owner];
        let mut expected = kinds_in_order(&reg, owner);
        expected.retain(|k| *k != kind);
        reg.close(owner, kind);
        prop_assert_eq!(kinds_in_order(&reg, owner), expected);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. remove_all
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn remove_all_empties_owner_and_vacates_front(
        ops in prop::collection::vec(op_strategy(), 0..150),
        owner in owner_strategy(),
    ) {
        let mut reg = PanelRegistry::new();
        for op in &ops {
            apply(&mut reg, op);
        }
        let owner = OWNERS[owner];
        let was_active = reg.active_owner().map(|o| o.as_str()) == Some(owner);
        let others_active = reg.active_owner().filter(|o| o.as_str() != owner).cloned();
        let expected = reg.panels_of(owner).len();

        prop_assert_eq!(reg.remove_all(owner), expected);
        prop_assert!(reg.panels_of(owner).is_empty());
        prop_assert!(reg.group(owner).is_none());
        if was_active {
            prop_assert_eq!(reg.active_owner(), None);
            prop_assert_eq!(reg.groups().filter(|g| g.is_active()).count(), 0);
        } else {
            prop_assert_eq!(reg.active_owner().cloned(), others_active);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 6. Layout purity
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn position_is_idempotent(
        ops in prop::collection::vec(op_strategy(), 0..120),
        owner in owner_strategy(),
        kind in kind_strategy(),
        x in -10_000.0f64..10_000.0,
        y in -10_000.0f64..10_000.0,
    ) {
        let mut reg = PanelRegistry::new();
        for op in &ops {
            apply(&mut reg, op);
        }
        let geometry = PanelGeometry::default();
        let node = CanvasPoint::new(x, y);
        let owner = OWNERS[owner];
        let before = reg.snapshot();

        let a = reg.position(&geometry, owner, kind, node);
        let b = reg.position(&geometry, owner, kind, node);
        prop_assert_eq!(a, b);
        prop_assert_eq!(a.y, y);
        prop_assert_eq!(reg.snapshot(), before);

        let expected = match reg.panel(owner, kind) {
            Some(p) => geometry.slot_origin(node, p.stack_order()),
            None => geometry.fallback_origin(node),
        };
        prop_assert_eq!(a, expected);
    }
}
