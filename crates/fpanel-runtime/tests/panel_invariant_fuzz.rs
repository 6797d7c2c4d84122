//! Fuzz-style invariants for coordinator operation streams.
//!
//! Random UI event streams (open, close, toggle, activity, node deletion) are
//! driven through `PanelCoordinator` and checked against a plain reference
//! model after every step. Streams are replayed to prove determinism.

use std::collections::BTreeMap;

use fpanel_core::{ActivityTrigger, CanvasPoint, OwnerId, PanelKind};
use fpanel_runtime::{PanelCoordinator, PanelRegistry};
use proptest::prelude::*;
use web_time::Instant;

#[derive(Debug, Clone)]
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    fn choose_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        ((self.next_u64() >> 33) % len as u64) as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Open(String, PanelKind),
    Close(String, PanelKind),
    Toggle(String, PanelKind),
    Activity(String, ActivityTrigger),
    NodeRemoved(String),
}

/// What the registry should look like: each owner's kinds in row order, plus
/// the front owner.
#[derive(Debug, Default)]
struct Model {
    rows: BTreeMap<String, Vec<PanelKind>>,
    active: Option<String>,
}

impl Model {
    fn open(&mut self, owner: &str, kind: PanelKind) {
        let row = self.rows.entry(owner.to_owned()).or_default();
        if !row.contains(&kind) {
            row.push(kind);
            self.active = Some(owner.to_owned());
        }
    }

    fn close(&mut self, owner: &str, kind: PanelKind) {
        if let Some(row) = self.rows.get_mut(owner) {
            row.retain(|k| *k != kind);
            if row.is_empty() {
                self.rows.remove(owner);
                if self.active.as_deref() == Some(owner) {
                    self.active = None;
                }
            }
        }
    }

    fn apply(&mut self, event: &Event) {
        match event {
            Event::Open(o, k) => self.open(o, *k),
            Event::Close(o, k) => self.close(o, *k),
            Event::Toggle(o, k) => {
                if self.rows.get(o).is_some_and(|row| row.contains(k)) {
                    self.close(o, *k);
                } else {
                    self.open(o, *k);
                }
            }
            Event::Activity(o, _) => {
                if self.rows.contains_key(o) {
                    self.active = Some(o.clone());
                }
            }
            Event::NodeRemoved(o) => {
                self.rows.remove(o);
                if self.active.as_deref() == Some(o.as_str()) {
                    self.active = None;
                }
            }
        }
    }
}

const OWNERS: [&str; 5] = ["a", "b", "c", "d", ""];
const TRIGGERS: [ActivityTrigger; 4] = [
    ActivityTrigger::Click,
    ActivityTrigger::Hover,
    ActivityTrigger::Focus,
    ActivityTrigger::Custom(7),
];

fn random_event(rng: &mut Lcg) -> Event {
    let owner = OWNERS[rng.choose_index(OWNERS.len())].to_owned();
    let kind = PanelKind::ALL[rng.choose_index(PanelKind::COUNT)];
    match rng.choose_index(10) {
        0..=3 => Event::Open(owner, kind),
        4..=5 => Event::Close(owner, kind),
        6 => Event::Toggle(owner, kind),
        7..=8 => Event::Activity(owner, TRIGGERS[rng.choose_index(TRIGGERS.len())]),
        _ => Event::NodeRemoved(owner),
    }
}

fn dispatch(coordinator: &mut PanelCoordinator, event: &Event, now: Instant) {
    match event {
        Event::Open(o, k) => {
            coordinator.open(o.as_str(), *k);
        }
        Event::Close(o, k) => {
            coordinator.close(o, *k);
        }
        Event::Toggle(o, k) => {
            coordinator.toggle(o.as_str(), *k);
        }
        Event::Activity(o, t) => {
            coordinator.notify_activity(o.as_str(), *t, now);
        }
        Event::NodeRemoved(o) => {
            coordinator.node_removed(o);
        }
    }
}

fn assert_matches_model(registry: &PanelRegistry, model: &Model, context: &str) {
    let report = registry.invariant_report();
    assert!(!report.has_errors(), "{context}: {report}");

    assert_eq!(
        registry.active_owner().map(OwnerId::as_str),
        model.active.as_deref(),
        "{context}: active owner"
    );
    assert_eq!(registry.owner_count(), model.rows.len(), "{context}: owners");
    for (owner, row) in &model.rows {
        let kinds: Vec<PanelKind> = registry.panels_of(owner).iter().map(|p| p.kind()).collect();
        assert_eq!(&kinds, row, "{context}: row of {owner:?}");
    }
}

fn assert_render_list_is_paint_ordered(coordinator: &PanelCoordinator) {
    let list = coordinator.render_list(|id| {
        let i = OWNERS.iter().position(|o| *o == id.as_str())?;
        Some(CanvasPoint::new(0.0, i as f64 * 500.0))
    });
    assert_eq!(list.len(), coordinator.registry().panel_count());
    assert!(list.windows(2).all(|w| w[0].z_index <= w[1].z_index));
    if let Some(front) = coordinator.registry().active_owner() {
        let top = list.last().expect("active owner has panels");
        assert_eq!(&top.owner, front);
    }
}

fn run_sequence(seed: u64, steps: usize) -> (PanelCoordinator, Vec<Event>) {
    let mut coordinator = PanelCoordinator::new();
    let mut model = Model::default();
    let mut rng = Lcg::new(seed);
    let mut applied = Vec::with_capacity(steps);
    let now = Instant::now();

    for step in 0..steps {
        let event = random_event(&mut rng);
        dispatch(&mut coordinator, &event, now);
        model.apply(&event);

        let context = format!("seed={seed} step={step} event={event:?}");
        assert_matches_model(coordinator.registry(), &model, &context);
        assert_render_list_is_paint_ordered(&coordinator);
        applied.push(event);
    }

    (coordinator, applied)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn random_event_streams_match_reference_model(
        seed in any::<u64>(),
        steps in 20usize..160,
    ) {
        let _ = run_sequence(seed, steps);
    }

    #[test]
    fn random_event_streams_replay_deterministically(
        seed in any::<u64>(),
        steps in 20usize..100,
    ) {
        let (final_state, events) = run_sequence(seed, steps);
        let expected = final_state.registry().snapshot();

        let mut replay = PanelCoordinator::new();
        let now = Instant::now();
        for event in &events {
            dispatch(&mut replay, event, now);
        }

        let actual = replay.registry().snapshot();
        prop_assert_eq!(actual.state_hash(), expected.state_hash());
        prop_assert_eq!(actual, expected);
    }
}

#[test]
fn fuzz_seed_corpus_matches_reference_model() {
    let seeds = [
        0_u64,
        1,
        2,
        3,
        5,
        8,
        13,
        21,
        34,
        55,
        89,
        144,
        u32::MAX as u64,
        (u32::MAX as u64) + 1,
        u64::MAX - 1,
        u64::MAX,
    ];

    for seed in seeds {
        let (coordinator, _) = run_sequence(seed, 240);
        assert!(!coordinator.registry().invariant_report().has_errors());
    }
}
