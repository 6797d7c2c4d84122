#![no_main]

use arbitrary::Arbitrary;
use fpanel_core::{ActivityTrigger, PanelKind};
use fpanel_runtime::{ACTIVE_BASE, PanelCoordinator};
use libfuzzer_sys::fuzz_target;
use std::time::Duration;

#[derive(Debug, Arbitrary)]
enum Op {
    Open(u8, u8),
    Close(u8, u8),
    Toggle(u8, u8),
    Promote(u8),
    Activity(u8, u8, u16),
    Wait(u8),
    NodeRemoved(u8),
}

#[derive(Debug, Arbitrary)]
struct Input {
    repeat_window_ms: u8,
    ops: Vec<Op>,
}

fn owner(o: u8) -> String {
    // Small owner space so operations collide.
    format!("n{}", o % 8)
}

fn kind(k: u8) -> PanelKind {
    PanelKind::ALL[usize::from(k) % PanelKind::COUNT]
}

fn trigger(t: u8, code: u16) -> ActivityTrigger {
    match t % 5 {
        0 => ActivityTrigger::Open,
        1 => ActivityTrigger::Click,
        2 => ActivityTrigger::Hover,
        3 => ActivityTrigger::Focus,
        _ => ActivityTrigger::Custom(code),
    }
}

fuzz_target!(|input: Input| {
    let gate = fpanel_runtime::ActivityGate::new(Duration::from_millis(u64::from(
        input.repeat_window_ms,
    )));
    let mut coordinator = PanelCoordinator::new().gate(gate);
    let mut now = web_time::Instant::now();

    for op in input.ops.iter().take(512) {
        match *op {
            Op::Open(o, k) => {
                coordinator.open(owner(o), kind(k));
            }
            Op::Close(o, k) => {
                coordinator.close(&owner(o), kind(k));
            }
            Op::Toggle(o, k) => {
                coordinator.toggle(owner(o), kind(k));
            }
            Op::Promote(o) => {
                let target = owner(o);
                coordinator.promote(target.as_str());
                for panel in coordinator.registry().entries() {
                    assert_eq!(panel.owner() == target.as_str(), panel.z_index() > ACTIVE_BASE);
                }
            }
            Op::Activity(o, t, code) => {
                coordinator.notify_activity(owner(o), trigger(t, code), now);
            }
            Op::Wait(ms) => now += Duration::from_millis(u64::from(ms)),
            Op::NodeRemoved(o) => {
                let o = owner(o);
                coordinator.node_removed(&o);
                assert!(coordinator.registry().panels_of(&o).is_empty());
            }
        }

        let report = coordinator.registry().invariant_report();
        assert!(!report.has_errors(), "{report}");
    }
});
