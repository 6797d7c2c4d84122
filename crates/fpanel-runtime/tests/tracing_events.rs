//! Structured tracing emitted by the registry and coordinator.

#![cfg(feature = "tracing")]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use fpanel_core::{ActivityTrigger, PanelKind};
use fpanel_runtime::{ActivityGate, PanelCoordinator};
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use web_time::Instant;

#[derive(Default)]
struct PanelTraceState {
    spans: Vec<String>,
    messages: Vec<String>,
}

struct PanelTraceCapture {
    state: Arc<Mutex<PanelTraceState>>,
}

impl<S> Layer<S> for PanelTraceCapture
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::Id,
        _ctx: Context<'_, S>,
    ) {
        self.state
            .lock()
            .expect("panel trace lock")
            .spans
            .push(attrs.metadata().name().to_string());
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        struct Msg {
            message: Option<String>,
        }
        impl tracing::field::Visit for Msg {
            fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                if field.name() == "message" {
                    self.message = Some(value.to_string());
                }
            }

            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.message = Some(format!("{value:?}").trim_matches('"').to_string());
                }
            }
        }
        let mut msg = Msg { message: None };
        event.record(&mut msg);
        if let Some(message) = msg.message {
            self.state
                .lock()
                .expect("panel trace lock")
                .messages
                .push(message);
        }
    }
}

fn capture<F: FnOnce()>(f: F) -> PanelTraceState {
    let state = Arc::new(Mutex::new(PanelTraceState::default()));
    let subscriber = tracing_subscriber::registry().with(PanelTraceCapture {
        state: Arc::clone(&state),
    });
    tracing::subscriber::with_default(subscriber, f);
    let mut guard = state.lock().expect("panel trace lock");
    std::mem::take(&mut *guard)
}

#[test]
fn lifecycle_events_are_emitted() {
    let trace = capture(|| {
        let mut c = PanelCoordinator::new();
        c.open("n1", PanelKind::Summary);
        c.open("n2", PanelKind::Chat);
        c.close("n2", PanelKind::Chat);
        c.node_removed("n1");
    });

    for expected in ["panel.open", "group.promote", "panel.close", "panel.remove_all"] {
        assert!(
            trace.messages.iter().any(|m| m == expected),
            "expected {expected} in {:?}",
            trace.messages
        );
    }
    assert!(trace.spans.iter().any(|s| s == "group.promote"));
}

#[test]
fn repromotion_does_not_log_a_promote_event() {
    let mut c = PanelCoordinator::new();
    c.open("n1", PanelKind::Summary);
    let trace = capture(|| {
        c.promote("n1");
    });
    assert!(!trace.messages.iter().any(|m| m == "group.promote"));
}

#[test]
fn gated_activity_is_logged() {
    let mut c = PanelCoordinator::new().gate(ActivityGate::new(Duration::from_secs(1)));
    c.open("n1", PanelKind::Summary);
    let now = Instant::now();
    c.notify_activity("n1", ActivityTrigger::Hover, now);
    let trace = capture(|| {
        c.notify_activity("n1", ActivityTrigger::Hover, now);
    });
    assert_eq!(trace.messages, vec!["activity.gated".to_string()]);
}
