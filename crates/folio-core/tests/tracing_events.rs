#![forbid(unsafe_code)]

//! Structured log events emitted by the resolver.
//!
//! Activations are logged at DEBUG with the section and phase; ignored
//! events are logged at TRACE with the reason.
//!
//! Run:
//!   cargo test -p folio-core --test tracing_events

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use folio_core::{ActiveSectionResolver, ResolverConfig, SectionId, SectionRegistry, VisibilitySample};
use tracing_subscriber::layer::SubscriberExt;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    fields: HashMap<String, String>,
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let mut fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.remove("message").unwrap_or_default();
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields,
        });
    }
}

fn with_captured_events(run: impl FnOnce()) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(EventCapture {
        events: events.clone(),
    });
    tracing::subscriber::with_default(subscriber, run);
    let captured = events.lock().unwrap().clone();
    captured
}

fn resolver() -> ActiveSectionResolver {
    let registry = SectionRegistry::new(["about", "experience"]).unwrap();
    let config = ResolverConfig {
        bootstrap_checkpoints: Vec::new(),
        ..ResolverConfig::default()
    };
    ActiveSectionResolver::new(registry, config).unwrap()
}

#[test]
fn activation_logs_section_and_phase_at_debug() {
    let events = with_captured_events(|| {
        let mut r = resolver();
        r.init(Duration::ZERO);
        r.on_navigate(&SectionId::new("experience"), Duration::from_millis(5));
    });

    let updates: Vec<_> = events
        .iter()
        .filter(|e| e.message == "active section updated")
        .collect();
    assert_eq!(updates.len(), 2, "events: {events:?}");
    assert!(updates.iter().all(|e| e.level == tracing::Level::DEBUG));
    assert_eq!(updates[0].fields.get("section").map(String::as_str), Some("about"));
    assert_eq!(updates[0].fields.get("phase").map(String::as_str), Some("Init"));
    assert_eq!(
        updates[1].fields.get("section").map(String::as_str),
        Some("experience")
    );
    assert_eq!(updates[1].fields.get("phase").map(String::as_str), Some("Navigate"));
}

#[test]
fn ignored_events_log_reason_at_trace() {
    let events = with_captured_events(|| {
        let mut r = resolver();
        r.init(Duration::ZERO);
        r.on_navigate(&SectionId::new("experience"), Duration::from_millis(5));
        r.on_visibility_batch(
            &[VisibilitySample::new("about", 0.9, true)],
            Duration::from_millis(100),
        );
    });

    let ignored = events
        .iter()
        .find(|e| e.message == "resolver event ignored")
        .expect("override suppression is logged");
    assert_eq!(ignored.level, tracing::Level::TRACE);
    assert_eq!(
        ignored.fields.get("outcome").map(String::as_str),
        Some("Ignored(OverrideLive)")
    );
}
