//! Structured log output of the solver and the group facade.
//!
//! Dev builds enable `panelkit-core/tracing`, so the engine's log macros
//! route to `tracing` and can be captured here with a scoped subscriber.

use std::sync::{Arc, Mutex, Once};

use panelkit_core::geometry::Point;
use panelkit_layout::{AllocationSolver, GroupConfig, PanelDescriptor, PanelGroup};
use tracing_subscriber::layer::SubscriberExt;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    fields: Vec<(String, String)>,
}

#[derive(Clone, Default)]
struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let message = visitor
            .0
            .iter()
            .find(|(k, _)| k == "message")
            .map(|(_, v)| v.clone())
            .unwrap_or_default();
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields: visitor.0,
        });
    }
}

fn ensure_global_trace_level() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let subscriber =
            tracing_subscriber::registry().with(tracing_subscriber::filter::LevelFilter::TRACE);
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

fn capture<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    ensure_global_trace_level();
    let layer = EventCapture::default();
    let events = Arc::clone(&layer.events);
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::TRACE)
        .with(layer);
    tracing::subscriber::with_default(subscriber, || {
        tracing::callsite::rebuild_interest_cache();
        f();
    });
    events.lock().unwrap().clone()
}

#[test]
fn unsatisfiable_minimums_warn_with_overflow() {
    let events = capture(|| {
        let panels = [
            PanelDescriptor::flexible("a").min_size(200.0),
            PanelDescriptor::flexible("b").min_size(200.0),
        ];
        let allocation = AllocationSolver::new(0.0).solve(&panels, &[], 300.0);
        assert_eq!(allocation.overflow, 100.0);
    });

    let warn = events
        .iter()
        .find(|e| e.level == tracing::Level::WARN)
        .expect("overflow warning");
    assert!(warn.message.contains("minimums exceed"), "{warn:?}");
    assert!(
        warn.fields.iter().any(|(k, v)| k == "overflow" && v == "100"),
        "{warn:?}"
    );
}

#[test]
fn satisfiable_solve_logs_debug_only() {
    let events = capture(|| {
        let panels = [PanelDescriptor::flexible("a"), PanelDescriptor::flexible("b")];
        let _ = AllocationSolver::new(0.0).solve(&panels, &[], 300.0);
    });
    assert!(events.iter().all(|e| e.level != tracing::Level::WARN));
    assert!(events.iter().any(|e| e.message == "solved panel allocation"));
}

#[test]
fn drag_lifecycle_is_logged() {
    let events = capture(|| {
        let mut group = PanelGroup::new(
            GroupConfig::default().divider_thickness(0.0),
            vec![PanelDescriptor::flexible("a"), PanelDescriptor::flexible("b")],
        )
        .expect("valid group");
        group.on_container_length_changed(200.0);
        group.pointer_start(0, Point::new(100.0, 0.0)).expect("start");
        group.pointer_move(Point::new(120.0, 0.0)).expect("move");
        group.on_frame();
        group.pointer_end(Point::new(130.0, 0.0)).expect("end");
    });

    let messages: Vec<&str> = events.iter().map(|e| e.message.as_str()).collect();
    assert!(messages.contains(&"panel group initialized"), "{messages:?}");
    assert!(messages.contains(&"drag session started"), "{messages:?}");
    assert!(messages.contains(&"drag move"), "{messages:?}");
    assert!(messages.contains(&"drag session committed"), "{messages:?}");
    let move_event = events
        .iter()
        .find(|e| e.message == "drag move")
        .expect("trace move");
    assert_eq!(move_event.level, tracing::Level::TRACE);
}
