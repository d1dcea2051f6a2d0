use std::cell::RefCell;
use std::rc::Rc;

use goap_tools::{TraceEvent, TraceSink, Tracer};

#[derive(Clone, Default)]
struct RcSink(Rc<RefCell<Vec<TraceEvent>>>);

impl TraceSink for RcSink {
    fn emit(&mut self, event: TraceEvent) {
        self.0.borrow_mut().push(event);
    }
}

#[test]
fn emit_writes_to_trace_log_when_present() {
    let mut tracer = Tracer::new().with_log();

    tracer.emit(
        TraceEvent::new(1, "test")
            .with_goal("Wander")
            .with_action("Walk"),
    );

    let log = tracer.log().unwrap();
    assert_eq!(log.events.len(), 1);
    assert_eq!(log.events[0].tick, 1);
    assert_eq!(log.events[0].tag, "test");
    assert_eq!(log.events[0].goal.as_deref(), Some("Wander"));
    assert_eq!(log.events[0].action.as_deref(), Some("Walk"));
    assert_eq!(log.events[0].fact, None);
    assert!(log.contains_tag("test"));
    assert_eq!(log.with_tag("other").count(), 0);
}

#[test]
fn emit_writes_to_sink_when_present() {
    let handle = RcSink::default();
    let shared = handle.0.clone();
    let mut tracer = Tracer::new().with_sink(Box::new(handle));

    tracer.emit(TraceEvent::new(2, "sink_event"));

    let events = shared.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].tick, 2);
    assert_eq!(events[0].tag, "sink_event");
    assert!(tracer.log().is_none());
}

#[test]
fn disabled_tracer_drops_events() {
    let mut tracer = Tracer::new();
    assert!(!tracer.is_enabled());
    tracer.emit(TraceEvent::new(3, "dropped"));
    assert!(tracer.log().is_none());
}
