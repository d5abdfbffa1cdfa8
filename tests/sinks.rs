//! Sink dispatch through the process-wide registry.
//!
//! Every test in this binary shares the registry, so each one uses message
//! texts of its own and only looks at the dispatches containing them.

use std::{
    cell::{Cell, RefCell},
    panic,
    sync::{Barrier, Mutex, Once},
    thread,
};

use errata::{
    Errata, ErrataRef, Rv, Severity,
    sinks::{SinkRegistry, install_sinks, register_sink, registered_sink_count},
};

/// One dispatch as seen by the recording sink.
#[derive(Debug, Clone)]
struct Seen {
    texts: Vec<String>,
    severity: Severity,
    during_trigger: bool,
}

static SEEN: Mutex<Vec<Seen>> = Mutex::new(Vec::new());
static SETUP: Once = Once::new();

thread_local! {
    static IN_TRIGGER: Cell<bool> = const { Cell::new(false) };
    static HELD: RefCell<Option<Errata>> = const { RefCell::new(None) };
}

fn record(errata: ErrataRef<'_>) {
    let seen = Seen {
        texts: errata.iter().map(|note| note.text().to_owned()).collect(),
        severity: errata.severity(),
        during_trigger: IN_TRIGGER.with(Cell::get),
    };
    SEEN.lock().unwrap().push(seen);
}

/// Drops a fresh errata from inside a sink when it sees a trigger text.
fn trigger(errata: ErrataRef<'_>) {
    if errata.iter().any(|note| note.text() == "nested trigger") {
        IN_TRIGGER.with(|flag| flag.set(true));
        drop(Errata::new().with_note(Severity::Info, "nested inner"));
        IN_TRIGGER.with(|flag| flag.set(false));
    }
    if errata.iter().any(|note| note.text() == "teardown trigger") {
        drop(Errata::new().with_note(Severity::Info, "teardown inner"));
    }
}

/// Drops a fresh errata and then panics when it sees the failing text.
fn failing_trigger(errata: ErrataRef<'_>) {
    if errata.iter().any(|note| note.text() == "failing trigger") {
        drop(Errata::new().with_note(Severity::Warn, "dropped before failing"));
        panic!("sink failed");
    }
}

fn setup() {
    SETUP.call_once(|| {
        let registry = SinkRegistry::new()
            .register(record)
            .register(trigger)
            .register(failing_trigger);
        install_sinks(registry).expect("no sinks registered before setup");
    });
}

/// The dispatches whose notes include `text`.
fn dispatches_with(text: &str) -> Vec<Seen> {
    SEEN.lock()
        .unwrap()
        .iter()
        .filter(|seen| seen.texts.iter().any(|t| t == text))
        .cloned()
        .collect()
}

#[test]
fn test_abandoned_errata_dispatched_once() {
    setup();
    let mut errata = Errata::new();
    errata.error("abandoned once");
    let clone = errata.clone();
    drop(clone);
    assert!(dispatches_with("abandoned once").is_empty());

    drop(errata);
    let seen = dispatches_with("abandoned once");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].texts, ["abandoned once"]);
    assert_eq!(seen[0].severity, Severity::Error);
}

#[test]
fn test_dismissed_and_cleared_are_not_dispatched() {
    setup();
    Errata::new().with_note(Severity::Error, "dismissed").dismiss();

    let mut cleared = Errata::new().with_note(Severity::Error, "cleared");
    cleared.clear();
    drop(cleared);

    assert!(dispatches_with("dismissed").is_empty());
    assert!(dispatches_with("cleared").is_empty());
}

#[test]
fn test_dismissing_a_shared_handle_keeps_the_other() {
    setup();
    let errata = Errata::new().with_note(Severity::Warn, "still shared");
    let other = errata.clone();
    errata.dismiss();
    assert!(dispatches_with("still shared").is_empty());

    drop(other);
    assert_eq!(dispatches_with("still shared").len(), 1);
}

#[test]
fn test_note_take_transfers_dispatch() {
    setup();
    let source = Errata::new().with_note(Severity::Warn, "taken note");
    let mut target = Errata::new().with_note(Severity::Info, "taking errata");
    target.note_take(source);
    assert!(dispatches_with("taken note").is_empty());

    drop(target);
    let seen = dispatches_with("taken note");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].texts, ["taken note", "taking errata"]);
}

#[test]
fn test_dropped_rv_dispatches() {
    setup();
    let rv: Rv<u64> = Errata::new().with_note(Severity::Error, "rv dropped").into();
    assert_eq!(rv.into_value_discarding_errata(), 0);
    assert_eq!(dispatches_with("rv dropped").len(), 1);
}

#[test]
fn test_dispatch_on_dropping_thread() {
    setup();
    let errata = Errata::new().with_note(Severity::Diag, "sent to another thread");
    thread::spawn(move || drop(errata)).join().unwrap();
    assert_eq!(dispatches_with("sent to another thread").len(), 1);
}

#[test]
fn test_registration() {
    setup();
    let before = registered_sink_count();
    assert!(before >= 2);

    let rejected = install_sinks(SinkRegistry::new().register(|_: ErrataRef<'_>| {}));
    let error = rejected.unwrap_err();
    assert_eq!(error.0.len(), 1);
    assert_eq!(error.to_string(), "errata sinks are already installed globally");

    register_sink(|_: ErrataRef<'_>| {});
    assert!(registered_sink_count() > before);
}

#[test]
fn test_nested_abandonment() {
    setup();
    drop(Errata::new().with_note(Severity::Error, "nested trigger"));

    assert_eq!(dispatches_with("nested trigger").len(), 1);
    let inner = dispatches_with("nested inner");
    assert_eq!(inner.len(), 1);

    // With `std` the inner errata waits until the trigger sink has returned.
    #[cfg(feature = "std")]
    assert!(!inner[0].during_trigger);
    #[cfg(not(feature = "std"))]
    assert!(inner[0].during_trigger);
}

#[test]
fn test_panicking_sink_does_not_strand_nested_errata() {
    setup();
    let result = panic::catch_unwind(|| {
        drop(Errata::new().with_note(Severity::Error, "failing trigger"));
    });
    assert!(result.is_err());

    assert_eq!(dispatches_with("failing trigger").len(), 1);
    let nested = dispatches_with("dropped before failing");
    assert_eq!(nested.len(), 1);
    assert_eq!(nested[0].severity, Severity::Warn);

    // The thread can still dispatch afterwards.
    drop(Errata::new().with_note(Severity::Info, "after the failure"));
    assert_eq!(dispatches_with("after the failure").len(), 1);
}

#[test]
fn test_clones_dropped_concurrently_dispatch_once() {
    const THREADS: usize = 8;

    setup();
    let mut errata = Errata::new();
    errata.info("raced context").warn("raced clones");
    let clones: Vec<Errata> = (0..THREADS).map(|_| errata.clone()).collect();
    assert_eq!(errata.strong_count(), THREADS + 1);
    drop(errata);
    assert!(dispatches_with("raced clones").is_empty());

    let barrier = Barrier::new(THREADS);
    thread::scope(|scope| {
        for clone in clones {
            let barrier = &barrier;
            scope.spawn(move || {
                barrier.wait();
                drop(clone);
            });
        }
    });

    let seen = dispatches_with("raced clones");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].texts, ["raced clones", "raced context"]);
    assert_eq!(seen[0].severity, Severity::Warn);
}

#[test]
fn test_abandoned_during_thread_teardown() {
    setup();
    thread::spawn(|| {
        HELD.with(|held| {
            *held.borrow_mut() = Some(Errata::new().with_note(Severity::Warn, "teardown trigger"));
        });
        // Sets up the dispatch thread-locals after `HELD`, so they are torn
        // down before it.
        drop(Errata::new().with_note(Severity::Diag, "teardown warmup"));
    })
    .join()
    .unwrap();

    assert_eq!(dispatches_with("teardown warmup").len(), 1);
    assert_eq!(dispatches_with("teardown trigger").len(), 1);
    assert_eq!(dispatches_with("teardown inner").len(), 1);
}
