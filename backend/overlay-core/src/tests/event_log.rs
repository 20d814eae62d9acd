use crate::event_log::{EventKind, EventLog};

/// **VALUE**: Verifies the run-length collapse of identical consecutive events.
///
/// **WHY THIS MATTERS**: Scroll updates arrive dozens of times per second. Without
/// collapsing, a single gesture would evict the whole diagnostic history.
///
/// **BUG THIS CATCHES**: Would catch a regression where repeats allocate new slots
/// or where the repeat count is not incremented.
#[test]
fn given_same_event_three_times_when_recorded_then_one_entry_with_two_repeats() {
    // GIVEN: A log of capacity 5
    let mut log = EventLog::new("Client", 5);

    // WHEN: Recording the same kind+label three times
    log.record(EventKind::Float, "A", 0.1);
    log.record(EventKind::Float, "A", 0.2);
    log.record(EventKind::Float, "A", 0.3);

    // THEN: Only one entry, annotated with two repeats and the latest value
    let entries = log.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].repeat_count, 2);
    assert_eq!(entries[0].value, 0.3);
}

/// **VALUE**: Verifies interleaved distinct events keep their own slots.
///
/// **BUG THIS CATCHES**: Would catch de-duplication that looks further back than the
/// most recent slot and swallows an A-B-A sequence.
#[test]
fn given_interleaved_labels_when_recorded_then_three_distinct_entries() {
    // GIVEN: A log of capacity 5
    let mut log = EventLog::new("Client", 5);

    // WHEN: Recording A, B, A
    log.float("A", 0.1);
    log.float("B", 0.1);
    log.float("A", 0.1);

    // THEN: Three entries, none repeated
    let entries = log.entries();
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|e| e.repeat_count == 0));
    let labels: Vec<_> = entries.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["A", "B", "A"]);
}

#[test]
fn given_same_label_different_kind_when_recorded_then_not_collapsed() {
    let mut log = EventLog::new("Service", 5);

    log.flag("Connected", true);
    log.flag("Connected", false);

    assert_eq!(log.len(), 2);
}

/// **VALUE**: Verifies the ring wraps and keeps only the newest `capacity` entries.
///
/// **BUG THIS CATCHES**: Would catch an off-by-one in the write cursor that either
/// panics on wrap or returns entries out of order.
#[test]
fn given_full_log_when_more_events_recorded_then_oldest_evicted_in_order() {
    // GIVEN: A log of capacity 3
    let mut log = EventLog::new("Client", 3);

    // WHEN: Recording five distinct events
    for i in 0..5 {
        log.int(&format!("e{i}"), i);
    }

    // THEN: The last three remain, oldest first
    let labels: Vec<_> = log.entries().iter().map(|e| e.label.clone()).collect();
    assert_eq!(labels, vec!["e2", "e3", "e4"]);
    assert_eq!(log.len(), log.capacity());
}

#[test]
fn given_zero_capacity_when_created_then_holds_one_entry() {
    let mut log = EventLog::new("Client", 0);

    log.event("a");
    log.event("b");

    assert_eq!(log.capacity(), 1);
    assert_eq!(log.entries()[0].label, "b");
}

/// **VALUE**: Verifies the rendered dump format used in diagnostic snapshots.
///
/// **WHY THIS MATTERS**: Dumps are read by humans triaging bug reports; payload
/// formatting per kind and the repeat annotation must be stable.
#[test]
fn given_mixed_events_when_dumped_then_renders_header_payloads_and_repeats() {
    // GIVEN: A log with each kind of event and one repeat
    let mut log = EventLog::new("Service", 10);
    log.event("attachedToWindow");
    log.int("stateChanged", 3);
    log.flag("Connected", true);
    log.float("onScroll", 0.5);
    log.float("onScroll", 0.25);

    // WHEN: Dumping with a prefix
    let dump = log.dump("> ");
    let lines: Vec<_> = dump.lines().collect();

    // THEN: Header first, then entries oldest first with formatted payloads
    assert_eq!(lines[0], "> Service event history:");
    assert_eq!(lines.len(), 5);
    assert!(lines[1].ends_with("  attachedToWindow"));
    assert!(lines[2].ends_with("  stateChanged: 3"));
    assert!(lines[3].ends_with("  Connected: true"));
    assert!(lines[4].ends_with("  onScroll: 0.25 & 1 similar events"));
    assert!(lines[1].starts_with(">   "));
}
