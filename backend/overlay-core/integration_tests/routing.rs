use crate::helpers::Harness;

use overlay_core::wire::OverlayCallback;

use models::WindowParams;

use std::thread;
use std::time::Duration;

/// **VALUE**: Verifies only the latest of a burst of scrolls reaches the host.
///
/// **WHY THIS MATTERS**: Stale scroll values make the host's dimming animation jump
/// backwards while the user drags the overlay.
///
/// **BUG THIS CATCHES**: Would catch coalescing that is lost between the sink and
/// the owning-thread dispatch.
#[test]
fn given_three_scrolls_before_dispatch_when_drained_then_host_sees_only_latest() {
    // GIVEN: A ready client whose provider reports the overlay attached
    let mut h = Harness::ready(5);
    let callback = h.transport.callback();
    callback.overlay_status_changed(1);
    h.client.dispatch_pending();

    // WHEN: Three scrolls arrive before the owning thread drains
    callback.overlay_scroll_changed(0.1);
    callback.overlay_scroll_changed(0.4);
    callback.overlay_scroll_changed(0.9);
    h.client.dispatch_pending();

    // THEN: The host callback ran once, with 0.9
    assert_eq!(*h.callbacks.scrolls.borrow(), vec![0.9]);
}

#[test]
fn given_overlay_not_attached_when_scroll_arrives_then_not_forwarded() {
    let mut h = Harness::ready(5);
    let callback = h.transport.callback();

    callback.overlay_scroll_changed(0.5);
    h.client.dispatch_pending();

    assert!(h.callbacks.scrolls.borrow().is_empty());
}

#[test]
fn given_status_updates_when_drained_then_all_delivered_in_order() {
    let mut h = Harness::ready(5);
    let callback = h.transport.callback();

    callback.overlay_status_changed(1);
    callback.overlay_status_changed(3);
    callback.overlay_status_changed(1);
    h.client.dispatch_pending();

    assert_eq!(
        *h.callbacks.states.borrow(),
        vec![(true, false), (true, true), (true, false)]
    );
}

/// **VALUE**: Verifies a late status from an unbound registration changes nothing.
///
/// **WHY THIS MATTERS**: Provider callbacks can still be in flight when the client
/// unbinds. Applying them would report an overlay that is gone.
///
/// **BUG THIS CATCHES**: Would catch the owning thread applying queued callbacks
/// without checking the binding is still current.
#[test]
fn given_unbound_connection_when_late_status_arrives_then_ignored() {
    // GIVEN: A ready client that then unbinds
    let mut h = Harness::ready(5);
    let callback = h.transport.callback();
    h.connection.unbind();

    // WHEN: A status callback arrives late
    callback.overlay_status_changed(5);
    h.client.dispatch_pending();

    // THEN: No observer call, status untouched
    assert!(h.callbacks.states.borrow().is_empty());
    assert_eq!(h.client.service_status().raw(), 0);
}

#[test]
fn given_destroyed_client_when_late_status_arrives_then_ignored() {
    let mut h = Harness::ready(5);
    let callback = h.transport.callback();
    h.client.destroy();

    callback.overlay_status_changed(5);
    callback.overlay_scroll_changed(0.5);
    h.client.dispatch_pending();

    assert!(h.callbacks.states.borrow().is_empty());
    assert!(h.callbacks.scrolls.borrow().is_empty());
    assert!(h.client.inbox().is_empty());
}

#[test]
fn given_window_shift_requests_when_drained_then_host_window_moved_and_restored() {
    let mut h = Harness::ready(5);
    *h.host.params.borrow_mut() = Some(crate::helpers::window(1));
    let callback = h.transport.callback();

    callback.window_shift_requested(true);
    h.client.dispatch_pending();
    let hidden = h.host.params.borrow().clone().expect("window");

    callback.window_shift_requested(false);
    h.client.dispatch_pending();
    let shown = h.host.params.borrow().clone().expect("window");

    assert_eq!(hidden.x, -2340);
    assert!(hidden.has_flag(WindowParams::FLAG_LAYOUT_NO_LIMITS));
    assert_eq!(shown.x, 0);
    assert!(!shown.has_flag(WindowParams::FLAG_LAYOUT_NO_LIMITS));
}

#[test]
fn given_callbacks_from_transport_thread_when_drained_then_applied_on_owner() {
    let mut h = Harness::ready(5);
    let callback = h.transport.callback();

    thread::spawn(move || {
        callback.overlay_status_changed(1);
        callback.overlay_scroll_changed(0.25);
    })
    .join()
    .expect("transport thread");
    let taken = h.client.dispatch_pending();

    assert_eq!(taken, 2);
    assert_eq!(*h.callbacks.states.borrow(), vec![(true, false)]);
    assert_eq!(*h.callbacks.scrolls.borrow(), vec![0.25]);
}

#[test]
fn given_scrolls_when_drained_then_service_log_categorizes_them() {
    let mut h = Harness::ready(5);
    let callback = h.transport.callback();
    callback.overlay_status_changed(1);
    h.client.dispatch_pending();

    for progress in [0.0, 0.5, 1.0] {
        callback.overlay_scroll_changed(progress);
        h.client.dispatch_pending();
    }

    let dump = h.client.service_log().dump("");
    assert!(dump.contains("onScroll 0, overlay closed"));
    assert!(dump.contains("onScroll: 0.5"));
    assert!(dump.contains("onScroll 1, overlay opened"));
}

/// **VALUE**: Verifies an async host loop can park on the inbox until work arrives.
#[tokio::test]
async fn given_idle_client_when_callback_arrives_later_then_wait_wakes_owner() {
    // GIVEN: A ready client with an empty inbox
    let mut h = Harness::ready(5);
    let callback = h.transport.callback();
    let inbox = h.client.inbox();

    // WHEN: A transport thread delivers a status after a delay
    let transport_thread = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        callback.overlay_status_changed(1);
    });
    inbox.wait().await;
    h.client.dispatch_pending();

    // THEN: The owner applied it
    transport_thread.join().expect("transport thread");
    assert_eq!(*h.callbacks.states.borrow(), vec![(true, false)]);
}
