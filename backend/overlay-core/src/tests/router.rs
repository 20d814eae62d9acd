use crate::event_log::EventLog;
use crate::host::OverlayHost;
use crate::router::{CallbackRouter, InboundMessage, MessageKind, MessageQueue, RoutedClient};
use crate::tests::fakes::WindowHost;
use crate::wire::OverlayCallback;

use models::{DisplaySize, ServiceStatus, WindowParams};

use std::rc::Rc;
use std::sync::Arc;
use std::thread;

struct RecordingClient {
    status: ServiceStatus,
    scrolls: Vec<f32>,
    statuses: Vec<i32>,
    log: EventLog,
}

impl RecordingClient {
    fn with_status(status: i32) -> Self {
        Self {
            status: ServiceStatus::from_raw(status),
            scrolls: Vec::new(),
            statuses: Vec::new(),
            log: EventLog::new("Service", 10),
        }
    }
}

impl RoutedClient for RecordingClient {
    fn service_status(&self) -> ServiceStatus {
        self.status
    }

    fn deliver_scroll(&self, _progress: f32) {}

    fn notify_status_changed(&mut self, status: i32) {
        self.statuses.push(status);
        self.status = ServiceStatus::from_raw(status);
    }

    fn service_log(&mut self) -> &mut EventLog {
        &mut self.log
    }
}

fn window() -> WindowParams {
    WindowParams {
        token: 1,
        x: 0,
        y: 0,
        width: 1080,
        height: 2340,
        flags: 0,
    }
}

fn router_with(params: Option<WindowParams>) -> (CallbackRouter, Rc<WindowHost>, Arc<MessageQueue>) {
    let host = Rc::new(WindowHost::new(params, DisplaySize::new(1080, 2340)));
    let queue = Arc::new(MessageQueue::new());
    let router = CallbackRouter::new(Arc::clone(&queue), host.clone());
    (router, host, queue)
}

fn drain(queue: &MessageQueue) -> Vec<InboundMessage> {
    std::iter::from_fn(|| queue.pop()).collect()
}

/// **VALUE**: Verifies scroll coalescing keeps only the latest pending value.
///
/// **WHY THIS MATTERS**: A gesture floods the queue with scroll updates. Processing
/// stale ones makes the host animate backwards.
///
/// **BUG THIS CATCHES**: Would catch coalescing that drops the newest value or that
/// also removes status messages.
#[test]
fn given_three_scrolls_when_posted_coalesced_then_only_latest_remains() {
    // GIVEN: An empty queue
    let queue = MessageQueue::new();

    // WHEN: Posting three scrolls back to back
    queue.post_coalesced(InboundMessage::ScrollChanged(0.1));
    queue.post_coalesced(InboundMessage::ScrollChanged(0.4));
    queue.post_coalesced(InboundMessage::ScrollChanged(0.9));

    // THEN: One message carrying 0.9
    assert_eq!(drain(&queue), vec![InboundMessage::ScrollChanged(0.9)]);
}

#[test]
fn given_status_between_scrolls_when_coalesced_then_status_kept_and_scroll_moves_last() {
    let queue = MessageQueue::new();

    queue.post_coalesced(InboundMessage::ScrollChanged(0.1));
    queue.post(InboundMessage::StatusChanged(1));
    queue.post(InboundMessage::StatusChanged(3));
    queue.post_coalesced(InboundMessage::ScrollChanged(0.5));

    assert_eq!(
        drain(&queue),
        vec![
            InboundMessage::StatusChanged(1),
            InboundMessage::StatusChanged(3),
            InboundMessage::ScrollChanged(0.5),
        ]
    );
}

#[test]
fn given_connection_messages_when_kind_checked_then_share_one_kind() {
    assert_eq!(InboundMessage::ServiceConnected.kind(), MessageKind::Connection);
    assert_eq!(InboundMessage::BindFailed.kind(), MessageKind::Connection);
    assert_eq!(InboundMessage::WindowShift(true).kind(), MessageKind::WindowShift);
}

/// **VALUE**: Verifies the sink can be fed from another thread.
///
/// **WHY THIS MATTERS**: Provider callbacks arrive on the transport's thread; the
/// sink is the only object allowed to be touched there.
#[test]
fn given_sink_when_called_from_other_thread_then_messages_queued_in_order() {
    // GIVEN: A router and its sink
    let (router, _host, queue) = router_with(None);
    let callback = router.callback();

    // WHEN: Another thread delivers status and scroll callbacks
    thread::spawn(move || {
        callback.overlay_status_changed(1);
        callback.overlay_scroll_changed(0.2);
        callback.overlay_scroll_changed(0.7);
        callback.overlay_status_changed(3);
    })
    .join()
    .expect("callback thread");

    // THEN: Status order is preserved and only the last scroll remains
    assert_eq!(
        drain(&queue),
        vec![
            InboundMessage::StatusChanged(1),
            InboundMessage::ScrollChanged(0.7),
            InboundMessage::StatusChanged(3),
        ]
    );
}

#[test]
fn given_cleared_router_when_callbacks_arrive_then_dropped() {
    let (router, _host, queue) = router_with(None);
    let callback = router.callback();

    router.clear();
    callback.overlay_status_changed(5);
    callback.window_shift_requested(true);

    assert!(queue.is_empty());
    assert!(router.sink().is_cleared());
}

#[test]
fn given_rebound_router_when_old_sink_called_then_ignored() {
    let (mut router, _host, queue) = router_with(None);
    let old = router.callback();

    router.bind(Arc::clone(&queue), 0);
    old.overlay_status_changed(1);
    router.callback().overlay_status_changed(2);

    assert_eq!(drain(&queue), vec![InboundMessage::StatusChanged(2)]);
}

/// **VALUE**: Verifies every sink message carries the binding generation the sink
/// was created for.
///
/// **BUG THIS CATCHES**: Would catch a sink posting unstamped messages, which the
/// owner could not tell apart from callbacks of the current binding.
#[test]
fn given_router_bound_to_generation_when_sink_posts_then_delivery_stamped() {
    // GIVEN: A router rebound for binding generation 3
    let (mut router, _host, queue) = router_with(None);
    router.bind(Arc::clone(&queue), 3);

    // WHEN: The provider reports a status and a scroll
    let callback = router.callback();
    callback.overlay_status_changed(1);
    callback.overlay_scroll_changed(0.5);

    // THEN: Both deliveries carry generation 3; host posts carry none
    queue.post(InboundMessage::BindFailed);
    let stamps: Vec<_> = std::iter::from_fn(|| queue.pop_delivery())
        .map(|delivery| delivery.binding)
        .collect();
    assert_eq!(stamps, vec![Some(3), Some(3), None]);
    assert_eq!(router.sink().binding(), 3);
}

/// **VALUE**: Verifies scrolls reach the host only while the overlay is attached.
///
/// **BUG THIS CATCHES**: Would catch forwarding scroll progress while the provider
/// reports the overlay detached, which makes the host dim for an invisible surface.
#[test]
fn given_status_without_attached_bit_when_scroll_handled_then_not_forwarded() {
    // GIVEN: A client whose status lacks the attached bit
    let (router, _host, _queue) = router_with(None);
    let mut client = RecordingClient::with_status(2);

    // WHEN: Handling a scroll
    router.handle(InboundMessage::ScrollChanged(0.5), &mut client);

    // THEN: Nothing logged
    assert!(client.log.is_empty());
}

#[test]
fn given_attached_status_when_scrolls_handled_then_categorized_in_log() {
    let (router, _host, _queue) = router_with(None);
    let mut client = RecordingClient::with_status(1);

    router.handle(InboundMessage::ScrollChanged(0.0), &mut client);
    router.handle(InboundMessage::ScrollChanged(0.5), &mut client);
    router.handle(InboundMessage::ScrollChanged(1.0), &mut client);

    let labels: Vec<_> = client.log.entries().iter().map(|e| e.label.clone()).collect();
    assert_eq!(
        labels,
        vec!["onScroll 0, overlay closed", "onScroll", "onScroll 1, overlay opened"]
    );
}

#[test]
fn given_status_message_when_handled_then_client_notified_and_logged() {
    let (router, _host, _queue) = router_with(None);
    let mut client = RecordingClient::with_status(0);

    router.handle(InboundMessage::StatusChanged(3), &mut client);

    assert_eq!(client.statuses, vec![3]);
    assert_eq!(client.log.entries()[0].label, "stateChanged");
}

#[test]
fn given_connection_message_when_handled_then_not_routed() {
    let (router, _host, _queue) = router_with(None);
    let mut client = RecordingClient::with_status(0);

    router.handle(InboundMessage::ServiceConnected, &mut client);

    assert!(client.statuses.is_empty());
    assert!(client.log.is_empty());
}

/// **VALUE**: Verifies the window shift moves the window fully off-screen and back.
///
/// **WHY THIS MATTERS**: A partial shift leaves a sliver of the host visible behind
/// the overlay in landscape.
///
/// **BUG THIS CATCHES**: Would catch using width instead of the larger dimension, or
/// forgetting to toggle the layout flag.
#[test]
fn given_window_when_shift_requested_then_moved_by_larger_dimension_and_restored() {
    // GIVEN: A host window on a 1080x2340 display
    let (router, host, _queue) = router_with(Some(window()));
    let mut client = RecordingClient::with_status(1);

    // WHEN: The provider hides the window
    router.handle(InboundMessage::WindowShift(true), &mut client);

    // THEN: Shifted by -2340 with the no-limits flag
    let shifted = host.window_params().expect("window");
    assert_eq!(router.window_shift(), -2340);
    assert_eq!(shifted.x, -2340);
    assert!(shifted.has_flag(WindowParams::FLAG_LAYOUT_NO_LIMITS));

    // WHEN: The provider shows it again
    router.handle(InboundMessage::WindowShift(false), &mut client);

    // THEN: Back at zero without the flag
    let restored = host.window_params().expect("window");
    assert_eq!(restored.x, 0);
    assert!(!restored.has_flag(WindowParams::FLAG_LAYOUT_NO_LIMITS));
}

#[tokio::test]
async fn given_empty_queue_when_message_posted_later_then_wait_resolves() {
    let queue = Arc::new(MessageQueue::new());
    let poster = Arc::clone(&queue);

    let handle = tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        poster.post(InboundMessage::StatusChanged(1));
    });

    queue.wait().await;
    handle.await.expect("poster");

    assert_eq!(queue.len(), 1);
}
