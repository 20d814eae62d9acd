use crate::connection::{BindFlags, ConnectionManager, ConnectionMode, SharedConnectionRegistry};
use crate::router::{InboundMessage, MessageQueue};
use crate::service::ServiceTarget;
use crate::tests::fakes::{CountingBinder, NullTransport};

use std::rc::Rc;
use std::sync::Arc;

fn manager(mode: ConnectionMode) -> (ConnectionManager, Rc<CountingBinder>) {
    let binder = Rc::new(CountingBinder::default());
    let manager = ConnectionManager::new(binder.clone(), ServiceTarget::default(), mode);
    (manager, binder)
}

fn drain(queue: &MessageQueue) -> Vec<InboundMessage> {
    std::iter::from_fn(|| queue.pop()).collect()
}

/// **VALUE**: Verifies reconnect binds once and reports an in-flight bind as success.
///
/// **BUG THIS CATCHES**: Would catch every lifecycle `on_start` issuing a fresh bind,
/// which leaks bindings in the platform.
#[test]
fn given_bound_manager_when_reconnect_called_again_then_no_second_bind() {
    // GIVEN: A per-client manager
    let (manager, binder) = manager(ConnectionMode::PerClient);

    // WHEN: Reconnecting twice
    assert!(manager.reconnect());
    assert!(manager.reconnect());

    // THEN: Only one bind with auto-create
    assert_eq!(binder.binds.get(), 1);
    assert_eq!(
        binder.last_flags.get().map(BindFlags::bits),
        Some(BindFlags::AUTO_CREATE)
    );
}

#[test]
fn given_shared_mode_when_binding_then_waives_priority() {
    let (manager, binder) = manager(ConnectionMode::Shared);

    manager.reconnect();

    assert_eq!(binder.last_flags.get().map(BindFlags::bits), Some(33));
}

#[test]
fn given_refused_bind_when_reconnect_then_reports_not_bound() {
    let (manager, binder) = manager(ConnectionMode::PerClient);
    binder.refuse.set(true);

    assert!(!manager.reconnect());
    assert!(!manager.is_bound());
}

#[test]
fn given_bound_manager_when_unbind_twice_then_unbinds_once() {
    let (manager, binder) = manager(ConnectionMode::PerClient);
    manager.reconnect();

    manager.unbind();
    manager.unbind();

    assert_eq!(binder.unbinds.get(), 1);
}

/// **VALUE**: Verifies a connection result arriving after unbind is ignored.
///
/// **WHY THIS MATTERS**: Bind results are asynchronous. Applying a late one would
/// resurrect a connection the client already gave up.
#[test]
fn given_unbound_manager_when_late_connect_arrives_then_silently_ignored() {
    // GIVEN: A registered client whose bind was cancelled
    let (manager, _binder) = manager(ConnectionMode::PerClient);
    let inbox = Arc::new(MessageQueue::new());
    manager.register(&inbox);
    manager.reconnect();
    manager.unbind();

    // WHEN: The connection result arrives late
    manager.on_service_connected(Arc::new(NullTransport::default()));

    // THEN: No handle is held and nothing is posted
    assert!(manager.overlay().is_none());
    assert!(inbox.is_empty());
}

#[test]
fn given_registered_client_when_connected_then_inbox_notified() {
    let (manager, _binder) = manager(ConnectionMode::PerClient);
    let inbox = Arc::new(MessageQueue::new());
    manager.register(&inbox);
    manager.reconnect();

    manager.on_service_connected(Arc::new(NullTransport::default()));

    assert!(manager.overlay().is_some());
    assert_eq!(drain(&inbox), vec![InboundMessage::ServiceConnected]);
}

/// **VALUE**: Verifies the delayed unbind: stop is deferred while a handle is live.
///
/// **WHY THIS MATTERS**: Tearing down a live binding mid-flight drops in-progress
/// provider calls.
///
/// **BUG THIS CATCHES**: Would catch `stop_service(true)` unbinding immediately.
#[test]
fn given_live_handle_when_stop_requested_then_unbinds_only_after_disconnect() {
    // GIVEN: A connected manager
    let (manager, binder) = manager(ConnectionMode::Shared);
    let inbox = Arc::new(MessageQueue::new());
    manager.register(&inbox);
    manager.reconnect();
    manager.on_service_connected(Arc::new(NullTransport::default()));

    // WHEN: Stop is requested
    manager.stop_service(true);

    // THEN: Still bound
    assert!(manager.is_bound());
    assert_eq!(binder.unbinds.get(), 0);

    // WHEN: The provider goes away
    manager.on_service_disconnected();

    // THEN: The deferred unbind happens and the client hears about it
    assert!(!manager.is_bound());
    assert_eq!(binder.unbinds.get(), 1);
    assert_eq!(
        drain(&inbox),
        vec![InboundMessage::ServiceConnected, InboundMessage::ServiceDisconnected]
    );
}

#[test]
fn given_no_handle_when_stop_requested_then_unbinds_immediately() {
    let (manager, binder) = manager(ConnectionMode::PerClient);
    manager.reconnect();

    manager.stop_service(true);

    assert_eq!(binder.unbinds.get(), 1);
}

/// **VALUE**: Verifies a replaced client cannot unregister its successor.
///
/// **BUG THIS CATCHES**: Would catch the old window's late destroy tearing down the
/// shared binding the new window is using.
#[test]
fn given_replaced_registrant_when_stale_unregister_then_ignored() {
    // GIVEN: Two clients registered in turn on a shared connection
    let (manager, binder) = manager(ConnectionMode::Shared);
    let first = Arc::new(MessageQueue::new());
    let second = Arc::new(MessageQueue::new());
    manager.register(&first);
    manager.reconnect();
    manager.register(&second);

    // WHEN: The first one unregisters with unbind
    manager.unregister(&first, true);

    // THEN: The second remains registered and bound
    assert!(manager.is_registered(&second));
    assert!(manager.is_bound());
    assert_eq!(binder.unbinds.get(), 0);
}

#[test]
fn given_shared_connection_with_handle_when_new_client_registers_then_connected_replayed() {
    let (manager, _binder) = manager(ConnectionMode::Shared);
    let first = Arc::new(MessageQueue::new());
    manager.register(&first);
    manager.reconnect();
    manager.on_service_connected(Arc::new(NullTransport::default()));

    let second = Arc::new(MessageQueue::new());
    manager.register(&second);

    assert_eq!(drain(&second), vec![InboundMessage::ServiceConnected]);
}

#[test]
fn given_dropped_registrant_when_connected_then_nothing_posted() {
    let (manager, _binder) = manager(ConnectionMode::PerClient);
    let inbox = Arc::new(MessageQueue::new());
    manager.register(&inbox);
    manager.reconnect();
    drop(inbox);

    manager.on_service_connected(Arc::new(NullTransport::default()));

    assert!(manager.overlay().is_some());
}

/// **VALUE**: Verifies the registry hands out one manager until it is retired.
#[test]
fn given_registry_when_obtained_twice_then_same_manager_until_final_unbind() {
    // GIVEN: A registry and a binder
    let registry = SharedConnectionRegistry::new();
    let binder = Rc::new(CountingBinder::default());

    // WHEN: Obtaining twice
    let a = registry.obtain(binder.clone(), ServiceTarget::default());
    let b = registry.obtain(binder.clone(), ServiceTarget::default());

    // THEN: Same instance
    assert!(Rc::ptr_eq(&a, &b));

    // WHEN: The last client unregisters with unbind
    let inbox = Arc::new(MessageQueue::new());
    a.register(&inbox);
    a.reconnect();
    a.unregister(&inbox, true);

    // THEN: The retired manager is replaced
    assert!(a.is_retired());
    assert!(registry.current().is_none());
    let c = registry.obtain(binder, ServiceTarget::default());
    assert!(!Rc::ptr_eq(&a, &c));
}
