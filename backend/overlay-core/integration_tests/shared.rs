use crate::helpers::{FakeBinder, Harness, window};

use overlay_core::SharedConnectionRegistry;
use overlay_core::connection::BindFlags;
use overlay_core::service::ServiceTarget;
use overlay_core::wire::MethodId;

use std::rc::Rc;

fn shared_pair() -> (SharedConnectionRegistry, Rc<FakeBinder>) {
    (SharedConnectionRegistry::new(), Rc::new(FakeBinder::default()))
}

/// **VALUE**: Verifies a second window reuses the live shared binding.
///
/// **WHY THIS MATTERS**: Rebinding per window makes the provider restart its
/// surface every time the launcher recreates its activity.
///
/// **BUG THIS CATCHES**: Would catch the newcomer waiting forever for a connection
/// result that already arrived before it registered.
#[test]
fn given_live_shared_connection_when_second_client_created_then_connection_replayed() {
    // GIVEN: A first client connected over the shared binding
    let (registry, binder) = shared_pair();
    let connection = registry.obtain(binder.clone(), ServiceTarget::default());
    let mut first = Harness::with_connection(5, binder.clone(), connection.clone(), None);
    first.connect();

    // WHEN: A second client registers with a window and drains its inbox
    let second_connection = registry.obtain(binder.clone(), ServiceTarget::default());
    let mut second = Harness::with_connection(5, binder.clone(), second_connection, Some(window(2)));
    second.transport = first.transport.clone();
    second.client.dispatch_pending();

    // THEN: One bind in total, waived priority, and the second client attached
    assert_eq!(binder.binds.get(), 1);
    assert_eq!(
        binder.last_flags.get().map(BindFlags::bits),
        Some(BindFlags::AUTO_CREATE | BindFlags::WAIVE_PRIORITY)
    );
    assert!(second.client.is_connected());
    assert!(second.transport.methods().contains(&MethodId::WindowAttached2));
}

/// **VALUE**: Verifies the replaced client's destroy leaves the binding alone.
///
/// **BUG THIS CATCHES**: Would catch the old activity's late `on_destroy` unbinding
/// the connection its successor is using.
#[test]
fn given_replaced_client_when_destroyed_then_shared_binding_survives() {
    // GIVEN: Two clients on one shared connection, the second registered last
    let (registry, binder) = shared_pair();
    let connection = registry.obtain(binder.clone(), ServiceTarget::default());
    let mut first = Harness::with_connection(5, binder.clone(), connection.clone(), None);
    first.connect();
    let second = Harness::with_connection(5, binder.clone(), connection.clone(), None);

    // WHEN: The first client is destroyed
    first.client.destroy();

    // THEN: Still bound and the second client still registered
    assert!(connection.is_bound());
    assert_eq!(binder.unbinds.get(), 0);
    assert!(connection.is_registered(&second.client.inbox()));
}

#[test]
fn given_configuration_change_when_shared_client_destroyed_then_binding_kept() {
    let (registry, binder) = shared_pair();
    let connection = registry.obtain(binder.clone(), ServiceTarget::default());
    let mut h = Harness::with_connection(5, binder.clone(), connection.clone(), None);
    h.connect();
    h.host.changing_configurations.set(true);

    h.client.on_destroy();

    assert!(connection.is_bound());
    assert!(!connection.is_retired());
    let next = registry.obtain(binder.clone(), ServiceTarget::default());
    assert!(Rc::ptr_eq(&connection, &next));
}

#[test]
fn given_last_shared_client_when_destroyed_then_unbound_and_registry_renews() {
    let (registry, binder) = shared_pair();
    let connection = registry.obtain(binder.clone(), ServiceTarget::default());
    let mut h = Harness::with_connection(5, binder.clone(), connection.clone(), None);
    h.connect();

    h.client.on_destroy();

    assert!(!connection.is_bound());
    assert_eq!(binder.unbinds.get(), 1);
    let next = registry.obtain(binder.clone(), ServiceTarget::default());
    assert!(!Rc::ptr_eq(&connection, &next));
}

#[test]
fn given_per_client_connection_when_destroyed_during_configuration_change_then_unbound() {
    let mut h = Harness::new(5);
    h.connect();
    h.host.changing_configurations.set(true);

    h.client.on_destroy();

    assert!(!h.connection.is_bound());
    assert_eq!(h.binder.unbinds.get(), 1);
}

/// **VALUE**: Verifies a client replaced on the shared connection stops applying
/// callbacks that still reach its old sink.
///
/// **WHY THIS MATTERS**: The provider may keep calling the previous window's
/// callback for a moment after the new window registers.
///
/// **BUG THIS CATCHES**: Would catch the replaced client updating its status and
/// notifying its host from a registration it no longer holds.
#[test]
fn given_replaced_shared_client_when_old_sink_reports_status_then_ignored() {
    // GIVEN: A first client attached over the shared binding
    let (registry, binder) = shared_pair();
    let connection = registry.obtain(binder.clone(), ServiceTarget::default());
    let mut first = Harness::with_connection(5, binder.clone(), connection.clone(), Some(window(1)));
    first.connect();
    let old_callback = first.transport.callback();

    // WHEN: A second client registers and the provider reports through the old sink
    let second = Harness::with_connection(5, binder.clone(), connection.clone(), None);
    assert!(!connection.is_registered(&first.client.inbox()));
    old_callback.overlay_status_changed(5);
    old_callback.overlay_scroll_changed(0.5);
    let taken = first.client.dispatch_pending();

    // THEN: Taken off the queue but nothing applied or reported
    assert_eq!(taken, 2);
    assert_eq!(first.client.service_status().raw(), 0);
    assert!(first.callbacks.states.borrow().is_empty());
    assert!(first.callbacks.scrolls.borrow().is_empty());
    assert!(connection.is_registered(&second.client.inbox()));
}
