use crate::helpers::{BindOutcome, Harness, window};

use overlay_core::error::protocol::ProtocolError;
use overlay_core::wire::{MethodId, OverlayCall};
use overlay_core::{CLIENT_VERSION, ProtocolClient};

use models::{ClientOptions, ClientState};

// ============================================
// ATTACH HANDSHAKE
// ============================================

/// **VALUE**: Verifies the legacy handshake at protocol version 2.
///
/// **WHY THIS MATTERS**: Old providers reject bundled attach and unified lifecycle
/// transactions. Sending them leaves the overlay permanently blank.
///
/// **BUG THIS CATCHES**: Would catch the version gate leaking a newer call shape to
/// an old provider.
#[test]
fn given_version_two_when_window_attached_then_legacy_attach_and_discrete_resume() {
    // GIVEN: A connected, started and resumed client at version 2
    let mut h = Harness::new(2);
    h.connect();
    h.client.on_start();
    h.client.on_resume();

    // WHEN: The window attaches
    h.client.on_window_attached(window(1));

    // THEN: Three-argument attach followed by resume, nothing newer
    assert_eq!(
        h.transport.calls(),
        vec![
            OverlayCall::WindowAttached {
                params: window(1),
                client_options: ClientOptions::default().bits(),
            },
            OverlayCall::Resume,
        ]
    );
}

#[test]
fn given_version_two_and_paused_when_window_attached_then_discrete_pause() {
    let mut h = Harness::new(2);
    h.connect();
    h.client.on_start();

    h.client.on_window_attached(window(1));

    assert_eq!(
        h.transport.methods(),
        vec![MethodId::WindowAttached, MethodId::Pause]
    );
}

/// **VALUE**: Verifies the bundled handshake at protocol version 5.
///
/// **BUG THIS CATCHES**: Would catch a newer provider receiving the legacy
/// resume/pause pair instead of the state bitmask.
#[test]
fn given_version_five_when_window_attached_then_bundled_attach_and_notify_lifecycle() {
    // GIVEN: A connected, started and resumed client at version 5
    let mut h = Harness::new(5);
    h.connect();
    h.client.on_start();
    h.client.on_resume();

    // WHEN: The window attaches
    h.client.on_window_attached(window(1));

    // THEN: Bundled attach with configuration, then notifyLifecycle(STARTED|RESUMED)
    assert_eq!(
        h.transport.calls(),
        vec![
            OverlayCall::WindowAttachedBundled {
                params: window(1),
                configuration: h.host.configuration.borrow().clone(),
                client_options: ClientOptions::default().bits(),
            },
            OverlayCall::NotifyLifecycle {
                state: (ClientState::STARTED | ClientState::RESUMED) as i32,
            },
        ]
    );
}

#[test]
fn given_window_before_connection_when_provider_connects_then_handshake_runs() {
    // GIVEN: An attached window and no provider yet
    let mut h = Harness::new(5);
    h.client.on_window_attached(window(1));
    assert!(h.transport.calls().is_empty());

    // WHEN: The provider connects
    h.connect();

    // THEN: The deferred handshake runs
    assert_eq!(
        h.transport.methods(),
        vec![MethodId::WindowAttached2, MethodId::NotifyLifecycle]
    );
    assert!(h.client.is_connected());
}

#[test]
fn given_host_window_at_creation_when_built_then_attaches_on_connect() {
    let binder = std::rc::Rc::new(crate::helpers::FakeBinder::default());
    let connection = std::rc::Rc::new(overlay_core::ConnectionManager::new(
        binder.clone(),
        Default::default(),
        overlay_core::ConnectionMode::PerClient,
    ));
    let mut h = Harness::with_connection(5, binder, connection, Some(window(9)));

    h.connect();

    assert_eq!(h.client.window_params(), Some(&window(9)));
    assert_eq!(h.transport.methods()[0], MethodId::WindowAttached2);
}

#[test]
fn given_failing_attach_when_window_attached_then_lifecycle_still_attempted_and_no_panic() {
    let mut h = Harness::new(5);
    h.connect();
    h.transport.fail_calls(true);

    h.client.on_window_attached(window(1));

    assert!(h.transport.calls().is_empty());
    assert_eq!(h.client.window_params(), Some(&window(1)));
}

// ============================================
// LIFECYCLE
// ============================================

#[test]
fn given_attached_version_five_when_lifecycle_changes_then_notify_lifecycle_carries_bits() {
    let mut h = Harness::ready(5);

    h.client.on_pause();
    h.client.on_stop();

    assert_eq!(
        h.transport.calls(),
        vec![
            OverlayCall::NotifyLifecycle {
                state: ClientState::STARTED as i32
            },
            OverlayCall::NotifyLifecycle { state: 0 },
        ]
    );
}

#[test]
fn given_attached_version_three_when_start_and_stop_then_no_rpc() {
    let mut h = Harness::ready(3);

    h.client.on_stop();
    h.client.on_start();
    h.client.on_pause();

    assert_eq!(h.transport.methods(), vec![MethodId::Pause]);
}

#[test]
fn given_no_window_when_lifecycle_changes_then_state_updated_without_rpc() {
    let mut h = Harness::new(5);
    h.connect();

    h.client.on_start();
    h.client.on_resume();

    assert!(h.transport.calls().is_empty());
    assert!(h.client.client_state().is_resumed());
}

/// **VALUE**: Verifies redundant lifecycle calls are idempotent for every sequence.
///
/// **WHY THIS MATTERS**: Hosts deliver duplicate lifecycle callbacks routinely. The
/// bitmask must reflect only the last call affecting each bit.
///
/// **BUG THIS CATCHES**: Would catch toggling instead of setting, or one call
/// clobbering the other bit.
#[test]
fn given_all_short_lifecycle_sequences_when_replayed_then_bits_follow_last_call_per_bit() {
    // GIVEN: Every sequence of up to four lifecycle calls
    const OPS: [&str; 4] = ["start", "resume", "pause", "stop"];
    let mut sequences: Vec<Vec<&str>> = vec![vec![]];
    let mut frontier = sequences.clone();
    for _ in 0..4 {
        let mut longer = Vec::new();
        for sequence in &frontier {
            for op in OPS {
                let mut next = sequence.clone();
                next.push(op);
                longer.push(next);
            }
        }
        sequences.extend(longer.iter().cloned());
        frontier = longer;
    }

    for sequence in sequences {
        // WHEN: Applying the sequence
        let mut h = Harness::ready(5);
        for op in &sequence {
            match *op {
                "start" => h.client.on_start(),
                "resume" => h.client.on_resume(),
                "pause" => h.client.on_pause(),
                _ => h.client.on_stop(),
            }
        }

        // THEN: Each bit equals what its last setter/clearer said, starting from 3
        let started = sequence
            .iter()
            .rev()
            .find(|op| matches!(**op, "start" | "stop"))
            .map_or(true, |op| *op == "start");
        let resumed = sequence
            .iter()
            .rev()
            .find(|op| matches!(**op, "resume" | "pause"))
            .map_or(true, |op| *op == "resume");
        let state = h.client.client_state();
        assert_eq!(state.is_started(), started, "{sequence:?}");
        assert_eq!(state.is_resumed(), resumed, "{sequence:?}");
    }
}

// ============================================
// WINDOW DETACH AND OPTIONS
// ============================================

/// **VALUE**: Verifies detach tells the provider and then treats it as absent.
///
/// **BUG THIS CATCHES**: Would catch gesture or lifecycle calls still reaching the
/// provider for a window it no longer has.
#[test]
fn given_attached_when_window_detached_then_detach_sent_and_overlay_treated_absent() {
    // GIVEN: A ready client in a configuration change
    let mut h = Harness::ready(5);
    h.host.changing_configurations.set(true);

    // WHEN: The window detaches and the host keeps going
    h.client.on_window_detached();
    h.client.on_pause();
    h.client.start_move();

    // THEN: Only the detach went out
    assert_eq!(
        h.transport.calls(),
        vec![OverlayCall::WindowDetached {
            is_reconfiguring: true
        }]
    );
    assert!(!h.client.is_connected());

    // WHEN: A new window attaches
    h.transport.clear();
    h.client.on_window_attached(window(2));

    // THEN: The overlay is usable again
    assert!(h.client.is_connected());
    assert_eq!(h.transport.methods()[0], MethodId::WindowAttached2);
}

#[test]
fn given_same_options_when_set_then_no_rpc() {
    let mut h = Harness::ready(5);

    h.client.set_client_options(ClientOptions::default());

    assert!(h.transport.calls().is_empty());
}

#[test]
fn given_new_options_when_set_then_reattached_with_new_bits() {
    let mut h = Harness::ready(2);
    let options = ClientOptions::new(true, false, false);

    h.client.set_client_options(options);

    assert_eq!(
        h.transport.calls()[0],
        OverlayCall::WindowAttached {
            params: window(1),
            client_options: 1,
        }
    );
    assert_eq!(h.client.client_options(), options);
}

#[test]
fn given_version_seven_when_configuration_changes_then_reattached() {
    let mut h = Harness::ready(7);

    h.client.on_configuration_changed();

    assert_eq!(
        h.transport.methods(),
        vec![MethodId::WindowAttached2, MethodId::NotifyLifecycle]
    );
}

#[test]
fn given_version_six_when_configuration_changes_then_nothing_sent() {
    let mut h = Harness::ready(6);

    h.client.on_configuration_changed();

    assert!(h.transport.calls().is_empty());
}

// ============================================
// COMMANDS
// ============================================

#[test]
fn given_connected_when_gesture_forwarded_then_progress_unclamped() {
    let mut h = Harness::ready(5);

    h.client.start_move();
    h.client.update_move(1.5);
    h.client.end_move();

    assert_eq!(
        h.transport.calls(),
        vec![
            OverlayCall::StartScroll,
            OverlayCall::Scroll { progress: 1.5 },
            OverlayCall::EndScroll,
        ]
    );
}

#[test]
fn given_durations_when_showing_and_hiding_then_encoded_values_sent() {
    let mut h = Harness::ready(5);

    h.client.show_overlay(true);
    h.client.show_overlay_with_duration(300).unwrap();
    h.client.hide_overlay(false);
    h.client.hide_overlay_with_duration(2047).unwrap();

    assert_eq!(
        h.transport.calls(),
        vec![
            OverlayCall::OpenOverlay { value: 1 },
            OverlayCall::OpenOverlay {
                value: (300 << 2) | 1
            },
            OverlayCall::CloseOverlay { value: 0 },
            OverlayCall::CloseOverlay {
                value: (2047 << 2) | 1
            },
        ]
    );
}

/// **VALUE**: Verifies out-of-range durations fail fast at the caller.
///
/// **BUG THIS CATCHES**: Would catch the error being logged and swallowed, or a
/// truncated value being sent to the provider.
#[test]
fn given_out_of_range_duration_when_showing_then_error_and_nothing_sent() {
    let mut h = Harness::ready(5);

    let show = h.client.show_overlay_with_duration(0);
    let hide = h.client.hide_overlay_with_duration(2048);

    assert!(matches!(show, Err(ProtocolError::InvalidArgument { .. })));
    assert!(matches!(hide, Err(ProtocolError::InvalidArgument { .. })));
    assert!(h.transport.calls().is_empty());
}

#[test]
fn given_provider_reports_secondary_active_when_queried_then_true() {
    let mut h = Harness::ready(5);
    h.transport.set_secondary_active(true);

    h.client.request_secondary_capability(true);

    assert!(h.client.is_secondary_capability_active());
    assert!(h.client.query_extended_capability());
    assert_eq!(
        h.transport.calls()[0],
        OverlayCall::RequestSecondaryCapability { enabled: true }
    );
}

/// **VALUE**: Verifies transport failures never escape the client.
///
/// **WHY THIS MATTERS**: The provider can die at any moment; the host must keep
/// running as if the overlay were absent.
#[test]
fn given_dead_provider_when_calls_made_then_failures_swallowed() {
    // GIVEN: A ready client whose provider died
    let mut h = Harness::ready(5);
    h.transport.set_secondary_active(true);
    h.transport.fail_calls(true);

    // WHEN: Making every kind of call
    h.client.on_pause();
    h.client.update_move(0.3);
    h.client.show_overlay(true);

    // THEN: No panic and queries report false
    assert!(!h.client.is_secondary_capability_active());
    assert!(!h.client.query_extended_capability());
}

#[test]
fn given_no_provider_when_queried_then_false() {
    let h = Harness::new(5);

    assert!(!h.client.is_connected());
    assert!(!h.client.is_secondary_capability_active());
}

// ============================================
// STATUS AND CONNECTION
// ============================================

/// **VALUE**: Verifies observers hear a status only when it changes.
///
/// **BUG THIS CATCHES**: Would catch duplicate `onServiceStateChanged` calls that
/// restart host animations.
#[test]
fn given_same_status_twice_when_notified_then_callback_once() {
    // GIVEN: A client
    let mut h = Harness::new(5);

    // WHEN: Notifying 5 twice
    h.client.notify_status_changed(5);
    h.client.notify_status_changed(5);

    // THEN: One callback, attached but secondary inactive
    assert_eq!(*h.callbacks.states.borrow(), vec![(true, false)]);
    assert_eq!(h.client.service_status().raw(), 5);
}

/// **VALUE**: Verifies a failed bind is reported through the inbox, not recursively.
///
/// **WHY THIS MATTERS**: Observers assume status changes arrive from the queue; a
/// direct call from inside `on_start` re-enters host code mid-lifecycle.
#[test]
fn given_denied_bind_when_reconnecting_then_disconnect_reported_on_dispatch() {
    // GIVEN: A client with an attached status and an unbound connection
    let mut h = Harness::new(5);
    h.client.notify_status_changed(1);
    h.connection.unbind();
    h.binder.outcome.set(BindOutcome::Deny);

    // WHEN: The host starts
    h.client.on_start();

    // THEN: Nothing yet, then a disconnect once the inbox is drained
    assert_eq!(h.callbacks.states.borrow().len(), 1);
    h.client.dispatch_pending();
    assert_eq!(h.callbacks.states.borrow().last(), Some(&(false, false)));
    assert!(!h.connection.is_bound());
}

/// **VALUE**: Verifies a provider refusing the bind is reported like a denial.
///
/// **BUG THIS CATCHES**: Would catch only security failures being reported, leaving
/// the host believing the overlay is still attached after a refused bind.
#[test]
fn given_refused_bind_when_reconnecting_then_disconnect_reported_on_dispatch() {
    // GIVEN: An attached status and a provider that refuses to bind
    let mut h = Harness::new(5);
    h.client.notify_status_changed(1);
    h.connection.unbind();
    h.binder.outcome.set(BindOutcome::Refuse);

    // WHEN: The host starts and the inbox is drained
    h.client.on_start();
    h.client.dispatch_pending();

    // THEN: Reported disconnected and left unbound
    assert_eq!(h.callbacks.states.borrow().last(), Some(&(false, false)));
    assert!(!h.connection.is_bound());
}

/// **VALUE**: Verifies callbacks from a released binding stay dead after a rebind.
///
/// **WHY THIS MATTERS**: `on_stop` can unbind and `on_start` rebind before the
/// owning thread drains; the old provider's last words must not count.
///
/// **BUG THIS CATCHES**: Would catch staleness judged only by "is bound right now",
/// which a quick rebind makes true again.
#[test]
fn given_unbind_then_rebind_when_late_status_drained_then_ignored() {
    // GIVEN: A ready client whose binding is released
    let mut h = Harness::ready(5);
    let old_callback = h.transport.callback();
    h.connection.unbind();

    // WHEN: The old provider reports late and the client rebinds before draining
    old_callback.overlay_status_changed(5);
    h.client.reconnect();
    h.client.dispatch_pending();

    // THEN: Status untouched and no host callback
    assert!(h.connection.is_bound());
    assert_eq!(h.client.service_status().raw(), 0);
    assert!(h.callbacks.states.borrow().is_empty());

    // AND: The new binding's callbacks apply once it connects
    h.connect();
    h.transport.callback().overlay_status_changed(1);
    h.client.dispatch_pending();
    assert_eq!(*h.callbacks.states.borrow(), vec![(true, false)]);
}

#[test]
fn given_provider_dies_when_disconnect_processed_then_status_cleared_and_reconnect_recovers() {
    let mut h = Harness::ready(5);
    h.client.notify_status_changed(3);

    h.connection.on_service_disconnected();
    h.client.dispatch_pending();

    assert!(!h.client.is_connected());
    assert_eq!(h.callbacks.states.borrow().last(), Some(&(false, false)));

    h.transport.clear();
    h.connect();
    assert_eq!(
        h.transport.methods(),
        vec![MethodId::WindowAttached2, MethodId::NotifyLifecycle]
    );
}

#[test]
fn given_stopped_with_live_provider_when_provider_dies_then_unbound() {
    let mut h = Harness::ready(5);
    h.client.on_stop();
    assert!(h.connection.is_bound());

    h.connection.on_service_disconnected();

    assert!(!h.connection.is_bound());
    assert_eq!(h.binder.unbinds.get(), 1);
}

#[test]
fn given_package_reinstalled_when_notified_then_rebinds() {
    let mut h = Harness::new(5);
    h.connection.unbind();

    h.client.on_package_added();

    assert_eq!(h.binder.binds.get(), 2);
    assert!(h.connection.is_bound());
}

// ============================================
// CREATION, DESTRUCTION, DUMP
// ============================================

#[test]
fn given_new_client_when_built_then_listening_and_bound() {
    let h = Harness::new(5);

    assert_eq!(
        h.host.listening_to.borrow().as_deref(),
        Some(overlay_core::service::DEFAULT_OVERLAY_PACKAGE)
    );
    assert_eq!(h.binder.binds.get(), 1);
    assert_eq!(h.client.protocol_version().get(), 5);
}

#[test]
fn given_missing_host_when_built_then_invalid_argument() {
    let result = ProtocolClient::builder().build();

    assert!(matches!(result, Err(ProtocolError::InvalidArgument { .. })));
}

/// **VALUE**: Verifies destroy is idempotent and silences the client.
///
/// **BUG THIS CATCHES**: Would catch a second destroy unbinding twice, or lifecycle
/// calls after destroy rebinding the provider.
#[test]
fn given_destroyed_client_when_destroyed_again_and_lifecycle_called_then_inert() {
    // GIVEN: A ready client
    let mut h = Harness::ready(5);

    // WHEN: Destroying twice and then driving lifecycle
    h.client.destroy();
    h.client.destroy();
    h.client.on_start();
    h.client.on_window_attached(window(3));

    // THEN: One unbind, no new bind, no provider traffic, no listener
    assert!(h.client.is_destroyed());
    assert_eq!(h.binder.unbinds.get(), 1);
    assert_eq!(h.binder.binds.get(), 1);
    assert!(h.transport.calls().is_empty());
    assert!(h.host.listening_to.borrow().is_none());
}

#[test]
fn given_ready_client_when_dumped_then_reports_flags_versions_and_logs() {
    let mut h = Harness::ready(5);
    h.client.notify_status_changed(1);

    let dump = h.client.dump("");

    assert!(dump.starts_with("ProtocolClient\n"));
    assert!(dump.contains("  isConnected: true\n"));
    assert!(dump.contains("  act.isBound: true\n"));
    assert!(dump.contains("  serviceVersion: 5\n"));
    assert!(dump.contains(&format!("  clientVersion: {CLIENT_VERSION}\n")));
    assert!(dump.contains("  clientState: 3\n"));
    assert!(dump.contains("  serviceStatus: 1\n"));
    assert!(dump.contains("  clientOptions: 7\n"));
    assert!(dump.contains("  Client event history:\n"));
    assert!(dump.contains("  Service event history:\n"));
    assert!(dump.contains("attachedToWindow"));
}
