use overlay_host::host::{DemoBinder, DemoHost, DemoResolver, LoggingCallbacks};
use overlay_host::provider::LoopbackProvider;
use overlay_host::session::{self, SessionParts, settle};

use overlay_core::service::{ServiceTarget, VERSION_METADATA_KEY};
use overlay_core::version::load_api_version;
use overlay_core::wire::MethodId;
use overlay_core::{ConnectionManager, ConnectionMode, OverlayHost, ProtocolClient};

use models::{DisplaySize, ProtocolVersion, WindowParams};

use std::rc::Rc;

struct Rig {
    binder: Rc<DemoBinder>,
    connection: Rc<ConnectionManager>,
    host: Rc<DemoHost>,
    callbacks: Rc<LoggingCallbacks>,
    provider: LoopbackProvider,
}

impl Rig {
    fn new() -> Self {
        let binder = Rc::new(DemoBinder::new(true));
        let connection = Rc::new(ConnectionManager::new(
            binder.clone(),
            ServiceTarget::default(),
            ConnectionMode::PerClient,
        ));
        Self {
            binder,
            connection,
            host: Rc::new(DemoHost::new(DisplaySize::new(1080, 2340))),
            callbacks: Rc::new(LoggingCallbacks::default()),
            provider: LoopbackProvider::spawn(),
        }
    }

    fn client(&self, version: ProtocolVersion) -> ProtocolClient {
        ProtocolClient::builder()
            .with_host(self.host.clone())
            .with_callbacks(self.callbacks.clone())
            .with_connection(self.connection.clone())
            .with_version(version)
            .build()
            .expect("client")
    }

    fn parts(&self) -> SessionParts<'_> {
        SessionParts {
            binder: &self.binder,
            connection: &self.connection,
            host: &self.host,
            callbacks: &self.callbacks,
            provider: &self.provider,
        }
    }
}

/// **VALUE**: Runs the full scripted session against a provider on another thread.
///
/// **WHY THIS MATTERS**: This is the only test where callbacks really arrive from a
/// different thread than the owner, through the real queue and router.
///
/// **BUG THIS CATCHES**: Would catch a deadlock between the owner waiting on its
/// inbox and the provider posting to it, or callbacks that never cross over.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_loopback_provider_when_session_runs_then_overlay_round_trips() {
    // GIVEN: A client at the version the provider advertises
    let rig = Rig::new();
    let resolver = DemoResolver::installed(VERSION_METADATA_KEY, 7);
    let version = load_api_version(&resolver, &ServiceTarget::default(), VERSION_METADATA_KEY);
    let mut client = rig.client(version);

    // WHEN: Running the scripted session
    session::run(&mut client, &rig.parts())
        .await
        .expect("session");

    // THEN: The provider saw the bundled handshake and the gesture
    let received = rig.provider.received();
    assert_eq!(received.first(), Some(&MethodId::WindowAttached2));
    assert!(received.contains(&MethodId::NotifyLifecycle));
    assert!(received.contains(&MethodId::OnScroll));
    assert!(received.contains(&MethodId::OpenOverlay));
    assert!(received.contains(&MethodId::QuerySecondaryCapabilityActive));

    // AND: Status and scroll made it back to the host
    assert_eq!(rig.callbacks.last_state(), Some((true, true)));
    assert_eq!(rig.callbacks.last_scroll(), Some(0.0));
    assert!(client.service_status().is_overlay_attached());

    // AND: Closing the overlay put the window back
    let window = rig.host.window_params().expect("window");
    assert_eq!(window.x, 0);
    assert!(!window.has_flag(WindowParams::FLAG_LAYOUT_NO_LIMITS));

    client.destroy();
    rig.provider.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_open_overlay_when_settled_then_window_shifted_off_screen() {
    let rig = Rig::new();
    let mut client = rig.client(ProtocolVersion::new(5));
    let parts = rig.parts();
    let window = WindowParams {
        token: 1,
        x: 0,
        y: 0,
        width: 1080,
        height: 2340,
        flags: 0,
    };

    client.on_start();
    rig.host.set_window(Some(window.clone()));
    client.on_window_attached(window);
    settle(&mut client, &parts).await;
    client.show_overlay(true);
    settle(&mut client, &parts).await;

    let shifted = rig.host.window_params().expect("window");
    assert_eq!(shifted.x, -2340);
    assert!(shifted.has_flag(WindowParams::FLAG_LAYOUT_NO_LIMITS));
    assert_eq!(rig.callbacks.last_scroll(), Some(1.0));

    client.destroy();
    drop(parts);
    rig.provider.shutdown().await;
}

/// **VALUE**: A provider that went away mid-session only costs logged warnings.
///
/// **BUG THIS CATCHES**: Would catch a failed one-way call panicking the owner or
/// leaking a half-applied callback into the host.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_provider_shut_down_when_client_calls_then_calls_fail_quietly() {
    // GIVEN: An attached client whose provider then stops
    let rig = Rig::new();
    let mut client = rig.client(ProtocolVersion::new(5));
    let parts = rig.parts();
    settle(&mut client, &parts).await;
    let window = WindowParams {
        token: 2,
        x: 0,
        y: 0,
        width: 1080,
        height: 2340,
        flags: 0,
    };
    rig.host.set_window(Some(window.clone()));
    client.on_window_attached(window);
    settle(&mut client, &parts).await;
    drop(parts);
    rig.provider.shutdown().await;

    // WHEN: Driving a gesture and opening the overlay
    client.start_move();
    client.update_move(0.5);
    client.end_move();
    client.show_overlay(true);

    // THEN: Nothing comes back and the client still thinks it is connected
    assert_eq!(client.dispatch_pending(), 0);
    assert!(client.is_connected());
    assert_eq!(rig.callbacks.last_scroll(), None);
    assert_eq!(rig.host.window_params().map(|w| w.x), Some(0));

    client.destroy();
    assert!(!client.is_connected());
}
