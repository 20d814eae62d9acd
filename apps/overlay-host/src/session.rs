//! A scripted host session driving one protocol client end to end.

use crate::error::HostError;
use crate::host::{DemoBinder, DemoHost, LoggingCallbacks};
use crate::provider::LoopbackProvider;

use overlay_core::{ConnectionManager, OverlayHost, ProtocolClient};

use common::ErrorLocation;
use models::WindowParamsBuilder;

use std::panic::Location;
use std::time::Duration;

use log::{debug, info};
use tokio::time::timeout;

/// How long the owning thread waits for more inbound work before moving on.
const SETTLE_TIMEOUT: Duration = Duration::from_millis(50);

const DEMO_WINDOW_TOKEN: u64 = 0x5eed;
const OPEN_DURATION_MS: i32 = 250;

/// Everything a session needs besides the client itself.
pub struct SessionParts<'a> {
    pub binder: &'a DemoBinder,
    pub connection: &'a ConnectionManager,
    pub host: &'a DemoHost,
    pub callbacks: &'a LoggingCallbacks,
    pub provider: &'a LoopbackProvider,
}

/// Deliver any finished bind and drain the inbox until it stays quiet.
pub async fn settle(client: &mut ProtocolClient, parts: &SessionParts<'_>) -> usize {
    if parts.binder.take_pending() {
        parts.connection.on_service_connected(parts.provider.handle());
    }

    let inbox = client.inbox();
    let mut handled = client.dispatch_pending();
    while timeout(SETTLE_TIMEOUT, inbox.wait()).await.is_ok() {
        handled += client.dispatch_pending();
    }
    debug!("settled after {handled} messages");
    handled
}

/// Start, attach, open and close the overlay, then stop.
///
/// # Errors
///
/// Returns [`HostError`] if the demo window is invalid or a transition
/// duration is rejected.
pub async fn run(client: &mut ProtocolClient, parts: &SessionParts<'_>) -> Result<(), HostError> {
    let display = parts.host.display_size();
    let window = WindowParamsBuilder::default()
        .with_token(DEMO_WINDOW_TOKEN)
        .with_size(display.width, display.height)
        .build()
        .map_err(|e| HostError::Host {
            message: format!("Invalid demo window: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

    client.on_start();
    client.on_resume();
    settle(client, parts).await;

    info!("Attaching window {DEMO_WINDOW_TOKEN:#x}");
    parts.host.set_window(Some(window.clone()));
    client.on_window_attached(window);
    settle(client, parts).await;

    client.start_move();
    for progress in [0.2, 0.5, 0.8] {
        client.update_move(progress);
    }
    client.end_move();
    settle(client, parts).await;

    client
        .show_overlay_with_duration(OPEN_DURATION_MS)
        .map_err(|e| HostError::Core {
            message: format!("Failed to open overlay: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;
    client.request_secondary_capability(true);
    settle(client, parts).await;
    info!(
        "secondary capability active: {}",
        client.is_secondary_capability_active()
    );

    client.hide_overlay(true);
    client.on_pause();
    client.on_stop();
    settle(client, parts).await;
    info!("final overlay state: {:?}", parts.callbacks.last_state());

    Ok(())
}
