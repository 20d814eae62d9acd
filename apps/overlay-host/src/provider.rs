//! In-process stand-in for the overlay provider.
//!
//! The transport half decodes every call on the caller's thread and answers
//! queries directly. Everything else is forwarded to an actor task that owns
//! the provider's state and invokes the client's callback from a runtime
//! worker thread, the way a real provider calls back from its binder thread.

use overlay_core::client::{OverlayTransition, decode_transition};
use overlay_core::error::ipc::IpcError;
use overlay_core::wire::{
    MethodId, OverlayCall, OverlayCallback, OverlayHandle, OverlayTransport, Reply, Transaction,
    bool_reply,
};

use common::ErrorLocation;
use models::ServiceStatus;

use std::panic::Location;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

enum ProviderCommand {
    /// A forwarded call, with the callback object that travelled alongside it.
    Call {
        call: OverlayCall,
        callback: Option<Arc<dyn OverlayCallback>>,
    },
    Shutdown,
}

#[derive(Default)]
struct ProviderShared {
    secondary_active: AtomicBool,
    received: Mutex<Vec<MethodId>>,
}

/// Transport handed to the connection manager as the provider handle.
struct LoopbackTransport {
    commands: mpsc::UnboundedSender<ProviderCommand>,
    shared: Arc<ProviderShared>,
}

impl OverlayTransport for LoopbackTransport {
    fn transact(&self, transaction: Transaction) -> Result<Reply, IpcError> {
        let call = OverlayCall::decode(&transaction)?;
        self.shared
            .received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call.method());

        match call {
            OverlayCall::QuerySecondaryCapabilityActive => Ok(bool_reply(
                self.shared.secondary_active.load(Ordering::SeqCst),
            )),
            OverlayCall::QueryExtendedCapability => Ok(bool_reply(false)),
            call => {
                let command = ProviderCommand::Call {
                    call,
                    callback: transaction.callback,
                };
                self.commands
                    .send(command)
                    .map_err(|_| IpcError::DeadObject {
                        message: "Loopback provider has shut down".to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    })?;
                Ok(Reply::default())
            }
        }
    }
}

/// Running loopback provider. Handles given out keep working until
/// [`LoopbackProvider::shutdown`]; afterwards every call fails as a dead object.
pub struct LoopbackProvider {
    transport: Arc<LoopbackTransport>,
    task: JoinHandle<()>,
}

impl LoopbackProvider {
    /// Start the provider actor on the current tokio runtime.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(ProviderShared::default());
        let task = tokio::spawn(provider_actor(rx, Arc::clone(&shared)));
        info!("Loopback overlay provider started");

        Self {
            transport: Arc::new(LoopbackTransport {
                commands: tx,
                shared,
            }),
            task,
        }
    }

    pub fn handle(&self) -> OverlayHandle {
        self.transport.clone()
    }

    /// Method ids received so far, in arrival order.
    pub fn received(&self) -> Vec<MethodId> {
        self.transport
            .shared
            .received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Process what is already queued, then stop.
    pub async fn shutdown(self) {
        if self.transport.commands.send(ProviderCommand::Shutdown).is_err() {
            debug!("Loopback provider already stopped");
        }
        if let Err(e) = self.task.await {
            warn!("Loopback provider task ended abnormally: {e}");
        }
    }
}

async fn provider_actor(
    mut commands: mpsc::UnboundedReceiver<ProviderCommand>,
    shared: Arc<ProviderShared>,
) {
    let mut callback: Option<Arc<dyn OverlayCallback>> = None;
    let mut status = 0;

    while let Some(command) = commands.recv().await {
        let ProviderCommand::Call {
            call,
            callback: attached,
        } = command
        else {
            break;
        };

        debug!("provider received {call:?}");
        match call {
            OverlayCall::WindowAttached { .. } | OverlayCall::WindowAttachedBundled { .. } => {
                callback = attached;
                status |= ServiceStatus::OVERLAY_ATTACHED;
                report_status(callback.as_deref(), status);
            }
            OverlayCall::WindowDetached { is_reconfiguring } => {
                debug!("window detached (reconfiguring: {is_reconfiguring})");
                status = 0;
                callback = None;
            }
            OverlayCall::Scroll { progress } => {
                if let Some(cb) = callback.as_deref() {
                    cb.overlay_scroll_changed(progress.clamp(0.0, 1.0));
                }
            }
            OverlayCall::OpenOverlay { value } => {
                log_transition("open", value);
                if let Some(cb) = callback.as_deref() {
                    cb.overlay_scroll_changed(1.0);
                    cb.window_shift_requested(true);
                }
            }
            OverlayCall::CloseOverlay { value } => {
                log_transition("close", value);
                if let Some(cb) = callback.as_deref() {
                    cb.overlay_scroll_changed(0.0);
                    cb.window_shift_requested(false);
                }
            }
            OverlayCall::RequestSecondaryCapability { enabled } => {
                shared.secondary_active.store(enabled, Ordering::SeqCst);
                if enabled {
                    status |= ServiceStatus::SECONDARY_ACTIVE;
                } else {
                    status &= !ServiceStatus::SECONDARY_ACTIVE;
                }
                report_status(callback.as_deref(), status);
            }
            OverlayCall::NotifyLifecycle { state } => debug!("host lifecycle state {state}"),
            OverlayCall::Resume => debug!("host resumed"),
            OverlayCall::Pause => debug!("host paused"),
            OverlayCall::StartScroll | OverlayCall::EndScroll => {}
            OverlayCall::QuerySecondaryCapabilityActive | OverlayCall::QueryExtendedCapability => {}
        }
    }

    info!("Loopback overlay provider stopped");
}

fn report_status(callback: Option<&dyn OverlayCallback>, status: i32) {
    if let Some(cb) = callback {
        cb.overlay_status_changed(status);
    }
}

fn log_transition(what: &str, value: i32) {
    match decode_transition(value) {
        OverlayTransition::Duration(ms) => debug!("{what} over {ms}ms"),
        OverlayTransition::Animated(animate) => debug!("{what} (animate: {animate})"),
    }
}
