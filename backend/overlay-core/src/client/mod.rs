//! The protocol client: maps host lifecycle onto overlay provider calls.
//!
//! # Architecture
//!
//! The client tracks four independent axes: host lifecycle ([`ClientState`]),
//! provider presence, window attachment, and provider status
//! ([`ServiceStatus`]). Each operation mutates one axis and then re-applies
//! whatever remote calls the combination requires.
//!
//! All methods run on the owning thread. Provider callbacks and connection
//! results reach the client only through its inbox, drained by
//! [`ProtocolClient::dispatch_pending`].
//!
//! Remote failures are logged and treated as "overlay absent". The only
//! error a caller ever sees is caller misuse, from
//! [`ProtocolClient::show_overlay_with_duration`] and friends.

pub mod builder;
pub mod transition;

pub use builder::ProtocolClientBuilder;
pub use transition::{OverlayTransition, decode_transition, encode_duration};

use crate::CLIENT_VERSION;
use crate::connection::{ConnectionManager, ConnectionMode};
use crate::error::ipc::IpcError;
use crate::error::protocol::ProtocolError;
use crate::event_log::EventLog;
use crate::host::{OverlayClientCallbacks, OverlayHost};
use crate::router::{CallbackRouter, Delivery, InboundMessage, MessageQueue, RoutedClient};
use crate::wire::{Capability, MethodId, MethodTable, OverlayCallback, OverlayProxy};

use models::{ClientOptions, ClientState, ProtocolVersion, ServiceStatus, WindowParams};

use std::fmt::Write as _;
use std::rc::Rc;
use std::sync::Arc;

use log::{debug, trace, warn};

pub struct ProtocolClient {
    host: Rc<dyn OverlayHost>,
    callbacks: Rc<dyn OverlayClientCallbacks>,
    connection: Rc<ConnectionManager>,
    version: ProtocolVersion,
    methods: MethodTable,
    inbox: Arc<MessageQueue>,
    router: Option<CallbackRouter>,
    client_log: EventLog,
    service_log: EventLog,
    state: ClientState,
    service_status: ServiceStatus,
    options: ClientOptions,
    window: Option<WindowParams>,
    service_connected: bool,
    // Set by a window detach; the provider handle is ignored until the next attach.
    overlay_released: bool,
    destroyed: bool,
}

impl ProtocolClient {
    pub fn builder() -> ProtocolClientBuilder {
        ProtocolClientBuilder::default()
    }

    // ============================================
    // HOST LIFECYCLE
    // ============================================

    pub fn on_start(&mut self) {
        if self.destroyed {
            return;
        }
        self.connection.stop_service(false);
        self.reconnect();
        self.state.set_started(true);
        self.report_lifecycle(Capability::ReportStart);
        self.client_log.int("stateChanged", self.state_bits());
    }

    pub fn on_resume(&mut self) {
        if self.destroyed {
            return;
        }
        self.state.set_resumed(true);
        self.report_lifecycle(Capability::ReportResume);
        self.client_log.int("stateChanged", self.state_bits());
    }

    pub fn on_pause(&mut self) {
        if self.destroyed {
            return;
        }
        self.state.set_resumed(false);
        self.report_lifecycle(Capability::ReportPause);
        self.client_log.int("stateChanged", self.state_bits());
    }

    pub fn on_stop(&mut self) {
        if self.destroyed {
            return;
        }
        self.state.set_started(false);
        self.report_lifecycle(Capability::ReportStop);
        self.connection.stop_service(true);
        self.client_log.int("stateChanged", self.state_bits());
    }

    /// Host teardown. Keeps a shared binding alive across a configuration change.
    pub fn on_destroy(&mut self) {
        let unbind = !self.host.is_changing_configurations();
        self.disconnect(unbind);
    }

    /// Release everything. Idempotent.
    pub fn destroy(&mut self) {
        self.disconnect(true);
    }

    pub fn on_window_attached(&mut self, params: WindowParams) {
        if self.destroyed {
            return;
        }
        self.client_log.event("attachedToWindow");
        self.set_window(Some(params));
    }

    pub fn on_window_detached(&mut self) {
        if self.destroyed {
            return;
        }
        self.client_log.event("detachedFromWindow");
        self.set_window(None);
    }

    pub fn on_configuration_changed(&mut self) {
        if self.destroyed {
            return;
        }
        self.client_log.event("configurationChanged");
        self.reattach_overlay();
    }

    /// The provider package was (re)installed.
    pub fn on_package_added(&mut self) {
        debug!("{} changed, reconnecting", self.connection.target().package);
        self.reconnect();
    }

    pub fn set_client_options(&mut self, options: ClientOptions) {
        if options == self.options {
            return;
        }
        self.options = options;
        self.client_log.int("setClientOptions", options.bits());
        if self.window.is_some() {
            self.attach_handshake();
        }
    }

    /// Bind if needed. A failed bind is reported through the inbox like any
    /// other disconnect.
    pub fn reconnect(&mut self) {
        if self.destroyed {
            return;
        }
        if !self.connection.reconnect() {
            self.inbox.post(InboundMessage::BindFailed);
        }
    }

    // ============================================
    // GESTURES AND COMMANDS
    // ============================================

    pub fn start_move(&mut self) {
        self.client_log.event("startMove");
        self.remote("startScroll", |p| p.start_scroll());
    }

    /// `progress` is passed through unclamped.
    pub fn update_move(&mut self, progress: f32) {
        self.client_log.float("updateMove", progress);
        self.remote("onScroll", |p| p.on_scroll(progress));
    }

    pub fn end_move(&mut self) {
        self.client_log.event("endMove");
        self.remote("endScroll", |p| p.end_scroll());
    }

    pub fn show_overlay(&mut self, animate: bool) {
        self.client_log.flag("showOverlay", animate);
        self.remote("openOverlay", |p| p.open_overlay(i32::from(animate)));
    }

    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidArgument`] unless `0 < duration_ms <= 2047`.
    #[track_caller]
    pub fn show_overlay_with_duration(&mut self, duration_ms: i32) -> Result<(), ProtocolError> {
        let value = encode_duration(duration_ms)?;
        self.client_log.int("showOverlay", duration_ms);
        self.remote("openOverlay", |p| p.open_overlay(value));
        Ok(())
    }

    pub fn hide_overlay(&mut self, animate: bool) {
        self.client_log.flag("hideOverlay", animate);
        self.remote("closeOverlay", |p| p.close_overlay(i32::from(animate)));
    }

    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidArgument`] unless `0 < duration_ms <= 2047`.
    #[track_caller]
    pub fn hide_overlay_with_duration(&mut self, duration_ms: i32) -> Result<(), ProtocolError> {
        let value = encode_duration(duration_ms)?;
        self.client_log.int("hideOverlay", duration_ms);
        self.remote("closeOverlay", |p| p.close_overlay(value));
        Ok(())
    }

    pub fn request_secondary_capability(&mut self, enabled: bool) {
        self.client_log.flag("requestSecondaryCapability", enabled);
        self.remote("requestSecondaryCapability", |p| {
            p.request_secondary_capability(enabled)
        });
    }

    /// `false` whenever the provider is absent or the query fails.
    pub fn is_secondary_capability_active(&self) -> bool {
        self.remote("querySecondaryCapabilityActive", |p| {
            p.is_secondary_capability_active()
        })
        .unwrap_or(false)
    }

    pub fn query_extended_capability(&self) -> bool {
        self.remote("queryExtendedCapability", |p| p.query_extended_capability())
            .unwrap_or(false)
    }

    /// Re-run the attach handshake on providers that accept a repeated attach.
    pub fn reattach_overlay(&mut self) {
        if self.window.is_none() || !self.methods.supports(Capability::Reattach) {
            return;
        }
        self.client_log.event("reattachOverlay");
        self.attach_handshake();
    }

    // ============================================
    // INBOUND
    // ============================================

    /// Apply a provider status. Observers hear only about actual changes.
    pub fn notify_status_changed(&mut self, status: i32) {
        let status = ServiceStatus::from_raw(status);
        if status == self.service_status {
            return;
        }
        self.service_status = status;
        self.callbacks.on_service_state_changed(
            status.is_overlay_attached(),
            status.is_secondary_active(),
        );
    }

    /// Drain the inbox on the owning thread. Returns how many messages were taken.
    pub fn dispatch_pending(&mut self) -> usize {
        let mut taken = 0;
        while let Some(Delivery { message, binding }) = self.inbox.pop_delivery() {
            taken += 1;
            if self.destroyed {
                trace!("dropping {message:?} after destroy");
                continue;
            }

            match message {
                InboundMessage::ServiceConnected => self.on_overlay_connected(),
                InboundMessage::ServiceDisconnected => self.on_overlay_disconnected(),
                InboundMessage::BindFailed => self.notify_status_changed(0),
                routed => {
                    if !self.accepts_routed(binding) {
                        debug!("dropping stale {routed:?}");
                        continue;
                    }
                    if let Some(router) = self.router.clone() {
                        router.handle(routed, self);
                    }
                }
            }
        }
        taken
    }

    // ============================================
    // ACCESSORS
    // ============================================

    /// Shared handle for feeding and awaiting the owning thread's inbox.
    pub fn inbox(&self) -> Arc<MessageQueue> {
        Arc::clone(&self.inbox)
    }

    /// The callback object most recently handed to the provider.
    pub fn callback(&self) -> Option<Arc<dyn OverlayCallback>> {
        self.router.as_ref().map(CallbackRouter::callback)
    }

    pub fn router(&self) -> Option<&CallbackRouter> {
        self.router.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.overlay().is_some()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn client_state(&self) -> ClientState {
        self.state
    }

    pub fn service_status(&self) -> ServiceStatus {
        self.service_status
    }

    pub fn client_options(&self) -> ClientOptions {
        self.options
    }

    pub fn protocol_version(&self) -> ProtocolVersion {
        self.version
    }

    pub fn window_params(&self) -> Option<&WindowParams> {
        self.window.as_ref()
    }

    pub fn client_log(&self) -> &EventLog {
        &self.client_log
    }

    pub fn service_log(&self) -> &EventLog {
        &self.service_log
    }

    /// Human-readable snapshot for diagnostics.
    pub fn dump(&self, prefix: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{prefix}ProtocolClient");
        let _ = writeln!(out, "{prefix}  isConnected: {}", self.is_connected());
        let _ = writeln!(out, "{prefix}  act.isBound: {}", self.connection.is_bound());
        let _ = writeln!(out, "{prefix}  serviceVersion: {}", self.version);
        let _ = writeln!(out, "{prefix}  clientVersion: {CLIENT_VERSION}");
        let _ = writeln!(out, "{prefix}  clientState: {}", self.state);
        let _ = writeln!(out, "{prefix}  serviceStatus: {}", self.service_status);
        let _ = writeln!(out, "{prefix}  clientOptions: {}", self.options.bits());

        let nested = format!("{prefix}  ");
        out.push_str(&self.client_log.dump(&nested));
        out.push_str(&self.service_log.dump(&nested));
        out
    }

    // ============================================
    // INTERNALS
    // ============================================

    /// Routed callbacks apply only while this client is the connection's
    /// registrant and the posting sink belongs to the current binding.
    fn accepts_routed(&self, binding: Option<u64>) -> bool {
        self.connection.is_bound()
            && self.connection.is_registered(&self.inbox)
            && binding.is_none_or(|b| b == self.connection.binding())
    }

    fn state_bits(&self) -> i32 {
        self.state.bits() as i32
    }

    /// Borrow the provider for one call attempt.
    fn overlay(&self) -> Option<OverlayProxy> {
        if self.destroyed || !self.service_connected || self.overlay_released {
            return None;
        }
        self.connection.overlay().map(OverlayProxy::new)
    }

    /// Run one remote call if the provider is present. Failures are logged
    /// and reported as `None`.
    fn remote<T>(
        &self,
        what: &str,
        call: impl FnOnce(&OverlayProxy) -> Result<T, IpcError>,
    ) -> Option<T> {
        let proxy = self.overlay()?;
        match call(&proxy) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Overlay call {what} failed: {e}");
                None
            }
        }
    }

    fn set_window(&mut self, window: Option<WindowParams>) {
        if self.window == window {
            return;
        }

        match window {
            Some(params) => {
                self.window = Some(params);
                self.overlay_released = false;
                self.attach_handshake();
            }
            None => {
                let is_reconfiguring = self.host.is_changing_configurations();
                self.remote("windowDetached", |p| p.window_detached(is_reconfiguring));
                self.window = None;
                self.overlay_released = true;
            }
        }
    }

    /// Hand the provider a callback and the window, then bring it up to date
    /// with the lifecycle. Each step fails independently.
    fn attach_handshake(&mut self) {
        let Some(params) = self.window.clone() else {
            return;
        };
        let Some(proxy) = self.overlay() else {
            debug!("attach deferred until the provider connects");
            return;
        };

        let binding = self.connection.binding();
        let router = self
            .router
            .get_or_insert_with(|| CallbackRouter::new(Arc::clone(&self.inbox), Rc::clone(&self.host)));
        router.bind(Arc::clone(&self.inbox), binding);
        let callback = router.callback();

        let options = self.options.bits();
        let attached = match self.methods.resolve(Capability::AttachWindow) {
            Some(MethodId::WindowAttached2) => proxy.window_attached_bundled(
                &params,
                &self.host.configuration(),
                options,
                callback,
            ),
            _ => proxy.window_attached(&params, callback, options),
        };
        if let Err(e) = attached {
            warn!("Overlay attach failed: {e}");
        }

        let capability = if self.state.is_resumed() {
            Capability::ReportResume
        } else {
            Capability::ReportPause
        };
        if let Err(e) = self.send_lifecycle(&proxy, capability) {
            warn!("Overlay lifecycle update after attach failed: {e}");
        }
    }

    fn report_lifecycle(&self, capability: Capability) {
        if self.window.is_none() {
            return;
        }
        let Some(proxy) = self.overlay() else {
            return;
        };
        if let Err(e) = self.send_lifecycle(&proxy, capability) {
            warn!("Overlay lifecycle update {capability:?} failed: {e}");
        }
    }

    fn send_lifecycle(&self, proxy: &OverlayProxy, capability: Capability) -> Result<(), IpcError> {
        match self.methods.resolve(capability) {
            Some(MethodId::NotifyLifecycle) => proxy.notify_lifecycle(self.state_bits()),
            Some(MethodId::Resume) => proxy.resume(),
            Some(MethodId::Pause) => proxy.pause(),
            Some(method) => {
                debug!("{capability:?} has no lifecycle mapping to {}", method.name());
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn on_overlay_connected(&mut self) {
        self.service_log.flag("Connected", true);
        self.service_connected = true;
        if self.window.is_some() {
            self.attach_handshake();
        }
    }

    fn on_overlay_disconnected(&mut self) {
        self.service_log.flag("Connected", false);
        self.service_connected = false;
        self.notify_status_changed(0);
    }

    fn disconnect(&mut self, unbind: bool) {
        if !self.destroyed {
            self.host.unregister_package_listener();
        }
        self.destroyed = true;

        if self.connection.mode() == ConnectionMode::PerClient {
            self.connection.unbind();
        }
        self.connection.unregister(&self.inbox, unbind);

        if let Some(router) = self.router.take() {
            router.clear();
        }
        self.inbox.clear();
    }
}

impl RoutedClient for ProtocolClient {
    fn service_status(&self) -> ServiceStatus {
        self.service_status
    }

    fn deliver_scroll(&self, progress: f32) {
        self.callbacks.on_overlay_scroll_changed(progress);
    }

    fn notify_status_changed(&mut self, status: i32) {
        ProtocolClient::notify_status_changed(self, status);
    }

    fn service_log(&mut self) -> &mut EventLog {
        &mut self.service_log
    }
}
