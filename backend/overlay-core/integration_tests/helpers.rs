//! Test doubles for the host, the binder and the overlay provider.

use overlay_core::connection::{BindFlags, ConnectionManager, ConnectionMode, ServiceBinder};
use overlay_core::error::bind::BindError;
use overlay_core::error::ipc::IpcError;
use overlay_core::service::{PackageResolver, ServiceDescriptor, ServiceTarget};
use overlay_core::wire::{
    MethodId, OverlayCall, OverlayCallback, OverlayTransport, Reply, Transaction, bool_reply,
};
use overlay_core::{OverlayClientCallbacks, OverlayHost, ProtocolClient};

use common::ErrorLocation;
use models::{ClientOptions, Configuration, DisplaySize, ProtocolVersion, WindowParams};

use std::cell::{Cell, RefCell};
use std::panic::Location;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub fn window(token: u64) -> WindowParams {
    WindowParams {
        token,
        x: 0,
        y: 0,
        width: 1080,
        height: 2340,
        flags: 0,
    }
}

// ============================================
// PROVIDER
// ============================================

/// Overlay provider that decodes and records every call it receives.
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<OverlayCall>>,
    callback: Mutex<Option<Arc<dyn OverlayCallback>>>,
    failing: AtomicBool,
    secondary_active: AtomicBool,
}

impl RecordingTransport {
    pub fn calls(&self) -> Vec<OverlayCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<MethodId> {
        self.calls().iter().map(OverlayCall::method).collect()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// The callback object passed with the most recent attach.
    pub fn callback(&self) -> Arc<dyn OverlayCallback> {
        self.callback
            .lock()
            .unwrap()
            .clone()
            .expect("no attach received")
    }

    pub fn fail_calls(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_secondary_active(&self, active: bool) {
        self.secondary_active.store(active, Ordering::SeqCst);
    }
}

impl OverlayTransport for RecordingTransport {
    fn transact(&self, transaction: Transaction) -> Result<Reply, IpcError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(IpcError::DeadObject {
                message: "provider died".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if let Some(callback) = transaction.callback.clone() {
            *self.callback.lock().unwrap() = Some(callback);
        }

        let call = OverlayCall::decode(&transaction)?;
        self.calls.lock().unwrap().push(call);

        Ok(match transaction.method {
            MethodId::QuerySecondaryCapabilityActive => {
                bool_reply(self.secondary_active.load(Ordering::SeqCst))
            }
            MethodId::QueryExtendedCapability => bool_reply(true),
            _ => Reply::default(),
        })
    }
}

// ============================================
// BINDER
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    Accept,
    Refuse,
    Deny,
}

pub struct FakeBinder {
    pub outcome: Cell<BindOutcome>,
    pub binds: Cell<u32>,
    pub unbinds: Cell<u32>,
    pub last_flags: Cell<Option<BindFlags>>,
}

impl Default for FakeBinder {
    fn default() -> Self {
        Self {
            outcome: Cell::new(BindOutcome::Accept),
            binds: Cell::new(0),
            unbinds: Cell::new(0),
            last_flags: Cell::new(None),
        }
    }
}

impl ServiceBinder for FakeBinder {
    fn bind_service(&self, target: &ServiceTarget, flags: BindFlags) -> Result<bool, BindError> {
        self.binds.set(self.binds.get() + 1);
        self.last_flags.set(Some(flags));
        match self.outcome.get() {
            BindOutcome::Accept => Ok(true),
            BindOutcome::Refuse => Ok(false),
            BindOutcome::Deny => Err(BindError::Security {
                message: format!("Not allowed to bind to {}", target.component()),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    fn unbind_service(&self, _target: &ServiceTarget) {
        self.unbinds.set(self.unbinds.get() + 1);
    }
}

// ============================================
// HOST
// ============================================

pub struct RecordingHost {
    pub params: RefCell<Option<WindowParams>>,
    pub changing_configurations: Cell<bool>,
    pub listening_to: RefCell<Option<String>>,
    pub configuration: RefCell<Configuration>,
}

impl RecordingHost {
    pub fn new(params: Option<WindowParams>) -> Self {
        Self {
            params: RefCell::new(params),
            changing_configurations: Cell::new(false),
            listening_to: RefCell::new(None),
            configuration: RefCell::new(Configuration::default()),
        }
    }
}

impl OverlayHost for RecordingHost {
    fn window_params(&self) -> Option<WindowParams> {
        self.params.borrow().clone()
    }

    fn update_window_params(&self, params: WindowParams) {
        *self.params.borrow_mut() = Some(params);
    }

    fn configuration(&self) -> Configuration {
        self.configuration.borrow().clone()
    }

    fn display_size(&self) -> DisplaySize {
        DisplaySize::new(1080, 2340)
    }

    fn is_changing_configurations(&self) -> bool {
        self.changing_configurations.get()
    }

    fn register_package_listener(&self, package: &str) {
        *self.listening_to.borrow_mut() = Some(package.to_string());
    }

    fn unregister_package_listener(&self) {
        *self.listening_to.borrow_mut() = None;
    }
}

#[derive(Default)]
pub struct RecordingCallbacks {
    pub scrolls: RefCell<Vec<f32>>,
    pub states: RefCell<Vec<(bool, bool)>>,
}

impl OverlayClientCallbacks for RecordingCallbacks {
    fn on_overlay_scroll_changed(&self, progress: f32) {
        self.scrolls.borrow_mut().push(progress);
    }

    fn on_service_state_changed(&self, overlay_attached: bool, secondary_active: bool) {
        self.states
            .borrow_mut()
            .push((overlay_attached, secondary_active));
    }
}

// ============================================
// PACKAGE MANAGER
// ============================================

#[derive(Default)]
pub struct FakeResolver {
    pub descriptor: Option<ServiceDescriptor>,
    pub lookups: Cell<u32>,
}

impl FakeResolver {
    pub fn advertising(key: &str, version: i64) -> Self {
        Self {
            descriptor: Some(ServiceDescriptor::default().with_metadata(key, version)),
            lookups: Cell::new(0),
        }
    }
}

impl PackageResolver for FakeResolver {
    fn resolve_service(&self, _target: &ServiceTarget) -> Option<ServiceDescriptor> {
        self.lookups.set(self.lookups.get() + 1);
        self.descriptor.clone()
    }
}

// ============================================
// HARNESS
// ============================================

/// A client wired to fakes, created without a window.
pub struct Harness {
    pub client: ProtocolClient,
    pub binder: Rc<FakeBinder>,
    pub host: Rc<RecordingHost>,
    pub callbacks: Rc<RecordingCallbacks>,
    pub connection: Rc<ConnectionManager>,
    pub transport: Arc<RecordingTransport>,
}

impl Harness {
    pub fn new(version: u32) -> Self {
        let binder = Rc::new(FakeBinder::default());
        let connection = Rc::new(ConnectionManager::new(
            binder.clone(),
            ServiceTarget::default(),
            ConnectionMode::PerClient,
        ));
        Self::with_connection(version, binder, connection, None)
    }

    pub fn with_connection(
        version: u32,
        binder: Rc<FakeBinder>,
        connection: Rc<ConnectionManager>,
        params: Option<WindowParams>,
    ) -> Self {
        let host = Rc::new(RecordingHost::new(params));
        let callbacks = Rc::new(RecordingCallbacks::default());

        let client = ProtocolClient::builder()
            .with_host(host.clone())
            .with_callbacks(callbacks.clone())
            .with_connection(connection.clone())
            .with_version(ProtocolVersion::new(version))
            .with_options(ClientOptions::default())
            .build()
            .expect("client");

        Self {
            client,
            binder,
            host,
            callbacks,
            connection,
            transport: Arc::new(RecordingTransport::default()),
        }
    }

    /// Deliver the provider handle and let the client process it.
    pub fn connect(&mut self) {
        self.connection.on_service_connected(self.transport.clone());
        self.client.dispatch_pending();
    }

    /// Connected, started, resumed and attached, with the provider's call log
    /// cleared.
    pub fn ready(version: u32) -> Self {
        let mut harness = Self::new(version);
        harness.connect();
        harness.client.on_start();
        harness.client.on_resume();
        harness.client.on_window_attached(window(1));
        harness.transport.clear();
        harness
    }
}
