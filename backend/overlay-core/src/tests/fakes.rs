// Minimal collaborators shared by the unit tests.

use crate::connection::{BindFlags, ServiceBinder};
use crate::error::bind::BindError;
use crate::error::ipc::IpcError;
use crate::host::OverlayHost;
use crate::service::ServiceTarget;
use crate::wire::{OverlayCallback, OverlayTransport, Reply, Transaction};

use models::{Configuration, DisplaySize, WindowParams};

use std::cell::{Cell, RefCell};
use std::sync::Mutex;

#[derive(Default)]
pub struct CountingBinder {
    pub binds: Cell<u32>,
    pub unbinds: Cell<u32>,
    pub last_flags: Cell<Option<BindFlags>>,
    pub refuse: Cell<bool>,
}

impl ServiceBinder for CountingBinder {
    fn bind_service(&self, _target: &ServiceTarget, flags: BindFlags) -> Result<bool, BindError> {
        self.binds.set(self.binds.get() + 1);
        self.last_flags.set(Some(flags));
        Ok(!self.refuse.get())
    }

    fn unbind_service(&self, _target: &ServiceTarget) {
        self.unbinds.set(self.unbinds.get() + 1);
    }
}

#[derive(Default)]
pub struct NullTransport {
    pub calls: Mutex<Vec<u32>>,
}

impl OverlayTransport for NullTransport {
    fn transact(&self, transaction: Transaction) -> Result<Reply, IpcError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(transaction.method.code());
        Ok(Reply::default())
    }
}

pub struct WindowHost {
    pub params: RefCell<Option<WindowParams>>,
    pub display: DisplaySize,
}

impl WindowHost {
    pub fn new(params: Option<WindowParams>, display: DisplaySize) -> Self {
        Self {
            params: RefCell::new(params),
            display,
        }
    }
}

impl OverlayHost for WindowHost {
    fn window_params(&self) -> Option<WindowParams> {
        self.params.borrow().clone()
    }

    fn update_window_params(&self, params: WindowParams) {
        *self.params.borrow_mut() = Some(params);
    }

    fn configuration(&self) -> Configuration {
        Configuration::default()
    }

    fn display_size(&self) -> DisplaySize {
        self.display
    }

    fn is_changing_configurations(&self) -> bool {
        false
    }

    fn register_package_listener(&self, _package: &str) {}

    fn unregister_package_listener(&self) {}
}

pub struct NoopCallback;

impl OverlayCallback for NoopCallback {
    fn overlay_scroll_changed(&self, _progress: f32) {}

    fn overlay_status_changed(&self, _status: i32) {}

    fn window_shift_requested(&self, _hidden: bool) {}
}
