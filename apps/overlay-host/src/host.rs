//! Demo host collaborators: a window owner, a binder and a package manager.

use overlay_core::connection::{BindFlags, ServiceBinder};
use overlay_core::error::bind::BindError;
use overlay_core::service::{PackageResolver, ServiceDescriptor, ServiceTarget};
use overlay_core::{OverlayClientCallbacks, OverlayHost};

use common::ErrorLocation;
use models::{Configuration, DisplaySize, WindowParams};

use std::cell::{Cell, RefCell};
use std::panic::Location;

use log::{debug, info};

/// A single window on a fixed display.
pub struct DemoHost {
    params: RefCell<Option<WindowParams>>,
    display: DisplaySize,
    configuration: Configuration,
    changing_configurations: Cell<bool>,
    listening_to: RefCell<Option<String>>,
}

impl DemoHost {
    pub fn new(display: DisplaySize) -> Self {
        Self {
            params: RefCell::new(None),
            display,
            configuration: Configuration::default(),
            changing_configurations: Cell::new(false),
            listening_to: RefCell::new(None),
        }
    }

    pub fn set_window(&self, params: Option<WindowParams>) {
        *self.params.borrow_mut() = params;
    }

    pub fn set_changing_configurations(&self, changing: bool) {
        self.changing_configurations.set(changing);
    }

    pub fn listening_to(&self) -> Option<String> {
        self.listening_to.borrow().clone()
    }
}

impl OverlayHost for DemoHost {
    fn window_params(&self) -> Option<WindowParams> {
        self.params.borrow().clone()
    }

    fn update_window_params(&self, params: WindowParams) {
        debug!("window moved to x={} flags={:#x}", params.x, params.flags);
        *self.params.borrow_mut() = Some(params);
    }

    fn configuration(&self) -> Configuration {
        self.configuration.clone()
    }

    fn display_size(&self) -> DisplaySize {
        self.display
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

/// Binder whose connection result is delivered later by the session loop.
pub struct DemoBinder {
    installed: bool,
    pending: Cell<bool>,
}

impl DemoBinder {
    pub fn new(installed: bool) -> Self {
        Self {
            installed,
            pending: Cell::new(false),
        }
    }

    /// Whether a bind started since the last call.
    pub fn take_pending(&self) -> bool {
        self.pending.replace(false)
    }
}

impl ServiceBinder for DemoBinder {
    fn bind_service(&self, target: &ServiceTarget, flags: BindFlags) -> Result<bool, BindError> {
        if !self.installed {
            return Err(BindError::NotInstalled {
                message: format!("{} is not installed", target.package),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        debug!("binding {} with flags {:#x}", target.component(), flags.bits());
        self.pending.set(true);
        Ok(true)
    }

    fn unbind_service(&self, target: &ServiceTarget) {
        debug!("unbinding {}", target.component());
        self.pending.set(false);
    }
}

/// Package manager that knows about exactly one provider.
pub struct DemoResolver {
    descriptor: Option<ServiceDescriptor>,
}

impl DemoResolver {
    pub fn installed(metadata_key: &str, version: u32) -> Self {
        Self {
            descriptor: Some(ServiceDescriptor::default().with_metadata(metadata_key, i64::from(version))),
        }
    }

    pub fn missing() -> Self {
        Self { descriptor: None }
    }
}

impl PackageResolver for DemoResolver {
    fn resolve_service(&self, _target: &ServiceTarget) -> Option<ServiceDescriptor> {
        self.descriptor.clone()
    }
}

/// Observer that records what the overlay reported.
#[derive(Default)]
pub struct LoggingCallbacks {
    last_scroll: Cell<Option<f32>>,
    last_state: Cell<Option<(bool, bool)>>,
}

impl LoggingCallbacks {
    pub fn last_scroll(&self) -> Option<f32> {
        self.last_scroll.get()
    }

    pub fn last_state(&self) -> Option<(bool, bool)> {
        self.last_state.get()
    }
}

impl OverlayClientCallbacks for LoggingCallbacks {
    fn on_overlay_scroll_changed(&self, progress: f32) {
        debug!("overlay scroll {progress}");
        self.last_scroll.set(Some(progress));
    }

    fn on_service_state_changed(&self, overlay_attached: bool, secondary_active: bool) {
        info!("overlay attached: {overlay_attached}, secondary active: {secondary_active}");
        self.last_state.set(Some((overlay_attached, secondary_active)));
    }
}
