//! Seams between the protocol client and the application hosting it.

use models::{Configuration, DisplaySize, WindowParams};

/// The window owner the client is attached to.
///
/// Every method is called on the owning thread.
pub trait OverlayHost {
    /// Current placement of the host window, `None` while not attached.
    fn window_params(&self) -> Option<WindowParams>;

    fn update_window_params(&self, params: WindowParams);

    fn configuration(&self) -> Configuration;

    fn display_size(&self) -> DisplaySize;

    /// True while the host is being torn down only to be recreated.
    fn is_changing_configurations(&self) -> bool;

    /// Start listening for (re)installs of the provider package.
    fn register_package_listener(&self, package: &str);

    fn unregister_package_listener(&self);
}

/// Observers the host registers for overlay state.
pub trait OverlayClientCallbacks {
    fn on_overlay_scroll_changed(&self, progress: f32);

    fn on_service_state_changed(&self, overlay_attached: bool, secondary_active: bool);
}
