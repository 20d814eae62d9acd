//! Window placement and display configuration handed to the overlay provider.

pub mod builder;

use serde::{Deserialize, Serialize};

/// Placement parameters of the host window.
///
/// `None` at the client level means "not attached to any window"; a value
/// triggers the attach handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowParams {
    pub token: u64,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub flags: u32,
}

impl WindowParams {
    /// Lets the window extend outside the screen, used while shifted off-screen.
    pub const FLAG_LAYOUT_NO_LIMITS: u32 = 0x0000_0200;

    pub const fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag == flag
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Host display configuration, bundled with the window params on newer protocols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub orientation: Orientation,
    pub screen_width_dp: i32,
    pub screen_height_dp: i32,
    pub density_dpi: i32,
    pub night_mode: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            orientation: Orientation::Portrait,
            screen_width_dp: 411,
            screen_height_dp: 891,
            density_dpi: 420,
            night_mode: false,
        }
    }
}

/// Real pixel size of the default display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySize {
    pub width: i32,
    pub height: i32,
}

impl DisplaySize {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Horizontal offset that moves a window fully off-screen in any orientation.
    pub fn off_screen_shift(&self) -> i32 {
        -self.width.max(self.height)
    }
}
