use serde::{Deserialize, Serialize};

/// Local feature toggles sent to the overlay provider.
///
/// Immutable once built; replace the whole value to change options. The
/// packed form is what travels on the wire with every attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientOptions {
    enable_primary_surface: bool,
    enable_secondary_capability: bool,
    enable_prewarming: bool,
}

impl ClientOptions {
    pub const PRIMARY_SURFACE: i32 = 1;
    pub const SECONDARY_CAPABILITY: i32 = 1 << 1;
    pub const PREWARMING: i32 = 1 << 2;

    pub const fn new(
        enable_primary_surface: bool,
        enable_secondary_capability: bool,
        enable_prewarming: bool,
    ) -> Self {
        Self {
            enable_primary_surface,
            enable_secondary_capability,
            enable_prewarming,
        }
    }

    pub const fn primary_surface(&self) -> bool {
        self.enable_primary_surface
    }

    pub const fn secondary_capability(&self) -> bool {
        self.enable_secondary_capability
    }

    pub const fn prewarming(&self) -> bool {
        self.enable_prewarming
    }

    /// Packed wire representation.
    pub const fn bits(&self) -> i32 {
        let mut bits = 0;
        if self.enable_primary_surface {
            bits |= Self::PRIMARY_SURFACE;
        }
        if self.enable_secondary_capability {
            bits |= Self::SECONDARY_CAPABILITY;
        }
        if self.enable_prewarming {
            bits |= Self::PREWARMING;
        }
        bits
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::new(true, true, true)
    }
}
