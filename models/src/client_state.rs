//! Bitmask state exchanged with the overlay provider.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FormatResult};

/// Host lifecycle state as reported to the overlay provider.
///
/// Only the host's owning thread mutates this value. The raw bits are what
/// `notifyLifecycle` carries on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientState(u32);

impl ClientState {
    pub const STARTED: u32 = 1;
    pub const RESUMED: u32 = 1 << 1;

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & (Self::STARTED | Self::RESUMED))
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_started(self) -> bool {
        self.0 & Self::STARTED != 0
    }

    pub const fn is_resumed(self) -> bool {
        self.0 & Self::RESUMED != 0
    }

    pub fn set_started(&mut self, started: bool) {
        self.set(Self::STARTED, started);
    }

    pub fn set_resumed(&mut self, resumed: bool) {
        self.set(Self::RESUMED, resumed);
    }

    fn set(&mut self, bit: u32, on: bool) {
        if on {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }
    }
}

impl Display for ClientState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        write!(f, "{}", self.0)
    }
}

/// Opaque status bitmask reported by the overlay provider.
///
/// Bit 0 means the overlay is attached, bit 1 that the secondary capability
/// (voice/hotword) is active. Other bits are carried but not interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceStatus(i32);

impl ServiceStatus {
    pub const OVERLAY_ATTACHED: i32 = 1;
    pub const SECONDARY_ACTIVE: i32 = 1 << 1;

    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> i32 {
        self.0
    }

    pub const fn is_overlay_attached(self) -> bool {
        self.0 & Self::OVERLAY_ATTACHED != 0
    }

    pub const fn is_secondary_active(self) -> bool {
        self.0 & Self::SECONDARY_ACTIVE != 0
    }
}

impl Display for ServiceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        write!(f, "{}", self.0)
    }
}
