//! Binding to the overlay provider.
//!
//! A [`ConnectionManager`] owns one binding and forwards connection results
//! to at most one registered client inbox. In [`ConnectionMode::Shared`] the
//! same manager outlives individual clients through the
//! [`SharedConnectionRegistry`].

mod manager;
mod registry;

pub use manager::ConnectionManager;
pub use registry::SharedConnectionRegistry;

use crate::error::bind::BindError;
use crate::service::ServiceTarget;

/// Platform service binding.
///
/// `bind_service` starts an asynchronous bind. A successful result only means
/// the bind is in flight; the handle arrives through
/// [`ConnectionManager::on_service_connected`], possibly before this call
/// returns.
pub trait ServiceBinder {
    fn bind_service(&self, target: &ServiceTarget, flags: BindFlags) -> Result<bool, BindError>;

    fn unbind_service(&self, target: &ServiceTarget);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindFlags(u32);

impl BindFlags {
    pub const AUTO_CREATE: u32 = 0x1;
    pub const WAIVE_PRIORITY: u32 = 0x20;

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, flag: u32) -> bool {
        self.0 & flag == flag
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConnectionMode {
    /// One binding per client, released when the client goes away.
    #[default]
    PerClient,
    /// One binding reused by successive clients of the same host.
    Shared,
}

impl ConnectionMode {
    pub const fn bind_flags(self) -> BindFlags {
        match self {
            ConnectionMode::PerClient => BindFlags(BindFlags::AUTO_CREATE),
            ConnectionMode::Shared => BindFlags(BindFlags::AUTO_CREATE | BindFlags::WAIVE_PRIORITY),
        }
    }
}
