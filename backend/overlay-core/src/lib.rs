//! Client side of the overlay provider protocol.
//!
//! A host window owner creates one [`ProtocolClient`] and forwards its
//! lifecycle to it. The client binds to the optional overlay provider
//! through a [`ConnectionManager`], speaks whichever protocol revision the
//! provider advertises, and feeds provider callbacks back to the owning
//! thread through its inbox.
//!
//! # Layout
//!
//! - [`event_log`] - bounded diagnostic history
//! - [`wire`] - method ids, version-gated method table and codec
//! - [`connection`] - binding lifecycle and the shared connection registry
//! - [`router`] - inbound callback queueing and dispatch
//! - [`client`] - the lifecycle state machine
//! - [`config`] - on-disk configuration

pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod event_log;
pub mod host;
pub mod proto;
pub mod router;
pub mod service;
pub mod version;
pub mod wire;

pub use client::{ProtocolClient, ProtocolClientBuilder};
pub use config::OverlayConfig;
pub use connection::{ConnectionManager, ConnectionMode, ServiceBinder, SharedConnectionRegistry};
pub use error::CoreError;
pub use event_log::EventLog;
pub use host::{OverlayClientCallbacks, OverlayHost};
pub use router::{CallbackRouter, InboundMessage, MessageQueue};
pub use version::VersionCache;

/// Protocol revision implemented by this client, reported in dumps.
pub const CLIENT_VERSION: u32 = 14;

#[cfg(test)]
mod tests;
