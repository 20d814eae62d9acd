//! Domain models for the overlay client.
//!
//! This crate contains pure data structures describing what travels between
//! a host window owner and the remote overlay provider. Models have no
//! protocol logic - the state machine operating on them lives in
//! `overlay-core`.

pub mod client_options;
pub mod client_state;
pub mod error;
pub mod protocol_version;
pub mod window;

pub use client_options::ClientOptions;
pub use client_state::{ClientState, ServiceStatus};
pub use error::model_error::ModelError;
pub use protocol_version::ProtocolVersion;
pub use window::builder::WindowParamsBuilder;
pub use window::{Configuration, DisplaySize, Orientation, WindowParams};

pub use common::ErrorLocation;

#[cfg(test)]
mod tests;
