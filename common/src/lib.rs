//! Shared primitives for the overlay client workspace.
//!
//! ## Architecture
//!
//! - **common** (this crate): cross-cutting helpers used by every error type
//! - **models**: pure data exchanged between the host and the overlay provider
//! - **overlay-core**: the protocol client operating on models
//! - **overlay-host**: a runnable host wiring everything together

pub mod error;

pub use error::error_location::ErrorLocation;

#[cfg(test)]
mod tests;
