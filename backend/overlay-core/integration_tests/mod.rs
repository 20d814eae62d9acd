//! Integration tests for the overlay-core public API.
//!
//! Every test drives a [`overlay_core::ProtocolClient`] through fakes for the
//! host window, the platform binder and the provider transport.

mod client;
mod helpers;
mod routing;
mod shared;
mod version;
