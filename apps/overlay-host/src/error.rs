use common::ErrorLocation;

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the host binary.
///
/// Serializable so a session report can carry them as JSON alongside the dump.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum HostError {
    /// Error from this app
    #[error("Host Error: {message} {location}")]
    Host {
        message: String,
        location: ErrorLocation,
    },

    /// Error from overlay-core (client construction, caller misuse)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        location: ErrorLocation,
    },

    /// Config could not be loaded or saved
    #[error("Config Error: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
    },
}
