use common::ErrorLocation;

use thiserror::Error as ThisError;

/// Caller misuse of the protocol surface. Propagated, never logged-and-ignored.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
    #[error("Invalid Argument Error: {message} {location}")]
    InvalidArgument {
        message: String,
        location: ErrorLocation,
    },
}
