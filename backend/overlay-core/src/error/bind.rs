use common::ErrorLocation;

use thiserror::Error as ThisError;

/// Failure to bind the overlay provider's service.
#[derive(Debug, ThisError)]
pub enum BindError {
    #[error("Security Error: {message} {location}")]
    Security {
        message: String,
        location: ErrorLocation,
    },

    #[error("Not Installed Error: {message} {location}")]
    NotInstalled {
        message: String,
        location: ErrorLocation,
    },
}
