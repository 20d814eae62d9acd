use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

/// Transport-level failure of a single remote call.
///
/// Always caught by the protocol client and treated as "overlay absent";
/// never surfaced to the host.
#[derive(Debug, ThisError)]
pub enum IpcError {
    #[error("Dead Object Error: {message} {location}")]
    DeadObject {
        message: String,
        location: ErrorLocation,
    },

    #[error("Transaction Error: {message} {location}")]
    Transaction {
        message: String,
        location: ErrorLocation,
    },

    #[error("Unknown Method Error: {message} {location}")]
    UnknownMethod {
        message: String,
        location: ErrorLocation,
    },

    #[error("Protobuf Decode Error: {message} {location}")]
    ProtobufDecode {
        message: String,
        location: ErrorLocation,
    },

    #[error("Protobuf Encode Error: {message} {location}")]
    ProtobufEncode {
        message: String,
        location: ErrorLocation,
    },
}

impl From<prost::DecodeError> for IpcError {
    #[track_caller]
    fn from(error: prost::DecodeError) -> Self {
        IpcError::ProtobufDecode {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<prost::EncodeError> for IpcError {
    #[track_caller]
    fn from(error: prost::EncodeError) -> Self {
        IpcError::ProtobufEncode {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
