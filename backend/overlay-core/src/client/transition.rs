//! Timed open/close transitions share the integer argument of the plain
//! animate flag. A duration is tagged in the low bits so the provider can
//! tell `1` (animate) apart from `(ms << 2) | 1`.

use crate::error::protocol::ProtocolError;

use common::ErrorLocation;

use std::panic::Location;

pub const MAX_TRANSITION_DURATION_MS: i32 = 2047;

const DURATION_TAG: i32 = 1;
const TAG_MASK: i32 = 0b11;

/// How the provider should animate an open or close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayTransition {
    Animated(bool),
    Duration(i32),
}

/// Encode a transition duration for `open_overlay` / `close_overlay`.
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidArgument`] unless `0 < duration_ms <= 2047`.
#[track_caller]
pub fn encode_duration(duration_ms: i32) -> Result<i32, ProtocolError> {
    if duration_ms <= 0 || duration_ms > MAX_TRANSITION_DURATION_MS {
        return Err(ProtocolError::InvalidArgument {
            message: format!(
                "Invalid duration: {duration_ms}ms (must be 1-{MAX_TRANSITION_DURATION_MS})"
            ),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    Ok((duration_ms << 2) | DURATION_TAG)
}

/// Interpret the integer argument of an open/close call.
pub fn decode_transition(value: i32) -> OverlayTransition {
    let duration = value >> 2;
    if value & TAG_MASK == DURATION_TAG && duration > 0 {
        OverlayTransition::Duration(duration)
    } else {
        OverlayTransition::Animated(value != 0)
    }
}
