use crate::client::transition::{
    MAX_TRANSITION_DURATION_MS, OverlayTransition, decode_transition, encode_duration,
};
use crate::error::protocol::ProtocolError;

/// **VALUE**: Verifies the accepted duration range and the low-bit tag.
///
/// **WHY THIS MATTERS**: The provider tells a duration from the plain animate flag
/// only by the tag bits. A wrong tag makes it treat every duration as "animate".
///
/// **BUG THIS CATCHES**: Would catch an off-by-one at either bound or a wrong shift.
#[test]
fn given_durations_in_range_when_encoded_then_tagged_and_round_trip() {
    for ms in [1, 2, 250, 1024, MAX_TRANSITION_DURATION_MS] {
        // WHEN: Encoding a valid duration
        let encoded = encode_duration(ms).expect("valid duration");

        // THEN: Low two bits are 01 and decoding yields the input
        assert_eq!(encoded & 0b11, 1, "tag bits for {ms}");
        assert_eq!(encoded, (ms << 2) | 1);
        assert_eq!(decode_transition(encoded), OverlayTransition::Duration(ms));
    }
}

#[test]
fn given_durations_out_of_range_when_encoded_then_invalid_argument() {
    for ms in [i32::MIN, -1, 0, MAX_TRANSITION_DURATION_MS + 1, i32::MAX] {
        let result = encode_duration(ms);

        assert!(
            matches!(result, Err(ProtocolError::InvalidArgument { .. })),
            "{ms} should be rejected"
        );
    }
}

#[test]
fn given_plain_animate_flags_when_decoded_then_animated() {
    assert_eq!(decode_transition(1), OverlayTransition::Animated(true));
    assert_eq!(decode_transition(0), OverlayTransition::Animated(false));
}

#[test]
fn given_rejected_duration_when_formatted_then_names_bounds() {
    let err = encode_duration(4000).unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("Invalid Argument Error: Invalid duration: 4000ms"));
    assert!(message.contains("1-2047"));
}
