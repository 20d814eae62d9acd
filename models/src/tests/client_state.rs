use crate::{ClientState, ServiceStatus};

/// **VALUE**: Verifies that setting and clearing lifecycle bits is idempotent.
///
/// **WHY THIS MATTERS**: Hosts may deliver redundant lifecycle signals (resume twice,
/// pause without resume). The bitmask sent to the overlay provider must only reflect
/// the last call of each kind.
///
/// **BUG THIS CATCHES**: Would catch if set/clear toggled bits instead of assigning them.
#[test]
fn given_redundant_transitions_when_applied_then_only_last_of_each_kind_counts() {
    // GIVEN: A fresh state
    let mut state = ClientState::default();

    // WHEN: Applying redundant starts/resumes and a pause
    state.set_started(true);
    state.set_started(true);
    state.set_resumed(true);
    state.set_resumed(false);
    state.set_resumed(false);

    // THEN: Only STARTED remains
    assert_eq!(state.bits(), ClientState::STARTED);
    assert!(state.is_started());
    assert!(!state.is_resumed());
}

/// **VALUE**: Verifies that unknown bits are masked off when building from raw bits.
///
/// **BUG THIS CATCHES**: Would catch a lifecycle mask leaking bits the protocol never defined.
#[test]
fn given_raw_bits_with_unknown_flags_when_from_bits_then_masks_unknown() {
    // GIVEN/WHEN: Raw bits containing an undefined flag
    let state = ClientState::from_bits(0b111);

    // THEN: Only STARTED | RESUMED survive
    assert_eq!(state.bits(), 0b11);
}

/// **VALUE**: Verifies the two interpreted service status bits.
///
/// **WHY THIS MATTERS**: Scroll forwarding is gated on bit 0 and the host callback
/// reports bit 1 as the secondary capability. Swapping them would silently break both.
#[test]
fn given_status_five_when_decoded_then_attached_without_secondary() {
    // GIVEN: A status with bits 0 and 2 set
    let status = ServiceStatus::from_raw(5);

    // THEN: Attached, secondary inactive, raw preserved
    assert!(status.is_overlay_attached());
    assert!(!status.is_secondary_active());
    assert_eq!(status.raw(), 5);
}
