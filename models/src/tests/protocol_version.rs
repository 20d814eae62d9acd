use crate::ProtocolVersion;

/// **VALUE**: Verifies that invalid metadata never produces a version below baseline semantics.
///
/// **WHY THIS MATTERS**: A provider advertising a garbage (negative) version must be treated
/// as the minimal protocol, not wrap around to a huge version that unlocks every RPC shape.
///
/// **BUG THIS CATCHES**: Would catch an `as u32` cast replacing the checked conversion.
#[test]
fn given_negative_metadata_when_interpreted_then_falls_back_to_baseline() {
    // GIVEN/WHEN: A negative advertised version
    let version = ProtocolVersion::from_metadata(-3);

    // THEN: Baseline
    assert_eq!(version, ProtocolVersion::BASELINE);
}

#[test]
fn given_version_five_when_checking_thresholds_then_compares_inclusively() {
    let version = ProtocolVersion::from_metadata(5);

    assert!(version.at_least(3));
    assert!(version.at_least(5));
    assert!(!version.at_least(7));
}
