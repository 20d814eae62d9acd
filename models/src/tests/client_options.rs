use crate::ClientOptions;

/// **VALUE**: Verifies the packed option bits match the wire layout.
///
/// **WHY THIS MATTERS**: The overlay provider decodes these bits; a reordered flag
/// would enable prewarming when the user asked for the secondary capability.
///
/// **BUG THIS CATCHES**: Would catch if bit positions drift during refactoring.
#[test]
fn given_each_single_option_when_packed_then_sets_its_own_bit() {
    // GIVEN/WHEN: Each option enabled alone
    let primary = ClientOptions::new(true, false, false);
    let secondary = ClientOptions::new(false, true, false);
    let prewarm = ClientOptions::new(false, false, true);

    // THEN: Each maps to a distinct bit
    assert_eq!(primary.bits(), 1);
    assert_eq!(secondary.bits(), 2);
    assert_eq!(prewarm.bits(), 4);
    assert_eq!(ClientOptions::default().bits(), 7);
}

#[test]
fn given_equal_flags_when_compared_then_options_are_equal() {
    assert_eq!(
        ClientOptions::new(true, false, true),
        ClientOptions::new(true, false, true)
    );
    assert_ne!(
        ClientOptions::new(true, false, true),
        ClientOptions::new(true, true, true)
    );
}
