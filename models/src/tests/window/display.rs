use crate::DisplaySize;

/// **VALUE**: Verifies the off-screen shift uses the larger display edge.
///
/// **WHY THIS MATTERS**: The host window must leave the screen completely in both
/// orientations; using the width alone would leave a strip visible in portrait.
#[test]
fn given_portrait_display_when_computing_shift_then_uses_height() {
    // GIVEN: A portrait display
    let display = DisplaySize::new(1080, 2340);

    // WHEN/THEN: Shift is the negated larger edge
    assert_eq!(display.off_screen_shift(), -2340);
}
