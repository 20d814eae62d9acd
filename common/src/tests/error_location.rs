use crate::ErrorLocation;

use std::panic::Location;

#[track_caller]
fn capture() -> ErrorLocation {
    ErrorLocation::from(Location::caller())
}

/// **VALUE**: Verifies that `#[track_caller]` propagates to the error site.
///
/// **WHY THIS MATTERS**: Every error in the workspace reports where it was raised.
/// If propagation breaks, all errors point at the constructor instead of the failure.
///
/// **BUG THIS CATCHES**: Would catch `#[track_caller]` being dropped from a helper.
#[test]
fn given_two_call_sites_when_capturing_then_lines_differ_by_one() {
    // GIVEN/WHEN: Two consecutive captures
    let first = capture();
    let second = capture();

    // THEN: Same file, sequential lines
    assert_eq!(first.file, second.file);
    assert_eq!(first.line + 1, second.line);
    assert!(first.file.contains("error_location.rs"));
}

/// **VALUE**: Verifies the bracketed `[file:line:column]` display format.
#[test]
fn given_location_when_displayed_then_uses_bracketed_format() {
    // GIVEN: A fixed location
    let location = ErrorLocation {
        file: "src/lib.rs",
        line: 12,
        column: 5,
    };

    // WHEN/THEN: Rendered with brackets and two colons
    assert_eq!(location.to_string(), "[src/lib.rs:12:5]");
}
