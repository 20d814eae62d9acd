// Unit tests for error module
// Session reports carry errors as JSON

use crate::error::HostError;

use common::ErrorLocation;

use std::panic::Location;

/// **VALUE**: Tests that host errors serialize with their variant tag.
///
/// **WHY THIS MATTERS**: A session report that cannot be serialized loses the one
/// piece of information needed to triage a failed run.
///
/// **BUG THIS CATCHES**: Would catch removal of `#[derive(Serialize)]` or a field
/// type that cannot be serialized.
#[test]
fn given_host_error_when_serialized_then_contains_variant_and_message() {
    // GIVEN: A HostError
    let err = HostError::Config {
        message: String::from("bad capacity"),
        location: ErrorLocation::from(Location::caller()),
    };

    // WHEN: Serializing to JSON
    let json = serde_json::to_string(&err).expect("serializable");

    // THEN: Tag and message are present
    assert!(json.contains("\"type\":\"Config\""), "JSON should carry the variant tag");
    assert!(json.contains("bad capacity"), "JSON should contain message");
}

#[test]
fn given_host_error_when_displayed_then_includes_location() {
    let err = HostError::Host {
        message: String::from("boom"),
        location: ErrorLocation::from(Location::caller()),
    };

    let text = err.to_string();

    assert!(text.starts_with("Host Error: boom ["));
    assert!(text.contains("error.rs"));
}
