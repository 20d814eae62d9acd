use crate::{ModelError, WindowParamsBuilder};

/// **VALUE**: Verifies that builder validation rejects a zero window token.
///
/// **WHY THIS MATTERS**: The overlay provider attaches its surface to the host through
/// this token. A zero token is never a real window and would make the provider attach to nothing.
///
/// **BUG THIS CATCHES**: Would catch if the token check is removed during refactoring.
#[test]
fn given_zero_token_when_building_window_params_then_returns_validation_error() {
    // GIVEN: Builder with a zero token
    let builder = WindowParamsBuilder::default()
        .with_token(0)
        .with_size(1080, 2340);

    // WHEN: Attempting to build
    let result = builder.build();

    // THEN: Should return validation error
    match result {
        Err(ModelError::Validation { message, .. }) => {
            assert_eq!(message, "Window token must be non-zero");
        }
        Ok(params) => panic!("Expected validation error, got {params:?}"),
    }
}

/// **VALUE**: Verifies that a missing size is reported.
///
/// **BUG THIS CATCHES**: Would catch if the builder silently defaulted size to 0x0.
#[test]
fn given_missing_size_when_building_then_returns_validation_error() {
    // GIVEN: Builder without a size
    let builder = WindowParamsBuilder::default().with_token(7);

    // WHEN: Attempting to build
    let result = builder.build();

    // THEN: Should return validation error
    match result {
        Err(ModelError::Validation { message, .. }) => {
            assert_eq!(message, "Window size is required");
        }
        Ok(params) => panic!("Expected validation error, got {params:?}"),
    }
}

/// **VALUE**: Verifies a fully specified builder produces the expected params.
#[test]
fn given_complete_builder_when_building_then_returns_params() {
    // GIVEN: A complete builder
    let builder = WindowParamsBuilder::default()
        .with_token(42)
        .with_position(0, 0)
        .with_size(1080, 2340)
        .with_flags(0x100);

    // WHEN: Building
    let params = builder.build().expect("builder should succeed");

    // THEN: Fields carried over
    assert_eq!(params.token, 42);
    assert_eq!(params.width, 1080);
    assert_eq!(params.height, 2340);
    assert!(params.has_flag(0x100));
}
