// Unit tests for logger module initialization logic

use crate::logger::initialize;

use std::path::PathBuf;

use tempfile::TempDir;

/// **VALUE**: Verifies that calling initialize() multiple times doesn't panic or fail.
///
/// **WHY THIS MATTERS**: Tests and the binary may both initialize logging. A second
/// call must not try to install another global logger.
///
/// **BUG THIS CATCHES**: Would catch removal of the Once or AtomicBool guards,
/// causing fern to fail when setting a global logger twice.
#[test]
fn given_logger_initialized_when_called_again_then_returns_ok() {
    // GIVEN: A writable temporary directory
    let temp_dir = TempDir::new().unwrap();

    // WHEN: Calling initialize twice
    let first = initialize(temp_dir.path());
    let second = initialize(temp_dir.path());

    // THEN: Both return Ok
    assert!(first.is_ok() || second.is_ok(), "One call should succeed");
    assert!(second.is_ok(), "Second initialization should be idempotent");
}

/// **VALUE**: Verifies an unwritable directory is reported as an error, not a panic.
///
/// **NOTE**: The guard makes only the first call in the process do real work, so
/// this only asserts the error shape when it is that first call.
#[test]
fn given_invalid_log_dir_when_initialize_called_then_no_panic() {
    let invalid_dir = PathBuf::from("/dev/null/invalid-path");

    let result = initialize(&invalid_dir);

    if let Err(err) = result {
        assert!(format!("{err:?}").contains("Host"));
    }
}
