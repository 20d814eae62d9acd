use crate::config::OverlayConfig;
use crate::error::config::ConfigError;

use std::fs;

use tempfile::TempDir;

#[test]
fn given_missing_file_when_loaded_then_defaults() {
    let dir = TempDir::new().unwrap();

    let config = OverlayConfig::load(dir.path()).unwrap();

    assert_eq!(config, OverlayConfig::default());
    assert_eq!(config.event_log.client_capacity, 20);
    assert_eq!(config.event_log.service_capacity, 10);
}

/// **VALUE**: Verifies save then load preserves a customized config.
///
/// **BUG THIS CATCHES**: Would catch serde renames or a save that writes the temp
/// file but never renames it into place.
#[test]
fn given_saved_config_when_loaded_then_values_preserved_and_no_temp_left() {
    // GIVEN: A customized config
    let dir = TempDir::new().unwrap();
    let mut config = OverlayConfig::default();
    config.options.enable_prewarming = false;
    config.service.package = "org.example.overlay".to_string();

    // WHEN: Saving and loading back
    config.save(dir.path()).unwrap();
    let loaded = OverlayConfig::load(dir.path()).unwrap();

    // THEN: Same values, temp file gone
    assert_eq!(loaded, config);
    assert_eq!(loaded.client_options().bits(), 0b011);
    assert_eq!(loaded.service_target().package, "org.example.overlay");
    assert!(!dir.path().join("overlay.json.tmp").exists());
}

#[test]
fn given_partial_json_when_loaded_then_missing_fields_defaulted() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("overlay.json"),
        r#"{"options": {"enable_secondary_capability": false}}"#,
    )
    .unwrap();

    let config = OverlayConfig::load(dir.path()).unwrap();

    assert!(config.options.enable_primary_surface);
    assert!(!config.options.enable_secondary_capability);
    assert_eq!(config.version, 1);
}

#[test]
fn given_malformed_json_when_loaded_then_parse_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("overlay.json"), "{ not json").unwrap();

    let result = OverlayConfig::load(dir.path());

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
fn given_invalid_values_when_validated_then_rejected() {
    let mut bad_version = OverlayConfig::default();
    bad_version.version = 2;
    let mut empty_package = OverlayConfig::default();
    empty_package.service.package = "  ".to_string();
    let mut zero_capacity = OverlayConfig::default();
    zero_capacity.event_log.service_capacity = 0;

    for config in [bad_version, empty_package, zero_capacity] {
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}

#[test]
fn given_invalid_config_when_saved_then_nothing_written() {
    let dir = TempDir::new().unwrap();
    let mut config = OverlayConfig::default();
    config.version = 0;

    assert!(config.save(dir.path()).is_err());
    assert!(!dir.path().join("overlay.json").exists());
}
