//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;

use roombook_domain::{ImportMode, OrphanPolicy, SecretSource};
use roombook_infra::config;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_from_toml_file() {
    let toml_content = r#"
[sis]
base_url = "https://academy.sis.example.sc/"
username = "staff-updater"
request_timeout_secs = 20

[secret]
source = "keyring"
name = "ArborStaffUpdaterPassword"
service = "roombook"

[import]
mode = "unavailability"
orphan_policy = "delete"
cache_lookups = false
email_address_type = "HOME"
"#;

    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(toml_content.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("toml");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let result = config::load(Some(path.clone()));
    assert!(result.is_ok(), "Failed to load config from TOML file: {:?}", result.err());

    let config = result.unwrap();

    // Connection settings, trailing slash trimmed
    assert_eq!(config.sis.base_url, "https://academy.sis.example.sc");
    assert_eq!(config.sis.username, "staff-updater");
    assert_eq!(config.sis.request_timeout_secs, 20);

    // Secret settings
    assert_eq!(config.secret.source, SecretSource::Keyring);
    assert_eq!(config.secret.name, "ArborStaffUpdaterPassword");

    // Import settings
    assert_eq!(config.import.mode, ImportMode::Unavailability);
    assert_eq!(config.import.orphan_policy, OrphanPolicy::Delete);
    assert!(!config.import.cache_lookups);
    assert_eq!(config.import.email_address_type, "HOME");

    // Cleanup
    std::fs::remove_file(path).ok();
}

#[test]
fn test_missing_sis_section_is_rejected() {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(b"[import]\norphan_policy = \"keep\"\n").expect("write");

    let path = temp_file.path().with_extension("toml");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let result = config::load(Some(path.clone()));
    assert!(result.is_err(), "Config without [sis] must not load");

    std::fs::remove_file(path).ok();
}
