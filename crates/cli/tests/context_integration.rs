//! Integration tests for building the application context from a config file

use std::sync::Mutex;

use roombook_cli::context::AppContext;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn write_config(dir: &tempfile::TempDir, secret_name: &str) -> std::path::PathBuf {
    let path = dir.path().join("roombook.toml");
    let content = format!(
        r#"
[sis]
base_url = "https://academy.sis.example.sc/"
username = "staff-updater"

[secret]
source = "env"
name = "{secret_name}"
"#
    );
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn context_reads_password_from_named_variable() {
    let _guard = ENV_LOCK.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "RoombookCliContextPassword");

    std::env::remove_var("ROOMBOOK_SECRET");
    std::env::set_var("ROOMBOOK_CLI_CONTEXT_PASSWORD", "hunter2");

    let ctx = AppContext::new(Some(path)).unwrap();
    assert_eq!(ctx.config.sis.base_url, "https://academy.sis.example.sc");
    assert_eq!(ctx.client.credentials().username(), "staff-updater");
    assert_eq!(ctx.client.credentials().password(), "hunter2");

    std::env::remove_var("ROOMBOOK_CLI_CONTEXT_PASSWORD");
}

#[test]
fn missing_secret_names_the_variables_to_set() {
    let _guard = ENV_LOCK.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "RoombookCliMissingPassword");

    std::env::remove_var("ROOMBOOK_SECRET");
    std::env::remove_var("ROOMBOOK_CLI_MISSING_PASSWORD");

    let Err(err) = AppContext::new(Some(path)) else {
        panic!("expected a secret error");
    };
    let message = format!("{err:#}");
    assert!(message.contains("failed to read secret 'RoombookCliMissingPassword'"), "{message}");
    assert!(message.contains("ROOMBOOK_CLI_MISSING_PASSWORD"), "{message}");
}

#[test]
fn missing_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let Err(err) = AppContext::new(Some(dir.path().join("absent.toml"))) else {
        panic!("expected a config error");
    };
    assert!(format!("{err:#}").contains("failed to load configuration"));
}
