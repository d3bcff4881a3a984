//! Tests for configuration resolution
//!
//! Tests that touch YOKO_ROOT_FOLDER are marked #[serial] so they do not
//! race on the process environment.

use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;
use yoko_common::config::{
    CliOverrides, CompiledDefaults, RootFolderInitializer, RootFolderResolver, ServiceConfig,
    TomlConfig, DEFAULT_FROM_EMAIL, DEFAULT_PORT, ROOT_FOLDER_ENV,
};

#[test]
fn test_compiled_defaults() {
    let defaults = CompiledDefaults::for_current_platform();
    assert!(!defaults.root_folder.as_os_str().is_empty());
    assert_eq!(defaults.port, DEFAULT_PORT);
    assert_eq!(defaults.host, "127.0.0.1");
}

#[test]
#[serial]
fn test_cli_arg_beats_env_and_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/yoko-from-env");
    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/yoko-from-toml")),
        ..Default::default()
    };

    let resolver = RootFolderResolver::new(Some(PathBuf::from("/tmp/yoko-from-cli")), &toml);
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/yoko-from-cli"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_env_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/yoko-from-env");
    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/yoko-from-toml")),
        ..Default::default()
    };

    let resolver = RootFolderResolver::new(None, &toml);
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/yoko-from-env"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_toml_beats_default() {
    env::remove_var(ROOT_FOLDER_ENV);
    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/yoko-from-toml")),
        ..Default::default()
    };

    let resolver = RootFolderResolver::new(None, &toml);
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/yoko-from-toml"));
}

#[test]
#[serial]
fn test_falls_back_to_compiled_default() {
    env::remove_var(ROOT_FOLDER_ENV);
    let resolver = RootFolderResolver::new(None, &TomlConfig::default());
    assert_eq!(
        resolver.resolve(),
        CompiledDefaults::for_current_platform().root_folder
    );
}

#[test]
fn test_initializer_database_path() {
    let root = PathBuf::from("/tmp/yoko-test-root");
    let initializer = RootFolderInitializer::new(root.clone());
    assert_eq!(initializer.database_path(), root.join("yoko.db"));
}

#[test]
fn test_initializer_creates_directory_idempotently() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("a").join("b");
    let initializer = RootFolderInitializer::new(root.clone());

    initializer.ensure_directory_exists().unwrap();
    initializer.ensure_directory_exists().unwrap();

    assert!(root.is_dir());
    assert!(!initializer.database_exists());
}

#[test]
fn test_toml_parsing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
root_folder = "/srv/yoko"
port = 8080

[mail]
api_key = "md-secret"
"#,
    )
    .unwrap();

    let config = TomlConfig::load(&path).unwrap();
    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/yoko")));
    assert_eq!(config.port, Some(8080));
    assert_eq!(config.host, None);
    assert_eq!(config.mail.api_key.as_deref(), Some("md-secret"));
}

#[test]
fn test_malformed_toml_falls_back_to_default() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = \"not a number\"").unwrap();

    assert!(TomlConfig::load(&path).is_err());
    let config = TomlConfig::load_or_default(Some(&path));
    assert!(config.port.is_none());
}

#[test]
fn test_missing_toml_falls_back_to_default() {
    let config = TomlConfig::load_or_default(Some(&PathBuf::from("/nonexistent/yoko/config.toml")));
    assert!(config.root_folder.is_none());
}

#[test]
#[serial]
fn test_service_config_priority() {
    env::remove_var(ROOT_FOLDER_ENV);
    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/srv/yoko")),
        host: Some("0.0.0.0".to_string()),
        port: Some(8080),
        ..Default::default()
    };
    let cli = CliOverrides {
        port: Some(9000),
        mail_api_key: Some("   ".to_string()),
        ..Default::default()
    };

    let config = ServiceConfig::resolve(cli, &toml);
    assert_eq!(config.port, 9000);
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.db_path, PathBuf::from("/srv/yoko/yoko.db"));
    assert_eq!(config.bind_addr(), "0.0.0.0:9000");
    // Blank keys disable mail
    assert!(config.mail.api_key.is_none());
    assert_eq!(config.mail.from_email, DEFAULT_FROM_EMAIL);
}
