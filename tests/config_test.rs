// tests/config_test.rs
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use oam_tag::config::{load_config, Config};
use serial_test::serial;
use tempfile::{NamedTempFile, TempDir};

#[test]
#[serial]
fn test_load_default_config() {
    let root = TempDir::new().unwrap();
    let config = load_config(None, root.path()).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
registry = "registry.example.com/team"

[annotations]
commit_sha_key = "example.com/sha"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path()), Path::new("/nonexistent")).unwrap();
    assert_eq!(config.registry, "registry.example.com/team");
    assert_eq!(config.annotations.commit_sha_key, "example.com/sha");
    assert_eq!(config.annotations.version_key, "app.version");
    assert_eq!(
        config.paths.manifest,
        PathBuf::from("oam/applications/application.yaml")
    );
}

#[test]
fn test_project_config_is_picked_up() {
    let root = TempDir::new().unwrap();
    fs::copy("tests/fixtures/oamtag.toml", root.path().join("oamtag.toml")).unwrap();

    let config = load_config(None, root.path()).unwrap();
    assert_eq!(config.registry, "ghcr.io/learning");
    assert_eq!(
        config.base_version_path(root.path()),
        root.path().join("deploy/VERSION")
    );
    assert_eq!(
        config.manifest_path(root.path()),
        root.path().join("deploy/app.yaml")
    );
    assert_eq!(config.annotations.version_key, "example.com/version");
    assert_eq!(config.annotations.commit_sha_key, "app.commit-sha");
}

#[test]
fn test_explicit_path_wins_over_project_config() {
    let root = TempDir::new().unwrap();
    fs::copy("tests/fixtures/oamtag.toml", root.path().join("oamtag.toml")).unwrap();

    let explicit = root.path().join("other.toml");
    fs::write(&explicit, "registry = \"quay.io/other\"\n").unwrap();

    let config = load_config(Some(explicit.as_path()), root.path()).unwrap();
    assert_eq!(config.registry, "quay.io/other");
}

#[test]
fn test_invalid_toml_is_config_error() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("oamtag.toml"), "registry = [unterminated").unwrap();

    let err = load_config(None, root.path()).unwrap_err();
    assert!(err.to_string().starts_with("Configuration error: cannot parse"));
}

#[test]
fn test_missing_explicit_file_is_config_error() {
    let root = TempDir::new().unwrap();
    let missing = root.path().join("nope.toml");
    let err = load_config(Some(missing.as_path()), root.path()).unwrap_err();
    assert!(err.to_string().contains("cannot read"));
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_user_config_directory() {
    let root = TempDir::new().unwrap();
    let xdg = TempDir::new().unwrap();
    fs::write(
        xdg.path().join(".oamtag.toml"),
        "registry = \"user.registry/me\"\n",
    )
    .unwrap();

    let previous = std::env::var_os("XDG_CONFIG_HOME");
    std::env::set_var("XDG_CONFIG_HOME", xdg.path());
    let config = load_config(None, root.path());
    match previous {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }

    assert_eq!(config.unwrap().registry, "user.registry/me");
}
