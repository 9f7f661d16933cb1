//! End-to-end tests for loading, editing and saving environment files.

use std::fs;
use std::path::PathBuf;

use envfile::{Configuration, EnvError, Locator};
use envfile_telemetry::{init_logging, LogConfig};
use tempfile::TempDir;

const SAMPLE: &str = "\
# Application settings
APP_NAME=\"demo app\"          # shown in the title bar
port=8080
DEBUG=TRUE
LEGACY_FLAG=1

THIS LINE HAS NO SEPARATOR
";

/// Writes `contents` to a fresh `.env` in a temp dir.
fn env_file(contents: &str) -> (TempDir, PathBuf) {
    // Another test may have installed the subscriber already.
    let _ = init_logging(&LogConfig {
        level: "envfile=trace".to_string(),
        ..LogConfig::development()
    });

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(".env");
    fs::write(&path, contents).unwrap();
    (temp_dir, path)
}

#[test]
fn test_load_typed_values() {
    let (_dir, path) = env_file(SAMPLE);
    let config = Configuration::open(&path).unwrap();

    assert_eq!(config.get_string("APP_NAME"), Some("demo app"));
    assert_eq!(config.get_integer("PORT").unwrap(), 8080);
    assert!(config.get_boolean("DEBUG").unwrap());
    assert!(config.key_equals("DEBUG", true));
    assert_eq!(
        config.keys(),
        vec!["APP_NAME", "PORT", "DEBUG", "LEGACY_FLAG"]
    );
}

#[test]
fn test_lookup_failures() {
    let (_dir, path) = env_file(SAMPLE);
    let config = Configuration::open(&path).unwrap();

    assert!(matches!(
        config.get_integer("MISSING"),
        Err(EnvError::MissingKey { .. })
    ));
    assert!(matches!(
        config.get_integer("APP_NAME"),
        Err(EnvError::NumberFormat { .. })
    ));
    assert!(matches!(
        config.get_boolean("LEGACY_FLAG"),
        Err(EnvError::BooleanFormat { .. })
    ));

    // Keys read from the file are upper-case.
    assert_eq!(config.get_string("port"), None);
}

#[test]
fn test_fallbacks_never_fail() {
    let (_dir, path) = env_file(SAMPLE);
    let config = Configuration::open(&path).unwrap();

    for key in ["APP_NAME", "PORT", "DEBUG", "LEGACY_FLAG", "MISSING"] {
        let _ = config.get_string_or(key, "fallback");
        let _ = config.get_integer_or(key, -1);
        let _ = config.get_boolean_or(key, false);
    }
    assert_eq!(config.get_integer_or("APP_NAME", -1), -1);
    assert!(config.get_boolean_or("LEGACY_FLAG", true));
}

#[test]
fn test_save_without_changes_keeps_file() {
    let (_dir, path) = env_file(SAMPLE);
    let config = Configuration::open(&path).unwrap();

    config.save().unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);
}

#[test]
fn test_save_with_changes() {
    let (_dir, path) = env_file(SAMPLE);
    let mut config = Configuration::open(&path).unwrap();

    config.set("APP_NAME", "renamed app");
    config.set("PORT", 9090);
    assert_eq!(config.remove("LEGACY_FLAG"), Some("1".to_string()));
    config.set("WORKERS", 4);
    config.set("VERBOSE", false);
    config.save().unwrap();

    let expected = "\
# Application settings
APP_NAME=\"renamed app\" # shown in the title bar
PORT=9090
DEBUG=TRUE

THIS LINE HAS NO SEPARATOR

WORKERS=4
VERBOSE=false
";
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);

    let reloaded = Configuration::open(&path).unwrap();
    assert_eq!(reloaded.get_string("APP_NAME"), Some("renamed app"));
    assert_eq!(reloaded.get_integer("WORKERS").unwrap(), 4);
    assert!(!reloaded.get_boolean("VERBOSE").unwrap());
    assert_eq!(reloaded.get_string("LEGACY_FLAG"), None);
}

#[test]
fn test_load_replaces_memory() {
    let (_dir, path) = env_file("A=1\n");
    let mut config = Configuration::open(&path).unwrap();
    config.set("UNSAVED", "x");

    fs::write(&path, "B=2\n").unwrap();
    config.load().unwrap();

    assert_eq!(config.keys(), vec!["B"]);
}

#[test]
fn test_failed_load_keeps_memory() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = Configuration::from_path(temp_dir.path().join("missing.env"));
    config.set("KEEP", "me");

    let err = config.load().unwrap_err();
    assert!(err.is_io());
    assert_eq!(config.get_string("KEEP"), Some("me"));
}

#[test]
fn test_save_denied_on_read_only_file() {
    let (_dir, path) = env_file(SAMPLE);
    let mut config = Configuration::open(&path).unwrap();
    config.set("PORT", 1);

    let mut permissions = fs::metadata(&path).unwrap().permissions();
    permissions.set_readonly(true);
    fs::set_permissions(&path, permissions).unwrap();

    let err = config.save().unwrap_err();
    assert!(matches!(err, EnvError::WriteDenied { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);
}

#[test]
fn test_crlf_file_is_rewritten_with_lf() {
    let (_dir, path) = env_file("# c\r\nA=1\r\n");
    let config = Configuration::open(&path).unwrap();
    config.save().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "# c\nA=1\n");
}

#[test]
fn test_with_locator_finds_parent_file() {
    let (dir, path) = env_file("FOUND=yes\n");
    let nested = dir.path().join("service").join("bin");
    fs::create_dir_all(&nested).unwrap();

    let mut config = Configuration::with_locator(&Locator::new().with_base_dir(&nested));
    config.load().unwrap();

    assert_eq!(config.get_string("FOUND"), Some("yes"));
    assert_eq!(
        config.path().canonicalize().unwrap(),
        path.canonicalize().unwrap()
    );
}

#[test]
fn test_with_locator_creates_empty_file() {
    let temp_dir = TempDir::new().unwrap();
    let locator = Locator::new()
        .with_base_dir(temp_dir.path())
        .with_parent_depth(0);

    let mut config = Configuration::with_locator(&locator);
    config.load().unwrap();
    assert!(config.keys().is_empty());

    config.set("FIRST", "value");
    config.save().unwrap();
    assert_eq!(
        fs::read_to_string(temp_dir.path().join(".env")).unwrap(),
        "\nFIRST=value\n"
    );
}
