// tests/config_loading.rs

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use interpkit::config::{load_and_validate, parse_raw, ConfigFile};
use interpkit::errors::InterpkitError;
use interpkit::types::Platform;
use interpkit_test_utils::builders::ConfigFileBuilder;
use tempfile::NamedTempFile;

fn load(contents: &str) -> Result<ConfigFile, InterpkitError> {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    load_and_validate(file.path())
}

fn expect_config_error(contents: &str, needle: &str) {
    match load(contents) {
        Err(InterpkitError::ConfigError(msg)) => {
            assert!(msg.contains(needle), "message {msg:?} lacks {needle:?}");
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn demo_config_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/Interpkit.toml");
    let cfg = load_and_validate(&path).expect("demo config should be valid");

    assert!(cfg.environment.use_builtin_toolchain);
    assert_eq!(cfg.environment.extra_path_entries, vec!["/opt/tools/bin"]);
    assert_eq!(
        cfg.environment.extra_variables.get("PYTHONUNBUFFERED").map(String::as_str),
        Some("1")
    );
    assert_eq!(cfg.layout.cache_dir, PathBuf::from("/var/tmp/interpkit/cache"));
    assert_eq!(
        cfg.layout.env_bin_dir,
        PathBuf::from("/var/tmp/interpkit/env").join(cfg.platform.env_bin_dir_name())
    );
    assert_eq!(cfg.custom_directories, vec!["/opt/python/bin"]);
    assert_eq!(cfg.runner_timeout, Some(Duration::from_secs(600)));
}

#[test]
fn empty_file_uses_defaults() {
    let cfg = load("").unwrap();

    assert_eq!(cfg.environment.caller_id, "cli");
    assert!(!cfg.environment.use_builtin_toolchain);
    assert_eq!(cfg.platform, Platform::current());
    assert_eq!(cfg.runner_timeout, None);
}

#[test]
fn platform_override_changes_bin_dir_name() {
    let cfg = load(
        r#"
platform = "windows"

[layout]
env_root_dir = "/srv/env"
"#,
    )
    .unwrap();

    assert_eq!(cfg.platform, Platform::Windows);
    assert_eq!(cfg.layout.env_bin_dir, PathBuf::from("/srv/env/Scripts"));
    assert_eq!(cfg.isolated_runtime_dir, None);
}

#[test]
fn macos_gets_isolated_runtime_dir_unless_disabled() {
    let default = load("platform = \"macos\"").unwrap();
    assert!(default.isolated_runtime_dir.is_some());

    let disabled = load(
        r#"
platform = "macos"

[resolver]
isolated_runtime_dir = ""
"#,
    )
    .unwrap();
    assert_eq!(disabled.isolated_runtime_dir, None);
}

#[test]
fn empty_caller_id_is_rejected() {
    expect_config_error(
        r#"
[environment]
caller_id = "  "
"#,
        "caller_id",
    );
}

#[test]
fn zero_timeout_is_rejected() {
    expect_config_error(
        r#"
[runner]
timeout_secs = 0
"#,
        "timeout_secs",
    );
}

#[test]
fn relative_layout_dir_is_rejected() {
    expect_config_error(
        r#"
[layout]
cache_dir = "relative/cache"
"#,
        "cache_dir",
    );
}

#[test]
fn bad_variable_name_is_rejected() {
    expect_config_error(
        r#"
[environment.extra_variables]
"A=B" = "x"
"#,
        "A=B",
    );
}

#[test]
fn blank_custom_directory_is_rejected() {
    expect_config_error(
        r#"
[resolver]
custom_directories = ["/ok", ""]
"#,
        "custom_directories",
    );
}

#[test]
fn malformed_toml_is_a_toml_error() {
    match parse_raw("[environment\ncaller_id = 1") {
        Err(InterpkitError::TomlError(_)) => {}
        other => panic!("Expected TomlError, got: {:?}", other.map(|_| ())),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    match load_and_validate("/definitely/not/here/Interpkit.toml") {
        Err(InterpkitError::IoError(_)) => {}
        other => panic!("Expected IoError, got: {:?}", other.map(|_| ())),
    }
}

#[test]
fn builder_produces_valid_config() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = ConfigFileBuilder::new(dir.path())
        .platform(Platform::Linux)
        .custom_directory("/opt/py")
        .timeout_secs(5)
        .build();

    assert_eq!(cfg.layout.env_bin_dir, dir.path().join("env").join("bin"));
    assert_eq!(cfg.runner_timeout, Some(Duration::from_secs(5)));
    assert_eq!(cfg.custom_directories, vec!["/opt/py"]);
}
