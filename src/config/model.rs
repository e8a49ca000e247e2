// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::env::EnvironmentConfig;
use crate::layout::DirLayout;
use crate::types::Platform;

/// Configuration exactly as read from a TOML file.
///
/// ```toml
/// [environment]
/// caller_id = "cli"
/// use_builtin_toolchain = true
/// extra_path_entries = ["/opt/tools/bin"]
///
/// [environment.extra_variables]
/// PYTHONUNBUFFERED = "1"
///
/// [layout]
/// cache_dir = "/home/me/.cache/interpkit"
///
/// [resolver]
/// custom_directories = ["/opt/python/bin"]
///
/// [runner]
/// timeout_secs = 30
/// ```
///
/// All sections are optional. A raw config becomes a [`ConfigFile`] through
/// `TryFrom`, which validates it and fills in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// Overrides the compiled-in platform; mostly useful for testing.
    #[serde(default)]
    pub platform: Option<Platform>,

    #[serde(default)]
    pub environment: EnvironmentConfig,

    #[serde(default)]
    pub layout: LayoutSection,

    #[serde(default)]
    pub resolver: ResolverSection,

    #[serde(default)]
    pub runner: RunnerSection,
}

/// `[layout]` section. Unset entries fall back to per-user OS defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayoutSection {
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    #[serde(default)]
    pub core_dir: Option<PathBuf>,

    #[serde(default)]
    pub env_root_dir: Option<PathBuf>,

    /// Defaults to `<env_root_dir>/bin` (`Scripts` on Windows).
    #[serde(default)]
    pub env_bin_dir: Option<PathBuf>,
}

/// `[resolver]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolverSection {
    /// Searched before anything else, in order.
    #[serde(default)]
    pub custom_directories: Vec<String>,

    /// Isolated runtime directory; `""` disables the platform default.
    #[serde(default)]
    pub isolated_runtime_dir: Option<String>,
}

/// `[runner]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunnerSection {
    /// Default timeout for spawned processes; none when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Validated configuration with every default resolved.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub platform: Platform,
    pub environment: EnvironmentConfig,
    pub layout: DirLayout,
    pub custom_directories: Vec<String>,
    pub isolated_runtime_dir: Option<String>,
    pub runner_timeout: Option<Duration>,
}

impl ConfigFile {
    /// Resolve defaults without validating. Use `ConfigFile::try_from`.
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        let platform = raw.platform.unwrap_or_default();
        let defaults = DirLayout::platform_default(platform);

        let env_root_dir = raw.layout.env_root_dir.unwrap_or(defaults.env_root_dir);
        let env_bin_dir = raw
            .layout
            .env_bin_dir
            .unwrap_or_else(|| env_root_dir.join(platform.env_bin_dir_name()));

        let layout = DirLayout {
            cache_dir: raw.layout.cache_dir.unwrap_or(defaults.cache_dir),
            core_dir: raw.layout.core_dir.unwrap_or(defaults.core_dir),
            env_bin_dir,
            env_root_dir,
        };

        let isolated_runtime_dir = match raw.resolver.isolated_runtime_dir {
            Some(dir) if dir.trim().is_empty() => None,
            Some(dir) => Some(dir),
            None => platform.default_isolated_runtime_dir().map(str::to_string),
        };

        Self {
            platform,
            environment: raw.environment,
            layout,
            custom_directories: raw.resolver.custom_directories,
            isolated_runtime_dir,
            runner_timeout: raw.runner.timeout_secs.map(Duration::from_secs),
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(RawConfigFile::default())
    }
}
