// src/env/compose.rs

//! Composition of the child-process environment.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use super::{
    expand, path_list, ProcessEnvironment, CALLER_ENV_VAR, LEGACY_PATH_VAR, LOOPBACK_ADDR,
    NO_PROXY_VAR, PATH_VAR,
};
use crate::layout::Layout;
use crate::types::Platform;

/// Progress-bar switch understood by the package installer.
pub const PROGRESS_BAR_VAR: &str = "PIP_PROGRESS_BAR";
/// Callers whose output panes cannot render progress bars.
pub const NO_PROGRESS_BAR_CALLERS: &[&str] = &["vscode"];

/// What the host wants the composed environment to contain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnvironmentConfig {
    /// Exported to children as `INTERPKIT_CALLER`.
    #[serde(default = "default_caller_id")]
    pub caller_id: String,

    /// Put the built-in toolchain first on PATH (or strip it when false).
    #[serde(default)]
    pub use_builtin_toolchain: bool,

    /// Prepended to PATH as one block unless already present.
    #[serde(default)]
    pub extra_path_entries: Vec<String>,

    /// Merged over the base environment.
    #[serde(default)]
    pub extra_variables: BTreeMap<String, String>,
}

fn default_caller_id() -> String {
    "cli".to_string()
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            caller_id: default_caller_id(),
            use_builtin_toolchain: false,
            extra_path_entries: Vec::new(),
            extra_variables: BTreeMap::new(),
        }
    }
}

/// Computes child environments for one layout and platform.
#[derive(Debug, Clone)]
pub struct EnvironmentComposer {
    layout: Arc<dyn Layout>,
    platform: Platform,
}

impl EnvironmentComposer {
    pub fn new(layout: Arc<dyn Layout>, platform: Platform) -> Self {
        Self { layout, platform }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Compose from a snapshot of the current process environment.
    pub fn compose_current(&self, config: &EnvironmentConfig) -> ProcessEnvironment {
        self.compose(&ProcessEnvironment::capture(), config)
    }

    /// Derive the environment children should run with.
    ///
    /// `base` is never modified and the result depends only on `base`,
    /// `config`, the layout and the platform, so recomposing from the same
    /// base after flipping `use_builtin_toolchain` leaves no residue.
    pub fn compose(&self, base: &ProcessEnvironment, config: &EnvironmentConfig) -> ProcessEnvironment {
        let delimiter = self.platform.path_delimiter();
        let mut env = base.clone();

        env.set(CALLER_ENV_VAR, config.caller_id.as_str());
        self.apply_platform_overrides(&mut env, config);

        for (key, value) in &config.extra_variables {
            env.set(key.as_str(), value.as_str());
        }

        let mut path = env.get_or_empty(PATH_VAR).to_string();
        if let Some(legacy) = env.get(LEGACY_PATH_VAR) {
            path = path_list::append(&path, legacy, delimiter);
        }

        path = self.apply_builtin_toolchain(&path, config.use_builtin_toolchain);

        if !config.extra_path_entries.is_empty() {
            let block = path_list::join(config.extra_path_entries.iter().map(String::as_str), delimiter);
            if !block.is_empty() && !path.contains(&block) {
                path = path_list::prepend(&[block.as_str()], &path, delimiter);
            }
        }

        env.set(PATH_VAR, path.as_str());

        if self.platform.supports_percent_expansion() {
            let expanded = self.expand_path(&env, &path);
            env.set(PATH_VAR, expanded);
        }

        if base.contains_key(LEGACY_PATH_VAR) {
            let path = env.get_or_empty(PATH_VAR).to_string();
            env.set(LEGACY_PATH_VAR, path);
        }

        let no_proxy = with_loopback(env.get_or_empty(NO_PROXY_VAR));
        env.set(NO_PROXY_VAR, no_proxy);

        debug!(
            caller = %config.caller_id,
            builtin = config.use_builtin_toolchain,
            path = %env.get_or_empty(PATH_VAR),
            "composed process environment"
        );

        env
    }

    fn apply_platform_overrides(&self, env: &mut ProcessEnvironment, config: &EnvironmentConfig) {
        if let Some((key, value)) = self.platform.utf8_locale_override() {
            env.set(key, value);
        }
        if NO_PROGRESS_BAR_CALLERS.contains(&config.caller_id.as_str()) {
            env.set(PROGRESS_BAR_VAR, "off");
        }
    }

    fn apply_builtin_toolchain(&self, path: &str, enabled: bool) -> String {
        let delimiter = self.platform.path_delimiter();
        let bin = self.layout.env_bin_dir().to_string_lossy();
        let root = self.layout.env_root_dir().to_string_lossy();

        if enabled {
            path_list::prepend(&[bin.as_ref(), root.as_ref()], path, delimiter)
        } else {
            path_list::remove_containing(path, root.as_ref(), delimiter)
        }
    }

    fn expand_path(&self, env: &ProcessEnvironment, path: &str) -> String {
        let case_insensitive = self.platform.env_keys_case_insensitive();
        match expand::expand_percent_vars(path, |name| {
            env.lookup(name, case_insensitive).map(str::to_string)
        }) {
            Some(expanded) => expanded,
            None => {
                warn!(
                    passes = expand::MAX_EXPANSION_PASSES,
                    "PATH expansion did not settle; keeping it unexpanded"
                );
                path.to_string()
            }
        }
    }
}

/// Append the loopback address to a comma-separated no-proxy list.
fn with_loopback(existing: &str) -> String {
    if existing.split(',').any(|entry| entry.trim() == LOOPBACK_ADDR) {
        return existing.to_string();
    }
    if existing.is_empty() {
        LOOPBACK_ADDR.to_string()
    } else {
        format!("{existing},{LOOPBACK_ADDR}")
    }
}
