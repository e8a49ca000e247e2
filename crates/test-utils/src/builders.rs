#![allow(dead_code)]

use std::path::Path;

use interpkit::config::{ConfigFile, RawConfigFile};
use interpkit::types::Platform;

/// Builder for `ConfigFile` to simplify test setup.
///
/// Every layout directory lives under one base directory so tests never
/// touch the user's real cache or toolchain.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        let mut config = RawConfigFile::default();
        config.layout.cache_dir = Some(base.join("cache"));
        config.layout.core_dir = Some(base.join("core"));
        config.layout.env_root_dir = Some(base.join("env"));
        config.resolver.isolated_runtime_dir = Some(String::new());
        Self { config }
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.config.platform = Some(platform);
        self
    }

    pub fn caller_id(mut self, caller: &str) -> Self {
        self.config.environment.caller_id = caller.to_string();
        self
    }

    pub fn use_builtin_toolchain(mut self, val: bool) -> Self {
        self.config.environment.use_builtin_toolchain = val;
        self
    }

    pub fn extra_path_entry(mut self, entry: &str) -> Self {
        self.config.environment.extra_path_entries.push(entry.to_string());
        self
    }

    pub fn extra_variable(mut self, key: &str, value: &str) -> Self {
        self.config
            .environment
            .extra_variables
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn custom_directory(mut self, dir: &str) -> Self {
        self.config.resolver.custom_directories.push(dir.to_string());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.runner.timeout_secs = Some(secs);
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}
