// src/env/mod.rs

//! Environment composition for spawned interpreters.
//!
//! - [`compose`] turns a base environment plus an [`EnvironmentConfig`] into
//!   the environment children should see. It is pure: the host decides when
//!   (and whether) to apply the result.
//! - [`path_list`] has the PATH segment helpers.
//! - [`expand`] implements Windows-style `%NAME%` interpolation.

use std::collections::BTreeMap;

use tokio::process::Command;

pub mod compose;
pub mod expand;
pub mod path_list;

pub use compose::{EnvironmentComposer, EnvironmentConfig};

/// Canonical PATH variable.
pub const PATH_VAR: &str = "PATH";
/// Alternate-cased PATH some Windows environments carry instead of / next to `PATH`.
pub const LEGACY_PATH_VAR: &str = "Path";
/// Identifies the host application to child processes.
pub const CALLER_ENV_VAR: &str = "INTERPKIT_CALLER";
pub const NO_PROXY_VAR: &str = "NO_PROXY";
pub const LOOPBACK_ADDR: &str = "127.0.0.1";

/// A full set of environment variables for a child process.
///
/// Keys are kept exactly as given, so `PATH` and `Path` can coexist; ordering
/// is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessEnvironment {
    vars: BTreeMap<String, String>,
}

impl ProcessEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current process environment.
    ///
    /// Non-UTF-8 names or values are converted lossily.
    pub fn capture() -> Self {
        std::env::vars_os()
            .map(|(k, v)| {
                (
                    k.to_string_lossy().into_owned(),
                    v.to_string_lossy().into_owned(),
                )
            })
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Absent variables read as the empty string.
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    /// Lookup that optionally ignores ASCII case, preferring an exact match.
    pub fn lookup(&self, key: &str, case_insensitive: bool) -> Option<&str> {
        if let Some(v) = self.get(key) {
            return Some(v);
        }
        if !case_insensitive {
            return None;
        }
        self.vars
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.vars.remove(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Replace the command's inherited environment with this one.
    pub fn apply_to(&self, cmd: &mut Command) {
        cmd.env_clear();
        cmd.envs(&self.vars);
    }
}

impl FromIterator<(String, String)> for ProcessEnvironment {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for ProcessEnvironment {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}
