// src/layout.rs

//! Where the built-in toolchain and the cache live on disk.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::types::Platform;

/// Filesystem-layout provider.
///
/// Implementations only promise stable absolute paths; nothing here checks
/// that the directories exist.
pub trait Layout: Send + Sync + std::fmt::Debug {
    fn cache_dir(&self) -> &Path;
    fn core_dir(&self) -> &Path;
    /// Directory holding the built-in toolchain's executables.
    fn env_bin_dir(&self) -> &Path;
    /// Root of the built-in toolchain's environment.
    fn env_root_dir(&self) -> &Path;

    /// Parent directory for scratch temp directories.
    fn scratch_parent_dir(&self) -> PathBuf {
        self.cache_dir().join("tmp")
    }
}

/// Plain set of directories, usually built from the `[layout]` config section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirLayout {
    pub cache_dir: PathBuf,
    pub core_dir: PathBuf,
    pub env_bin_dir: PathBuf,
    pub env_root_dir: PathBuf,
}

impl DirLayout {
    /// Layout rooted at a single base directory. Mostly useful in tests.
    pub fn under(base: impl AsRef<Path>, platform: Platform) -> Self {
        let base = base.as_ref();
        let env_root_dir = base.join("env");
        Self {
            cache_dir: base.join("cache"),
            core_dir: base.join("core"),
            env_bin_dir: env_root_dir.join(platform.env_bin_dir_name()),
            env_root_dir,
        }
    }

    /// Per-user default locations from the OS conventions.
    pub fn platform_default(platform: Platform) -> Self {
        match ProjectDirs::from("", "", "interpkit") {
            Some(dirs) => {
                let env_root_dir = dirs.data_dir().join("env");
                Self {
                    cache_dir: dirs.cache_dir().to_path_buf(),
                    core_dir: dirs.config_dir().to_path_buf(),
                    env_bin_dir: env_root_dir.join(platform.env_bin_dir_name()),
                    env_root_dir,
                }
            }
            None => Self::under(std::env::temp_dir().join("interpkit"), platform),
        }
    }
}

impl Layout for DirLayout {
    fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn core_dir(&self) -> &Path {
        &self.core_dir
    }

    fn env_bin_dir(&self) -> &Path {
        &self.env_bin_dir
    }

    fn env_root_dir(&self) -> &Path {
        &self.env_root_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bin_dir_follows_platform_convention() {
        let unix = DirLayout::under("/opt/ik", Platform::Linux);
        assert_eq!(unix.env_bin_dir, PathBuf::from("/opt/ik/env/bin"));

        let win = DirLayout::under("/opt/ik", Platform::Windows);
        assert_eq!(win.env_bin_dir, PathBuf::from("/opt/ik/env/Scripts"));
        assert_eq!(win.scratch_parent_dir(), PathBuf::from("/opt/ik/cache/tmp"));
    }

    #[test]
    fn platform_default_is_absolute() {
        let layout = DirLayout::platform_default(Platform::current());
        assert!(layout.cache_dir.is_absolute());
        assert!(layout.env_bin_dir.starts_with(&layout.env_root_dir));
    }
}
