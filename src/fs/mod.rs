// src/fs/mod.rs

//! Filesystem utilities consumed by the runner and the resolver.
//!
//! Everything that touches the disk goes through [`FileSystem`] so tests can
//! swap in [`mock::MockFileSystem`].

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod mock;

/// Prefix of directories handed out by [`FileSystem::create_temp_dir`].
pub const TEMP_DIR_PREFIX: &str = "tmp-";

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Write `contents`, creating missing parent directories.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn remove_dir_all(&self, path: &Path) -> Result<()>;

    /// Create a uniquely named subdirectory of `parent` and return its path.
    ///
    /// The directory is not cleaned up automatically; the caller owns it.
    fn create_temp_dir(&self, parent: &Path) -> Result<PathBuf>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating dir {:?}", parent))?;
        }
        fs::write(path, contents).with_context(|| format!("writing to file {:?}", path))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        fs::remove_dir_all(path).with_context(|| format!("removing dir {:?}", path))
    }

    fn create_temp_dir(&self, parent: &Path) -> Result<PathBuf> {
        fs::create_dir_all(parent).with_context(|| format!("creating dir {:?}", parent))?;
        let dir = tempfile::Builder::new()
            .prefix(TEMP_DIR_PREFIX)
            .tempdir_in(parent)
            .with_context(|| format!("allocating temp dir in {:?}", parent))?;
        Ok(dir.keep())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_dirs_are_unique_and_persist_until_removed() {
        let root = tempfile::tempdir().unwrap();
        let fs = RealFileSystem;

        let a = fs.create_temp_dir(&root.path().join("tmp")).unwrap();
        let b = fs.create_temp_dir(&root.path().join("tmp")).unwrap();
        assert_ne!(a, b);
        assert!(a.is_dir() && b.is_dir());
        assert!(a.starts_with(root.path().join("tmp")));

        fs.remove_dir_all(&a).unwrap();
        assert!(!a.exists());
        assert!(b.exists());
    }

    #[test]
    fn write_creates_parents() {
        let root = tempfile::tempdir().unwrap();
        let fs = RealFileSystem;
        let target = root.path().join("nested/deeper/file.py");

        fs.write(&target, b"print(1)\n").unwrap();
        assert!(fs.is_file(&target));
        assert_eq!(fs.read_to_string(&target).unwrap(), "print(1)\n");
    }
}
