// src/exec/scratch.rs

//! Private temp directory for installer / virtualenv runs on Windows.
//!
//! Those tools trip over long or non-ASCII user temp paths there, so they
//! get a fresh directory under the cache dir as both cwd and temp location.

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, warn};

use crate::env::ProcessEnvironment;
use crate::fs::FileSystem;
use crate::layout::Layout;

/// Temp-location variables pointed at the scratch directory.
pub const TEMP_VARS: [&str; 3] = ["TMP", "TEMP", "TMPDIR"];

const SCRATCH_TOOLS: [&str; 2] = ["pip", "virtualenv"];

/// Scratch directory owned by exactly one run.
#[derive(Debug)]
pub struct ScratchDir {
    pub dir: PathBuf,
    /// Copy of the effective environment with [`TEMP_VARS`] redirected.
    pub env: ProcessEnvironment,
}

/// Whether `command args...` invokes one of the affected tools, either
/// directly (`pip`, `pip3.12.exe`, `virtualenv`) or as `-m <tool>`.
pub fn needs_scratch_dir(command: &str, args: &[String]) -> bool {
    let basename = command.rsplit(['/', '\\']).next().unwrap_or(command);
    let lower = basename.to_ascii_lowercase();
    let stem = lower.strip_suffix(".exe").unwrap_or(&lower);

    if is_scratch_tool(stem) {
        return true;
    }

    matches!(
        args,
        [flag, module, ..] if flag == "-m" && SCRATCH_TOOLS.contains(&module.as_str())
    )
}

fn is_scratch_tool(stem: &str) -> bool {
    if stem == "virtualenv" {
        return true;
    }
    match stem.strip_prefix("pip") {
        Some(rest) => rest.chars().all(|c| c.is_ascii_digit() || c == '.'),
        None => false,
    }
}

/// Allocate the directory and the redirected environment.
pub fn prepare(
    fs: &dyn FileSystem,
    layout: &dyn Layout,
    base_env: Option<&ProcessEnvironment>,
) -> Result<ScratchDir> {
    let dir = fs.create_temp_dir(&layout.scratch_parent_dir())?;
    let mut env = base_env.cloned().unwrap_or_else(ProcessEnvironment::capture);
    let value = dir.to_string_lossy();
    for var in TEMP_VARS {
        env.set(var, value.as_ref());
    }
    debug!(dir = %dir.display(), "allocated scratch temp dir");
    Ok(ScratchDir { dir, env })
}

/// Best-effort removal; failures are logged and otherwise ignored.
pub fn cleanup(fs: &dyn FileSystem, scratch: ScratchDir) {
    match fs.remove_dir_all(&scratch.dir) {
        Ok(()) => debug!(dir = %scratch.dir.display(), "removed scratch temp dir"),
        Err(err) => warn!(
            dir = %scratch.dir.display(),
            error = %err,
            "failed to remove scratch temp dir"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use crate::layout::DirLayout;
    use crate::types::Platform;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn detects_installer_and_virtualenv() {
        assert!(needs_scratch_dir("pip", &[]));
        assert!(needs_scratch_dir("C:\\env\\Scripts\\pip3.exe", &[]));
        assert!(needs_scratch_dir("/env/bin/pip3.12", &args(&["install", "x"])));
        assert!(needs_scratch_dir("VirtualEnv.EXE", &[]));
        assert!(needs_scratch_dir("python", &args(&["-m", "pip", "install"])));
        assert!(needs_scratch_dir("python.exe", &args(&["-m", "virtualenv", "v"])));
    }

    #[test]
    fn ignores_everything_else() {
        assert!(!needs_scratch_dir("python", &args(&["script.py"])));
        assert!(!needs_scratch_dir("pipenv", &[]));
        assert!(!needs_scratch_dir("python", &args(&["-c", "pip"])));
        assert!(!needs_scratch_dir("/home/pip/bin/python", &[]));
    }

    #[test]
    fn prepare_redirects_temp_vars_and_cleanup_removes_dir() {
        let fs = MockFileSystem::new();
        let layout = DirLayout::under("/ik", Platform::Windows);
        let base: ProcessEnvironment = [("TEMP", "C:\\Users\\x\\AppData\\Local\\Temp")].into_iter().collect();

        let scratch = prepare(&fs, &layout, Some(&base)).unwrap();
        assert!(scratch.dir.starts_with("/ik/cache/tmp"));
        assert!(fs.is_dir(&scratch.dir));
        for var in TEMP_VARS {
            assert_eq!(scratch.env.get(var), Some(scratch.dir.to_string_lossy().as_ref()));
        }

        let dir = scratch.dir.clone();
        cleanup(&fs, scratch);
        assert!(!fs.exists(&dir));
    }

    #[test]
    fn cleanup_failure_is_swallowed() {
        let fs = MockFileSystem::new();
        let layout = DirLayout::under("/ik", Platform::Windows);
        let scratch = prepare(&fs, &layout, None).unwrap();
        let dir = scratch.dir.clone();

        fs.fail_removals(true);
        cleanup(&fs, scratch);
        assert!(fs.exists(&dir));
    }
}
