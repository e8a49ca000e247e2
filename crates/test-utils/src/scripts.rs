//! Executable shell scripts standing in for real tools in process tests.

use std::path::{Path, PathBuf};

/// Write `#!/bin/sh` + `body` to `dir/name` and make it executable.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    std::fs::create_dir_all(dir).expect("create script dir");
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    let mut perms = std::fs::metadata(&path).expect("stat script").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod script");
    path
}

/// Fake interpreter that exits with `code` whatever it is asked to run.
#[cfg(unix)]
pub fn fake_interpreter(dir: &Path, name: &str, code: i32) -> PathBuf {
    write_script(dir, name, &format!("exit {code}"))
}
