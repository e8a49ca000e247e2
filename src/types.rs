// src/types.rs

use std::str::FromStr;

use serde::Deserialize;

/// Operating-system family whose conventions drive environment composition,
/// process spawning and interpreter discovery.
///
/// The platform is passed around as a value instead of being read from
/// `cfg!` at every decision point, so Windows-only behaviour (for example the
/// `%VAR%` expansion or the scratch temp directory) can be exercised on any
/// host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    #[serde(alias = "darwin")]
    MacOs,
    Linux,
}

impl Platform {
    /// Platform the binary was compiled for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }

    pub fn is_windows(self) -> bool {
        self == Platform::Windows
    }

    /// Separator used in PATH-like lists.
    pub fn path_delimiter(self) -> char {
        match self {
            Platform::Windows => ';',
            Platform::MacOs | Platform::Linux => ':',
        }
    }

    /// Whether `%NAME%` tokens in PATH are interpolated by the shell.
    pub fn supports_percent_expansion(self) -> bool {
        self.is_windows()
    }

    /// Windows resolves variable names without regard to case.
    pub fn env_keys_case_insensitive(self) -> bool {
        self.is_windows()
    }

    /// Locale override forced on this platform, if any.
    pub fn utf8_locale_override(self) -> Option<(&'static str, &'static str)> {
        match self {
            Platform::MacOs => Some(("LC_ALL", "en_US.UTF-8")),
            Platform::Windows | Platform::Linux => None,
        }
    }

    /// Whether installer / virtualenv commands need a private temp directory.
    pub fn needs_scratch_tmp_dir(self) -> bool {
        self.is_windows()
    }

    /// Default directory of an isolated interpreter runtime searched before
    /// PATH, on the platforms that ship one outside the usual locations.
    pub fn default_isolated_runtime_dir(self) -> Option<&'static str> {
        match self {
            Platform::MacOs => Some("/Library/Frameworks/Python.framework/Versions/Current/bin"),
            Platform::Windows | Platform::Linux => None,
        }
    }

    /// Interpreter executable names, in priority order.
    pub fn interpreter_names(self) -> &'static [&'static str] {
        match self {
            Platform::Windows => &["python.exe"],
            Platform::MacOs | Platform::Linux => &["python3", "python", "python3.12"],
        }
    }

    /// Name of the directory holding executables inside an environment root.
    pub fn env_bin_dir_name(self) -> &'static str {
        match self {
            Platform::Windows => "Scripts",
            Platform::MacOs | Platform::Linux => "bin",
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::current()
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "windows" | "win32" => Ok(Platform::Windows),
            "macos" | "darwin" => Ok(Platform::MacOs),
            "linux" => Ok(Platform::Linux),
            other => Err(format!(
                "invalid platform: {other} (expected \"windows\", \"macos\" or \"linux\")"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_platform_names() {
        assert_eq!("Windows".parse::<Platform>(), Ok(Platform::Windows));
        assert_eq!("darwin".parse::<Platform>(), Ok(Platform::MacOs));
        assert_eq!(" linux ".parse::<Platform>(), Ok(Platform::Linux));
        assert!("plan9".parse::<Platform>().is_err());
    }

    #[test]
    fn windows_has_single_interpreter_name() {
        assert_eq!(Platform::Windows.interpreter_names(), &["python.exe"]);
        assert_eq!(Platform::Linux.interpreter_names().len(), 3);
        assert_eq!(Platform::Linux.interpreter_names()[0], "python3");
    }
}
