// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `interpkit`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "interpkit",
    version,
    about = "Compose interpreter environments, run processes with them and locate a compatible interpreter.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `$INTERPKIT_CONFIG`, then `Interpkit.toml` in the current
    /// working directory. A missing default file means built-in defaults.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `INTERPKIT_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the composed environment as sorted KEY=VALUE lines.
    Env,

    /// Run a command with the composed environment and forward its output.
    Run {
        /// Working directory for the child.
        #[arg(long, value_name = "DIR")]
        cwd: Option<PathBuf>,

        /// Kill the child after this many seconds.
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// Command to execute.
        program: String,

        /// Arguments passed to the command.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Print the first compatible interpreter found.
    Resolve {
        /// Extra directory searched before everything else (repeatable).
        #[arg(long = "dir", value_name = "DIR")]
        dirs: Vec<String>,

        /// Do not consider the built-in toolchain directories.
        #[arg(long)]
        no_builtin: bool,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_keeps_hyphenated_child_args() {
        let args = CliArgs::try_parse_from([
            "interpkit", "run", "python", "-m", "pip", "--version",
        ])
        .unwrap();
        match args.command {
            Command::Run { program, args, .. } => {
                assert_eq!(program, "python");
                assert_eq!(args, vec!["-m", "pip", "--version"]);
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn resolve_collects_repeated_dirs() {
        let args = CliArgs::try_parse_from([
            "interpkit", "resolve", "--dir", "/a", "--dir", "/b", "--no-builtin",
        ])
        .unwrap();
        match args.command {
            Command::Resolve { dirs, no_builtin } => {
                assert_eq!(dirs, vec!["/a", "/b"]);
                assert!(no_builtin);
            }
            other => panic!("expected resolve, got {other:?}"),
        }
    }
}
