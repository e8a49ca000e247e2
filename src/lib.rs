// src/lib.rs

pub mod cli;
pub mod config;
pub mod env;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod host;
pub mod layout;
pub mod logging;
pub mod types;
pub mod resolve;

use std::io::Write;
use std::time::Duration;

use tracing::{debug, info};

use crate::cli::{CliArgs, Command};
use crate::config::load_or_default;
use crate::errors::Result;
use crate::exec::SpawnRequest;
use crate::host::Host;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - environment composition (once, from the current process environment)
/// - the requested subcommand
///
/// Returns the exit code the binary should terminate with.
pub async fn run(args: CliArgs) -> Result<i32> {
    let cfg = load_or_default(args.config.as_deref())?;
    debug!(platform = ?cfg.platform, "configuration loaded");

    let host = Host::new(cfg);

    match args.command {
        Command::Env => {
            print_environment(&host)?;
            Ok(0)
        }
        Command::Run {
            cwd,
            timeout,
            program,
            args,
        } => {
            let mut request = SpawnRequest::new(program).args(args);
            if let Some(dir) = cwd {
                request = request.working_directory(dir);
            }
            if let Some(secs) = timeout {
                request = request.timeout(Duration::from_secs(secs));
            }

            let result = host.run_process(request).await;

            let mut stdout = std::io::stdout().lock();
            stdout.write_all(result.stdout.as_bytes())?;
            stdout.flush()?;
            let mut stderr = std::io::stderr().lock();
            stderr.write_all(result.stderr.as_bytes())?;
            stderr.flush()?;

            Ok(exit_code_for(result.exit_code))
        }
        Command::Resolve { dirs, no_builtin } => {
            let use_builtin = !no_builtin && host.config().environment.use_builtin_toolchain;
            match host.resolve_interpreter(use_builtin, &dirs).await {
                Some(path) => {
                    println!("{}", path.display());
                    Ok(0)
                }
                None => {
                    eprintln!("no compatible interpreter found");
                    Ok(1)
                }
            }
        }
    }
}

/// Sorted `KEY=VALUE` dump of the composed environment.
fn print_environment(host: &Host) -> Result<()> {
    let mut out = std::io::stdout().lock();
    for (key, value) in host.environment().iter() {
        writeln!(out, "{key}={value}")?;
    }
    info!(vars = host.environment().len(), "printed composed environment");
    Ok(())
}

/// Map a child exit code onto something a process can exit with.
fn exit_code_for(code: i32) -> i32 {
    if code == exec::SPAWN_FAILED_EXIT_CODE { 1 } else { code }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_maps_to_generic_failure() {
        assert_eq!(exit_code_for(-1), 1);
        assert_eq!(exit_code_for(0), 0);
        assert_eq!(exit_code_for(3), 3);
    }
}
