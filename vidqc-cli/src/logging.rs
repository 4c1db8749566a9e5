// ============================================================================
// vidqc-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Console and Optional File Logging
//
// Without --log-dir the CLI uses env_logger on stderr. With --log-dir a fern
// dispatch writes the same records to stderr and to
// `vidqc_<command>_<YYYYMMDD_HHMMSS>.log` inside that directory.
//
// USAGE:
// - RUST_LOG=info (default): Normal operation logs
// - RUST_LOG=debug or --verbose: Detailed debugging information
// - RUST_LOG=trace: Very verbose debugging information

use crate::error::{CliErrorContext, CliResult};
use log::LevelFilter;
use std::fs;
use std::path::{Path, PathBuf};
use vidqc_core::CoreError;

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Log file name for one invocation of `command`.
pub fn log_file_name(command: &str) -> String {
    format!("vidqc_{}_{}.log", command, get_timestamp())
}

/// `--verbose` wins; otherwise a plain level in RUST_LOG; otherwise info.
fn resolve_level(verbose: bool) -> LevelFilter {
    if verbose {
        return LevelFilter::Debug;
    }
    std::env::var("RUST_LOG")
        .ok()
        .and_then(|value| value.trim().parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Installs the global logger. Returns the log file path when one is written.
pub fn init_logging(verbose: bool, log_dir: Option<&Path>, command: &str) -> CliResult<Option<PathBuf>> {
    match log_dir {
        None => {
            let mut builder = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or("info"),
            );
            if verbose {
                builder.filter_level(LevelFilter::Debug);
            }
            builder
                .format_timestamp(None)
                .format_target(false)
                .try_init()
                .map_err(|e| CoreError::OperationFailed(format!("Failed to initialize logger: {e}")))?;
            Ok(None)
        }
        Some(dir) => {
            fs::create_dir_all(dir)
                .cli_with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let path = dir.join(log_file_name(command));
            let file = fern::log_file(&path)
                .cli_with_context(|| format!("Failed to open log file {}", path.display()))?;

            fern::Dispatch::new()
                .level(resolve_level(verbose))
                .chain(
                    fern::Dispatch::new()
                        .format(|out, message, record| {
                            out.finish(format_args!("[{}] {}", record.level(), message))
                        })
                        .chain(std::io::stderr()),
                )
                .chain(
                    fern::Dispatch::new()
                        .format(|out, message, record| {
                            out.finish(format_args!(
                                "{} [{}] {}",
                                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                                record.level(),
                                message
                            ))
                        })
                        .chain(file),
                )
                .apply()
                .map_err(|e| CoreError::OperationFailed(format!("Failed to initialize logger: {e}")))?;

            log::debug!("Logging to {}", path.display());
            Ok(Some(path))
        }
    }
}
