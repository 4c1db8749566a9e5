// ============================================================================
// vidqc-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Core Error Types
//
// This module defines the error type shared by the detectors, the external
// tool layer and the report writer. Report ingestion problems are NOT errors:
// they are modelled as `IngestOutcome` values so a bad detector output never
// aborts aggregation.
//
// KEY COMPONENTS:
// - CoreError: every fatal condition the library can surface
// - CoreResult: result alias used throughout the crate
// - command_*_error: helpers for building external command errors

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Fatal errors raised by detectors, external tools and report output.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Required dependency not found: {0}")]
    DependencyNotFound(String),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, std::io::Error),

    #[error("Failed waiting for command '{0}': {1}")]
    CommandWait(String, std::io::Error),

    #[error("Command '{cmd}' failed with status {status}: {stderr}")]
    CommandFailed {
        cmd: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Could not open media source: {0}")]
    MediaOpen(String),

    #[error("Could not parse measurement: {0}")]
    MeasurementParse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for vidqc-core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds a [`CoreError::CommandStart`] for a command that could not be spawned.
pub fn command_start_error(cmd: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

/// Builds a [`CoreError::CommandWait`] for a command whose exit status could not be read.
pub fn command_wait_error(cmd: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}

/// Builds a [`CoreError::CommandFailed`] for a command that exited unsuccessfully.
pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.into(),
        status,
        stderr: stderr.into(),
    }
}

/// Builds a [`CoreError::OperationFailed`] for ffmpeg output that could not be read.
pub fn ffmpeg_output_error(err: impl std::fmt::Display) -> CoreError {
    CoreError::OperationFailed(format!("reading ffmpeg output: {err}"))
}
