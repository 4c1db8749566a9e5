// ============================================================================
// vidqc-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg, ffprobe and tesseract
//
// This module encapsulates every call into an external command-line tool.
// Detectors use it to verify their preconditions (input present, tool on
// PATH) before doing any work, so a missing dependency surfaces as a fatal
// CoreError and no report is written.
//
// KEY COMPONENTS:
// - check_dependency: verifies a binary can be started
// - ensure_input_exists: verifies the media file is present
// - FfmpegCommandBuilder: common ffmpeg command setup
// - ffprobe helpers for frame rate detection

use crate::error::{CoreError, CoreResult};

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// ffmpeg command construction shared by the detectors
pub mod ffmpeg_builder;

/// ffprobe queries (stream frame rate)
pub mod ffprobe_executor;

pub use ffmpeg_builder::FfmpegCommandBuilder;
pub use ffprobe_executor::{parse_frame_rate, probe_frame_rate};

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks if a required external command is available and executable.
///
/// The command is started with `version_arg` and its output discarded; only
/// whether it could be spawned matters.
///
/// # Returns
///
/// * `Ok(())` - If the command could be started
/// * `Err(CoreError::DependencyNotFound)` - If the command is not on PATH
/// * `Err(CoreError::CommandStart)` - If the command exists but fails to start
pub fn check_dependency(cmd_name: &str, version_arg: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg(version_arg)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd_name);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!(
                "Failed to start dependency check command '{}': {}",
                cmd_name,
                e
            );
            Err(CoreError::CommandStart(cmd_name.to_string(), e))
        }
    }
}

/// Checks that ffmpeg is installed.
pub fn check_ffmpeg() -> CoreResult<()> {
    check_dependency("ffmpeg", "-version")
}

/// Fails with [`CoreError::InputNotFound`] unless `path` is an existing file.
pub fn ensure_input_exists(path: &Path) -> CoreResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CoreError::InputNotFound(path.to_path_buf()))
    }
}
