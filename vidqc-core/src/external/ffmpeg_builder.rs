//! FFmpeg command builder utilities
//!
//! This module provides a builder for constructing FFmpeg commands with the
//! options every detector shares: banner suppression, an optional log level
//! and the input file.

use ffmpeg_sidecar::command::FfmpegCommand;
use std::path::Path;

/// Builder for creating `FFmpeg` commands with common configurations
pub struct FfmpegCommandBuilder {
    cmd: FfmpegCommand,
    hide_banner: bool,
    log_level: Option<&'static str>,
}

impl Default for FfmpegCommandBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegCommandBuilder {
    /// Creates a new `FFmpeg` command builder with sensible defaults
    #[must_use]
    pub fn new() -> Self {
        Self {
            cmd: FfmpegCommand::new(),
            hide_banner: true,
            log_level: None,
        }
    }

    /// Sets whether to hide the `FFmpeg` banner
    #[must_use]
    pub fn with_hide_banner(mut self, hide: bool) -> Self {
        self.hide_banner = hide;
        self
    }

    /// Sets `-loglevel` (e.g. "error"). Loudness measurement needs the default
    /// info level since loudnorm prints its summary there.
    #[must_use]
    pub fn with_log_level(mut self, level: &'static str) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Builds the command and adds `input` as its first input.
    #[must_use]
    pub fn build_with_input(self, input: &Path) -> FfmpegCommand {
        let mut cmd = self.build();
        cmd.input(input);
        cmd
    }

    /// Builds the `FFmpeg` command with all configured options
    #[must_use]
    pub fn build(mut self) -> FfmpegCommand {
        if self.hide_banner {
            self.cmd.arg("-hide_banner");
        }

        if let Some(level) = self.log_level {
            self.cmd.args(["-loglevel", level]);
        }

        self.cmd
    }
}
