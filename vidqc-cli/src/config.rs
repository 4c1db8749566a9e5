// vidqc-cli/src/config.rs
//
// Turns parsed command-line options into the core `QcConfig`.

use crate::cli::{AudioOptions, OcrOptions, RunArgs, VisualOptions};
use crate::error::{CliErrorContext, CliResult};
use vidqc_core::{AudioConfig, OcrConfig, QcConfig, VisualConfig};

impl VisualOptions {
    pub fn to_config(&self) -> VisualConfig {
        VisualConfig {
            dark_luma_threshold: self.dark_threshold,
            coverage_ratio: self.coverage,
            min_duration_secs: self.min_black_duration,
            ..VisualConfig::default()
        }
    }
}

impl AudioOptions {
    pub fn to_config(&self) -> AudioConfig {
        AudioConfig {
            target_lufs: self.target_lufs,
            tolerance_db: self.tolerance,
            stream_index: self.stream,
        }
    }
}

impl OcrOptions {
    pub fn to_config(&self) -> OcrConfig {
        OcrConfig {
            interval_secs: self.interval,
            confidence_threshold: self.min_confidence,
            languages: self.languages.clone(),
            tesseract_binary: self.tesseract.clone(),
        }
    }
}

/// Builds a validated configuration for `vidqc run`.
pub fn pipeline_config(args: &RunArgs) -> CliResult<QcConfig> {
    let mut config = QcConfig::new(args.output_dir.clone());
    config.visual = args.visual.to_config();
    config.audio = args.audio.to_config();
    config.ocr = args.ocr.to_config();
    config.validate().cli_context("Invalid options")?;
    Ok(config)
}

/// Validates a single detector's settings against an otherwise default configuration.
pub fn validate_with<F>(apply: F) -> CliResult<()>
where
    F: FnOnce(&mut QcConfig),
{
    let mut config = QcConfig::default();
    apply(&mut config);
    config.validate().cli_context("Invalid options")
}
