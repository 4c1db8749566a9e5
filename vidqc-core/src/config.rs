// ============================================================================
// vidqc-core/src/config.rs
// ============================================================================
//
// CONFIGURATION: Detector Thresholds and Pipeline Paths
//
// This module defines the configuration used by the detectors and the
// pipeline runner. Every threshold has a documented default constant; the
// CLI starts from `QcConfig::default()` and overrides individual fields from
// command-line flags before calling `validate()`.
//
// KEY COMPONENTS:
// - Default constants for each detector
// - VisualConfig, AudioConfig, OcrConfig: per-detector settings
// - QcConfig: the full pipeline configuration

use crate::error::{CoreError, CoreResult};
use std::path::PathBuf;

// ============================================================================
// DEFAULT CONSTANTS
// ============================================================================

/// Luma below which a pixel counts as dark (0-255 scale).
pub const DEFAULT_DARK_LUMA_THRESHOLD: u8 = 13;

/// Fraction of dark pixels a frame must exceed to count as black.
pub const DEFAULT_BLACK_COVERAGE_RATIO: f64 = 0.98;

/// Shortest run of black frames reported as a glitch, in seconds.
pub const DEFAULT_MIN_BLACK_DURATION_SECS: f64 = 2.0;

/// Frame rate assumed when the container does not report one.
pub const DEFAULT_FALLBACK_FPS: f64 = 30.0;

/// EBU R128 integrated loudness target.
pub const DEFAULT_TARGET_LUFS: f64 = -23.0;

/// Allowed deviation from the loudness target, in dB.
pub const DEFAULT_LOUDNESS_TOLERANCE_DB: f64 = 1.0;

/// Audio stream measured by the loudness detector.
pub const DEFAULT_AUDIO_STREAM_INDEX: usize = 0;

/// Seconds between frames sampled for OCR.
pub const DEFAULT_OCR_INTERVAL_SECS: f64 = 2.0;

/// Recognized text at or below this confidence is dropped.
pub const DEFAULT_OCR_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Tesseract language packs used for recognition.
pub const DEFAULT_OCR_LANGUAGES: &str = "eng+hin";

pub const DEFAULT_TESSERACT_BINARY: &str = "tesseract";

pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

pub const VISUAL_REPORT_FILE: &str = "report_visual.json";
pub const AUDIO_REPORT_FILE: &str = "report_audio.json";
pub const OCR_REPORT_FILE: &str = "report_ocr.json";
pub const MASTER_REPORT_FILE: &str = "Master_Report.json";

// ============================================================================
// PER-DETECTOR SETTINGS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct VisualConfig {
    pub dark_luma_threshold: u8,
    pub coverage_ratio: f64,
    pub min_duration_secs: f64,
    pub fallback_fps: f64,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            dark_luma_threshold: DEFAULT_DARK_LUMA_THRESHOLD,
            coverage_ratio: DEFAULT_BLACK_COVERAGE_RATIO,
            min_duration_secs: DEFAULT_MIN_BLACK_DURATION_SECS,
            fallback_fps: DEFAULT_FALLBACK_FPS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioConfig {
    pub target_lufs: f64,
    pub tolerance_db: f64,
    pub stream_index: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            target_lufs: DEFAULT_TARGET_LUFS,
            tolerance_db: DEFAULT_LOUDNESS_TOLERANCE_DB,
            stream_index: DEFAULT_AUDIO_STREAM_INDEX,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OcrConfig {
    pub interval_secs: f64,
    pub confidence_threshold: f64,
    pub languages: String,
    pub tesseract_binary: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_OCR_INTERVAL_SECS,
            confidence_threshold: DEFAULT_OCR_CONFIDENCE_THRESHOLD,
            languages: DEFAULT_OCR_LANGUAGES.to_string(),
            tesseract_binary: DEFAULT_TESSERACT_BINARY.to_string(),
        }
    }
}

// ============================================================================
// PIPELINE CONFIGURATION
// ============================================================================

/// Full configuration for a pipeline run.
///
/// # Examples
///
/// ```rust
/// use vidqc_core::QcConfig;
///
/// let mut config = QcConfig::default();
/// config.audio.target_lufs = -24.0;
/// config.validate().unwrap();
/// assert_eq!(
///     config.master_report_path(),
///     std::path::PathBuf::from("outputs/Master_Report.json")
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QcConfig {
    /// Directory receiving the per-detector reports and the Master Report
    pub output_dir: PathBuf,

    pub visual: VisualConfig,
    pub audio: AudioConfig,
    pub ocr: OcrConfig,
}

impl Default for QcConfig {
    fn default() -> Self {
        Self::new(PathBuf::from(DEFAULT_OUTPUT_DIR))
    }
}

impl QcConfig {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            visual: VisualConfig::default(),
            audio: AudioConfig::default(),
            ocr: OcrConfig::default(),
        }
    }

    pub fn visual_report_path(&self) -> PathBuf {
        self.output_dir.join(VISUAL_REPORT_FILE)
    }

    pub fn audio_report_path(&self) -> PathBuf {
        self.output_dir.join(AUDIO_REPORT_FILE)
    }

    pub fn ocr_report_path(&self) -> PathBuf {
        self.output_dir.join(OCR_REPORT_FILE)
    }

    pub fn master_report_path(&self) -> PathBuf {
        self.output_dir.join(MASTER_REPORT_FILE)
    }

    /// Checks that every threshold is usable.
    pub fn validate(&self) -> CoreResult<()> {
        let visual = &self.visual;
        if !(0.0..=1.0).contains(&visual.coverage_ratio) {
            return Err(CoreError::Config(format!(
                "coverage_ratio must be within 0.0..=1.0, got {}",
                visual.coverage_ratio
            )));
        }
        if !visual.min_duration_secs.is_finite() || visual.min_duration_secs < 0.0 {
            return Err(CoreError::Config(format!(
                "min_duration_secs must be a non-negative number, got {}",
                visual.min_duration_secs
            )));
        }
        if !visual.fallback_fps.is_finite() || visual.fallback_fps <= 0.0 {
            return Err(CoreError::Config(format!(
                "fallback_fps must be positive, got {}",
                visual.fallback_fps
            )));
        }

        let audio = &self.audio;
        if !audio.target_lufs.is_finite() {
            return Err(CoreError::Config("target_lufs must be finite".to_string()));
        }
        if !audio.tolerance_db.is_finite() || audio.tolerance_db < 0.0 {
            return Err(CoreError::Config(format!(
                "tolerance_db must be a non-negative number, got {}",
                audio.tolerance_db
            )));
        }

        let ocr = &self.ocr;
        if !ocr.interval_secs.is_finite() || ocr.interval_secs <= 0.0 {
            return Err(CoreError::Config(format!(
                "OCR interval must be positive, got {}",
                ocr.interval_secs
            )));
        }
        if !(0.0..=1.0).contains(&ocr.confidence_threshold) {
            return Err(CoreError::Config(format!(
                "OCR confidence threshold must be within 0.0..=1.0, got {}",
                ocr.confidence_threshold
            )));
        }
        if ocr.languages.trim().is_empty() {
            return Err(CoreError::Config("OCR languages must not be empty".to_string()));
        }

        Ok(())
    }
}
