// ============================================================================
// vidqc-core/src/detectors/audio.rs
// ============================================================================
//
// AUDIO QC: EBU R128 Integrated Loudness Compliance
//
// The loudness of one audio stream is measured with ffmpeg's loudnorm filter
// in analysis mode. loudnorm prints a JSON summary at the end of its log
// output; the block between the last '{' and the last '}' is parsed and the
// integrated loudness is checked against the target window.
//
// KEY COMPONENTS:
// - LoudnessDetector: runs the measurement and builds the audio_qc report
// - extract_loudnorm_json / parse_loudnorm_output: pure stderr parsing
// - evaluate_compliance: inclusive target window check

use crate::config::AudioConfig;
use crate::detectors::Detector;
use crate::error::{
    CoreError, CoreResult, command_failed_error, command_start_error, command_wait_error,
    ffmpeg_output_error,
};
use crate::external::{FfmpegCommandBuilder, check_ffmpeg, ensure_input_exists};
use crate::report::schema::{
    AUDIO_MODULE, DetectorReport, Event, LOUDNESS_VIOLATION_EVENT, ReportStatus,
};
use crate::utils::round2;

use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use log::{debug, info};
use serde_json::{Map, Value};
use std::path::Path;

/// Integrated loudness reported when loudnorm omits `input_i`.
const MISSING_INTEGRATED_LUFS: f64 = -99.0;
/// True peak reported when loudnorm omits `input_tp`.
const MISSING_TRUE_PEAK_DBTP: f64 = 99.0;
const MISSING_LOUDNESS_RANGE_LU: f64 = 0.0;

/// Values read from the loudnorm summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoudnessMeasurement {
    /// `input_i`, LUFS
    pub integrated_lufs: f64,
    /// `input_tp`, dBTP
    pub true_peak_dbtp: f64,
    /// `input_lra`, LU
    pub loudness_range_lu: f64,
}

// ============================================================================
// OUTPUT PARSING
// ============================================================================

/// Returns the text between the last `{` and the last `}` of `output`.
#[must_use]
pub fn extract_loudnorm_json(output: &str) -> Option<&str> {
    let start = output.rfind('{')?;
    let end = output.rfind('}')?;
    (end > start).then(|| &output[start..=end])
}

/// Parses the loudnorm summary out of ffmpeg's log output.
///
/// Fields may be JSON strings (what ffmpeg prints) or numbers. Absent fields
/// take the loudnorm "unknown" defaults. Silent audio comes back as an
/// integrated loudness of `-inf`, which is kept; only NaN is an error.
pub fn parse_loudnorm_output(output: &str) -> CoreResult<LoudnessMeasurement> {
    let json = extract_loudnorm_json(output).ok_or_else(|| {
        CoreError::MeasurementParse(
            "no loudnorm summary in ffmpeg output; the stream might be silent".to_string(),
        )
    })?;

    let fields: Map<String, Value> = serde_json::from_str(json)
        .map_err(|e| CoreError::MeasurementParse(format!("invalid loudnorm summary: {e}")))?;

    let measurement = LoudnessMeasurement {
        integrated_lufs: numeric_field(&fields, "input_i", MISSING_INTEGRATED_LUFS)?,
        true_peak_dbtp: numeric_field(&fields, "input_tp", MISSING_TRUE_PEAK_DBTP)?,
        loudness_range_lu: numeric_field(&fields, "input_lra", MISSING_LOUDNESS_RANGE_LU)?,
    };

    if measurement.integrated_lufs.is_nan() {
        return Err(CoreError::MeasurementParse(
            "integrated loudness is not a number".to_string(),
        ));
    }

    Ok(measurement)
}

fn numeric_field(fields: &Map<String, Value>, key: &str, default: f64) -> CoreResult<f64> {
    match fields.get(key) {
        None => Ok(default),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| CoreError::MeasurementParse(format!("{key} is out of range: {n}"))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| CoreError::MeasurementParse(format!("{key} is not a number: {s:?}"))),
        Some(other) => Err(CoreError::MeasurementParse(format!(
            "{key} has unexpected value {other}"
        ))),
    }
}

// ============================================================================
// COMPLIANCE
// ============================================================================

/// `true` when `measured_lufs` lies within `target ± tolerance` (inclusive).
#[must_use]
pub fn evaluate_compliance(measured_lufs: f64, target_lufs: f64, tolerance_db: f64) -> bool {
    (target_lufs - tolerance_db) <= measured_lufs && measured_lufs <= (target_lufs + tolerance_db)
}

/// Builds the `audio_qc` report for a measurement.
pub fn build_audio_report(
    video_file: &str,
    measurement: &LoudnessMeasurement,
    config: &AudioConfig,
) -> DetectorReport {
    let measured = measurement.integrated_lufs;
    if evaluate_compliance(measured, config.target_lufs, config.tolerance_db) {
        return DetectorReport::new(AUDIO_MODULE, video_file, ReportStatus::Passed, Vec::new());
    }

    let event = Event::new(LOUDNESS_VIOLATION_EVENT, 0.0, 0.0, 1.0)
        .with_detail("measured_lufs", level_value(measured))
        .with_detail("target_lufs", config.target_lufs)
        .with_detail(
            "correction_needed_db",
            level_value(round2(config.target_lufs - measured)),
        );

    DetectorReport::new(AUDIO_MODULE, video_file, ReportStatus::Rejected, vec![event])
}

/// JSON has no infinities; silent audio is written as the string `"-inf"`.
fn level_value(level: f64) -> Value {
    if level.is_finite() {
        Value::from(level)
    } else {
        Value::String(level.to_string())
    }
}

// ============================================================================
// DETECTOR
// ============================================================================

/// Loudness compliance detector for one audio stream.
#[derive(Debug, Clone, Default)]
pub struct LoudnessDetector {
    config: AudioConfig,
}

impl LoudnessDetector {
    pub fn new(config: AudioConfig) -> Self {
        Self { config }
    }

    /// Runs loudnorm in analysis mode and parses its summary.
    pub fn measure(&self, input: &Path) -> CoreResult<LoudnessMeasurement> {
        let stream_map = format!("0:a:{}", self.config.stream_index);
        let filter = format!(
            "loudnorm=I={}:LRA=7:tp=-2:print_format=json",
            self.config.target_lufs
        );

        let mut cmd = FfmpegCommandBuilder::new().build_with_input(input);
        cmd.args(["-map", stream_map.as_str()])
            .arg("-vn")
            .args(["-af", filter.as_str()])
            .args(["-f", "null", "-"]);
        debug!("Running loudness measurement: {cmd:?}");

        let mut child = cmd
            .spawn()
            .map_err(|e| command_start_error("ffmpeg", e))?;

        let mut log_output = String::new();
        let mut errors: Vec<String> = Vec::new();

        for event in child.iter().map_err(ffmpeg_output_error)? {
            match event {
                FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, line)
                | FfmpegEvent::Error(line) => errors.push(line),
                FfmpegEvent::Log(_, line) => {
                    log_output.push_str(&line);
                    log_output.push('\n');
                }
                _ => {}
            }
        }

        let status = child
            .wait()
            .map_err(|e| command_wait_error("ffmpeg", e))?;

        if !status.success() && extract_loudnorm_json(&log_output).is_none() {
            return Err(command_failed_error("ffmpeg", status, errors.join("\n")));
        }

        parse_loudnorm_output(&log_output)
    }
}

impl Detector for LoudnessDetector {
    fn module(&self) -> &'static str {
        AUDIO_MODULE
    }

    fn analyze(&self, input: &Path) -> CoreResult<DetectorReport> {
        ensure_input_exists(input)?;
        check_ffmpeg()?;

        let measurement = self.measure(input)?;
        info!(
            "Integrated loudness {:.1} LUFS (target {:.1} ± {:.1}), true peak {:.1} dBTP, LRA {:.1} LU",
            measurement.integrated_lufs,
            self.config.target_lufs,
            self.config.tolerance_db,
            measurement.true_peak_dbtp,
            measurement.loudness_range_lu
        );

        Ok(build_audio_report(
            &input.to_string_lossy(),
            &measurement,
            &self.config,
        ))
    }
}
