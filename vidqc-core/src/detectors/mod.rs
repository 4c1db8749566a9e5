// ============================================================================
// vidqc-core/src/detectors/mod.rs
// ============================================================================
//
// DETECTORS: Independent Media Analysers Emitting Detector Reports
//
// Each detector reads one media file and produces exactly one
// DetectorReport. Detectors share no state and may run concurrently. A
// fatal precondition (missing input, missing tool, undecodable media) is
// returned as an error and NO report file is written; the aggregator then
// sees that detector's report as missing.
//
// KEY COMPONENTS:
// - Detector: trait implemented by every analyser
// - run_detector: analyse + write the report file
// - visual: black-screen detection
// - audio: EBU R128 loudness compliance
// - ocr: on-screen text extraction

use crate::error::CoreResult;
use crate::report::schema::DetectorReport;
use crate::report::writer::write_detector_report;
use log::info;
use std::path::Path;

pub mod audio;
pub mod ocr;
pub mod visual;

pub use audio::LoudnessDetector;
pub use ocr::{OcrDetector, TesseractRecognizer, TextRecognizer};
pub use visual::BlackScreenDetector;

/// A media analyser producing one [`DetectorReport`] per input.
pub trait Detector: Sync {
    /// Module name written into the report (`visual_qc`, `audio_qc`, ...).
    fn module(&self) -> &'static str;

    /// Analyses `input`. Errors are fatal preconditions.
    fn analyze(&self, input: &Path) -> CoreResult<DetectorReport>;
}

/// Runs `detector` on `input` and writes its report to `output`.
///
/// Nothing is written when analysis fails.
pub fn run_detector<D: Detector + ?Sized>(
    detector: &D,
    input: &Path,
    output: &Path,
) -> CoreResult<DetectorReport> {
    info!("[{}] Analyzing {}", detector.module(), input.display());
    let report = detector.analyze(input)?;
    write_detector_report(output, &report)?;
    info!(
        "[{}] Report saved to {} ({}, {} event(s))",
        detector.module(),
        output.display(),
        report.status,
        report.events.len()
    );
    Ok(report)
}
