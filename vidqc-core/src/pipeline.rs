// ============================================================================
// vidqc-core/src/pipeline.rs
// ============================================================================
//
// PIPELINE: Full QC Run for One Media File
//
// Runs the three detectors against one input and aggregates whatever they
// produced into the Master Report. Detectors run concurrently on the rayon
// pool; they share only read-only configuration. A detector that fails is
// logged and leaves its report file absent, which the aggregator treats as
// a missing report.
//
// KEY COMPONENTS:
// - run_pipeline: detectors + aggregation
// - DetectorRun: per-detector outcome
// - PipelineSummary: everything the caller needs to present the result

use crate::config::QcConfig;
use crate::detectors::{
    BlackScreenDetector, Detector, LoudnessDetector, OcrDetector, run_detector,
};
use crate::error::{CoreError, CoreResult};
use crate::external::ensure_input_exists;
use crate::report::{MasterReport, aggregate_paths, write_master_report};

use log::{debug, error, info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Outcome of one detector within a pipeline run.
#[derive(Debug)]
pub struct DetectorRun {
    pub module: &'static str,
    pub report_path: PathBuf,
    /// Status and event count on success; the fatal error otherwise.
    pub outcome: Result<(String, usize), CoreError>,
}

impl DetectorRun {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Result of [`run_pipeline`].
#[derive(Debug)]
pub struct PipelineSummary {
    pub input: PathBuf,
    pub runs: Vec<DetectorRun>,
    pub master: MasterReport,
    pub master_path: PathBuf,
}

impl PipelineSummary {
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.master.timeline.len()
    }

    pub fn failed_runs(&self) -> impl Iterator<Item = &DetectorRun> {
        self.runs.iter().filter(|run| !run.succeeded())
    }
}

/// Runs every detector on `input` and writes the Master Report.
///
/// Fails only when the input is missing, the configuration is invalid, or
/// the output directory or Master Report cannot be written.
pub fn run_pipeline(input: &Path, config: &QcConfig) -> CoreResult<PipelineSummary> {
    config.validate()?;
    ensure_input_exists(input)?;
    let input = fs::canonicalize(input)?;

    info!("Starting QC pipeline for {}", input.display());
    fs::create_dir_all(&config.output_dir)?;

    let visual_path = config.visual_report_path();
    let audio_path = config.audio_report_path();
    let ocr_path = config.ocr_report_path();
    for stale in [&visual_path, &audio_path, &ocr_path] {
        remove_stale_report(stale)?;
    }

    let visual = BlackScreenDetector::new(config.visual.clone());
    let audio = LoudnessDetector::new(config.audio.clone());
    let ocr = OcrDetector::new(config.ocr.clone());

    let (visual_run, (audio_run, ocr_run)) = rayon::join(
        || execute(&visual, &input, &visual_path),
        || {
            rayon::join(
                || execute(&audio, &input, &audio_path),
                || execute(&ocr, &input, &ocr_path),
            )
        },
    );

    info!("Aggregating detector reports");
    let master = aggregate_paths(&[&visual_path, &audio_path, &ocr_path]);
    let master_path = config.master_report_path();
    write_master_report(&master_path, &master)?;

    info!(
        "QC completed: {} ({} event(s), {} module(s)), report at {}",
        master.overall_status.as_str(),
        master.timeline.len(),
        master.modules_run,
        master_path.display()
    );

    Ok(PipelineSummary {
        input,
        runs: vec![visual_run, audio_run, ocr_run],
        master,
        master_path,
    })
}

fn execute<D: Detector>(detector: &D, input: &Path, report_path: &Path) -> DetectorRun {
    let outcome = run_detector(detector, input, report_path)
        .map(|report| (report.status.to_string(), report.events.len()));

    if let Err(e) = &outcome {
        error!(
            "[{}] failed, no report written: {}",
            detector.module(),
            e
        );
    }

    DetectorRun {
        module: detector.module(),
        report_path: report_path.to_path_buf(),
        outcome,
    }
}

fn remove_stale_report(path: &Path) -> CoreResult<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed stale report {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
