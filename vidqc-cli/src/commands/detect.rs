// vidqc-cli/src/commands/detect.rs
//
// Single-detector commands. A detector that cannot run (missing input,
// missing tool, undecodable media) returns an error before anything is
// written, so the report path stays absent and the command exits 1.

use crate::cli::{AudioArgs, OcrArgs, VisualArgs};
use crate::config::validate_with;
use crate::error::{CliErrorContext, CliResult};
use crate::terminal;
use std::path::Path;
use vidqc_core::{BlackScreenDetector, Detector, LoudnessDetector, OcrDetector, run_detector};

fn run_single<D: Detector>(detector: &D, input: &Path, output: &Path) -> CliResult<()> {
    let report = run_detector(detector, input, output)
        .cli_with_context(|| format!("{} could not analyse {}", detector.module(), input.display()))?;
    terminal::print_detector_result(&report, output);
    Ok(())
}

pub fn run_visual(args: VisualArgs) -> CliResult<()> {
    let config = args.options.to_config();
    validate_with(|c| c.visual = config.clone())?;
    run_single(&BlackScreenDetector::new(config), &args.input, &args.output)
}

pub fn run_audio(args: AudioArgs) -> CliResult<()> {
    let config = args.options.to_config();
    validate_with(|c| c.audio = config.clone())?;
    run_single(&LoudnessDetector::new(config), &args.input, &args.output)
}

pub fn run_ocr(args: OcrArgs) -> CliResult<()> {
    let config = args.options.to_config();
    validate_with(|c| c.ocr = config.clone())?;
    run_single(&OcrDetector::new(config), &args.input, &args.output)
}
