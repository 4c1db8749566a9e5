//! Core library for automated video quality control.
//!
//! Three independent detectors analyse a media file (black screens, loudness
//! compliance and on-screen text) and each emits a detector report. The
//! report module merges those reports into one Master Report with a single
//! PASSED/REJECTED verdict and a chronological timeline of every event.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use vidqc_core::{QcConfig, run_pipeline};
//! use std::path::{Path, PathBuf};
//!
//! let mut config = QcConfig::new(PathBuf::from("outputs"));
//! config.audio.target_lufs = -24.0;
//!
//! let summary = run_pipeline(Path::new("episode.mp4"), &config).unwrap();
//! println!(
//!     "{}: {} event(s)",
//!     summary.master.overall_status.as_str(),
//!     summary.event_count()
//! );
//! ```
//!
//! Aggregating existing reports never fails on bad input:
//!
//! ```rust
//! use vidqc_core::report::{OverallStatus, aggregate_paths};
//!
//! let master = aggregate_paths(&["does_not_exist.json"]);
//! assert_eq!(master.overall_status, OverallStatus::Passed);
//! assert_eq!(master.modules_run, 0);
//! ```

pub mod config;
pub mod detectors;
pub mod error;
pub mod external;
pub mod pipeline;
pub mod report;
pub mod utils;

// Re-exports for public API
pub use config::{AudioConfig, OcrConfig, QcConfig, VisualConfig};
pub use detectors::{
    BlackScreenDetector, Detector, LoudnessDetector, OcrDetector, TesseractRecognizer,
    TextRecognizer, run_detector,
};
pub use error::{CoreError, CoreResult};
pub use pipeline::{DetectorRun, PipelineSummary, run_pipeline};
pub use report::{
    DetectorReport, Event, IngestOutcome, MasterReport, OverallStatus, ReportStatus,
    aggregate_paths, write_master_report,
};
pub use utils::{format_timestamp, round2};
