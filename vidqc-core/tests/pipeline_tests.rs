use std::fs;
use tempfile::tempdir;
use vidqc_core::report::read_master_report;
use vidqc_core::{CoreError, OverallStatus, QcConfig, run_pipeline};

// A file that exists but is not media: every detector fails on it whether or
// not ffmpeg and tesseract are installed.
#[test]
fn test_pipeline_degrades_when_every_detector_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("not_a_video.mp4");
    fs::write(&input, "plain text, not media").unwrap();

    let out_dir = dir.path().join("outputs");
    fs::create_dir_all(&out_dir).unwrap();
    let config = QcConfig::new(out_dir.clone());

    // leftovers from an earlier run must not leak into this one
    let stale = r#"{"module": "visual_qc", "status": "REJECTED", "events": []}"#;
    fs::write(config.visual_report_path(), stale).unwrap();
    fs::write(config.audio_report_path(), stale).unwrap();

    let summary = run_pipeline(&input, &config).unwrap();

    assert_eq!(summary.runs.len(), 3);
    assert_eq!(summary.failed_runs().count(), 3);
    assert!(!config.visual_report_path().exists());
    assert!(!config.audio_report_path().exists());
    assert!(!config.ocr_report_path().exists());

    assert_eq!(summary.master.modules_run, 0);
    assert_eq!(summary.master.overall_status, OverallStatus::Passed);
    assert_eq!(summary.event_count(), 0);
    assert_eq!(summary.master_path, out_dir.join("Master_Report.json"));

    let on_disk = read_master_report(&summary.master_path).unwrap();
    assert_eq!(on_disk, summary.master);
}

#[test]
fn test_pipeline_requires_input() {
    let dir = tempdir().unwrap();
    let config = QcConfig::new(dir.path().join("outputs"));

    let err = run_pipeline(&dir.path().join("absent.mp4"), &config).unwrap_err();
    assert!(matches!(err, CoreError::InputNotFound(_)));
    assert!(!dir.path().join("outputs").exists());
}
