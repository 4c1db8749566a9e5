use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};
use vidqc_core::report::{
    IngestOutcome, OverallStatus, aggregate_paths, ingest_reports, read_master_report,
    write_master_report,
};

// --- Test Helper Functions ---

fn write_report(dir: &TempDir, name: &str, body: &Value) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, serde_json::to_vec_pretty(body).unwrap()).unwrap();
    path
}

fn report(module: &str, status: &str, events: Value) -> Value {
    json!({
        "module": module,
        "video_file": "clip.mp4",
        "status": status,
        "events": events,
    })
}

fn start_times(timeline: &[vidqc_core::Event]) -> Vec<Option<f64>> {
    timeline.iter().map(|e| e.start_time).collect()
}

#[test]
fn test_empty_input_list() {
    let master = aggregate_paths::<&Path>(&[]);
    assert_eq!(master.overall_status, OverallStatus::Passed);
    assert_eq!(master.modules_run, 0);
    assert!(master.timeline.is_empty());
}

#[test]
fn test_single_rejection_latches_verdict() {
    let dir = tempdir().unwrap();
    let a = write_report(&dir, "a.json", &report("visual_qc", "PASSED", json!([])));
    let b = write_report(&dir, "b.json", &report("audio_qc", "REJECTED", json!([])));
    let c = write_report(&dir, "c.json", &report("ocr_extraction", "PASSED", json!([])));

    let master = aggregate_paths(&[&a, &b, &c]);
    assert_eq!(master.overall_status, OverallStatus::Rejected);
    assert_eq!(master.modules_run, 3);
}

#[test]
fn test_only_exact_rejected_literal_counts() {
    let dir = tempdir().unwrap();
    let paths = [
        write_report(&dir, "a.json", &report("visual_qc", "rejected", json!([]))),
        write_report(&dir, "b.json", &report("audio_qc", "FAILED", json!([]))),
        write_report(
            &dir,
            "c.json",
            &json!({"module": "ocr_extraction", "status": 1, "events": []}),
        ),
        write_report(&dir, "d.json", &json!({"module": "extra_qc"})),
    ];

    let master = aggregate_paths(&paths);
    assert_eq!(master.overall_status, OverallStatus::Passed);
    assert_eq!(master.modules_run, 4);
}

#[test]
fn test_missing_file_is_skipped() {
    let dir = tempdir().unwrap();
    let visual = write_report(
        &dir,
        "report_visual.json",
        &report(
            "visual_qc",
            "REJECTED",
            json!([{"type": "black_screen_glitch", "start_time": 1.0, "end_time": 4.0,
                    "confidence": 1.0, "details": {"duration": 3.0}}]),
        ),
    );
    let audio = dir.path().join("report_audio.json");
    let ocr = write_report(&dir, "report_ocr.json", &report("ocr_extraction", "PASSED", json!([])));

    let master = aggregate_paths(&[&visual, &audio, &ocr]);
    assert_eq!(master.modules_run, 2);
    assert_eq!(master.overall_status, OverallStatus::Rejected);
    assert_eq!(master.timeline.len(), 1);
}

#[test]
fn test_malformed_file_is_skipped() {
    let dir = tempdir().unwrap();
    let good = write_report(&dir, "good.json", &report("audio_qc", "PASSED", json!([])));
    let truncated = dir.path().join("truncated.json");
    fs::write(&truncated, "{\"module\": \"visual_qc\", \"status\": \"REJ").unwrap();
    let array = dir.path().join("array.json");
    fs::write(&array, "[1, 2, 3]").unwrap();

    let outcomes = ingest_reports(&[&good, &truncated, &array]);
    assert!(outcomes[0].is_loaded());
    assert!(matches!(outcomes[1], IngestOutcome::Malformed { .. }));
    assert!(matches!(outcomes[2], IngestOutcome::Malformed { .. }));

    let master = aggregate_paths(&[&good, &truncated, &array]);
    assert_eq!(master.modules_run, 1);
    assert_eq!(master.overall_status, OverallStatus::Passed);
}

#[test]
fn test_stable_chronological_order() {
    let dir = tempdir().unwrap();
    let r1 = write_report(
        &dir,
        "r1.json",
        &report(
            "visual_qc",
            "PASSED",
            json!([
                {"type": "late", "start_time": 5.0, "end_time": 6.0},
                {"type": "early", "start_time": 2.0, "end_time": 3.0}
            ]),
        ),
    );
    let r2 = write_report(
        &dir,
        "r2.json",
        &report(
            "ocr_extraction",
            "PASSED",
            json!([{"type": "tie", "start_time": 2.0, "end_time": 4.0}]),
        ),
    );

    let master = aggregate_paths(&[&r1, &r2]);
    let order: Vec<(&str, &str)> = master
        .timeline
        .iter()
        .map(|e| {
            (
                e.source_module.as_deref().unwrap(),
                e.kind.as_deref().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        order,
        vec![
            ("visual_qc", "early"),
            ("ocr_extraction", "tie"),
            ("visual_qc", "late"),
        ]
    );
}

#[test]
fn test_source_module_is_overwritten() {
    let dir = tempdir().unwrap();
    let path = write_report(
        &dir,
        "r.json",
        &report(
            "audio_qc",
            "PASSED",
            json!([{"type": "x", "start_time": 0.0, "source_module": "spoofed"}]),
        ),
    );

    let master = aggregate_paths(&[&path]);
    assert_eq!(master.timeline[0].source_module.as_deref(), Some("audio_qc"));
}

#[test]
fn test_missing_module_tags_unknown() {
    let dir = tempdir().unwrap();
    let path = write_report(
        &dir,
        "r.json",
        &json!({"status": "PASSED", "events": [{"type": "x", "start_time": 1.0}]}),
    );

    let master = aggregate_paths(&[&path]);
    assert_eq!(master.timeline[0].source_module.as_deref(), Some("unknown"));
}

#[test]
fn test_missing_start_time_sorts_first() {
    let dir = tempdir().unwrap();
    let path = write_report(
        &dir,
        "r.json",
        &report(
            "visual_qc",
            "PASSED",
            json!([
                {"type": "a", "start_time": 0.5},
                {"type": "b"},
                {"type": "c", "start_time": "soon"},
                {"type": "d", "start_time": 0.0}
            ]),
        ),
    );

    let master = aggregate_paths(&[&path]);
    let kinds: Vec<&str> = master
        .timeline
        .iter()
        .map(|e| e.kind.as_deref().unwrap())
        .collect();
    assert_eq!(kinds, vec!["b", "c", "d", "a"]);
    assert_eq!(
        start_times(&master.timeline),
        vec![None, None, Some(0.0), Some(0.5)]
    );
}

#[test]
fn test_unknown_fields_are_preserved() {
    let dir = tempdir().unwrap();
    let path = write_report(
        &dir,
        "r.json",
        &report(
            "ocr_extraction",
            "PASSED",
            json!([{"type": "vernacular_text_detected", "start_time": 0.0, "end_time": 2.0,
                    "confidence": 0.9, "details": {"text": "नमस्ते", "language": "hi"},
                    "bbox": [1, 2, 3, 4]}]),
        ),
    );
    let out = dir.path().join("Master_Report.json");

    write_master_report(&out, &aggregate_paths(&[&path])).unwrap();
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("नमस्ते"), "non-ASCII text must be written verbatim");

    let value: Value = serde_json::from_str(&text).unwrap();
    let event = &value["timeline"][0];
    assert_eq!(event["bbox"], json!([1, 2, 3, 4]));
    assert_eq!(event["details"]["language"], json!("hi"));
    assert_eq!(event["source_module"], json!("ocr_extraction"));
}

#[test]
fn test_reaggregation_is_byte_identical() {
    let dir = tempdir().unwrap();
    let a = write_report(
        &dir,
        "a.json",
        &report(
            "visual_qc",
            "REJECTED",
            json!([{"type": "black_screen_glitch", "start_time": 12.4, "end_time": 15.0,
                    "confidence": 1.0, "details": {"duration": 2.6}}]),
        ),
    );
    let b = write_report(
        &dir,
        "b.json",
        &report(
            "audio_qc",
            "REJECTED",
            json!([{"type": "loudness_violation", "start_time": 0.0, "end_time": 0.0,
                    "confidence": 1.0, "details": {"measured_lufs": -27.6,
                    "target_lufs": -23.0, "correction_needed_db": 4.6}}]),
        ),
    );
    let missing = dir.path().join("c.json");
    let inputs = [a, b, missing];

    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    write_master_report(&first, &aggregate_paths(&inputs)).unwrap();
    write_master_report(&second, &aggregate_paths(&inputs)).unwrap();

    let first_bytes = fs::read(&first).unwrap();
    assert_eq!(first_bytes, fs::read(&second).unwrap());
    assert!(first_bytes.ends_with(b"}\n"));

    let reread = read_master_report(&first).unwrap();
    assert_eq!(reread.modules_run, 2);
    assert_eq!(reread.overall_status, OverallStatus::Rejected);
    assert_eq!(reread.timeline[0].source_module.as_deref(), Some("audio_qc"));
}

#[test]
fn test_output_uses_four_space_indent() {
    let dir = tempdir().unwrap();
    let path = write_report(
        &dir,
        "r.json",
        &report("visual_qc", "PASSED", json!([{"type": "x", "start_time": 1.0}])),
    );
    let out = dir.path().join("nested").join("Master_Report.json");

    write_master_report(&out, &aggregate_paths(&[&path])).unwrap();
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("{\n    \"overall_status\": \"PASSED\",\n    \"modules_run\": 1,"));
    assert!(text.contains("\n        {\n            \"type\": \"x\""));
}

#[test]
fn test_rejection_survives_mistyped_event_fields() {
    let dir = tempdir().unwrap();
    let spoofed = write_report(
        &dir,
        "visual.json",
        &report(
            "visual_qc",
            "REJECTED",
            json!([{"type": "black_screen_glitch", "start_time": 3.0, "end_time": 5.0,
                    "source_module": {"fake": true}}]),
        ),
    );
    let odd = write_report(
        &dir,
        "ocr.json",
        &report(
            "ocr_extraction",
            "PASSED",
            json!([{"type": "vernacular_text_detected", "start_time": 1.0,
                    "confidence": "1.0", "details": "opaque"}]),
        ),
    );
    let out = dir.path().join("Master_Report.json");

    let master = aggregate_paths(&[&spoofed, &odd]);
    assert_eq!(master.modules_run, 2);
    assert_eq!(master.overall_status, OverallStatus::Rejected);
    assert_eq!(master.timeline[1].source_module.as_deref(), Some("visual_qc"));

    write_master_report(&out, &master).unwrap();
    let value: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value["timeline"][0]["confidence"], json!("1.0"));
    assert_eq!(value["timeline"][0]["details"], json!("opaque"));
    assert_eq!(value["timeline"][0]["source_module"], json!("ocr_extraction"));
}

#[test]
fn test_negative_zero_keeps_input_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("r.json");
    fs::write(
        &path,
        r#"{"module": "visual_qc", "status": "PASSED",
            "events": [{"type": "first"}, {"type": "second", "start_time": -0.0}]}"#,
    )
    .unwrap();

    let master = aggregate_paths(&[&path]);
    let kinds: Vec<&str> = master
        .timeline
        .iter()
        .map(|e| e.kind.as_deref().unwrap())
        .collect();
    assert_eq!(kinds, vec!["first", "second"]);
}

#[test]
fn test_float_timings_pass_through_unchanged() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("r.json");
    fs::write(
        &path,
        r#"{"module": "visual_qc", "status": "PASSED",
            "events": [{"type": "x", "start_time": 9646.836343000077,
                        "end_time": 9648.0, "details": {"offset": 143.25429500016583}}]}"#,
    )
    .unwrap();
    let out = dir.path().join("Master_Report.json");

    write_master_report(&out, &aggregate_paths(&[&path])).unwrap();
    let reread = read_master_report(&out).unwrap();
    let event = &reread.timeline[0];
    assert_eq!(event.start_time, Some(9646.836343000077));
    assert_eq!(event.detail("offset").and_then(Value::as_f64), Some(143.25429500016583));
}
