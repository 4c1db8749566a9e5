//! Defensive ingestion of detector report files.
//!
//! Every path yields an [`IngestOutcome`]; nothing here returns an error.
//! A missing or unreadable file is `Missing`, a file that is not a JSON
//! object of the expected shape is `Malformed`, and only `Loaded` outcomes
//! take part in aggregation.

use crate::report::schema::DetectorReport;
use log::{debug, error, warn};
use serde::de::Error as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of trying to read one detector report.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    Loaded {
        path: PathBuf,
        report: DetectorReport,
    },
    Missing {
        path: PathBuf,
    },
    Malformed {
        path: PathBuf,
        reason: String,
    },
}

impl IngestOutcome {
    pub fn path(&self) -> &Path {
        match self {
            IngestOutcome::Loaded { path, .. }
            | IngestOutcome::Missing { path }
            | IngestOutcome::Malformed { path, .. } => path,
        }
    }

    pub fn into_report(self) -> Option<DetectorReport> {
        match self {
            IngestOutcome::Loaded { report, .. } => Some(report),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, IngestOutcome::Loaded { .. })
    }
}

/// Parses report bytes. The top level must be a JSON object.
pub fn parse_report(bytes: &[u8]) -> Result<DetectorReport, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    if !value.is_object() {
        return Err(serde_json::Error::custom(
            "expected a JSON object at the top level",
        ));
    }
    serde_json::from_value(value)
}

/// Reads and validates a single report file.
pub fn ingest_report(path: &Path) -> IngestOutcome {
    let path_buf = path.to_path_buf();

    if !path.is_file() {
        warn!("Report not found: {}. Skipping.", path.display());
        return IngestOutcome::Missing { path: path_buf };
    }

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Report not readable: {} ({}). Skipping.", path.display(), e);
            return IngestOutcome::Missing { path: path_buf };
        }
    };

    match parse_report(&bytes) {
        Ok(report) => {
            debug!(
                "Parsed {} with {} event(s)",
                path.display(),
                report.events.len()
            );
            IngestOutcome::Loaded {
                path: path_buf,
                report,
            }
        }
        Err(e) => {
            error!("Failed to parse {}: {}", path.display(), e);
            IngestOutcome::Malformed {
                path: path_buf,
                reason: e.to_string(),
            }
        }
    }
}

/// Ingests every path in order. The output has one outcome per input.
pub fn ingest_reports<P: AsRef<Path>>(paths: &[P]) -> Vec<IngestOutcome> {
    paths.iter().map(|p| ingest_report(p.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::schema::ReportStatus;
    use tempfile::tempdir;

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(parse_report(b"[1, 2, 3]").is_err());
        assert!(parse_report(b"\"PASSED\"").is_err());
        assert!(parse_report(b"{ not json").is_err());
    }

    #[test]
    fn test_parse_rejects_wrong_shapes() {
        assert!(parse_report(br#"{"events": 5}"#).is_err());
        assert!(parse_report(br#"{"events": ["not an event"]}"#).is_err());
        assert!(parse_report(br#"{"module": 12}"#).is_err());
    }

    #[test]
    fn test_parse_keeps_reports_with_odd_event_fields() {
        let report = parse_report(
            br#"{"module": "visual_qc", "status": "REJECTED",
                 "events": [{"type": "black_screen_glitch", "start_time": 1.0,
                             "confidence": "1.0", "details": "opaque",
                             "source_module": {"fake": true}}]}"#,
        )
        .unwrap();
        assert_eq!(report.status, ReportStatus::Rejected);
        assert_eq!(report.events.len(), 1);
        assert_eq!(report.events[0].details, Some(serde_json::json!("opaque")));
    }

    #[test]
    fn test_ingest_missing_and_directory() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.json");

        assert_eq!(
            ingest_report(&missing),
            IngestOutcome::Missing {
                path: missing.clone()
            }
        );
        assert!(matches!(
            ingest_report(dir.path()),
            IngestOutcome::Missing { .. }
        ));
    }

    #[test]
    fn test_ingest_loaded_and_malformed() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.json");
        let bad = dir.path().join("bad.json");
        fs::write(&good, r#"{"module": "audio_qc", "status": "REJECTED"}"#).unwrap();
        fs::write(&bad, "{\"module\": ").unwrap();

        let outcomes = ingest_reports(&[&good, &bad]);
        assert_eq!(outcomes.len(), 2);

        assert_eq!(outcomes[0].path(), good.as_path());
        let report = outcomes[0].clone().into_report().unwrap();
        assert_eq!(report.module, "audio_qc");
        assert_eq!(report.status, ReportStatus::Rejected);

        match &outcomes[1] {
            IngestOutcome::Malformed { path, reason } => {
                assert_eq!(path, &bad);
                assert!(!reason.is_empty());
            }
            other => panic!("expected malformed outcome, got {other:?}"),
        }
    }
}
