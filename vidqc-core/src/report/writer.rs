//! Report file output.
//!
//! Reports are UTF-8 JSON with 4-space indentation and a trailing newline.
//! Non-ASCII text (OCR results in particular) is written verbatim. Known
//! fields follow schema order and open maps are key-sorted, so serializing
//! the same report twice yields identical bytes.

use crate::error::{CoreError, CoreResult};
use crate::report::schema::{DetectorReport, MasterReport};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Serializes `value` into the on-disk report format.
pub fn to_report_bytes<T: Serialize>(value: &T) -> CoreResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Writes `value` to `path`, creating parent directories as needed.
///
/// The bytes go to a temporary sibling first and are then renamed into
/// place, so readers never observe a half-written report.
pub fn write_json_report<T: Serialize>(path: &Path, value: &T) -> CoreResult<()> {
    let bytes = to_report_bytes(value)?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| {
        CoreError::PathError(format!(
            "Failed to create report directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(&bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| CoreError::Io(e.error))?;

    log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

pub fn write_detector_report(path: &Path, report: &DetectorReport) -> CoreResult<()> {
    write_json_report(path, report)
}

pub fn write_master_report(path: &Path, report: &MasterReport) -> CoreResult<()> {
    write_json_report(path, report)
}

/// Reads a Master Report back, e.g. to summarize a finished run.
pub fn read_master_report(path: &Path) -> CoreResult<MasterReport> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::schema::{Event, OverallStatus};
    use tempfile::tempdir;

    #[test]
    fn test_empty_master_report_layout() {
        let bytes = to_report_bytes(&MasterReport::default()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "{\n    \"overall_status\": \"PASSED\",\n    \"modules_run\": 0,\n    \"timeline\": []\n}\n"
        );
    }

    #[test]
    fn test_non_ascii_is_not_escaped() {
        let event = Event::new("vernacular_text_detected", 0.0, 2.0, 0.9)
            .with_detail("text", "समाचार");
        let master = MasterReport {
            overall_status: OverallStatus::Passed,
            modules_run: 1,
            timeline: vec![event],
        };
        let text = String::from_utf8(to_report_bytes(&master).unwrap()).unwrap();
        assert!(text.contains("समाचार"));
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn test_write_creates_parent_and_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("Master_Report.json");
        let master = MasterReport {
            overall_status: OverallStatus::Rejected,
            modules_run: 2,
            timeline: vec![],
        };

        write_master_report(&path, &master).unwrap();
        assert_eq!(read_master_report(&path).unwrap(), master);
    }
}
