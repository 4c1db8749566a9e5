//! Unified event schema shared by every detector and the aggregator.
//!
//! Detectors emit a [`DetectorReport`]; the aggregator reads any number of
//! them and produces a single [`MasterReport`]. Parsing is deliberately
//! lenient about optional fields: a missing `module`, `status` or `events`
//! falls back to a documented default instead of failing, and non-numeric
//! timings are normalized to "absent".

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{self, Display};

/// Module name written by the black-screen detector.
pub const VISUAL_MODULE: &str = "visual_qc";
/// Module name written by the loudness detector.
pub const AUDIO_MODULE: &str = "audio_qc";
/// Module name written by the OCR detector.
pub const OCR_MODULE: &str = "ocr_extraction";
/// Module name substituted when a report omits `module`.
pub const UNKNOWN_MODULE: &str = "unknown";

pub const BLACK_SCREEN_EVENT: &str = "black_screen_glitch";
pub const LOUDNESS_VIOLATION_EVENT: &str = "loudness_violation";
pub const TEXT_DETECTED_EVENT: &str = "vernacular_text_detected";

const PASSED: &str = "PASSED";
const REJECTED: &str = "REJECTED";
const UNKNOWN: &str = "UNKNOWN";

// ============================================================================
// STATUS TYPES
// ============================================================================

/// Status carried by a single detector report.
///
/// Only the literals `PASSED` and `REJECTED` are meaningful. Anything else,
/// including a missing field or a non-string value, is kept verbatim as
/// `Unknown` so it can be logged, and never counts as a rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportStatus {
    Passed,
    Rejected,
    Unknown(String),
}

impl ReportStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ReportStatus::Passed => PASSED,
            ReportStatus::Rejected => REJECTED,
            ReportStatus::Unknown(raw) => raw,
        }
    }

    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, ReportStatus::Rejected)
    }
}

impl Default for ReportStatus {
    fn default() -> Self {
        ReportStatus::Unknown(UNKNOWN.to_string())
    }
}

impl From<&str> for ReportStatus {
    fn from(raw: &str) -> Self {
        match raw {
            PASSED => ReportStatus::Passed,
            REJECTED => ReportStatus::Rejected,
            other => ReportStatus::Unknown(other.to_string()),
        }
    }
}

impl Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ReportStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ReportStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(raw) => ReportStatus::from(raw.as_str()),
            Value::Null => ReportStatus::default(),
            other => ReportStatus::Unknown(other.to_string()),
        })
    }
}

/// Verdict for the whole asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OverallStatus {
    #[default]
    Passed,
    Rejected,
}

impl OverallStatus {
    /// Folds one detector status into the running verdict.
    ///
    /// Once `Rejected`, the verdict stays `Rejected`.
    #[must_use]
    pub fn observe(self, status: &ReportStatus) -> Self {
        if status.is_rejected() {
            OverallStatus::Rejected
        } else {
            self
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OverallStatus::Passed => PASSED,
            OverallStatus::Rejected => REJECTED,
        }
    }
}

impl Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// EVENT
// ============================================================================

/// One timestamped finding.
///
/// `details` is opaque to the aggregator and copied verbatim, as is any key
/// the schema does not name (collected in `extra`). A named field whose value
/// has the wrong JSON type is left in `extra` untouched instead of failing
/// the whole report; a non-string `source_module` is dropped because the
/// aggregator overwrites it anyway.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct Event {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,

    /// Injected by the aggregator; detectors leave it unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_module: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    /// Creates a detector event with an empty `details` map.
    pub fn new(kind: impl Into<String>, start_time: f64, end_time: f64, confidence: f64) -> Self {
        Self {
            kind: Some(kind.into()),
            start_time: Some(start_time),
            end_time: Some(end_time),
            confidence: Some(confidence),
            details: Some(Value::Object(Map::new())),
            source_module: None,
            extra: Map::new(),
        }
    }

    /// Adds one entry to `details`. Has no effect when `details` is not a map.
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Value::Object(details) = self
            .details
            .get_or_insert_with(|| Value::Object(Map::new()))
        {
            details.insert(key.into(), value.into());
        }
        self
    }

    /// Start time used for ordering; absent timings sort as the beginning of the media.
    #[must_use]
    pub fn sort_time(&self) -> f64 {
        self.start_time.unwrap_or(0.0)
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.as_ref().and_then(|d| d.get(key))
    }
}

impl From<Map<String, Value>> for Event {
    fn from(mut fields: Map<String, Value>) -> Self {
        let source_module = match fields.remove("source_module") {
            Some(Value::String(module)) => Some(module),
            _ => None,
        };
        Self {
            kind: take_typed(&mut fields, "type", |v| v.as_str().map(str::to_owned)),
            start_time: take_typed(&mut fields, "start_time", Value::as_f64),
            end_time: take_typed(&mut fields, "end_time", Value::as_f64),
            confidence: take_typed(&mut fields, "confidence", Value::as_f64),
            details: fields.remove("details"),
            source_module,
            extra: fields,
        }
    }
}

/// Removes `key` only when its value converts; otherwise it stays in `fields`.
fn take_typed<T>(
    fields: &mut Map<String, Value>,
    key: &str,
    convert: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    let typed = fields.get(key).and_then(convert)?;
    fields.remove(key);
    Some(typed)
}

// ============================================================================
// DETECTOR REPORT
// ============================================================================

/// Output of a single detector run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorReport {
    #[serde(default = "unknown_module", deserialize_with = "module_or_unknown")]
    pub module: String,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub video_file: Option<String>,

    #[serde(default)]
    pub status: ReportStatus,

    #[serde(default)]
    pub events: Vec<Event>,
}

impl DetectorReport {
    pub fn new(
        module: impl Into<String>,
        video_file: impl Into<String>,
        status: ReportStatus,
        events: Vec<Event>,
    ) -> Self {
        Self {
            module: module.into(),
            video_file: Some(video_file.into()),
            status,
            events,
        }
    }
}

fn unknown_module() -> String {
    UNKNOWN_MODULE.to_string()
}

fn module_or_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(unknown_module))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

// ============================================================================
// MASTER REPORT
// ============================================================================

/// The aggregator's combined output.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MasterReport {
    pub overall_status: OverallStatus,
    pub modules_run: usize,
    pub timeline: Vec<Event>,
}
