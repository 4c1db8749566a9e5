//! On-screen text extraction.
//!
//! Frames are sampled with ffmpeg at one frame per `interval_secs` into a
//! temporary directory, then each frame goes through a [`TextRecognizer`].
//! The default recognizer shells out to tesseract and reads its TSV output.
//! Text never rejects an asset: the report status is always `PASSED`.

use crate::config::OcrConfig;
use crate::detectors::Detector;
use crate::error::{
    CoreError, CoreResult, command_failed_error, command_start_error, command_wait_error,
    ffmpeg_output_error,
};
use crate::external::{FfmpegCommandBuilder, check_dependency, check_ffmpeg, ensure_input_exists};
use crate::report::schema::{DetectorReport, Event, OCR_MODULE, ReportStatus, TEXT_DETECTED_EVENT};

use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use log::{debug, info, warn};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// A line of recognized text with a confidence in `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    pub text: String,
    pub confidence: f64,
}

/// Recognizes text in a single image.
pub trait TextRecognizer: Sync {
    /// Fails when the recognizer cannot run at all.
    fn ensure_available(&self) -> CoreResult<()> {
        Ok(())
    }

    fn recognize(&self, image: &Path) -> CoreResult<Vec<TextFragment>>;
}

// ============================================================================
// TESSERACT
// ============================================================================

/// [`TextRecognizer`] backed by the tesseract command-line tool.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    binary: String,
    languages: String,
}

impl TesseractRecognizer {
    pub fn new(binary: impl Into<String>, languages: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            languages: languages.into(),
        }
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(&config.tesseract_binary, &config.languages)
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn ensure_available(&self) -> CoreResult<()> {
        check_dependency(&self.binary, "--version")
    }

    fn recognize(&self, image: &Path) -> CoreResult<Vec<TextFragment>> {
        let output = Command::new(&self.binary)
            .arg(image)
            .arg("stdout")
            .args(["-l", self.languages.as_str()])
            .arg("tsv")
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => CoreError::DependencyNotFound(self.binary.clone()),
                _ => command_start_error(&self.binary, e),
            })?;

        if !output.status.success() {
            return Err(command_failed_error(
                &self.binary,
                output.status,
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }

        Ok(parse_tesseract_tsv(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Groups tesseract TSV word rows into line fragments.
///
/// Words sharing (page, block, paragraph, line) form one fragment, in order
/// of first appearance. Rows with negative confidence (layout rows) or empty
/// text are ignored. Fragment confidence is the mean word confidence scaled
/// from tesseract's 0-100 to 0-1.
#[must_use]
pub fn parse_tesseract_tsv(tsv: &str) -> Vec<TextFragment> {
    struct Line<'a> {
        key: [&'a str; 4],
        words: Vec<&'a str>,
        conf_sum: f64,
    }

    let mut lines: Vec<Line<'_>> = Vec::new();

    for row in tsv.lines() {
        let cols: Vec<&str> = row.splitn(12, '\t').collect();
        if cols.len() < 11 || cols[0] == "level" {
            continue;
        }
        let Ok(conf) = cols[10].trim().parse::<f64>() else {
            continue;
        };
        let text = cols.get(11).map_or("", |t| t.trim());
        if conf < 0.0 || text.is_empty() {
            continue;
        }

        let key = [cols[1], cols[2], cols[3], cols[4]];
        match lines.iter_mut().find(|l| l.key == key) {
            Some(line) => {
                line.words.push(text);
                line.conf_sum += conf;
            }
            None => lines.push(Line {
                key,
                words: vec![text],
                conf_sum: conf,
            }),
        }
    }

    lines
        .into_iter()
        .map(|line| TextFragment {
            confidence: line.conf_sum / line.words.len() as f64 / 100.0,
            text: line.words.join(" "),
        })
        .collect()
}

/// `"hi"` when `text` contains any Devanagari character, otherwise `"en"`.
#[must_use]
pub fn detect_language(text: &str) -> &'static str {
    if text.chars().any(|c| ('\u{0900}'..='\u{097F}').contains(&c)) {
        "hi"
    } else {
        "en"
    }
}

// ============================================================================
// FRAME SAMPLING
// ============================================================================

/// Writes one JPEG per `interval_secs` of `input` into `dir` and returns the
/// frame paths in sampling order.
pub fn extract_frames(input: &Path, dir: &Path, interval_secs: f64) -> CoreResult<Vec<PathBuf>> {
    let pattern = dir.join("frame_%04d.jpg");
    let filter = format!("fps=1/{interval_secs}");

    let mut cmd = FfmpegCommandBuilder::new()
        .with_log_level("error")
        .build_with_input(input);
    cmd.args(["-vf", filter.as_str()])
        .arg("-y")
        .arg(&pattern);
    debug!("Extracting OCR frames: {cmd:?}");

    let mut child = cmd
        .spawn()
        .map_err(|e| command_start_error("ffmpeg", e))?;

    let mut errors: Vec<String> = Vec::new();
    for event in child.iter().map_err(ffmpeg_output_error)? {
        match event {
            FfmpegEvent::Error(line)
            | FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, line) => errors.push(line),
            _ => {}
        }
    }

    let status = child
        .wait()
        .map_err(|e| command_wait_error("ffmpeg", e))?;
    if !status.success() {
        return Err(command_failed_error("ffmpeg", status, errors.join("\n")));
    }

    let mut frames: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "jpg"))
        .collect();
    sort_frames(&mut frames);
    Ok(frames)
}

/// Orders frames by the number ffmpeg put in their name, so `frame_10000`
/// follows `frame_9999`. Unnumbered files go first.
fn sort_frames(frames: &mut [PathBuf]) {
    frames.sort_by_cached_key(|path| (frame_number(path), path.clone()));
}

fn frame_number(path: &Path) -> Option<u64> {
    path.file_stem()?
        .to_str()?
        .strip_prefix("frame_")?
        .parse()
        .ok()
}

/// Runs `recognizer` over `frames` and converts confident fragments into
/// events. Frame `i` spans `[i * interval, (i + 1) * interval]`.
pub fn recognize_frames<R: TextRecognizer + ?Sized>(
    recognizer: &R,
    frames: &[PathBuf],
    interval_secs: f64,
    confidence_threshold: f64,
) -> Vec<Event> {
    let mut events = Vec::new();

    for (idx, frame) in frames.iter().enumerate() {
        let fragments = match recognizer.recognize(frame) {
            Ok(fragments) => fragments,
            Err(e) => {
                warn!("Skipping frame {}: {}", frame.display(), e);
                continue;
            }
        };

        let start = idx as f64 * interval_secs;
        for fragment in fragments {
            if fragment.confidence <= confidence_threshold {
                continue;
            }
            let language = detect_language(&fragment.text);
            events.push(
                Event::new(TEXT_DETECTED_EVENT, start, start + interval_secs, fragment.confidence)
                    .with_detail("text", fragment.text.trim())
                    .with_detail("language", language),
            );
        }
    }

    events
}

// ============================================================================
// DETECTOR
// ============================================================================

/// OCR detector, generic over the recognizer.
#[derive(Debug, Clone)]
pub struct OcrDetector<R = TesseractRecognizer> {
    config: OcrConfig,
    recognizer: R,
}

impl OcrDetector<TesseractRecognizer> {
    pub fn new(config: OcrConfig) -> Self {
        let recognizer = TesseractRecognizer::from_config(&config);
        Self { config, recognizer }
    }
}

impl<R: TextRecognizer> OcrDetector<R> {
    pub fn with_recognizer(config: OcrConfig, recognizer: R) -> Self {
        Self { config, recognizer }
    }
}

impl<R: TextRecognizer> Detector for OcrDetector<R> {
    fn module(&self) -> &'static str {
        OCR_MODULE
    }

    fn analyze(&self, input: &Path) -> CoreResult<DetectorReport> {
        ensure_input_exists(input)?;
        check_ffmpeg()?;
        self.recognizer.ensure_available()?;

        let frame_dir = tempfile::Builder::new()
            .prefix("vidqc_frames_")
            .tempdir()?;
        let frames = extract_frames(input, frame_dir.path(), self.config.interval_secs)?;
        info!("Sampled {} frame(s) for OCR", frames.len());

        let events = recognize_frames(
            &self.recognizer,
            &frames,
            self.config.interval_secs,
            self.config.confidence_threshold,
        );

        Ok(DetectorReport::new(
            OCR_MODULE,
            input.to_string_lossy(),
            ReportStatus::Passed,
            events,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TSV: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
1\t1\t0\t0\t0\t0\t0\t0\t1280\t720\t-1\t
4\t1\t1\t1\t1\t0\t100\t600\t400\t40\t-1\t
5\t1\t1\t1\t1\t1\t100\t600\t120\t40\t96.5\tBreaking
5\t1\t1\t1\t1\t2\t230\t600\t100\t40\t91.5\tNews
5\t1\t2\t1\t1\t1\t100\t100\t200\t40\t40.0\tनमस्ते
5\t1\t2\t1\t1\t2\t310\t100\t20\t40\t95.0\t
5\t1\t1\t1\t2\t1\t100\t650\t80\t30\t30.0\tticker
";

    struct ScriptedRecognizer;

    impl TextRecognizer for ScriptedRecognizer {
        fn recognize(&self, image: &Path) -> CoreResult<Vec<TextFragment>> {
            match image.file_name().and_then(|n| n.to_str()) {
                Some("frame_0001.jpg") => Ok(vec![
                    TextFragment {
                        text: "  Breaking News ".to_string(),
                        confidence: 0.94,
                    },
                    TextFragment {
                        text: "blur".to_string(),
                        confidence: 0.5,
                    },
                ]),
                Some("frame_0003.jpg") => Ok(vec![TextFragment {
                    text: "समाचार".to_string(),
                    confidence: 0.81,
                }]),
                _ => Err(CoreError::OperationFailed("unreadable frame".to_string())),
            }
        }
    }

    #[test]
    fn test_parse_tesseract_tsv_groups_lines() {
        let fragments = parse_tesseract_tsv(TSV);
        assert_eq!(fragments.len(), 3);

        assert_eq!(fragments[0].text, "Breaking News");
        assert!((fragments[0].confidence - 0.94).abs() < 1e-9);

        assert_eq!(fragments[1].text, "नमस्ते");
        assert!((fragments[1].confidence - 0.40).abs() < 1e-9);

        assert_eq!(fragments[2].text, "ticker");
    }

    #[test]
    fn test_parse_tesseract_tsv_ignores_garbage() {
        assert!(parse_tesseract_tsv("").is_empty());
        assert!(parse_tesseract_tsv("not\ta\ttsv").is_empty());
    }

    #[test]
    fn test_detect_language() {
        assert_eq!(detect_language("नमस्ते"), "hi");
        assert_eq!(detect_language("Hello नमस्ते"), "hi");
        assert_eq!(detect_language("Hello"), "en");
        assert_eq!(detect_language("12:30"), "en");
        assert_eq!(detect_language(""), "en");
    }

    #[test]
    fn test_recognize_frames() {
        let frames: Vec<PathBuf> = ["frame_0001.jpg", "frame_0002.jpg", "frame_0003.jpg"]
            .iter()
            .map(PathBuf::from)
            .collect();

        let events = recognize_frames(&ScriptedRecognizer, &frames, 2.0, 0.5);
        assert_eq!(events.len(), 2);

        assert_eq!(events[0].kind.as_deref(), Some("vernacular_text_detected"));
        assert_eq!(events[0].start_time, Some(0.0));
        assert_eq!(events[0].end_time, Some(2.0));
        assert_eq!(events[0].confidence, Some(0.94));
        assert_eq!(events[0].detail("text"), Some(&json!("Breaking News")));
        assert_eq!(events[0].detail("language"), Some(&json!("en")));

        // the second frame failed and is skipped, but keeps its time slot
        assert_eq!(events[1].start_time, Some(4.0));
        assert_eq!(events[1].end_time, Some(6.0));
        assert_eq!(events[1].detail("language"), Some(&json!("hi")));
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let detector = OcrDetector::with_recognizer(OcrConfig::default(), ScriptedRecognizer);
        let result = detector.analyze(Path::new("/nonexistent/clip.mp4"));
        assert!(matches!(result, Err(CoreError::InputNotFound(_))));
    }

    #[test]
    fn test_frames_sort_by_number() {
        let names = ["frame_10000.jpg", "frame_1001.jpg", "frame_0002.jpg", "frame_9999.jpg"];
        let mut frames: Vec<PathBuf> = names
            .iter()
            .map(|name| Path::new("/tmp/ocr").join(name))
            .collect();
        sort_frames(&mut frames);
        let names: Vec<_> = frames
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["frame_0002.jpg", "frame_1001.jpg", "frame_9999.jpg", "frame_10000.jpg"]
        );
    }

    #[test]
    fn test_missing_tesseract_binary() {
        let recognizer = TesseractRecognizer::new("vidqc-no-such-tesseract", "eng");
        assert!(matches!(
            recognizer.ensure_available(),
            Err(CoreError::DependencyNotFound(_))
        ));
    }
}
