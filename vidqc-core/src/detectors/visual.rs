//! Black-screen detection.
//!
//! Frames are decoded by ffmpeg as raw RGB24 and classified one at a time:
//! a pixel is dark when its BT.601 luma is below the configured threshold,
//! and a frame is black when the dark-pixel ratio exceeds the coverage
//! ratio. Consecutive black frames form a run; a run lasting at least the
//! minimum duration becomes one `black_screen_glitch` event.

use crate::config::VisualConfig;
use crate::detectors::Detector;
use crate::error::{
    CoreError, CoreResult, command_start_error, command_wait_error, ffmpeg_output_error,
};
use crate::external::{FfmpegCommandBuilder, check_ffmpeg, ensure_input_exists, probe_frame_rate};
use crate::report::schema::{
    BLACK_SCREEN_EVENT, DetectorReport, Event, ReportStatus, VISUAL_MODULE,
};
use crate::utils::round2;

use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use log::{debug, info, warn};
use std::path::Path;

/// One detected black run, in seconds (rounded to 2 decimals).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackSegment {
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
}

/// Fraction of pixels in an RGB24 buffer whose luma is below `dark_luma`.
#[must_use]
pub fn dark_pixel_ratio(rgb: &[u8], dark_luma: u8) -> f64 {
    let pixels = rgb.len() / 3;
    if pixels == 0 {
        return 0.0;
    }
    let threshold = u32::from(dark_luma);
    let dark = rgb
        .chunks_exact(3)
        .filter(|px| {
            let (r, g, b) = (u32::from(px[0]), u32::from(px[1]), u32::from(px[2]));
            (299 * r + 587 * g + 114 * b + 500) / 1000 < threshold
        })
        .count();
    dark as f64 / pixels as f64
}

/// Turns a per-frame black/non-black sequence into timed segments.
///
/// Frame `n` (1-based) is stamped `n / fps`. A run is closed by the first
/// non-black frame after it, whose timestamp becomes the run's end. A run
/// still open when the stream ends is closed at the last frame's timestamp.
#[derive(Debug)]
pub struct BlackRunTracker {
    fps: f64,
    min_duration_secs: f64,
    frame_count: u64,
    run_frames: u64,
    segments: Vec<BlackSegment>,
}

impl BlackRunTracker {
    pub fn new(fps: f64, min_duration_secs: f64) -> Self {
        Self {
            fps,
            min_duration_secs,
            frame_count: 0,
            run_frames: 0,
            segments: Vec::new(),
        }
    }

    pub fn push(&mut self, is_black: bool) {
        self.frame_count += 1;
        if is_black {
            self.run_frames += 1;
        } else {
            self.close_run();
        }
    }

    #[must_use]
    pub fn frames_seen(&self) -> u64 {
        self.frame_count
    }

    pub fn finish(mut self) -> Vec<BlackSegment> {
        self.close_run();
        self.segments
    }

    fn close_run(&mut self) {
        if self.run_frames == 0 {
            return;
        }
        let duration = self.run_frames as f64 / self.fps;
        if duration >= self.min_duration_secs {
            let end = self.frame_count as f64 / self.fps;
            debug!("Black run of {} frames ending at {:.2}s", self.run_frames, end);
            self.segments.push(BlackSegment {
                start_time: round2(end - duration),
                end_time: round2(end),
                duration: round2(duration),
            });
        }
        self.run_frames = 0;
    }
}

/// Builds the `visual_qc` report; any segment rejects the asset.
pub fn build_visual_report(video_file: &str, segments: &[BlackSegment]) -> DetectorReport {
    let events: Vec<Event> = segments
        .iter()
        .map(|s| {
            Event::new(BLACK_SCREEN_EVENT, s.start_time, s.end_time, 1.0)
                .with_detail("duration", s.duration)
        })
        .collect();
    let status = if events.is_empty() {
        ReportStatus::Passed
    } else {
        ReportStatus::Rejected
    };
    DetectorReport::new(VISUAL_MODULE, video_file, status, events)
}

/// Detector for black-screen glitches.
#[derive(Debug, Clone, Default)]
pub struct BlackScreenDetector {
    config: VisualConfig,
}

impl BlackScreenDetector {
    pub fn new(config: VisualConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn is_black_frame(&self, rgb: &[u8]) -> bool {
        dark_pixel_ratio(rgb, self.config.dark_luma_threshold) > self.config.coverage_ratio
    }

    fn scan(&self, input: &Path, fps: f64) -> CoreResult<Vec<BlackSegment>> {
        let mut cmd = FfmpegCommandBuilder::new().build_with_input(input);
        cmd.rawvideo();
        debug!("Running black frame scan: {cmd:?}");

        let mut child = cmd
            .spawn()
            .map_err(|e| command_start_error("ffmpeg", e))?;

        let mut tracker = BlackRunTracker::new(fps, self.config.min_duration_secs);
        let mut decode_errors: Vec<String> = Vec::new();

        let events = child.iter().map_err(ffmpeg_output_error)?;

        for event in events {
            match event {
                FfmpegEvent::OutputFrame(frame) => tracker.push(self.is_black_frame(&frame.data)),
                FfmpegEvent::Error(msg)
                | FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, msg) => {
                    debug!("ffmpeg: {msg}");
                    decode_errors.push(msg);
                }
                _ => {}
            }
        }

        let status = child
            .wait()
            .map_err(|e| command_wait_error("ffmpeg", e))?;

        if tracker.frames_seen() == 0 {
            return Err(CoreError::MediaOpen(format!(
                "no frames decoded from {} ({}): {}",
                input.display(),
                status,
                decode_errors.join("; ")
            )));
        }
        if !status.success() {
            warn!(
                "ffmpeg exited with {} after {} frame(s); using the frames decoded so far",
                status,
                tracker.frames_seen()
            );
        }

        info!("Scanned {} frame(s) at {:.3} fps", tracker.frames_seen(), fps);
        Ok(tracker.finish())
    }
}

impl Detector for BlackScreenDetector {
    fn module(&self) -> &'static str {
        VISUAL_MODULE
    }

    fn analyze(&self, input: &Path) -> CoreResult<DetectorReport> {
        ensure_input_exists(input)?;
        check_ffmpeg()?;

        let fps = match probe_frame_rate(input)? {
            Some(fps) => fps,
            None => {
                warn!(
                    "Frame rate unknown for {}; assuming {} fps",
                    input.display(),
                    self.config.fallback_fps
                );
                self.config.fallback_fps
            }
        };

        let segments = self.scan(input, fps)?;
        Ok(build_visual_report(&input.to_string_lossy(), &segments))
    }
}
