//! FFprobe integration for stream metadata.
//!
//! The black-screen detector needs the video frame rate to turn frame
//! counts into timestamps. A file ffprobe cannot read, or one without a
//! video stream, is reported as [`CoreError::MediaOpen`].

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use ffprobe::{FfProbeError, ffprobe};
use std::path::Path;

/// Parses an ffprobe rate such as `"30000/1001"` or `"25"`.
///
/// Returns `None` for zero, negative or unparseable rates (ffprobe reports
/// `"0/0"` when it does not know).
#[must_use]
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let rate = rate.trim();
    let fps = match rate.split_once('/') {
        Some((num, den)) => {
            let num = num.trim().parse::<f64>().ok()?;
            let den = den.trim().parse::<f64>().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => rate.parse::<f64>().ok()?,
    };
    (fps.is_finite() && fps > 0.0).then_some(fps)
}

/// Returns the frame rate of the first video stream, or `None` if ffprobe
/// does not know it.
pub fn probe_frame_rate(input_path: &Path) -> CoreResult<Option<f64>> {
    log::debug!(
        "Running ffprobe (via crate) for frame rate on: {}",
        input_path.display()
    );
    let metadata = ffprobe(input_path).map_err(|err| {
        log::error!(
            "ffprobe failed for frame rate on {}: {:?}",
            input_path.display(),
            err
        );
        map_ffprobe_error(err, input_path)
    })?;

    let video_stream = metadata
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            CoreError::MediaOpen(format!("No video stream found in {}", input_path.display()))
        })?;

    Ok(parse_frame_rate(&video_stream.avg_frame_rate)
        .or_else(|| parse_frame_rate(&video_stream.r_frame_rate)))
}

fn map_ffprobe_error(err: FfProbeError, input_path: &Path) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error("ffprobe", io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            command_failed_error("ffprobe", output.status, stderr)
        }
        other => CoreError::MediaOpen(format!(
            "ffprobe could not read {}: {other:?}",
            input_path.display()
        )),
    }
}
