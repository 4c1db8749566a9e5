//! Utility functions for number and time formatting.

/// Rounds to two decimal places, the precision used for timings in reports.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Formats seconds as HH:MM:SS.ss (e.g., 3725.5 -> "01:02:05.50"). Returns "??:??:??" for invalid inputs.
#[must_use]
pub fn format_timestamp(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let centis = (seconds * 100.0).round() as u64;
    let hours = centis / 360_000;
    let minutes = (centis % 360_000) / 6_000;
    let secs = (centis % 6_000) / 100;
    let frac = centis % 100;
    format!("{hours:02}:{minutes:02}:{secs:02}.{frac:02}")
}
