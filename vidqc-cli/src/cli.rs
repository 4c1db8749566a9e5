// vidqc-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use vidqc_core::config::{
    DEFAULT_AUDIO_STREAM_INDEX, DEFAULT_BLACK_COVERAGE_RATIO, DEFAULT_DARK_LUMA_THRESHOLD,
    DEFAULT_LOUDNESS_TOLERANCE_DB, DEFAULT_MIN_BLACK_DURATION_SECS, DEFAULT_OCR_CONFIDENCE_THRESHOLD,
    DEFAULT_OCR_INTERVAL_SECS, DEFAULT_OCR_LANGUAGES, DEFAULT_OUTPUT_DIR, DEFAULT_TARGET_LUFS,
    DEFAULT_TESSERACT_BINARY, MASTER_REPORT_FILE,
};

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "vidqc: automated video quality control",
    long_about = "Runs black-screen, loudness and on-screen text detectors on a media file \
                  and merges their reports into a single Master Report."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (RUST_LOG is honoured otherwise)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Also write logs to a timestamped file in this directory
    #[arg(long, global = true, value_name = "DIR", env = "VIDQC_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect black-screen glitches
    Visual(VisualArgs),
    /// Check integrated loudness against the EBU R128 target
    Audio(AudioArgs),
    /// Extract on-screen text
    Ocr(OcrArgs),
    /// Merge detector reports into a Master Report
    Aggregate(AggregateArgs),
    /// Run every detector, then aggregate
    Run(RunArgs),
}

impl Commands {
    /// Short name used in log file names.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Visual(_) => "visual",
            Commands::Audio(_) => "audio",
            Commands::Ocr(_) => "ocr",
            Commands::Aggregate(_) => "aggregate",
            Commands::Run(_) => "run",
        }
    }
}

// --- Detector Options ---

#[derive(Args, Debug, Clone)]
pub struct VisualOptions {
    /// Luma below which a pixel counts as dark (0-255)
    #[arg(long, value_name = "LUMA", default_value_t = DEFAULT_DARK_LUMA_THRESHOLD)]
    pub dark_threshold: u8,

    /// Fraction of dark pixels a frame must exceed to count as black
    #[arg(long, value_name = "RATIO", default_value_t = DEFAULT_BLACK_COVERAGE_RATIO)]
    pub coverage: f64,

    /// Shortest black run reported, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_MIN_BLACK_DURATION_SECS)]
    pub min_black_duration: f64,
}

#[derive(Args, Debug, Clone)]
pub struct AudioOptions {
    /// Integrated loudness target in LUFS
    #[arg(
        long,
        value_name = "LUFS",
        allow_negative_numbers = true,
        default_value_t = DEFAULT_TARGET_LUFS
    )]
    pub target_lufs: f64,

    /// Allowed deviation from the target in dB
    #[arg(long, value_name = "DB", default_value_t = DEFAULT_LOUDNESS_TOLERANCE_DB)]
    pub tolerance: f64,

    /// Audio stream to measure (0 = first audio stream)
    #[arg(long, value_name = "INDEX", default_value_t = DEFAULT_AUDIO_STREAM_INDEX)]
    pub stream: usize,
}

#[derive(Args, Debug, Clone)]
pub struct OcrOptions {
    /// Seconds between sampled frames
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_OCR_INTERVAL_SECS)]
    pub interval: f64,

    /// Tesseract languages, '+'-separated
    #[arg(long, value_name = "LANGS", default_value = DEFAULT_OCR_LANGUAGES)]
    pub languages: String,

    /// Text at or below this confidence (0-1) is dropped
    #[arg(long, value_name = "CONF", default_value_t = DEFAULT_OCR_CONFIDENCE_THRESHOLD)]
    pub min_confidence: f64,

    /// Tesseract executable
    #[arg(
        long,
        value_name = "PATH",
        env = "VIDQC_TESSERACT",
        default_value = DEFAULT_TESSERACT_BINARY
    )]
    pub tesseract: String,
}

// --- Subcommand Arguments ---

#[derive(Args, Debug)]
pub struct VisualArgs {
    /// Media file to analyse
    #[arg(short = 'i', long = "input", value_name = "MEDIA")]
    pub input: PathBuf,

    /// Where to write the detector report
    #[arg(short = 'o', long = "output", value_name = "REPORT")]
    pub output: PathBuf,

    #[command(flatten)]
    pub options: VisualOptions,
}

#[derive(Args, Debug)]
pub struct AudioArgs {
    /// Media file to analyse
    #[arg(short = 'i', long = "input", value_name = "MEDIA")]
    pub input: PathBuf,

    /// Where to write the detector report
    #[arg(short = 'o', long = "output", value_name = "REPORT")]
    pub output: PathBuf,

    #[command(flatten)]
    pub options: AudioOptions,
}

#[derive(Args, Debug)]
pub struct OcrArgs {
    /// Media file to analyse
    #[arg(short = 'i', long = "input", value_name = "MEDIA")]
    pub input: PathBuf,

    /// Where to write the detector report
    #[arg(short = 'o', long = "output", value_name = "REPORT")]
    pub output: PathBuf,

    #[command(flatten)]
    pub options: OcrOptions,
}

#[derive(Args, Debug)]
pub struct AggregateArgs {
    /// Detector report files, in merge order
    #[arg(long, required = true, num_args = 1.., value_name = "REPORT")]
    pub inputs: Vec<PathBuf>,

    /// Where to write the Master Report
    #[arg(short = 'o', long = "output", value_name = "FILE", default_value = MASTER_REPORT_FILE)]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Media file to analyse
    #[arg(short = 'i', long = "input", value_name = "MEDIA")]
    pub input: PathBuf,

    /// Directory for the detector reports and the Master Report
    #[arg(
        long,
        value_name = "DIR",
        env = "VIDQC_OUTPUT_DIR",
        default_value = DEFAULT_OUTPUT_DIR
    )]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub visual: VisualOptions,

    #[command(flatten)]
    pub audio: AudioOptions,

    #[command(flatten)]
    pub ocr: OcrOptions,
}
