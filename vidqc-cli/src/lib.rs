// vidqc-cli/src/lib.rs
//
// Library portion of the vidqc CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod terminal;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands};
pub use commands::aggregate::run_aggregate;
pub use commands::detect::{run_audio, run_ocr, run_visual};
pub use commands::run::run_qc;
pub use error::{CliErrorContext, CliResult};
