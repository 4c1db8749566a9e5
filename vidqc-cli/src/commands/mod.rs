//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of one group of subcommands.

/// `visual`, `audio` and `ocr`: run one detector and write its report.
pub mod detect;

/// `aggregate`: merge detector reports into the Master Report.
pub mod aggregate;

/// `run`: every detector followed by aggregation.
pub mod run;
