// vidqc-cli/src/commands/run.rs
//
// Full pipeline: every detector, then aggregation into
// <output-dir>/Master_Report.json.

use crate::cli::RunArgs;
use crate::config::pipeline_config;
use crate::error::{CliErrorContext, CliResult};
use crate::terminal;
use log::warn;
use vidqc_core::run_pipeline;

pub fn run_qc(args: RunArgs) -> CliResult<()> {
    let config = pipeline_config(&args)?;
    let summary = run_pipeline(&args.input, &config)
        .cli_with_context(|| format!("QC pipeline failed for {}", args.input.display()))?;

    let failed = summary.failed_runs().count();
    if failed > 0 {
        warn!("{failed} detector(s) failed; their findings are missing from the Master Report");
    }

    terminal::print_pipeline_summary(&summary);
    Ok(())
}
