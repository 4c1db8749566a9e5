// vidqc-cli/src/commands/aggregate.rs
//
// The aggregate command never fails on bad detector output: missing and
// malformed reports are logged and skipped. Only a failure to write the
// Master Report makes it exit non-zero.

use crate::cli::AggregateArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::terminal;
use log::info;
use vidqc_core::{aggregate_paths, write_master_report};

pub fn run_aggregate(args: AggregateArgs) -> CliResult<()> {
    info!("Aggregating {} report(s)", args.inputs.len());
    let master = aggregate_paths(&args.inputs);

    write_master_report(&args.output, &master)
        .cli_with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!("Master Report saved to {}", args.output.display());

    terminal::print_master_summary(&master, &args.output);
    Ok(())
}
