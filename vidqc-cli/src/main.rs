// vidqc-cli/src/main.rs
//
// Entry point for the `vidqc` binary: parses arguments, sets up logging and
// dispatches to the command implementations. Any command error is logged,
// printed and turned into exit status 1.

use clap::Parser;
use std::process;
use vidqc_cli::{Cli, Commands, logging, terminal};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.verbose, cli.log_dir.as_deref(), cli.command.name()) {
        terminal::print_error(&e.to_string());
        process::exit(1);
    }

    let result = match cli.command {
        Commands::Visual(args) => vidqc_cli::run_visual(args),
        Commands::Audio(args) => vidqc_cli::run_audio(args),
        Commands::Ocr(args) => vidqc_cli::run_ocr(args),
        Commands::Aggregate(args) => vidqc_cli::run_aggregate(args),
        Commands::Run(args) => vidqc_cli::run_qc(args),
    };

    if let Err(e) = result {
        log::error!("{e}");
        terminal::print_error(&e.to_string());
        process::exit(1);
    }
}
