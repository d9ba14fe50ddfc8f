use std::io::{self, IsTerminal};
use std::process::ExitCode;

use backlog_forecast::commands::base_commands::{CliArgs, Commands};
use backlog_forecast::commands::report_cmd::report_command;
use clap::{CommandFactory, Parser};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    match args.command {
        Commands::Report(report_args) => {
            if let Err(e) = report_command(&report_args) {
                error!("Failed to build report: {e}");
                return ExitCode::FAILURE;
            }
        }
        Commands::Completions { shell } => {
            let mut command = CliArgs::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut io::stdout());
        }
    }
    ExitCode::SUCCESS
}

/// `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "backlog_forecast=debug"
    } else {
        "backlog_forecast=warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}
