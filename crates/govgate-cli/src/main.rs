//! GovGate CLI - run the governance gate from the command line

mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit status for any error, kept apart from a blocked verdict (1).
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so verdicts on stdout stay machine-readable
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = tokio::runtime::Runtime::new()
        .map_err(anyhow::Error::from)
        .and_then(|rt| rt.block_on(run_command_async(cli)));

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

async fn run_command_async(cli: Cli) -> anyhow::Result<ExitCode> {
    let format = cli.output.unwrap_or_default();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Input { text } => {
            let passed = commands::gate::run_input(config, &text, format).await?;
            Ok(exit_for(passed))
        }

        Commands::Output { text } => {
            let passed = commands::gate::run_output(config, &text, format).await?;
            Ok(exit_for(passed))
        }

        Commands::Scan { text } => {
            commands::scan::run(config, &text, format)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Redact { text, strategy } => {
            commands::redact::run(config, &text, strategy, format)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Audit { path } => {
            commands::audit::run(&path, format)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Policy { format } => {
            commands::policy::run(config, format)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn exit_for(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
