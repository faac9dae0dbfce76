mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ddcloud_core::CloudControlProvider;

use crate::cli::{Cli, Command, RuleCommand};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // Logs go to stderr so stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Offline commands don't need an API connection
        Command::Schema => commands::schema::handle(&cli.global),

        Command::Rule(args) => match args.command {
            RuleCommand::Validate { file } => commands::rule::validate(&file, &cli.global),

            // Lifecycle commands require an API connection
            RuleCommand::Lifecycle(command) => {
                let provider_config = config::build_provider_config(&cli.global)?;
                let provider = CloudControlProvider::from_config(&provider_config)?;

                tracing::debug!(command = ?command, "dispatching command");
                commands::rule::handle(command, &provider, &cli.global).await
            }
        },
    }
}
