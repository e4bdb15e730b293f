//! visualdocs CLI entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use visualdocs_analyzer::cli::{self, Cli, Commands, EXIT_ERROR};

/// Environment variable holding the log filter, e.g. `visualdocs_analyzer=debug`.
const LOG_ENV: &str = "VISUALDOCS_LOG";

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Analyze(args) => cli::run_analyze(&args).await,
        Commands::Docs(args) => cli::run_docs(&args).await,
        Commands::Show(args) => cli::run_show(&args).await,
        Commands::Init(args) => cli::run_init(&args),
    };

    let exit_code = match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
