//! Roombook CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use roombook_cli::cli::Cli;
use roombook_cli::{commands, logging};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; variables may come from the environment itself
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_json);

    match commands::execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
