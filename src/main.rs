mod cli;
mod db;
mod error;
mod models;
mod operations;
mod settings;
mod shell;

use clap::Parser;
use cli::{Cli, Commands};
use error::Result;
use std::io;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // stderr may be closed; nothing else to report to
            let _ = shell::report_error(&mut io::stderr(), &err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let app_config = settings::load(cli.config.as_deref(), cli.database)?;
    init_logging(&app_config.log_level);

    debug!(database = %app_config.database_path, "opening database");
    let conn = db::connection::establish_connection(&app_config.database_path)?;

    let command = cli.command.unwrap_or(Commands::Shell);
    let mut stdout = io::stdout();
    cli::execute(&conn, &app_config, command, &mut stdout)
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
