//! CLI entry point - the composition root.

use std::process::ExitCode;

use clap::Parser;

use sugarenv_cli::{Cli, exit_code, handlers, init_tracing};

fn main() -> ExitCode {
    // Load environment variables before clap reads SUGARENV_* defaults
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match handlers::setup::execute(&cli) {
        Ok(_report) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("[ERROR] {err:#}");
            exit_code(&err)
        }
    }
}
