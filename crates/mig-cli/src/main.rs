//! mig CLI - applies pending SQL migrations to a hosted database

use clap::Parser;

mod cli;
mod commands;
mod context;
mod logging;

use cli::Cli;
use commands::common::ExitCode;
use commands::deploy;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(err) = deploy::execute(&cli).await {
        let code = match err.downcast_ref::<ExitCode>() {
            Some(ExitCode(code)) => *code,
            None => {
                eprintln!("Error: {err:#}");
                1
            }
        };
        std::process::exit(code);
    }
}
