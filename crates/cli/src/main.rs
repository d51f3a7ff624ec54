#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;

use anyhow::anyhow;
use clap::{CommandFactory, Parser};
use ticketmail_cli::Args;
use ticketmail_domain::TicketMailError;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // a missing .env file is fine
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    if !args.has_action() {
        let _ = Args::command().print_help();
        println!();
        return ExitCode::FAILURE;
    }

    match try_main(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            let code = err.downcast_ref::<TicketMailError>().map_or(1, TicketMailError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn try_main(args: &Args) -> anyhow::Result<()> {
    init_tracing(args.debug)?;
    ticketmail_cli::run(args)?;
    Ok(())
}

/// `RUST_LOG` wins over `--debug`, which wins over the `info` default.
fn init_tracing(debug: bool) -> anyhow::Result<()> {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("cannot install the log subscriber: {err}"))
}
