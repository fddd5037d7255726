//! projectV command line entry point

mod cli;
mod commands;
mod prompt;
mod shell;

use anyhow::Result;
use clap::ArgMatches;
use projectv_core::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = cli::build().get_matches();
    init_tracing(matches.get_count("verbose"));

    if let Err(e) = run(&matches) {
        tracing::debug!("Command failed: {:?}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    let settings = Settings::discover(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    let mut session = Session::new(Roots::from_env(), settings, SystemRunner::new());

    match matches.subcommand_name() {
        None | Some("shell") => shell::run(&mut session),
        Some(_) => commands::dispatch(&mut session, matches, commands::Mode::OneShot).map(drop),
    }
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
