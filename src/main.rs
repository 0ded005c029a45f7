//! Foundry - build orchestrator for the libfoundation C++ library
//!
//! ## Architecture
//!
//! ```text
//! cli → commands → orchestrator → utils::tools (validate)
//!                               → build::dirs (prepare)
//!                               → build::cmake (compose)
//!                               → exec::subprocess (run)
//! ```

mod build;
mod cli;
mod commands;
mod config;
mod error;
mod exec;
mod orchestrator;
mod utils;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use error::FoundryError;
use utils::terminal;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("FOUNDRY_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.execute() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            match e.downcast_ref::<FoundryError>() {
                Some(err) => err.display_with_hints(),
                None => terminal::print_error(&format!("{:#}", e)),
            }
            std::process::exit(1);
        }
    }
}
