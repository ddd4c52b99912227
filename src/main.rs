//! Graft - pipeline component installer
//!
//! Installs versioned modules and subworkflows from a git registry into a
//! pipeline project, following include statements to pull in dependencies,
//! and records what was installed and why in `modules.json`.

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod config;
mod domain;
mod error;
mod git;
mod installer;
mod operations;
mod progress;
mod registry;
mod resolver;
#[cfg(test)]
mod test_fixtures;
mod transaction;
mod workspace;

use cli::Cli;

/// Log filter used when `RUST_LOG` is unset
fn default_filter(verbose: bool) -> &'static str {
    if verbose { "graft=debug" } else { "graft=info" }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = commands::run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
