//! Command implementations for Graft CLI

pub mod install;

use crate::cli::{Cli, ComponentCommand};
use crate::error::Result;

/// Dispatch the parsed command line
pub fn run(cli: &Cli) -> Result<()> {
    let kind = cli.command.kind();
    match cli.command.action() {
        ComponentCommand::Install(args) => install::run(cli, kind, args),
    }
}
