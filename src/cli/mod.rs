//! CLI definitions using clap derive API
//!
//! Global options select the pipeline and the registry; each component type
//! (`modules`, `subworkflows`) has its own subcommands.
//! - install: Install command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod install;

pub use install::InstallArgs;

use crate::domain::ComponentKind;
use crate::registry::DEFAULT_REMOTE;

/// Graft - pipeline component installer
///
/// Install versioned modules and subworkflows from a git registry into a pipeline.
#[derive(Parser, Debug)]
#[command(
    name = "graft",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Install pipeline modules and subworkflows from a git registry",
    long_about = "Graft installs modules and subworkflows from a git registry into a pipeline, \
                  follows their include statements to install what they depend on, and records \
                  every installed component with its revision in modules.json.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  graft modules install fastqc                     \x1b[90m# Install the latest fastqc module\x1b[0m\n   \
                  graft subworkflows install bam_stats_samtools    \x1b[90m# Install a subworkflow and its modules\x1b[0m\n   \
                  graft modules install fastqc --force             \x1b[90m# Reinstall over an existing copy\x1b[0m\n   \
                  graft modules install fastqc --sha <SHA>         \x1b[90m# Pin a registry revision\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Pipeline directory (defaults to current directory)
    #[arg(long, short = 'd', global = true, env = "GRAFT_DIR")]
    pub dir: Option<PathBuf>,

    /// Registry to install from
    #[arg(long, global = true, env = "GRAFT_REMOTE", default_value = DEFAULT_REMOTE)]
    pub git_remote: String,

    /// Registry branch (defaults to the remote's default branch)
    #[arg(long, short = 'b', global = true, env = "GRAFT_BRANCH")]
    pub branch: Option<String>,

    /// Use the cached registry clone without fetching
    #[arg(long, global = true)]
    pub no_pull: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage modules
    Modules(ComponentArgs),

    /// Manage subworkflows
    Subworkflows(ComponentArgs),
}

impl Commands {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Commands::Modules(_) => ComponentKind::Module,
            Commands::Subworkflows(_) => ComponentKind::Subworkflow,
        }
    }

    pub fn action(&self) -> &ComponentCommand {
        match self {
            Commands::Modules(args) | Commands::Subworkflows(args) => &args.command,
        }
    }
}

#[derive(Args, Debug)]
pub struct ComponentArgs {
    #[command(subcommand)]
    pub command: ComponentCommand,
}

#[derive(Subcommand, Debug)]
pub enum ComponentCommand {
    /// Install a component and everything it includes
    Install(InstallArgs),
}
