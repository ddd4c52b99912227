//! Install command implementation
//!
//! The installation process:
//! 1. Open the pipeline directory
//! 2. Open (clone or fetch) the registry
//! 3. Install the component and its includes
//! 4. Report dependencies that could not be installed

use tracing::debug;

use crate::cli::{Cli, InstallArgs};
use crate::domain::{ComponentKind, InstallOutcome};
use crate::error::{GraftError, Result};
use crate::installer::IncludeScanner;
use crate::operations::InstallOperation;
use crate::registry::{GitRegistry, RegistrySettings};
use crate::resolver::{InquirePrompt, NonInteractive, Prompt};
use crate::workspace::Pipeline;

/// Run install command
pub fn run(cli: &Cli, kind: ComponentKind, args: &InstallArgs) -> Result<()> {
    let dir = match &cli.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(|e| GraftError::IoError {
            message: format!("Failed to get current directory: {}", e),
        })?,
    };
    let pipeline = Pipeline::open(&dir)?;

    let settings = RegistrySettings {
        remote_url: cli.git_remote.clone(),
        branch: cli.branch.clone(),
        no_pull: cli.no_pull,
    };
    let registry = GitRegistry::open(&settings)?;

    let prompt: &dyn Prompt = if args.prompt {
        &InquirePrompt
    } else {
        &NonInteractive
    };
    let scanner = IncludeScanner::new()?;

    let outcome = InstallOperation::new(pipeline, &registry, prompt, &scanner)?.install(
        kind,
        args.name.as_deref(),
        &args.options(),
    )?;

    report(&outcome)
}

/// Turn collected dependency failures into the command's exit status
fn report(outcome: &InstallOutcome) -> Result<()> {
    let failures = outcome.dependency_failures();
    if failures.is_empty() {
        debug!("Installed '{}' with all dependencies", outcome.component());
        return Ok(());
    }
    Err(GraftError::DependenciesFailed {
        name: outcome.component().name.clone(),
        count: failures.len(),
    })
}
