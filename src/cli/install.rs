use clap::Parser;

use crate::domain::{InstallOptions, Revision};

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Install the latest revision:\n    graft modules install samtools/flagstat\n\n\
                   Install a subworkflow with its modules:\n    graft subworkflows install bam_stats_samtools\n\n\
                   Pin a revision:\n    graft modules install fastqc --sha 3c8a4f2\n\n\
                   Pick a component and revision interactively:\n    graft modules install --prompt")]
pub struct InstallArgs {
    /// Component name, e.g. fastqc or samtools/flagstat. Prompts when omitted with --prompt
    pub name: Option<String>,

    /// Reinstall even if the component is already installed
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Ask which revision to install and whether to reinstall
    #[arg(long, short = 'p')]
    pub prompt: bool,

    /// Install the component at this registry commit
    #[arg(long, short = 's', value_name = "SHA")]
    pub sha: Option<String>,

    /// Referrer recorded in modules.json (defaults to the component type)
    #[arg(long, value_name = "ID")]
    pub installed_by: Option<String>,
}

impl InstallArgs {
    pub fn options(&self) -> InstallOptions {
        InstallOptions {
            force: self.force,
            interactive: self.prompt,
            revision: self.sha.as_deref().map(Revision::from),
            installed_by: self.installed_by.clone(),
        }
    }
}
