//! Display and output functions for install operation
//! Prints include guidance for installed components and dependency failures

use std::path::Path;

use console::style;

use crate::domain::{ComponentRef, DependencyFailure, InstallSummary};

/// Config file a component may ship for pipelines to include
pub const COMPONENT_CONFIG: &str = "nextflow.config";

/// `/`-separated component path relative to the pipeline root
fn pipeline_relative(component: &ComponentRef) -> String {
    format!(
        "{}/{}/{}",
        component.kind.dir_name(),
        component.repo_path,
        component.name
    )
}

/// Statement that brings the component into a pipeline script
pub fn include_statement(component: &ComponentRef) -> String {
    format!(
        "include {{ {} }} from './{}/main'",
        component.include_symbol(),
        pipeline_relative(component)
    )
}

/// Statement that includes the component's config, if it ships one
pub fn include_config_statement(component: &ComponentRef, pipeline_root: &Path) -> Option<String> {
    component
        .install_dir(pipeline_root)
        .join(COMPONENT_CONFIG)
        .is_file()
        .then(|| {
            format!(
                "includeConfig './{}/{COMPONENT_CONFIG}'",
                pipeline_relative(component)
            )
        })
}

/// Hint logged when an install is skipped because the component is present
pub fn already_installed_hint(component: &ComponentRef) -> String {
    format!(
        "{} '{}' is already installed. To reinstall it use '--force', add '--sha <commit>' to reinstall at another revision",
        component.kind.label(),
        component
    )
}

/// Print include guidance after a top-level install
pub fn print_include_guidance(summary: &InstallSummary, pipeline_root: &Path) {
    let component = &summary.component;
    println!(
        "{} {} '{}' at {}",
        style(if summary.reinstalled { "Reinstalled" } else { "Installed" }).green().bold(),
        component.kind.label().to_lowercase(),
        component,
        style(summary.version.short()).dim()
    );
    println!("\nInclude statement:\n  {}", style(include_statement(component)).cyan());
    if let Some(config) = include_config_statement(component, pipeline_root) {
        println!("Config include statement:\n  {}", style(config).cyan());
    }
}

/// Print each dependency that could not be installed
pub fn print_dependency_failures(failures: &[DependencyFailure]) {
    if failures.is_empty() {
        return;
    }
    println!(
        "\n{} {} dependencies could not be installed:",
        style("Warning:").yellow().bold(),
        failures.len()
    );
    for failure in failures {
        println!(
            "  - {} '{}' (required by '{}'): {}",
            failure.kind.label().to_lowercase(),
            failure.name,
            failure.required_by,
            failure.reason
        );
    }
}
