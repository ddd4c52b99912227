//! Error types and handling for Graft
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`registry`]: Component registry and revision errors
//! - [`git`]: Git operation errors
//! - [`workspace`]: Project root errors
//! - [`lockfile`]: Lockfile errors
//! - [`fs`]: File system errors

pub mod fs;
pub mod git;
pub mod lockfile;
pub mod registry;
pub mod workspace;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Graft operations
#[derive(Error, Diagnostic, Debug)]
pub enum GraftError {
    // Project errors
    #[error("Could not find pipeline: {path}")]
    #[diagnostic(
        code(graft::workspace::invalid_root),
        help("Pass the pipeline directory with --dir or run graft from inside it")
    )]
    InvalidProjectRoot { path: String },

    // Registry errors
    #[error("{kind} '{name}' does not exist in {remote}")]
    #[diagnostic(
        code(graft::registry::name_resolution),
        help("Check the component name; names are lower case, modules may be nested (e.g. samtools/flagstat)")
    )]
    NameResolutionError {
        kind: String,
        name: String,
        remote: String,
    },

    #[error("Revision '{revision}' does not exist for '{name}' in {remote}")]
    #[diagnostic(
        code(graft::registry::invalid_revision),
        help("Use a commit SHA from the registry history that contains the component")
    )]
    InvalidRevision {
        name: String,
        revision: String,
        remote: String,
    },

    #[error("Several revisions are available for '{name}' and none was selected")]
    #[diagnostic(
        code(graft::registry::ambiguous_revision),
        help("Pass --sha to pin a revision, or drop --prompt to install the latest one")
    )]
    AmbiguousRevision { name: String },

    #[error("Failed to fetch '{name}' at {revision} from {remote} into {target}: {reason}")]
    #[diagnostic(code(graft::registry::fetch_failed))]
    FetchError {
        name: String,
        revision: String,
        remote: String,
        target: String,
        reason: String,
    },

    #[error("Could not remove installed files at {path}: {reason}")]
    #[diagnostic(
        code(graft::fs::removal_failed),
        help("Check permissions on the component directory and retry")
    )]
    RemovalError { path: String, reason: String },

    #[error("Failed to scan includes in {path}: {reason}")]
    #[diagnostic(code(graft::deps::scan_failed))]
    ScanFailed { path: String, reason: String },

    #[error("Circular include detected: {chain}")]
    #[diagnostic(
        code(graft::deps::circular),
        help("Remove the circular include from the subworkflow sources")
    )]
    CircularDependency { chain: String },

    #[error("{count} dependencies of '{name}' failed to install")]
    #[diagnostic(
        code(graft::deps::incomplete),
        help("Run with --verbose to see why each dependency failed")
    )]
    DependenciesFailed { name: String, count: usize },

    #[error("Installation cancelled")]
    #[diagnostic(code(graft::prompt::cancelled))]
    Cancelled,

    // Git errors
    #[error("Git operation failed: {message}")]
    #[diagnostic(code(graft::git::operation_failed))]
    GitOperationFailed { message: String },

    #[error("Failed to clone repository: {url}: {reason}")]
    #[diagnostic(
        code(graft::git::clone_failed),
        help("Check that URL is correct and you have access to repository")
    )]
    GitCloneFailed { url: String, reason: String },

    #[error("Failed to fetch from remote {url}: {reason}")]
    #[diagnostic(
        code(graft::git::fetch_failed),
        help("Use --no-pull to work from the cached copy of the registry")
    )]
    GitFetchFailed { url: String, reason: String },

    #[error("Failed to resolve git ref '{git_ref}': {reason}")]
    #[diagnostic(code(graft::git::ref_resolve_failed))]
    GitRefResolveFailed { git_ref: String, reason: String },

    #[error("Failed to open repository at '{path}': {reason}")]
    #[diagnostic(code(graft::git::open_failed))]
    GitOpenFailed { path: String, reason: String },

    // Configuration errors
    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(code(graft::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    // Lockfile errors
    #[error("Failed to parse lockfile {path}: {reason}")]
    #[diagnostic(
        code(graft::lockfile::parse_failed),
        help("Fix or delete modules.json; it is rebuilt from the installed components")
    )]
    LockfileParseFailed { path: String, reason: String },

    #[error("Failed to write lockfile {path}: {reason}")]
    #[diagnostic(code(graft::lockfile::write_failed))]
    LockfileWriteFailed { path: String, reason: String },

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(graft::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(graft::fs::io_error))]
    IoError { message: String },

    // Cache errors
    #[error("Cache operation failed: {message}")]
    #[diagnostic(code(graft::cache::operation_failed))]
    CacheOperationFailed { message: String },
}

impl From<std::io::Error> for GraftError {
    fn from(err: std::io::Error) -> Self {
        GraftError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for GraftError {
    fn from(err: serde_yaml::Error) -> Self {
        GraftError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for GraftError {
    fn from(err: serde_json::Error) -> Self {
        GraftError::LockfileParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<git2::Error> for GraftError {
    fn from(err: git2::Error) -> Self {
        GraftError::GitOperationFailed {
            message: err.message().to_string(),
        }
    }
}

impl From<inquire::InquireError> for GraftError {
    fn from(err: inquire::InquireError) -> Self {
        match err {
            inquire::InquireError::OperationCanceled
            | inquire::InquireError::OperationInterrupted => GraftError::Cancelled,
            other => GraftError::IoError {
                message: other.to_string(),
            },
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, GraftError>;
