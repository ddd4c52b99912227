//! Component registry errors

use super::GraftError;

/// Creates an unknown component error
pub fn name_resolution(
    kind: impl Into<String>,
    name: impl Into<String>,
    remote: impl Into<String>,
) -> GraftError {
    GraftError::NameResolutionError {
        kind: kind.into(),
        name: name.into(),
        remote: remote.into(),
    }
}

/// Creates an invalid revision error
pub fn invalid_revision(
    name: impl Into<String>,
    revision: impl Into<String>,
    remote: impl Into<String>,
) -> GraftError {
    GraftError::InvalidRevision {
        name: name.into(),
        revision: revision.into(),
        remote: remote.into(),
    }
}

/// Creates a fetch error for component files
pub fn fetch_failed(
    name: impl Into<String>,
    revision: impl Into<String>,
    remote: impl Into<String>,
    target: impl Into<String>,
    reason: impl Into<String>,
) -> GraftError {
    GraftError::FetchError {
        name: name.into(),
        revision: revision.into(),
        remote: remote.into(),
        target: target.into(),
        reason: reason.into(),
    }
}
