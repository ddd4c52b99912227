//! Git operation errors

use super::GraftError;

/// Creates a clone failure error
pub fn clone_failed(url: impl Into<String>, reason: impl Into<String>) -> GraftError {
    GraftError::GitCloneFailed {
        url: url.into(),
        reason: reason.into(),
    }
}

/// Creates a fetch failure error
pub fn fetch_failed(url: impl Into<String>, reason: impl Into<String>) -> GraftError {
    GraftError::GitFetchFailed {
        url: url.into(),
        reason: reason.into(),
    }
}

/// Creates a ref resolution error
pub fn ref_resolve_failed(git_ref: impl Into<String>, reason: impl Into<String>) -> GraftError {
    GraftError::GitRefResolveFailed {
        git_ref: git_ref.into(),
        reason: reason.into(),
    }
}
