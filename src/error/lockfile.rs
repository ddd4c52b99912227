//! Lockfile errors

use super::GraftError;

/// Creates a lockfile parse error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> GraftError {
    GraftError::LockfileParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a lockfile write error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> GraftError {
    GraftError::LockfileWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
