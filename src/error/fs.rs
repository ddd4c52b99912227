//! File system errors

use super::GraftError;

/// Creates a file read error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> GraftError {
    GraftError::FileReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a component removal error
pub fn removal_failed(path: impl Into<String>, reason: impl Into<String>) -> GraftError {
    GraftError::RemovalError {
        path: path.into(),
        reason: reason.into(),
    }
}
