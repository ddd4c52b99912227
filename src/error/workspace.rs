//! Project root errors

use super::GraftError;

/// Creates an invalid project root error
pub fn invalid_root(path: impl Into<String>) -> GraftError {
    GraftError::InvalidProjectRoot { path: path.into() }
}
