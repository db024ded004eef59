//! Core Error Types
//!
//! Errors raised by the core crate itself. Kept dependency-free (only
//! thiserror + std) so the leaf crates can share them.
//!
//! The application crate has its own phase-level `AppError`.

use thiserror::Error;

/// Core error type for the docsmith workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Path resolves outside the project root
    #[error("Path outside project root: {0}")]
    OutsideRoot(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create an outside-root error
    pub fn outside_root(msg: impl Into<String>) -> Self {
        Self::OutsideRoot(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outside_root_error() {
        let err = CoreError::outside_root("../etc/passwd");
        assert_eq!(err.to_string(), "Path outside project root: ../etc/passwd");
    }
}
