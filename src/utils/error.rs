//! Error Handling
//!
//! Unified error types for the agent.
//! Uses thiserror for ergonomic error definitions.

use docsmith_llm::LlmError;
use thiserror::Error;

/// Agent-wide error type. Every variant is fatal for the run.
#[derive(Error, Debug)]
pub enum AppError {
    /// The planner could not produce a usable plan
    #[error("Planning failed: {0}")]
    PlanningFailed(String),

    /// The site generator failed
    #[error("Generation error: {0}")]
    Generation(String),

    /// LLM gateway errors (auto-converted from LlmError)
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for agent errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a planning error
    pub fn planning_failed(msg: impl Into<String>) -> Self {
        Self::PlanningFailed(msg.into())
    }

    /// Create a generation error
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::planning_failed("no JSON object in response");
        assert_eq!(
            err.to_string(),
            "Planning failed: no JSON object in response"
        );
    }

    #[test]
    fn test_llm_error_conversion() {
        let llm_err = LlmError::NetworkError {
            message: "connection refused".to_string(),
        };
        let app_err: AppError = llm_err.into();
        assert!(matches!(app_err, AppError::Llm(_)));
        assert!(app_err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }
}
