//! Error types used throughout the domain layer

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for domain-level validation and configuration
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum SurveysError {
    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A value that is well-formed but outside its accepted range
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for domain operations
pub type Result<T> = std::result::Result<T, SurveysError>;
