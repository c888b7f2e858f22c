//! # Tailspin Domain
//!
//! Data types shared by the Tailspin Surveys web tier and its API client.
//!
//! This crate contains:
//! - Survey, question and contributor DTOs exchanged with the Surveys API
//! - Configuration structures for the API client
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - No dependencies on other Tailspin crates
//! - No I/O; everything here is plain data passed through serialization

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
