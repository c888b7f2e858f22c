//! # Tailspin Surveys Infrastructure
//!
//! Authenticated client layer for the Tailspin Surveys backend API.
//!
//! This crate contains:
//! - HTTP transport built on `reqwest`
//! - Token providers, including a per-user token cache
//! - The request pipeline and result mapping
//! - Survey and question resource clients
//! - Configuration loading and tracing setup
//!
//! ## Architecture
//! - Data transfer types and configuration live in `tailspin-domain`
//! - Everything that performs I/O lives here

pub mod api;
pub mod config;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use api::*;
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::{init_tracing, LogFormat, LoggingOptions};
