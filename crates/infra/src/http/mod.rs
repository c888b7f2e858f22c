//! HTTP transport shared by all API calls

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
