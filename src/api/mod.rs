//! HTTP client layer for the dashboard backend.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
