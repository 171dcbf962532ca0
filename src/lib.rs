//! admingate - session lifecycle and API client core for the admin dashboard.
//!
//! This crate owns the pieces of the dashboard that talk to the remote
//! REST backend:
//!
//! - `auth`: login sessions, token refresh, forced logout, permission gate
//! - `api`: the HTTP client and typed resource endpoints
//! - `models`: wire and projection types for backend entities
//! - `config`: base URL, locale, and local storage locations

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError};
pub use auth::{
    decide, AuthError, CredentialStore, ForceLogoutOutcome, Session, SessionAction, SessionError,
    SessionGuard, SessionStore, TokenPair,
};
pub use config::Config;
