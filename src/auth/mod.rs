//! Authentication module for managing login sessions and credentials.
//!
//! This module provides:
//! - `Session`: identity, permissions, and the access/refresh token pair
//! - `SessionStore`: the one live session, persisted to disk
//! - `SessionGuard`: per-request token validation and refresh
//! - `CredentialStore`: remembered login credentials via the OS keyring
//! - `can`: the permission gate used to show or hide actions

pub mod credentials;
pub mod guard;
pub mod permission;
pub mod session;
pub mod store;

pub use credentials::CredentialStore;
pub use guard::{decide, AuthError, ForceLogoutOutcome, RefreshTokens, SessionAction, SessionGuard};
pub use permission::can;
pub use session::{AccessClaims, Session, SessionError, TokenPair};
pub use store::SessionStore;
