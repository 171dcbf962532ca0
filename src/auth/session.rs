//! The login session: identity, permissions, and the token pair.
//!
//! A `Session` is created from a successful login, mutated in place by
//! a token refresh, and destroyed on logout or terminal refresh
//! failure. Identity and permissions come from the access token's JWT
//! claims and never change for the lifetime of the session; only the
//! token/expiry fields move.

use std::collections::HashSet;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Terminal session errors. Both are recoverable only by a full
/// re-login; the top-level watcher reacts to them with a forced
/// sign-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionError {
    /// The refresh call failed (network, non-2xx, or bad payload).
    RefreshAccessTokenError,
    /// The refresh token's own expiry passed; no refresh was attempted.
    RefreshTokenExpired,
}

/// A fresh token pair returned by the refresh endpoint. The backend may
/// omit everything except the access token, in which case the session
/// keeps its previous values.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub access_token_expires_at: Option<DateTime<Utc>>,
    pub refresh_token_expires_at: Option<DateTime<Utc>>,
}

/// Claims carried in the access token. The backend signs the token;
/// the client only reads the payload for display and permission gating.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessClaims {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub role_id: Option<i64>,
    #[serde(default)]
    pub role_name: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub profile_image: Option<String>,
    pub status: Option<String>,
    pub role_id: Option<i64>,
    pub role_name: Option<String>,
    pub permissions: HashSet<String>,
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token_expires_at: DateTime<Utc>,
    pub error: Option<SessionError>,
}

impl Session {
    /// Build a session from a login response: token pair plus absolute
    /// expiry timestamps, identity decoded from the access token.
    pub fn from_login(
        access_token: String,
        refresh_token: String,
        access_expires_ms: i64,
        refresh_expires_ms: i64,
    ) -> Result<Self> {
        let claims = decode_claims(&access_token)?;

        Ok(Self {
            user_id: claims.id,
            name: claims.name,
            email: claims.email,
            profile_image: claims.profile_image,
            status: claims.status,
            role_id: claims.role_id,
            role_name: claims.role_name,
            permissions: claims.permissions.into_iter().collect(),
            access_token,
            refresh_token,
            access_token_expires_at: timestamp_from_millis(access_expires_ms)?,
            refresh_token_expires_at: timestamp_from_millis(refresh_expires_ms)?,
            error: None,
        })
    }

    pub fn access_token_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.access_token_expires_at
    }

    pub fn refresh_token_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.refresh_token_expires_at
    }

    /// Permission gate: a pure membership test against the session's
    /// permission set. No hierarchy or wildcard semantics.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    /// Install a refreshed token pair, falling back to the current
    /// refresh token and expiries where the backend omitted them.
    /// Identity and permissions are untouched; a previous error tag is
    /// cleared since the session is valid again.
    pub fn apply_refresh(&mut self, pair: TokenPair) {
        self.access_token = pair.access_token;
        if let Some(refresh_token) = pair.refresh_token {
            self.refresh_token = refresh_token;
        }
        if let Some(expires_at) = pair.access_token_expires_at {
            self.access_token_expires_at = expires_at;
        }
        if let Some(expires_at) = pair.refresh_token_expires_at {
            self.refresh_token_expires_at = expires_at;
        }
        self.error = None;
    }

    pub fn tag_error(&mut self, error: SessionError) {
        self.error = Some(error);
    }

    /// A tagged session is terminal: the only way out is forced sign-out.
    pub fn is_terminal(&self) -> bool {
        self.error.is_some()
    }
}

/// Decode the JWT payload without verifying the signature. Verification
/// is the backend's job; the client never holds the signing key.
pub fn decode_claims(token: &str) -> Result<AccessClaims> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(&[]),
        &validation,
    )
    .context("Failed to decode access token claims")?;

    Ok(data.claims)
}

fn timestamp_from_millis(ms: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| anyhow::anyhow!("Token expiry timestamp out of range: {}", ms))
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_from_login_decodes_claims() {
        let token = encode_token(42, "Jane Doe", "jane@example.test", &["faq.edit"]);
        let now_ms = Utc::now().timestamp_millis();
        let session = Session::from_login(
            token.clone(),
            "R1".to_string(),
            now_ms + 10_000,
            now_ms + 100_000,
        )
        .expect("login session");

        assert_eq!(session.user_id, 42);
        assert_eq!(session.name, "Jane Doe");
        assert_eq!(session.email, "jane@example.test");
        assert_eq!(session.role_name.as_deref(), Some("Editor"));
        assert!(session.has_permission("faq.edit"));
        assert_eq!(session.access_token, token);
        assert!(session.access_token_expires_at <= session.refresh_token_expires_at);
        assert!(session.error.is_none());
    }

    #[test]
    fn test_permission_gate_is_pure_membership() {
        let now = Utc::now();
        let session = session_with_expiries(now + Duration::seconds(10), now + Duration::seconds(100));

        // Idempotent: repeated checks give the same answer
        assert!(session.has_permission("user.delete"));
        assert!(session.has_permission("user.delete"));

        // No wildcard or prefix semantics
        assert!(!session.has_permission("user"));
        assert!(!session.has_permission("user.*"));
        assert!(!session.has_permission("cms.edit"));
    }

    #[test]
    fn test_apply_refresh_preserves_identity() {
        let now = Utc::now();
        let mut session =
            session_with_expiries(now - Duration::seconds(5), now + Duration::seconds(100));
        let permissions_before = session.permissions.clone();

        session.apply_refresh(TokenPair {
            access_token: "A2".to_string(),
            refresh_token: None,
            access_token_expires_at: Some(now + Duration::seconds(30)),
            refresh_token_expires_at: None,
        });

        assert_eq!(session.user_id, 7);
        assert_eq!(session.permissions, permissions_before);
        assert_eq!(session.access_token, "A2");
        // Omitted fields fall back to the previous values
        assert_eq!(session.refresh_token, "R1");
        assert_eq!(session.refresh_token_expires_at, now + Duration::seconds(100));
        assert!(session.access_token_valid(now));
    }

    #[test]
    fn test_terminal_error_tag() {
        let now = Utc::now();
        let mut session =
            session_with_expiries(now + Duration::seconds(10), now + Duration::seconds(100));
        assert!(!session.is_terminal());

        session.tag_error(SessionError::RefreshTokenExpired);
        assert!(session.is_terminal());
        assert_eq!(session.error, Some(SessionError::RefreshTokenExpired));
    }
}
