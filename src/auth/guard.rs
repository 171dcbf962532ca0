//! The session guard: decides, per authenticated request, whether the
//! access token can be used as-is, must be refreshed first, or the
//! session is beyond saving.
//!
//! The decision is a pure function of the session's expiry timestamps
//! and the current wall clock (`decide`); the guard wires that decision
//! to the refresh transport and the store. State is re-derived on every
//! call rather than kept by a background timer, so there is nothing to
//! cancel and nothing to drift.
//!
//! Two flows that concurrently observe an expired access token will
//! both refresh; the store's last-writer-wins `set` resolves the race.
//! There is deliberately no single-flight lock around refresh.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::ApiError;

use super::session::{Session, SessionError, TokenPair};
use super::store::SessionStore;

/// Delay between the user-visible "session expired" notice and the
/// unconditional sign-out.
const FORCED_SIGNOUT_DELAY_MS: u64 = 2000;

/// What to do with a session at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// Access token still valid; use it without any network call.
    UseAsIs,
    /// Access token lapsed but the refresh token is alive; refresh.
    Refresh,
    /// Refresh token lapsed; the session is terminal.
    Expired,
}

/// Pure decision over the session's timestamps. The refresh-expiry
/// check takes priority: once the refresh token has lapsed no refresh
/// is attempted, even though the access token is also expired.
pub fn decide(session: &Session, now: DateTime<Utc>) -> SessionAction {
    if !session.refresh_token_valid(now) {
        SessionAction::Expired
    } else if session.access_token_valid(now) {
        SessionAction::UseAsIs
    } else {
        SessionAction::Refresh
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Failed to refresh access token")]
    RefreshFailed,
    #[error("Refresh token expired")]
    RefreshTokenExpired,
}

impl From<SessionError> for AuthError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::RefreshAccessTokenError => AuthError::RefreshFailed,
            SessionError::RefreshTokenExpired => AuthError::RefreshTokenExpired,
        }
    }
}

/// Outcome of an out-of-band force-logout link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceLogoutOutcome {
    /// The invalidated token was ours; the session was cleared and the
    /// caller should redirect to login.
    SignedOut,
    /// The token belonged to some other session; navigate away without
    /// touching local state.
    NavigatedAway,
}

/// The refresh transport seam. `ApiClient` implements this against the
/// real backend; tests substitute a stub.
#[async_trait]
pub trait RefreshTokens {
    /// Exchange the expired access token (plus live refresh token) for
    /// a new pair. One attempt, no retry.
    async fn refresh_tokens(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<TokenPair, ApiError>;
}

pub struct SessionGuard<R> {
    store: SessionStore,
    refresher: R,
}

impl<R: RefreshTokens> SessionGuard<R> {
    pub fn new(store: SessionStore, refresher: R) -> Self {
        Self { store, refresher }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Install a freshly logged-in session.
    pub fn install(&mut self, session: Session) {
        self.store.set(session);
        self.persist();
    }

    /// Resolve a usable access token for an authenticated request.
    ///
    /// Evaluates the session against `now`, refreshing when needed. A
    /// terminal error tag sticks: every subsequent call keeps returning
    /// the same error until `sign_out` resets the store.
    pub async fn authorize(&mut self, now: DateTime<Utc>) -> Result<String, AuthError> {
        let (action, access_token, refresh_token) = match self.store.get() {
            None => return Err(AuthError::NotAuthenticated),
            Some(session) => {
                if let Some(error) = session.error {
                    return Err(error.into());
                }
                (
                    decide(session, now),
                    session.access_token.clone(),
                    session.refresh_token.clone(),
                )
            }
        };

        match action {
            SessionAction::UseAsIs => Ok(access_token),
            SessionAction::Expired => {
                debug!("Refresh token expired, session is terminal");
                self.tag(SessionError::RefreshTokenExpired);
                Err(AuthError::RefreshTokenExpired)
            }
            SessionAction::Refresh => {
                match self
                    .refresher
                    .refresh_tokens(&access_token, &refresh_token)
                    .await
                {
                    Ok(pair) => {
                        let token = pair.access_token.clone();
                        if let Some(session) = self.store.get_mut() {
                            session.apply_refresh(pair);
                        }
                        self.persist();
                        debug!("Access token refreshed");
                        Ok(token)
                    }
                    Err(error) => {
                        warn!(error = %error, "Token refresh failed");
                        self.tag(SessionError::RefreshAccessTokenError);
                        Err(AuthError::RefreshFailed)
                    }
                }
            }
        }
    }

    /// Clear the session. The server-side `POST /auth/logout` is
    /// best-effort and handled by the caller; sign-out never blocks on it.
    pub fn sign_out(&mut self) -> anyhow::Result<()> {
        self.store.clear()
    }

    /// Unconditional sign-out after the notice delay. Invoked by the
    /// top-level watcher when a terminal session error surfaces.
    pub async fn forced_sign_out(&mut self) {
        tokio::time::sleep(std::time::Duration::from_millis(FORCED_SIGNOUT_DELAY_MS)).await;
        if let Err(error) = self.store.clear() {
            warn!(error = %error, "Failed to clear session during forced sign-out");
        }
    }

    /// Pass a resource-call result through the session-expiry watcher.
    /// A 401 sentinel triggers the forced sign-out; everything else is
    /// returned to the caller untouched.
    ///
    /// On the sentinel this call blocks through the notice delay and
    /// only returns once the store is cleared, so the caller that
    /// observed the 401 resumes in a signed-out state. Other flows on
    /// other tasks are not interrupted. Callers that must not stall for
    /// the delay should surface the error first and run `check` from
    /// their notification path.
    pub async fn check<T>(&mut self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(ApiError::SessionExpired) = &result {
            warn!("Session expired, scheduling forced sign-out");
            self.forced_sign_out().await;
        }
        result
    }

    /// React to a successful out-of-band `GET /auth/force-logout` call:
    /// sign out only if the invalidated token is the live session's own
    /// refresh token.
    pub fn handle_force_logout(
        &mut self,
        invalidated_token: &str,
    ) -> anyhow::Result<ForceLogoutOutcome> {
        match self.store.get() {
            Some(session) if session.refresh_token == invalidated_token => {
                self.store.clear()?;
                Ok(ForceLogoutOutcome::SignedOut)
            }
            _ => Ok(ForceLogoutOutcome::NavigatedAway),
        }
    }

    fn tag(&mut self, error: SessionError) {
        if let Some(session) = self.store.get_mut() {
            session.tag_error(error);
        }
        self.persist();
    }

    fn persist(&self) {
        if let Err(error) = self.store.save() {
            debug!(error = %error, "Failed to persist session");
        }
    }
}
