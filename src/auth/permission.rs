//! The permission gate consumed by UI collaborators.
//!
//! Binary presence/absence: a missing permission means the action is
//! not rendered at all, never shown disabled. Checks are pure and have
//! no side effects, so callers may gate as often as they like.

use super::session::Session;

/// `true` when the session exists and carries the permission key.
/// An anonymous context can do nothing.
pub fn can(session: Option<&Session>, permission: &str) -> bool {
    session
        .map(|s| s.has_permission(permission))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::test_support::session_with_expiries;
    use chrono::{Duration, Utc};

    #[test]
    fn test_can_requires_session_and_membership() {
        assert!(!can(None, "user.delete"));

        let now = Utc::now();
        let session = session_with_expiries(now + Duration::seconds(10), now + Duration::seconds(100));
        assert!(can(Some(&session), "user.delete"));
        assert!(!can(Some(&session), "role.delete"));

        // Same session, same key, same answer
        assert_eq!(
            can(Some(&session), "user.view"),
            can(Some(&session), "user.view")
        );
    }
}
