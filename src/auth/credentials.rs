//! Remembered sign-in credentials in the OS keychain.
//!
//! Backs the "remember me" box on the sign-in form: the last login
//! email lives in the config file, the matching password in the
//! keychain keyed by that email.

use anyhow::{Context, Result};
use keyring::Entry;

use crate::config::Config;

const SERVICE_NAME: &str = "admingate";

pub struct CredentialStore;

impl CredentialStore {
    fn entry(email: &str) -> Result<Entry> {
        Entry::new(SERVICE_NAME, email).context("Failed to open keychain entry")
    }

    /// Remember the password for an email after a successful login.
    pub fn remember(email: &str, password: &str) -> Result<()> {
        Self::entry(email)?
            .set_password(password)
            .context("Failed to store password in keychain")
    }

    /// Recall the remembered password for an email.
    pub fn recall(email: &str) -> Result<String> {
        Self::entry(email)?
            .get_password()
            .context("No remembered password for this email")
    }

    /// Drop a remembered password, e.g. on sign-out with the box
    /// unchecked.
    pub fn forget(email: &str) -> Result<()> {
        Self::entry(email)?
            .delete_credential()
            .context("Failed to remove password from keychain")
    }

    pub fn is_remembered(email: &str) -> bool {
        Self::entry(email)
            .map(|entry| entry.get_password().is_ok())
            .unwrap_or(false)
    }

    /// Credentials to prefill the sign-in form: the last login email
    /// from the config plus its remembered password, if both exist.
    pub fn prefill(config: &Config) -> Option<(String, String)> {
        let email = config.last_email.clone()?;
        let password = Self::recall(&email).ok()?;
        Some((email, password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remember_recall_forget_round_trip() {
        let email = "keychain-round-trip@example.test";
        if CredentialStore::remember(email, "s3cret").is_err() {
            // No keychain backend on this host.
            return;
        }
        assert_eq!(CredentialStore::recall(email).expect("recall"), "s3cret");
        assert!(CredentialStore::is_remembered(email));

        CredentialStore::forget(email).expect("forget");
        assert!(!CredentialStore::is_remembered(email));
        assert!(CredentialStore::recall(email).is_err());
    }

    #[test]
    fn test_prefill_requires_last_email() {
        let config = Config::default();
        assert!(CredentialStore::prefill(&config).is_none());
    }
}
