//! The credential store: holds the one live session.
//!
//! Reads and writes go through `get`/`set`/`clear`; `set` is a total
//! replacement with last-writer-wins semantics and no merge. Mutation
//! happens from a single logical flow (the request/response cycle), so
//! the store carries no locking of its own.
//!
//! The session is persisted as JSON in the cache directory so a
//! restarted client can resume without re-login, mirroring how the
//! browser keeps its session cookie.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::debug;

use super::session::Session;

/// Session file name in the cache directory
const SESSION_FILE: &str = "session.json";

pub struct SessionStore {
    cache_dir: PathBuf,
    session: Option<Session>,
}

impl SessionStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            session: None,
        }
    }

    pub fn get(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    /// Total replacement; the previous session, if any, is discarded.
    pub fn set(&mut self, session: Session) {
        self.session = Some(session);
    }

    /// Remove the session, signaling "logged out".
    pub fn clear(&mut self) -> Result<()> {
        self.session = None;
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Load a persisted session from disk. A session whose refresh
    /// token has already lapsed is not worth resuming and is skipped.
    pub fn load(&mut self) -> Result<bool> {
        let path = self.session_path();
        if path.exists() {
            let contents =
                std::fs::read_to_string(&path).context("Failed to read session file")?;
            let session: Session =
                serde_json::from_str(&contents).context("Failed to parse session file")?;

            if session.refresh_token_valid(Utc::now()) && !session.is_terminal() {
                self.session = Some(session);
                return Ok(true);
            }
            debug!("Persisted session expired, ignoring");
        }
        Ok(false)
    }

    /// Save the current session to disk.
    pub fn save(&self) -> Result<()> {
        if let Some(ref session) = self.session {
            let path = self.session_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(session)?;
            std::fs::write(path, contents)?;
        }
        Ok(())
    }

    fn session_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }
}
