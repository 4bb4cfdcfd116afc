//! AdminGate: the entry check in front of the editing surface.
//!
//! # This is not access control
//!
//! The gate compares a typed string against a key shipped with the site.
//! Anyone who can read the bundle (or this binary's settings file) can read
//! the key.  It exists so casual visitors do not stumble into the editor.
//! Real access control would have to live on a server, which this site does
//! not have.
//!
//! A rejected attempt shows an error for [`LOGIN_ERROR_DISPLAY`] and then
//! clears itself.  There is no lockout and no retry limit.

use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

/// Key compiled into the site when no override is configured.
pub const DEFAULT_MASTER_KEY: &str = "shipinn1849";

/// How long the "invalid key" state stays visible after a rejection.
pub const LOGIN_ERROR_DISPLAY: Duration = Duration::from_secs(2);

/// Error type for gate checks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("access denied: invalid key")]
    InvalidKey,
}

/// Tracks whether the editing surface is unlocked.
///
/// Time is passed in by the caller so the transient error window can be
/// driven deterministically.
#[derive(Debug)]
pub struct AdminGate {
    master_key: String,
    authenticated: bool,
    rejected_at: Option<Instant>,
}

impl AdminGate {
    pub fn new(master_key: impl Into<String>) -> Self {
        Self {
            master_key: master_key.into(),
            authenticated: false,
            rejected_at: None,
        }
    }

    /// Unlocks the gate when `candidate` equals the master key.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::InvalidKey`] on mismatch and starts the error
    /// display window at `now`.
    pub fn try_login(&mut self, candidate: &str, now: Instant) -> Result<(), GateError> {
        if candidate == self.master_key {
            self.authenticated = true;
            self.rejected_at = None;
            info!("editing surface unlocked");
            Ok(())
        } else {
            self.rejected_at = Some(now);
            warn!("rejected editing surface key");
            Err(GateError::InvalidKey)
        }
    }

    /// Whether the "invalid key" error should still be shown at `now`.
    pub fn error_visible(&self, now: Instant) -> bool {
        self.rejected_at
            .is_some_and(|at| now.saturating_duration_since(at) < LOGIN_ERROR_DISPLAY)
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Locks the editing surface again.
    pub fn lock(&mut self) {
        self.authenticated = false;
    }
}

impl Default for AdminGate {
    fn default() -> Self {
        Self::new(DEFAULT_MASTER_KEY)
    }
}
