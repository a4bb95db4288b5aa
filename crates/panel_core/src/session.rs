use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::info;

use crate::config::PostVars;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub user: Option<String>,
    pub token: Option<String>,
    pub error: Option<String>,
}

impl SessionSnapshot {
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }
}

#[derive(Default)]
struct SessionState {
    snapshot: SessionSnapshot,
    auto_login_tried: bool,
}

/// Login state of the administrator plus the single user-visible error slot.
#[derive(Default)]
pub struct AuthSession {
    state: RwLock<SessionState>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Establishes the session and clears any pending error.
    pub fn login(&self, user: impl Into<String>, token: impl Into<String>) {
        let user = user.into();
        info!(%user, "admin session established");
        let mut guard = self.write();
        guard.snapshot.user = Some(user);
        guard.snapshot.token = Some(token.into());
        guard.snapshot.error = None;
    }

    /// Drops user and token. The error slot survives so the login screen can
    /// explain why the session ended.
    pub fn logout(&self) {
        let mut guard = self.write();
        if guard.snapshot.token.is_some() {
            info!(user = ?guard.snapshot.user, "admin session closed");
        }
        guard.snapshot.user = None;
        guard.snapshot.token = None;
    }

    pub fn set_error(&self, message: impl Into<String>) {
        self.write().snapshot.error = Some(message.into());
    }

    pub fn clear_error(&self) {
        self.write().snapshot.error = None;
    }

    pub fn error(&self) -> Option<String> {
        self.read().snapshot.error.clone()
    }

    pub fn user(&self) -> Option<String> {
        self.read().snapshot.user.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().snapshot.token.clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.read().snapshot.is_logged_in()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.read().snapshot.clone()
    }

    /// Whether an automatic login should be attempted now. True at most once
    /// per session object, and only while logged out with complete hints.
    pub fn try_auto_login(&self, hints: &PostVars) -> bool {
        let mut guard = self.write();
        if guard.auto_login_tried || guard.snapshot.is_logged_in() || !hints.has_session_hints() {
            return false;
        }
        guard.auto_login_tried = true;
        true
    }
}
