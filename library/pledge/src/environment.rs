//! Collaborators injected into view models.
//!
//! Nothing in this crate reaches for a global session; whoever builds a view
//! model decides which session, formatters and config it sees.

use std::sync::{Arc, RwLock};

use crate::config::PledgeConfig;
use crate::format::{
    ChronoDateFormatter, CurrencyFormatter, DateFormatter, StandardCurrencyFormatter,
};
use crate::types::User;

/// Read-only view of the current session.
pub trait AuthenticationSnapshotProvider: Send + Sync {
    fn current_user(&self) -> Option<User>;
}

/// Process-wide session state, written by the login flow.
#[derive(Debug, Default)]
pub struct SessionStore {
    user: RwLock<Option<User>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&self, user: User) {
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = Some(user);
    }

    pub fn logout(&self) {
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl AuthenticationSnapshotProvider for SessionStore {
    fn current_user(&self) -> Option<User> {
        self.user.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// A session that never changes, e.g. one resolved per HTTP request.
#[derive(Debug, Clone, Default)]
pub struct StaticSession(pub Option<User>);

impl AuthenticationSnapshotProvider for StaticSession {
    fn current_user(&self) -> Option<User> {
        self.0.clone()
    }
}

#[derive(Clone)]
pub struct Environment {
    pub session: Arc<dyn AuthenticationSnapshotProvider>,
    pub currency: Arc<dyn CurrencyFormatter>,
    pub dates: Arc<dyn DateFormatter>,
    pub config: PledgeConfig,
}

impl Environment {
    /// Default formatters and config around the given session.
    pub fn new(session: Arc<dyn AuthenticationSnapshotProvider>) -> Self {
        Environment {
            session,
            currency: Arc::new(StandardCurrencyFormatter::default()),
            dates: Arc::new(ChronoDateFormatter),
            config: PledgeConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PledgeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_currency(mut self, currency: Arc<dyn CurrencyFormatter>) -> Self {
        self.currency = currency;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_store_login_logout() {
        let store = SessionStore::new();
        assert!(store.current_user().is_none());

        store.login(User {
            id: 1,
            name: "Blob".to_string(),
        });
        assert_eq!(store.current_user().map(|u| u.id), Some(1));

        store.logout();
        assert!(store.current_user().is_none());
    }

    #[test]
    fn static_session_is_fixed() {
        let session = StaticSession(Some(User {
            id: 9,
            name: "Fixed".to_string(),
        }));
        assert_eq!(session.current_user().map(|u| u.id), Some(9));
        assert!(StaticSession::default().current_user().is_none());
    }
}
