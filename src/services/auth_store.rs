// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory auth token store.
//!
//! The store is owned by `AppState` and handed to the HTTP client as an
//! `Arc<AuthStore>`. Its setters are the only write path; anything that
//! needs to react to a logout (UI, pollers) subscribes to changes.

use crate::models::AuthTokens;
use tokio::sync::watch;

/// Holds the current access/refresh token pair for the process.
pub struct AuthStore {
    tokens: watch::Sender<AuthTokens>,
}

impl Default for AuthStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthStore {
    /// Create an empty (logged-out) store.
    pub fn new() -> Self {
        let (tokens, _) = watch::channel(AuthTokens::default());
        Self { tokens }
    }

    /// Create a store that starts logged in.
    pub fn with_tokens(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        let store = Self::new();
        store.set_tokens(access, refresh);
        store
    }

    /// Current token pair.
    pub fn tokens(&self) -> AuthTokens {
        self.tokens.borrow().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.tokens.borrow().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.tokens.borrow().refresh_token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.borrow().access_token.is_some()
    }

    /// Overwrite both tokens (login, refresh, external-provider login).
    pub fn set_tokens(&self, access: impl Into<String>, refresh: impl Into<String>) {
        self.tokens.send_replace(AuthTokens {
            access_token: Some(access.into()),
            refresh_token: Some(refresh.into()),
        });
        tracing::debug!("Auth tokens updated");
    }

    /// Drop both tokens. Subscribers are only notified on an actual change.
    pub fn clear(&self) {
        let changed = self.tokens.send_if_modified(|tokens| {
            if tokens.is_empty() {
                return false;
            }
            *tokens = AuthTokens::default();
            true
        });
        if changed {
            tracing::info!("Auth tokens cleared");
        }
    }

    /// Called when the backend rejected us and nothing can be repaired.
    pub fn handle_unauthorized(&self) {
        self.clear();
    }

    /// Observe token changes. A cleared store means the user must log in again.
    pub fn subscribe(&self) -> watch::Receiver<AuthTokens> {
        self.tokens.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clear_together() {
        let store = AuthStore::new();
        assert!(!store.is_authenticated());

        store.set_tokens("access-1", "refresh-1");
        assert_eq!(store.access_token().as_deref(), Some("access-1"));
        assert_eq!(store.refresh_token().as_deref(), Some("refresh-1"));

        store.clear();
        assert!(store.tokens().is_empty());

        // Idempotent
        store.clear();
        store.handle_unauthorized();
        assert!(store.tokens().is_empty());
    }

    #[tokio::test]
    async fn test_subscribers_see_logout_once() {
        let store = AuthStore::with_tokens("a", "r");
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        store.clear();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_empty());

        store.clear();
        assert!(!rx.has_changed().unwrap());
    }
}
