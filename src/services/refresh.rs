// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Single-flight access token refresh.
//!
//! Any number of requests may hit a 401 at the same time. The first one to ask
//! for a refresh installs a shared refresh future; everyone else awaits that
//! same future, so the backend sees exactly one refresh call and every waiter
//! gets the same outcome.

use crate::error::AppError;
use crate::models::TokenPair;
use crate::services::{AuthApi, AuthStore};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

type RefreshOutcome = Result<TokenPair, Arc<AppError>>;
type SharedRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

/// Coordinates token refreshes for one `AuthStore`.
#[derive(Clone)]
pub struct TokenRefresher {
    api: AuthApi,
    store: Arc<AuthStore>,
    /// The refresh currently in flight, if any.
    in_flight: Arc<Mutex<Option<SharedRefresh>>>,
}

impl TokenRefresher {
    pub fn new(api: AuthApi, store: Arc<AuthStore>) -> Self {
        Self {
            api,
            store,
            in_flight: Arc::new(Mutex::new(None)),
        }
    }

    /// True while a refresh call is outstanding.
    pub fn is_refreshing(&self) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Refresh the access token, joining an in-flight refresh if there is one.
    ///
    /// On success both tokens in the store are replaced. On failure the store
    /// is cleared and every waiter receives `AppError::RefreshFailed` with the
    /// same cause.
    pub async fn refresh_access_token(&self) -> Result<TokenPair, AppError> {
        let refresh = {
            let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            match slot.as_ref() {
                Some(refresh) => {
                    tracing::debug!("Joining in-flight token refresh");
                    refresh.clone()
                }
                None => {
                    let refresh = self.start_refresh().boxed().shared();
                    *slot = Some(refresh.clone());
                    refresh
                }
            }
        };

        refresh.await.map_err(AppError::RefreshFailed)
    }

    /// Build the refresh future. It releases the in-flight slot itself once
    /// the store has been updated, so late callers never see a stale outcome.
    fn start_refresh(&self) -> impl Future<Output = RefreshOutcome> + Send + 'static {
        let api = self.api.clone();
        let store = Arc::clone(&self.store);
        let in_flight = Arc::clone(&self.in_flight);

        async move {
            let outcome = match store.refresh_token() {
                Some(refresh_token) => api.refresh(&refresh_token).await.map_err(Arc::new),
                None => Err(Arc::new(AppError::Unauthorized)),
            };

            match &outcome {
                Ok(pair) => {
                    store.set_tokens(pair.access_token.clone(), pair.refresh_token.clone());
                    tracing::info!("Access token refreshed");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Token refresh failed, logging out");
                    store.clear();
                }
            }

            *in_flight.lock().unwrap_or_else(PoisonError::into_inner) = None;
            outcome
        }
    }
}
