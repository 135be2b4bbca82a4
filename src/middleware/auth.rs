// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer token interceptor.
//!
//! Request side: attach `Authorization: Bearer <token>` and refresh ahead of
//! time when a JWT access token is about to expire.
//! Error side: decide how a 401 is repaired, or clear the session.

use crate::error::AppError;
use crate::services::{AuthStore, TokenRefresher};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use std::sync::Arc;

/// The only claims we look at.
#[derive(Debug, Default, Deserialize)]
struct ExpiryClaims {
    exp: Option<i64>,
    iat: Option<i64>,
}

/// Auth handling shared by every request the `HttpClient` sends.
#[derive(Clone)]
pub struct AuthInterceptor {
    store: Arc<AuthStore>,
    refresher: TokenRefresher,
    refresh_margin: Duration,
}

impl AuthInterceptor {
    pub fn new(
        store: Arc<AuthStore>,
        refresher: TokenRefresher,
        refresh_margin_secs: i64,
    ) -> Self {
        Self {
            store,
            refresher,
            refresh_margin: Duration::seconds(refresh_margin_secs),
        }
    }

    pub fn store(&self) -> &Arc<AuthStore> {
        &self.store
    }

    pub fn refresher(&self) -> &TokenRefresher {
        &self.refresher
    }

    /// Inject the bearer token, if any. Returns the token that was sent so a
    /// later 401 can tell whether the store has moved on since.
    pub async fn authorize(
        &self,
        request: &mut reqwest::Request,
    ) -> Result<Option<String>, AppError> {
        if let Some(token) = self.store.access_token() {
            if self.store.refresh_token().is_some() && self.expires_soon(&token) {
                tracing::debug!("Access token close to expiry, refreshing before send");
                // On failure the store is already cleared; don't send the request.
                self.refresher.refresh_access_token().await?;
            }
        }

        let token = self.store.access_token();
        if let Some(token) = &token {
            set_bearer(request, token)?;
        }
        Ok(token)
    }

    /// Handle a 401 for a request that was sent with `sent_with`.
    ///
    /// Returns the access token to replay the request with:
    /// 1. If the store already holds a different token, another request has
    ///    refreshed in the meantime; replay with that one
    /// 2. Without a refresh token nothing can be repaired: clear the session
    ///    and surface the original 401
    /// 3. Otherwise join (or start) the single-flight refresh
    pub async fn recover(&self, sent_with: Option<&str>) -> Result<String, AppError> {
        if let Some(current) = self.store.access_token() {
            if sent_with != Some(current.as_str()) {
                tracing::debug!("Token rotated while request was in flight, replaying");
                return Ok(current);
            }
        }

        if self.store.refresh_token().is_none() {
            tracing::info!("Received 401 with no refresh token, logging out");
            self.store.handle_unauthorized();
            return Err(AppError::Unauthorized);
        }

        let pair = self.refresher.refresh_access_token().await?;
        Ok(pair.access_token)
    }

    /// True if `token` is a JWT whose `exp` falls inside the refresh margin.
    /// Opaque tokens are never treated as expiring.
    fn expires_soon(&self, token: &str) -> bool {
        let Some(claims) = expiry_claims(token) else {
            return false;
        };
        needs_refresh(
            &claims,
            Utc::now().timestamp(),
            self.refresh_margin.num_seconds(),
        )
    }
}

/// Whether a token with `claims` should be refreshed at `now`.
///
/// When the token carries `iat`, the margin is capped at half its lifetime,
/// so short-lived tokens are not refreshed before every request.
fn needs_refresh(claims: &ExpiryClaims, now: i64, margin_secs: i64) -> bool {
    let Some(exp) = claims.exp else {
        return false;
    };
    let margin = match claims.iat {
        Some(iat) if exp - iat <= margin_secs => {
            tracing::debug!(
                lifetime_secs = exp - iat,
                margin_secs,
                "Token lifetime within refresh margin, capping margin"
            );
            (exp - iat) / 2
        }
        _ => margin_secs,
    };
    now + margin >= exp
}

fn expiry_claims(token: &str) -> Option<ExpiryClaims> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .ok()
        .map(|data| data.claims)
}

/// Read `exp` from a JWT without verifying its signature. The backend is the
/// authority on validity; this is only used to refresh early.
pub fn token_expiry(token: &str) -> Option<i64> {
    expiry_claims(token).and_then(|claims| claims.exp)
}

/// Overwrite the request's `Authorization` header.
pub fn set_bearer(request: &mut reqwest::Request, token: &str) -> Result<(), AppError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| AppError::BadRequest("access token is not a valid header value".into()))?;
    value.set_sensitive(true);
    request.headers_mut().insert(AUTHORIZATION, value);
    Ok(())
}
