// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Unauthenticated auth endpoints (login, token refresh).
//!
//! These calls bypass the bearer interceptor: a refresh must never trigger
//! another refresh.

use crate::error::AppError;
use crate::models::auth::{LoginRequest, RefreshRequest, TokenResponse};
use crate::models::TokenPair;
use serde::Serialize;

pub const LOGIN_PATH: &str = "/api/v1/auth/login";
pub const REFRESH_PATH: &str = "/api/v1/auth/refresh";

/// Client for the auth endpoints.
#[derive(Clone)]
pub struct AuthApi {
    http: reqwest::Client,
    base_url: Option<String>,
}

impl AuthApi {
    pub fn new(http: reqwest::Client, base_url: Option<String>) -> Self {
        Self { http, base_url }
    }

    /// Exchange email/password for a token pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AppError> {
        let pair = self
            .post_tokens(LOGIN_PATH, &LoginRequest { email, password }, "login")
            .await?;
        tracing::info!("Login succeeded");
        Ok(pair)
    }

    /// Trade a refresh token for a new token pair.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        self.post_tokens(REFRESH_PATH, &RefreshRequest { refresh_token }, "token refresh")
            .await
    }

    async fn post_tokens<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        what: &str,
    ) -> Result<TokenPair, AppError> {
        let base = self.base_url.as_deref().ok_or(AppError::NotConfigured)?;
        let url = format!("{}{}", base, path);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("{what} request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "{} rejected", what);
            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(AppError::Unauthorized);
            }
            return Err(AppError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::Network(format!("{what} response failed: {e}")))?;
        let parsed: TokenResponse = serde_json::from_slice(&body)
            .map_err(|e| AppError::InvalidResponse(format!("{what}: {e}")))?;

        parsed.into_tokens(what)
    }
}
