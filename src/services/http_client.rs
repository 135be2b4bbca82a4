// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authenticated HTTP client for the Hanibi backend.
//!
//! Handles:
//! - Bearer token injection on every request
//! - One transparent replay after a 401, behind a single-flight refresh
//! - Logout when the session cannot be repaired
//! - Envelope unwrapping for JSON responses

use crate::config::Config;
use crate::error::AppError;
use crate::middleware::auth::{set_bearer, AuthInterceptor};
use crate::models::ApiEnvelope;
use crate::services::{AuthApi, AuthStore, TokenRefresher};
use anyhow::Context;
use reqwest::{Method, Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// HTTP client shared by every API wrapper.
#[derive(Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: Option<String>,
    auth: AuthInterceptor,
}

impl HttpClient {
    /// Build the client and its auth plumbing around `store`.
    pub fn new(config: &Config, store: Arc<AuthStore>) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .context("failed building HTTP client")?;

        let auth_api = AuthApi::new(http.clone(), config.api_base_url.clone());
        let refresher = TokenRefresher::new(auth_api, Arc::clone(&store));
        let auth = AuthInterceptor::new(store, refresher, config.refresh_margin_secs);

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            auth,
        })
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn auth(&self) -> &AuthInterceptor {
        &self.auth
    }

    /// Unauthenticated auth endpoints sharing this client's connection pool.
    pub fn auth_api(&self) -> AuthApi {
        AuthApi::new(self.http.clone(), self.base_url.clone())
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> Result<String, AppError> {
        let base = self.base_url.as_deref().ok_or(AppError::NotConfigured)?;
        Ok(format!("{}{}", base, path))
    }

    /// GET `path` and unwrap the `{ success, data }` envelope.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let request = self
            .http
            .request(Method::GET, self.url(path)?)
            .query(query)
            .build()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let response = self.send(request).await?;
        decode_envelope(response, path).await
    }

    /// POST a JSON body to `path` and unwrap the envelope.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let request = self
            .http
            .request(Method::POST, self.url(path)?)
            .json(body)
            .build()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let response = self.send(request).await?;
        decode_envelope(response, path).await
    }

    /// Send a request through the auth pipeline.
    ///
    /// A 401 is repaired at most once: the request is cloned before dispatch
    /// and the clone is the only replay. Any other failure is returned as is.
    pub async fn send(&self, mut request: Request) -> Result<Response, AppError> {
        let sent_with = self.auth.authorize(&mut request).await?;
        let replay = request.try_clone();

        let response = self.execute(request).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return check_response(response).await;
        }

        let Some(mut replay) = replay else {
            // Streaming bodies can't be replayed.
            return Err(AppError::Unauthorized);
        };

        tracing::debug!(url = %replay.url().path(), "Received 401, recovering session");
        let token = self.auth.recover(sent_with.as_deref()).await?;
        set_bearer(&mut replay, &token)?;

        let response = self.execute(replay).await?;
        check_response(response).await
    }

    async fn execute(&self, request: Request) -> Result<Response, AppError> {
        self.http
            .execute(request)
            .await
            .map_err(|e| AppError::Network(e.to_string()))
    }
}

/// Check response status and return an error if not successful.
async fn check_response(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::UNAUTHORIZED {
        return Err(AppError::Unauthorized);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::debug!(status = %status, "Request failed");
    Err(AppError::Http {
        status: status.as_u16(),
        body,
    })
}

/// Parse a JSON envelope and return its `data`.
async fn decode_envelope<T: DeserializeOwned>(
    response: Response,
    what: &str,
) -> Result<T, AppError> {
    let body = response
        .bytes()
        .await
        .map_err(|e| AppError::Network(format!("{what}: {e}")))?;

    // Decode with serde_json directly so the error names the offending value.
    let envelope: ApiEnvelope<T> = serde_json::from_slice(&body)
        .map_err(|e| AppError::InvalidResponse(format!("{what}: {e}")))?;

    envelope.into_data(what)
}
