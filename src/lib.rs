// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hanibi client: authenticated access to the Hanibi backend and food input
//! session reconstruction for the smart food-waste processor.
//!
//! This crate provides the token lifecycle (bearer injection, single-flight
//! refresh, logout on failure) and the engine that pairs device events and
//! camera snapshots into food input sessions.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod time_utils;

use config::Config;
use error::AppError;
use services::{AuthStore, FoodSessionService, HanibiApi, HttpClient};
use std::sync::Arc;

/// Shared application state.
///
/// Owns the auth store; everything that sends requests gets it from here.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub auth_store: Arc<AuthStore>,
    pub http: HttpClient,
    pub api: HanibiApi,
    pub food_sessions: FoodSessionService,
}

impl AppState {
    /// Wire up the client stack around an empty (logged-out) store.
    pub fn new(config: Config) -> Result<Self, AppError> {
        Self::with_store(config, Arc::new(AuthStore::new()))
    }

    /// Wire up the client stack around an existing store.
    pub fn with_store(config: Config, auth_store: Arc<AuthStore>) -> Result<Self, AppError> {
        let http = HttpClient::new(&config, Arc::clone(&auth_store))?;
        let api = HanibiApi::new(http.clone());
        let food_sessions =
            FoodSessionService::new(api.clone(), config.event_limit, config.snapshot_limit);

        Ok(Self {
            config,
            auth_store,
            http,
            api,
            food_sessions,
        })
    }

    /// Log in with email/password and store the issued tokens.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AppError> {
        let pair = self.http.auth_api().login(email, password).await?;
        self.auth_store.set_tokens(pair.access_token, pair.refresh_token);
        Ok(())
    }

    /// Local logout.
    pub fn logout(&self) {
        self.auth_store.clear();
    }
}
