// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - API clients, auth lifecycle and session building.

pub mod auth_api;
pub mod auth_store;
pub mod food_sessions;
pub mod hanibi;
pub mod http_client;
pub mod refresh;
pub mod session_builder;

pub use auth_api::AuthApi;
pub use auth_store::AuthStore;
pub use food_sessions::{FeedUpdate, FoodSessionFeed, FoodSessionService};
pub use hanibi::{HanibiApi, SnapshotQuery};
pub use http_client::HttpClient;
pub use refresh::TokenRefresher;
pub use session_builder::build_sessions;
