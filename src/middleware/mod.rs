// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request/response interceptors.

pub mod auth;

pub use auth::AuthInterceptor;
