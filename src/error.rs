// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types.

use std::sync::Arc;

/// Error type for every fallible client operation.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The backend answered 401 and the request could not be repaired.
    #[error("Authentication required")]
    Unauthorized,

    /// Token refresh failed; local tokens have been cleared.
    #[error("Token refresh failed: {0}")]
    RefreshFailed(#[source] Arc<AppError>),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    /// Envelope reported failure, `data` was missing, or the body did not decode.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("API base URL is not configured (set HANIBI_API_URL)")]
    NotConfigured,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Unauthorized => Some(401),
            AppError::Http { status, .. } => Some(*status),
            AppError::RefreshFailed(cause) => cause.status(),
            _ => None,
        }
    }

    /// True for a bare 401 that was propagated to the caller.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Unauthorized)
    }

    /// True when authentication could not be established or repaired.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, AppError::Unauthorized | AppError::RefreshFailed(_))
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, AppError>;
