// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication token models.

use super::envelope::ApiEnvelope;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tokens held by the auth store. Both are set or cleared together.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthTokens {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl AuthTokens {
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

// Never print token material.
impl fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthTokens")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Token pair issued by login and refresh.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenPair { .. }")
    }
}

/// `POST /api/v1/auth/refresh` body.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// `POST /api/v1/auth/login` body.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Token responses arrive either bare or wrapped in the common envelope.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum TokenResponse {
    Enveloped(ApiEnvelope<TokenPair>),
    Bare(TokenPair),
}

impl TokenResponse {
    pub fn into_tokens(self, what: &str) -> Result<TokenPair, AppError> {
        match self {
            TokenResponse::Enveloped(envelope) => envelope.into_data(what),
            TokenResponse::Bare(pair) => Ok(pair),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_accepts_both_shapes() {
        let bare: TokenResponse =
            serde_json::from_str(r#"{"accessToken":"a1","refreshToken":"r1"}"#).unwrap();
        let pair = bare.into_tokens("refresh").unwrap();
        assert_eq!(pair.access_token, "a1");

        let wrapped: TokenResponse = serde_json::from_str(
            r#"{"success":true,"data":{"accessToken":"a2","refreshToken":"r2"}}"#,
        )
        .unwrap();
        let pair = wrapped.into_tokens("refresh").unwrap();
        assert_eq!(pair.refresh_token, "r2");
    }

    #[test]
    fn test_failed_envelope_is_an_error() {
        let wrapped: TokenResponse =
            serde_json::from_str(r#"{"success":false,"message":"expired"}"#).unwrap();
        assert!(wrapped.into_tokens("refresh").is_err());
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let tokens = AuthTokens {
            access_token: Some("secret-access".to_string()),
            refresh_token: Some("secret-refresh".to_string()),
        };
        let printed = format!("{tokens:?}");
        assert!(!printed.contains("secret"));
    }
}
