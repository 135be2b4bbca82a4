// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Common `{ success, data }` response envelope.

use crate::error::AppError;
use serde::Deserialize;

/// Envelope wrapping every JSON payload returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    /// Error description some endpoints attach when `success` is false
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload, treating `success: false` or a missing `data`
    /// field as an error rather than an empty result.
    pub fn into_data(self, what: &str) -> Result<T, AppError> {
        if !self.success {
            let reason = self.message.unwrap_or_else(|| "success=false".to_string());
            return Err(AppError::InvalidResponse(format!("{what}: {reason}")));
        }

        self.data
            .ok_or_else(|| AppError::InvalidResponse(format!("{what}: response has no data")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successful_envelope_yields_data() {
        let env: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"success":true,"data":[1,2,3]}"#).unwrap();
        assert_eq!(env.into_data("numbers").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_success_false_is_an_error() {
        let env: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"success":false,"message":"device offline"}"#).unwrap();
        let err = env.into_data("events").unwrap_err();
        assert!(err.to_string().contains("device offline"));
    }

    #[test]
    fn test_missing_data_is_an_error() {
        let env: ApiEnvelope<Vec<u32>> = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(matches!(
            env.into_data("events"),
            Err(AppError::InvalidResponse(_))
        ));

        let env: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"success":true,"data":null}"#).unwrap();
        assert!(env.into_data("events").is_err());
    }

    #[test]
    fn test_empty_list_is_not_an_error() {
        let env: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"success":true,"data":[]}"#).unwrap();
        assert!(env.into_data("events").unwrap().is_empty());
    }
}
