// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Device sensor event model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Server-assigned record identifier (numeric or opaque string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "bindings/")
)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Number(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

/// Event kinds reported by the device.
///
/// Only the three food-input kinds drive session building; everything else
/// is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    FoodInputBefore,
    FoodInputAfter,
    ProcessingCompleted,
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::FoodInputBefore => "FOOD_INPUT_BEFORE",
            EventKind::FoodInputAfter => "FOOD_INPUT_AFTER",
            EventKind::ProcessingCompleted => "PROCESSING_COMPLETED",
            EventKind::Other(raw) => raw,
        }
    }
}

impl From<String> for EventKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "FOOD_INPUT_BEFORE" => EventKind::FoodInputBefore,
            "FOOD_INPUT_AFTER" => EventKind::FoodInputAfter,
            "PROCESSING_COMPLETED" => EventKind::ProcessingCompleted,
            _ => EventKind::Other(value),
        }
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// A sensor event as returned by `GET /api/v1/devices/{id}/events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "bindings/")
)]
#[serde(rename_all = "camelCase")]
pub struct SensorEvent {
    pub id: RecordId,
    pub device_id: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub event_type: EventKind,
    /// Authoritative ordering key
    #[serde(deserialize_with = "crate::time_utils::deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    #[cfg_attr(
        feature = "binding-generation",
        ts(type = "Record<string, unknown>")
    )]
    pub payload: Map<String, Value>,
}

impl SensorEvent {
    /// `payload.weight`, only when it is a JSON number.
    pub fn weight(&self) -> Option<f64> {
        self.payload.get("weight").and_then(Value::as_f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_deserializes_from_wire_shape() {
        let event: SensorEvent = serde_json::from_value(json!({
            "id": 42,
            "deviceId": "dev-1",
            "eventType": "FOOD_INPUT_BEFORE",
            "createdAt": "2025-03-01T10:00:00Z",
            "payload": { "weight": 512.5 }
        }))
        .unwrap();

        assert_eq!(event.id, RecordId::Number(42));
        assert_eq!(event.event_type, EventKind::FoodInputBefore);
        assert_eq!(event.weight(), Some(512.5));
    }

    #[test]
    fn test_unknown_event_type_is_preserved() {
        let event: SensorEvent = serde_json::from_value(json!({
            "id": "evt-7",
            "deviceId": "dev-1",
            "eventType": "LID_OPENED",
            "createdAt": "2025-03-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(event.event_type, EventKind::Other("LID_OPENED".to_string()));
        assert_eq!(event.id.to_string(), "evt-7");
        assert!(event.payload.is_empty());

        let back = serde_json::to_value(&event).unwrap();
        assert_eq!(back["eventType"], "LID_OPENED");
    }

    #[test]
    fn test_non_numeric_weight_is_ignored() {
        let event: SensorEvent = serde_json::from_value(json!({
            "id": 1,
            "deviceId": "dev-1",
            "eventType": "FOOD_INPUT_AFTER",
            "createdAt": "2025-03-01T10:00:00Z",
            "payload": { "weight": "300" }
        }))
        .unwrap();

        assert_eq!(event.weight(), None);
    }

    #[test]
    fn test_malformed_created_at_is_rejected() {
        let result: Result<SensorEvent, _> = serde_json::from_value(json!({
            "id": 1,
            "deviceId": "dev-1",
            "eventType": "FOOD_INPUT_AFTER",
            "createdAt": "not a date"
        }));

        let err = result.unwrap_err().to_string();
        assert!(err.contains("invalid timestamp"), "got: {err}");
    }
}
