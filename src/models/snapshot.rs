// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Camera snapshot metadata.

use super::event::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Which food-input boundary caused the camera to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "bindings/")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SnapshotTrigger {
    FoodInputBefore,
    FoodInputAfter,
}

impl SnapshotTrigger {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "FOOD_INPUT_BEFORE" => Some(SnapshotTrigger::FoodInputBefore),
            "FOOD_INPUT_AFTER" => Some(SnapshotTrigger::FoodInputAfter),
            _ => None,
        }
    }
}

/// Snapshot metadata from `GET /api/v1/cameras/{id}/snapshots`.
///
/// The backend does not send `imageUrl`; the API layer fills it in after
/// decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "bindings/")
)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMeta {
    pub id: RecordId,
    pub device_id: String,
    #[serde(deserialize_with = "crate::time_utils::deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    /// Periodic or manual captures carry no trigger
    #[serde(default, deserialize_with = "deserialize_trigger")]
    pub trigger_type: Option<SnapshotTrigger>,
    #[serde(default)]
    pub image_url: String,
}

/// Unknown trigger strings map to `None` instead of failing the whole list.
fn deserialize_trigger<'de, D>(deserializer: D) -> Result<Option<SnapshotTrigger>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(SnapshotTrigger::parse))
}
