// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Food input sessions reconstructed from device events.

use super::event::SensorEvent;
use super::snapshot::SnapshotMeta;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "bindings/")
)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Completed => "completed",
        }
    }
}

/// Weights read from the boundary event payloads.
///
/// `diff` is `after - before` and is only present when both sides are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "bindings/")
)]
pub struct WeightChange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<f64>,
}

impl WeightChange {
    pub(crate) fn with_before(before: Option<f64>) -> Option<Self> {
        before.map(|b| WeightChange {
            before: Some(b),
            ..Default::default()
        })
    }

    /// Replace the closing weight with the one from the latest
    /// `FOOD_INPUT_AFTER` event and recompute `diff`. An event without a
    /// weight clears the previous closing weight.
    pub(crate) fn record_after(current: Option<Self>, after: Option<f64>) -> Option<Self> {
        let before = current.and_then(|w| w.before);
        if before.is_none() && after.is_none() {
            return None;
        }
        Some(WeightChange {
            before,
            after,
            diff: before.zip(after).map(|(b, a)| a - b),
        })
    }
}

/// One food input: from a `FOOD_INPUT_BEFORE` event up to its closing event.
///
/// Events and snapshots are borrowed from the slices the session was built
/// from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "bindings/")
)]
#[serde(rename_all = "camelCase")]
pub struct FoodInputSession<'a> {
    /// `session-{beforeEvent.id}`
    pub session_id: String,
    pub device_id: String,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    pub before_event: &'a SensorEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_event: Option<&'a SensorEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_completed_event: Option<&'a SensorEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before_snapshot: Option<&'a SnapshotMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_snapshot: Option<&'a SnapshotMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_change: Option<WeightChange>,
    pub status: SessionStatus,
}

impl FoodInputSession<'_> {
    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    /// Elapsed time between start and end, once the session has ended.
    pub fn duration(&self) -> Option<Duration> {
        self.ended_at.map(|end| end - self.started_at)
    }
}
