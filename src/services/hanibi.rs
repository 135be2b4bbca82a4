// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Device and camera endpoints of the Hanibi backend.

use crate::error::AppError;
use crate::models::{RecordId, SensorEvent, SnapshotMeta};
use crate::services::HttpClient;
use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, Utc};

/// Filter for snapshot listing. `from`/`to` are omitted from the query when unset.
#[derive(Debug, Clone, Default)]
pub struct SnapshotQuery {
    pub limit: u32,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl SnapshotQuery {
    pub fn latest(limit: u32) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }

    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("limit", self.limit.to_string())];
        if let Some(from) = self.from {
            query.push(("from", format_utc_rfc3339(from)));
        }
        if let Some(to) = self.to {
            query.push(("to", format_utc_rfc3339(to)));
        }
        query
    }
}

/// Typed wrappers over the device/camera endpoints.
#[derive(Clone)]
pub struct HanibiApi {
    http: HttpClient,
}

impl HanibiApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// `GET /api/v1/devices/{deviceId}/events?status=SUCCESS&limit={n}`
    pub async fn list_device_events(
        &self,
        device_id: &str,
        limit: u32,
    ) -> Result<Vec<SensorEvent>, AppError> {
        let path = format!("/api/v1/devices/{}/events", urlencoding::encode(device_id));
        let events: Vec<SensorEvent> = self
            .http
            .get_json(
                &path,
                &[("status", "SUCCESS".to_string()), ("limit", limit.to_string())],
            )
            .await?;

        tracing::debug!(device_id, count = events.len(), "Fetched device events");
        Ok(events)
    }

    /// `GET /api/v1/cameras/{deviceId}/snapshots`, with image URLs filled in.
    pub async fn list_snapshots(
        &self,
        device_id: &str,
        query: &SnapshotQuery,
    ) -> Result<Vec<SnapshotMeta>, AppError> {
        let path = format!("/api/v1/cameras/{}/snapshots", urlencoding::encode(device_id));
        let mut snapshots: Vec<SnapshotMeta> =
            self.http.get_json(&path, &query.to_query()).await?;

        for snapshot in &mut snapshots {
            snapshot.image_url = self.snapshot_image_url(device_id, &snapshot.id)?;
        }

        tracing::debug!(device_id, count = snapshots.len(), "Fetched camera snapshots");
        Ok(snapshots)
    }

    /// `{base}/api/v1/cameras/{deviceId}/snapshots/{id}/image`
    pub fn snapshot_image_url(&self, device_id: &str, id: &RecordId) -> Result<String, AppError> {
        self.http.url(&format!(
            "/api/v1/cameras/{}/snapshots/{}/image",
            urlencoding::encode(device_id),
            urlencoding::encode(&id.to_string())
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_snapshot_query_omits_unset_bounds() {
        let query = SnapshotQuery::latest(20).to_query();
        assert_eq!(query, vec![("limit", "20".to_string())]);
    }

    #[test]
    fn test_snapshot_query_formats_bounds() {
        let query = SnapshotQuery {
            limit: 5,
            from: Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()),
            to: Some(Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap()),
        }
        .to_query();

        assert_eq!(query[1], ("from", "2025-03-01T00:00:00.000Z".to_string()));
        assert_eq!(query[2], ("to", "2025-03-02T00:00:00.000Z".to_string()));
    }
}
