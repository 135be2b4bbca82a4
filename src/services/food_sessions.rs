// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Food session feed: fetch events and snapshots for a device and rebuild
//! sessions from them, once or on a polling interval.

use crate::error::AppError;
use crate::models::{FoodInputSession, SensorEvent, SnapshotMeta};
use crate::services::hanibi::SnapshotQuery;
use crate::services::session_builder::build_sessions;
use crate::services::HanibiApi;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Shortest polling period; a zero interval is raised to this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Raw data for one device, as fetched together.
#[derive(Debug, Clone)]
pub struct FoodSessionFeed {
    pub device_id: String,
    pub events: Vec<SensorEvent>,
    pub snapshots: Vec<SnapshotMeta>,
    pub fetched_at: DateTime<Utc>,
}

impl FoodSessionFeed {
    /// Sessions for this feed, newest first.
    pub fn sessions(&self) -> Vec<FoodInputSession<'_>> {
        build_sessions(&self.events, Some(&self.snapshots))
    }

    /// The most recently started session, if any.
    pub fn latest_session(&self) -> Option<FoodInputSession<'_>> {
        self.sessions().into_iter().next()
    }
}

/// State published by a polling task.
#[derive(Debug, Clone)]
pub enum FeedUpdate {
    /// First fetch still running
    Pending,
    Ready(Arc<FoodSessionFeed>),
    Failed(Arc<AppError>),
}

/// Fetches the inputs of the session builder.
#[derive(Clone)]
pub struct FoodSessionService {
    api: HanibiApi,
    event_limit: u32,
    snapshot_limit: u32,
}

impl FoodSessionService {
    pub fn new(api: HanibiApi, event_limit: u32, snapshot_limit: u32) -> Self {
        Self {
            api,
            event_limit,
            snapshot_limit,
        }
    }

    /// Fetch events and snapshots for `device_id` concurrently.
    ///
    /// Either request failing fails the whole fetch.
    pub async fn fetch(&self, device_id: &str) -> Result<FoodSessionFeed, AppError> {
        let snapshot_query = SnapshotQuery::latest(self.snapshot_limit);
        let (events, snapshots) = tokio::try_join!(
            self.api.list_device_events(device_id, self.event_limit),
            self.api.list_snapshots(device_id, &snapshot_query),
        )?;

        tracing::info!(
            device_id,
            events = events.len(),
            snapshots = snapshots.len(),
            "Food session feed fetched"
        );

        Ok(FoodSessionFeed {
            device_id: device_id.to_string(),
            events,
            snapshots,
            fetched_at: Utc::now(),
        })
    }

    /// Poll `device_id` every `interval` in a background task.
    ///
    /// Polling stops when the handle is aborted, when every receiver is
    /// dropped, or after an auth failure (the session is gone and further
    /// requests would only 401). Intervals below `MIN_POLL_INTERVAL` are
    /// raised to it.
    pub fn spawn_polling(
        &self,
        device_id: impl Into<String>,
        interval: Duration,
    ) -> (watch::Receiver<FeedUpdate>, JoinHandle<()>) {
        let (tx, rx) = watch::channel(FeedUpdate::Pending);
        let service = self.clone();
        let device_id = device_id.into();
        if interval < MIN_POLL_INTERVAL {
            tracing::warn!(?interval, "Poll interval too short, using minimum");
        }
        let interval = interval.max(MIN_POLL_INTERVAL);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = tx.closed() => break,
                }

                let (update, stop) = match service.fetch(&device_id).await {
                    Ok(feed) => (FeedUpdate::Ready(Arc::new(feed)), false),
                    Err(e) => {
                        let stop = e.is_auth_failure();
                        tracing::warn!(device_id = %device_id, error = %e, "Session poll failed");
                        (FeedUpdate::Failed(Arc::new(e)), stop)
                    }
                };

                if tx.send(update).is_err() || stop {
                    break;
                }
            }

            tracing::debug!(device_id = %device_id, "Session polling stopped");
        });

        (rx, handle)
    }
}
