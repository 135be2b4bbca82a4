// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Food input session reconstruction.
//!
//! Devices report food-input boundaries as independent events, and the camera
//! reports snapshots on its own clock. This module pairs the events into
//! sessions and attaches the closest snapshot to each boundary:
//! 1. Sort events and snapshots ascending by `created_at`
//! 2. Scan the events once with at most one tracked session
//! 3. Flush the last tracked session
//! 4. Return sessions newest first
//!
//! Everything here is pure: identical inputs give identical output.

use crate::models::{
    EventKind, FoodInputSession, SensorEvent, SessionStatus, SnapshotMeta, SnapshotTrigger,
    WeightChange,
};
use crate::time_utils::abs_diff_millis;
use chrono::{DateTime, Utc};

/// Maximum distance between a boundary event and a matching snapshot (2 minutes).
pub const SNAPSHOT_MATCH_WINDOW_MS: i64 = 2 * 60 * 1000;

/// Scanner state between events.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanState<'a> {
    /// No `FOOD_INPUT_BEFORE` seen yet.
    Idle,
    /// A session has started; it keeps absorbing closing events until the
    /// next `FOOD_INPUT_BEFORE` or the end of input.
    Tracking(FoodInputSession<'a>),
}

/// Rebuild food input sessions from device events and camera snapshots.
///
/// Output is newest session first. Sessions without a closing event are kept
/// and reported as `InProgress`.
pub fn build_sessions<'a>(
    events: &'a [SensorEvent],
    snapshots: Option<&'a [SnapshotMeta]>,
) -> Vec<FoodInputSession<'a>> {
    if events.is_empty() {
        return Vec::new();
    }

    let sorted_events = sorted_by_time(events, |e| e.created_at);
    let sorted_snapshots = sorted_by_time(snapshots.unwrap_or_default(), |s| s.created_at);

    let mut sessions = Vec::new();
    let mut state = ScanState::Idle;

    for event in sorted_events {
        let (next, flushed) = step(state, event, &sorted_snapshots);
        sessions.extend(flushed);
        state = next;
    }

    if let ScanState::Tracking(last) = state {
        sessions.push(last);
    }

    sessions.reverse();
    sessions
}

/// Advance the scanner by one event.
///
/// Returns the new state and, when a `FOOD_INPUT_BEFORE` displaces a tracked
/// session, the displaced session exactly as it stood.
pub fn step<'a>(
    state: ScanState<'a>,
    event: &'a SensorEvent,
    snapshots: &[&'a SnapshotMeta],
) -> (ScanState<'a>, Option<FoodInputSession<'a>>) {
    match (&event.event_type, state) {
        (EventKind::FoodInputBefore, previous) => {
            let flushed = match previous {
                ScanState::Tracking(session) => Some(session),
                ScanState::Idle => None,
            };
            (ScanState::Tracking(open_session(event, snapshots)), flushed)
        }

        (EventKind::FoodInputAfter, ScanState::Tracking(mut session)) => {
            session.after_event = Some(event);
            session.ended_at = Some(event.created_at);
            session.status = SessionStatus::Completed;
            session.after_snapshot = find_nearest_snapshot(
                snapshots,
                event.created_at,
                SnapshotTrigger::FoodInputAfter,
            );
            session.weight_change =
                WeightChange::record_after(session.weight_change, event.weight());
            (ScanState::Tracking(session), None)
        }

        (EventKind::ProcessingCompleted, ScanState::Tracking(mut session)) => {
            session.processing_completed_event = Some(event);
            if session.ended_at.is_none() {
                session.ended_at = Some(event.created_at);
            }
            session.status = SessionStatus::Completed;
            (ScanState::Tracking(session), None)
        }

        // Closing event with nothing open.
        (EventKind::FoodInputAfter | EventKind::ProcessingCompleted, ScanState::Idle) => {
            (ScanState::Idle, None)
        }

        // Lid, fault, heartbeat and other device events don't touch sessions.
        (EventKind::Other(_), state) => (state, None),
    }
}

/// Start a new session at a `FOOD_INPUT_BEFORE` event.
fn open_session<'a>(
    event: &'a SensorEvent,
    snapshots: &[&'a SnapshotMeta],
) -> FoodInputSession<'a> {
    FoodInputSession {
        session_id: format!("session-{}", event.id),
        device_id: event.device_id.clone(),
        started_at: event.created_at,
        ended_at: None,
        before_event: event,
        after_event: None,
        processing_completed_event: None,
        before_snapshot: find_nearest_snapshot(
            snapshots,
            event.created_at,
            SnapshotTrigger::FoodInputBefore,
        ),
        after_snapshot: None,
        weight_change: WeightChange::with_before(event.weight()),
        status: SessionStatus::InProgress,
    }
}

/// Find the snapshot of the given trigger type closest to `target`.
///
/// `snapshots` must be sorted ascending; on an exact tie the earlier snapshot
/// wins. Snapshots more than `SNAPSHOT_MATCH_WINDOW_MS` away never match.
pub fn find_nearest_snapshot<'a>(
    snapshots: &[&'a SnapshotMeta],
    target: DateTime<Utc>,
    trigger: SnapshotTrigger,
) -> Option<&'a SnapshotMeta> {
    let mut best: Option<(&'a SnapshotMeta, i64)> = None;

    for snapshot in snapshots
        .iter()
        .copied()
        .filter(|s| s.trigger_type == Some(trigger))
    {
        let diff = abs_diff_millis(snapshot.created_at, target);
        if diff > SNAPSHOT_MATCH_WINDOW_MS {
            continue;
        }
        match best {
            Some((_, best_diff)) if diff >= best_diff => {}
            _ => best = Some((snapshot, diff)),
        }
    }

    best.map(|(snapshot, _)| snapshot)
}

/// Stable ascending sort by timestamp; equal timestamps keep input order.
fn sorted_by_time<T>(items: &[T], key: impl Fn(&T) -> DateTime<Utc>) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by_key(|item| key(*item));
    sorted
}
