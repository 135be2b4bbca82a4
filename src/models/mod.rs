// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod auth;
pub mod envelope;
pub mod event;
pub mod session;
pub mod snapshot;

pub use auth::{AuthTokens, TokenPair};
pub use envelope::ApiEnvelope;
pub use event::{EventKind, RecordId, SensorEvent};
pub use session::{FoodInputSession, SessionStatus, WeightChange};
pub use snapshot::{SnapshotMeta, SnapshotTrigger};
