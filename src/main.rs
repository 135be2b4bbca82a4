// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hanibi session inspector
//!
//! Signs in, fetches a device's events and camera snapshots, and prints the
//! reconstructed food input sessions as JSON.
//!
//! Usage: `hanibi-client [--watch] <device-id>`
//!
//! With `--watch` the device is polled every `HANIBI_POLL_INTERVAL_SECS` and
//! the sessions are printed after each successful poll, until Ctrl+C.

use hanibi_client::{
    config::{Config, Credentials},
    models::FoodInputSession,
    services::FeedUpdate,
    AppState,
};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    let mut watch = false;
    let mut device_id = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--watch" | "-w" => watch = true,
            _ => device_id = Some(arg),
        }
    }
    let device_id = device_id
        .or_else(|| std::env::var("HANIBI_DEVICE_ID").ok())
        .ok_or("usage: hanibi-client [--watch] <device-id> (or set HANIBI_DEVICE_ID)")?;

    // Load configuration from environment
    let config = Config::from_env()?;
    let state = AppState::new(config)?;

    match Credentials::from_env()? {
        Credentials::Tokens { access, refresh } => {
            state.auth_store.set_tokens(access, refresh);
        }
        Credentials::Password { email, password } => {
            state.login(&email, &password).await?;
        }
    }

    if watch {
        return watch_device(&state, &device_id).await;
    }

    tracing::info!(device_id = %device_id, "Fetching food sessions");
    let feed = state.food_sessions.fetch(&device_id).await?;
    print_sessions(&feed.sessions())?;
    Ok(())
}

/// Poll until interrupted or until the session is lost.
async fn watch_device(
    state: &AppState,
    device_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let interval = Duration::from_secs(state.config.poll_interval_secs);
    tracing::info!(device_id = %device_id, ?interval, "Watching food sessions");

    let (mut updates, handle) = state.food_sessions.spawn_polling(device_id, interval);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received shutdown signal");
                handle.abort();
                return Ok(());
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    // Poller exited after an auth failure
                    break;
                }
            }
        }

        let update = updates.borrow_and_update().clone();
        match update {
            FeedUpdate::Pending => {}
            FeedUpdate::Ready(feed) => print_sessions(&feed.sessions())?,
            FeedUpdate::Failed(e) if e.is_auth_failure() => {
                return Err(format!("signed out: {e}").into());
            }
            FeedUpdate::Failed(_) => {}
        }
    }

    Err("session polling stopped".into())
}

fn print_sessions(sessions: &[FoodInputSession<'_>]) -> Result<(), serde_json::Error> {
    tracing::info!(
        sessions = sessions.len(),
        in_progress = sessions.iter().filter(|s| !s.is_completed()).count(),
        "Sessions rebuilt"
    );

    println!("{}", serde_json::to_string_pretty(sessions)?);
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true)
        .with_writer(std::io::stderr);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hanibi_client=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
