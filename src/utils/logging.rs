//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging
//! utilities for the Trailhead application.

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "trailhead.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(())
}

/// Log signup actions with structured data
pub fn log_signup_action(trip_id: i64, participant_id: i64, action: &str, details: Option<&str>) {
    info!(
        trip_id = trip_id,
        participant_id = participant_id,
        action = action,
        details = details,
        "Signup action performed"
    );
}

/// Log roster edits applied by trip administrators
pub fn log_roster_edit(trip_id: i64, revision: i32, entries: usize, deleted: usize) {
    info!(
        trip_id = trip_id,
        revision = revision,
        entries = entries,
        deleted = deleted,
        "Roster edit committed"
    );
}

/// Log a rejected concurrent edit
pub fn log_concurrent_edit(trip_id: i64, expected: i32, actual: i32) {
    warn!(
        trip_id = trip_id,
        expected = expected,
        actual = actual,
        "Concurrent trip edit rejected"
    );
}

/// Log lottery pairing events
pub fn log_pairing(participant_id: i64, paired_with: Option<i64>, reciprocal: bool) {
    info!(
        participant_id = participant_id,
        paired_with = paired_with,
        reciprocal = reciprocal,
        "Lottery pairing updated"
    );
}
