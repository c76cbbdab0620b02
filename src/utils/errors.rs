//! Error handling for Trailhead
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for Trailhead operations
#[derive(Error, Debug)]
pub enum TrailheadError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Trip not found: {trip_id}")]
    TripNotFound { trip_id: i64 },

    #[error("Signup not found: {signup_id}")]
    SignupNotFound { signup_id: i64 },

    #[error("Participant not found: {participant_id}")]
    ParticipantNotFound { participant_id: i64 },

    #[error("Participant {participant_id} is already signed up for trip {trip_id}")]
    AlreadySignedUp { participant_id: i64, trip_id: i64 },

    #[error("Signups are not open for trip {trip_id}")]
    SignupsClosed { trip_id: i64 },

    #[error("Participants cannot pair with themselves")]
    SelfPairing,

    #[error("Trip {trip_id} was edited concurrently (expected revision {expected}, found {actual})")]
    ConcurrentEdit {
        trip_id: i64,
        expected: i32,
        actual: i32,
    },

    #[error("Invalid trip capacity: {capacity}")]
    CapacityValidation { capacity: i32 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Trailhead operations
pub type Result<T> = std::result::Result<T, TrailheadError>;

impl TrailheadError {
    /// Check if the error is recoverable by retrying from a fresh read
    pub fn is_recoverable(&self) -> bool {
        match self {
            // The caller must re-fetch the trip and resubmit
            TrailheadError::ConcurrentEdit { .. } => true,
            // The store's own rollback guarantees no partial state persisted
            TrailheadError::Database(_) => true,
            TrailheadError::Migration(_) => false,
            TrailheadError::Config(_) => false,
            TrailheadError::TripNotFound { .. } => false,
            TrailheadError::SignupNotFound { .. } => false,
            TrailheadError::ParticipantNotFound { .. } => false,
            TrailheadError::AlreadySignedUp { .. } => false,
            TrailheadError::SignupsClosed { .. } => false,
            TrailheadError::SelfPairing => false,
            TrailheadError::CapacityValidation { .. } => false,
            TrailheadError::Serialization(_) => false,
            TrailheadError::InvalidInput(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TrailheadError::Database(_) => ErrorSeverity::Critical,
            TrailheadError::Migration(_) => ErrorSeverity::Critical,
            TrailheadError::Config(_) => ErrorSeverity::Critical,
            TrailheadError::ConcurrentEdit { .. } => ErrorSeverity::Warning,
            TrailheadError::SignupsClosed { .. } => ErrorSeverity::Info,
            TrailheadError::AlreadySignedUp { .. } => ErrorSeverity::Info,
            TrailheadError::SelfPairing => ErrorSeverity::Info,
            TrailheadError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concurrent_edit_is_recoverable() {
        let err = TrailheadError::ConcurrentEdit {
            trip_id: 1,
            expected: 3,
            actual: 4,
        };
        assert!(err.is_recoverable());
        assert_eq!(err.severity(), ErrorSeverity::Warning);
    }

    #[test]
    fn validation_errors_are_not_recoverable() {
        let err = TrailheadError::CapacityValidation { capacity: 0 };
        assert!(!err.is_recoverable());
    }
}
