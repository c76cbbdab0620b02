//! Signup model
//!
//! One participant's registration record for one trip. At most one signup
//! exists per (participant, trip) pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Signup {
    pub id: i64,
    pub trip_id: i64,
    pub participant_id: i64,
    /// Whether this signup counts against the trip's capacity
    pub on_trip: bool,
    /// Ordering key: waitlist position, or the personal rank used by
    /// lottery trips. Absent for signups placed before ranks were assigned;
    /// `time_created` then decides FIFO order.
    pub order: Option<i32>,
    pub time_created: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSignupRequest {
    pub trip_id: i64,
    pub participant_id: i64,
    pub notes: Option<String>,
}
