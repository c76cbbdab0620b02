//! Participant model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Participant {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Capability input from the external authorization collaborator:
    /// leaders may administer rosters and bypass the signups-open check.
    pub is_leader: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateParticipantRequest {
    pub name: String,
    pub email: String,
    pub is_leader: bool,
}
