//! Lottery pairing model
//!
//! A directed pairing request from one participant to another. The pairing
//! is reciprocal only when the target's own record points back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LotteryInfo {
    pub id: i64,
    pub participant_id: i64,
    /// Lookup edge, not ownership. `None` means no pairing requested.
    pub paired_with: Option<i64>,
    pub updated_at: DateTime<Utc>,
}
