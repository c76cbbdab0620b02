//! Trip model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::errors::TrailheadError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub trip_date: NaiveDate,
    pub maximum_participants: i32,
    pub algorithm: String,
    pub signups_open: bool,
    /// Incremented on every successful structural edit, to reject
    /// simultaneous edits to the same trip. Never decremented or reset.
    pub edit_revision: i32,
    pub creator_id: Option<i64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTripRequest {
    pub name: String,
    pub description: Option<String>,
    pub trip_date: NaiveDate,
    pub maximum_participants: i32,
    pub algorithm: TripAlgorithm,
    pub signups_open: bool,
    pub creator_id: Option<i64>,
    pub notes: Option<String>,
}

/// How participants are admitted to a trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripAlgorithm {
    FirstComeFirstServed,
    Lottery,
}

impl TripAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripAlgorithm::FirstComeFirstServed => "fcfs",
            TripAlgorithm::Lottery => "lottery",
        }
    }
}

impl std::fmt::Display for TripAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Trip {
    pub fn is_lottery(&self) -> bool {
        self.algorithm == TripAlgorithm::Lottery.as_str()
    }

    /// Reject a structural edit based on a stale view of the trip. Callers
    /// pass the revision they last read; any mismatch means another edit
    /// committed in between and this one must be retried from fresh state.
    pub fn check_revision(&self, believed: i32) -> Result<(), TrailheadError> {
        if self.edit_revision == believed {
            Ok(())
        } else {
            Err(TrailheadError::ConcurrentEdit {
                trip_id: self.id,
                expected: believed,
                actual: self.edit_revision,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn trip_at_revision(edit_revision: i32) -> Trip {
        let created = Utc::now();
        Trip {
            id: 1,
            name: "Test trip".to_string(),
            description: None,
            trip_date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            maximum_participants: 8,
            algorithm: TripAlgorithm::FirstComeFirstServed.as_str().to_string(),
            signups_open: true,
            edit_revision,
            creator_id: None,
            notes: None,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn matching_revision_passes() {
        assert!(trip_at_revision(3).check_revision(3).is_ok());
    }

    #[test]
    fn stale_revision_is_rejected_with_both_values() {
        // The editor read revision 2, then someone else committed
        assert_matches!(
            trip_at_revision(3).check_revision(2),
            Err(TrailheadError::ConcurrentEdit {
                trip_id: 1,
                expected: 2,
                actual: 3,
            })
        );
    }

    #[test]
    fn each_committed_edit_moves_the_check_forward_by_one() {
        let mut trip = trip_at_revision(0);
        assert!(trip.check_revision(0).is_ok());
        trip.edit_revision += 1;
        assert!(trip.check_revision(0).is_err());
        assert!(trip.check_revision(1).is_ok());
    }
}
