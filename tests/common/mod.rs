//! Shared builders for integration tests

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use trailhead::models::{Signup, Trip, TripAlgorithm};
use trailhead::roster::{Roster, RosterEntry, SignupRef};

pub fn trip(id: i64, maximum_participants: i32) -> Trip {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    Trip {
        id,
        name: format!("Trip {id}"),
        description: None,
        trip_date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        maximum_participants,
        algorithm: TripAlgorithm::FirstComeFirstServed.as_str().to_string(),
        signups_open: true,
        edit_revision: 0,
        creator_id: None,
        notes: None,
        created_at: created,
        updated_at: created,
    }
}

pub fn signup(id: i64, trip_id: i64, participant_id: i64, on_trip: bool) -> Signup {
    // Later ids signed up later, so FIFO order follows id order
    let base = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();
    Signup {
        id,
        trip_id,
        participant_id,
        on_trip,
        order: None,
        time_created: base + Duration::minutes(id),
        notes: None,
    }
}

/// Capacity 2, confirmed [10, 11], waitlisted [12, 13]
pub fn example_roster() -> Roster {
    Roster::new(
        trip(1, 2),
        vec![
            signup(10, 1, 100, true),
            signup(11, 1, 101, true),
            signup(12, 1, 102, false),
            signup(13, 1, 103, false),
        ],
    )
    .unwrap()
}

pub fn keep(signup_id: i64) -> RosterEntry {
    RosterEntry {
        signup: SignupRef::Existing { signup_id },
        remove: false,
    }
}

pub fn remove(signup_id: i64) -> RosterEntry {
    RosterEntry {
        signup: SignupRef::Existing { signup_id },
        remove: true,
    }
}

pub fn existing(signup_id: i64) -> SignupRef {
    SignupRef::Existing { signup_id }
}
