//! Roster administration service
//!
//! Administrator-facing structural edits to a trip: the atomic batch
//! roster update, capacity changes, and the non-mutating overflow preview
//! shown before a capacity change is committed. Every structural edit runs
//! under the edit-revision guard so two administrators editing the same
//! trip can never silently clobber each other.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Settings;
use crate::database::{DatabasePool, DatabaseService};
use crate::itinerary::{self, ItineraryAccess};
use crate::models::{CreateSignupRequest, Trip};
use crate::roster::{CapacityChange, CapacityPreview, Roster, RosterUpdate, SignupRef};
use crate::utils::errors::{Result, TrailheadError};
use crate::utils::logging;

/// What a committed batch edit did, returned to the caller along with the
/// new revision to use for subsequent edits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterReceipt {
    pub trip_id: i64,
    pub edit_revision: i32,
    pub confirmed: usize,
    pub waitlisted: usize,
    pub deleted: usize,
}

/// Advisory description of a proposed capacity change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverflowPreview {
    pub direction: OverflowDirection,
    /// Affected participant ids, in promotion/displacement order
    pub participants: Vec<i64>,
    pub message: String,
    pub message_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowDirection {
    None,
    Promoted,
    Displaced,
}

/// One member of a roster snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterMember {
    pub signup_id: i64,
    pub participant_id: i64,
    pub name: String,
    pub email: String,
    pub order: Option<i32>,
    pub notes: Option<String>,
}

/// Ordered view of a trip's membership for the admin screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterSnapshot {
    pub trip_id: i64,
    pub edit_revision: i32,
    pub confirmed: Vec<RosterMember>,
    pub waitlisted: Vec<RosterMember>,
}

#[derive(Debug, Clone)]
pub struct RosterService {
    pool: DatabasePool,
    db: DatabaseService,
    settings: Settings,
}

impl RosterService {
    /// Create a new RosterService instance
    pub fn new(pool: DatabasePool, db: DatabaseService, settings: Settings) -> Self {
        Self { pool, db, settings }
    }

    /// Atomically re-derive a trip's membership from an administrator's
    /// ordered instruction list, optionally changing capacity in the same
    /// edit.
    ///
    /// The caller supplies the revision it believes the trip to be at; a
    /// mismatch aborts with `ConcurrentEdit` before anything is touched.
    /// Any validation failure rolls the transaction back, leaving the trip
    /// exactly as it was.
    pub async fn update_roster(
        &self,
        trip_id: i64,
        believed_revision: i32,
        update: &RosterUpdate,
        maximum_participants: Option<i32>,
    ) -> Result<RosterReceipt> {
        debug!(
            trip_id = trip_id,
            believed_revision = believed_revision,
            entries = update.entries.len(),
            "Applying batch roster update"
        );

        // New participants must exist before we mutate anything
        for entry in &update.entries {
            if let SignupRef::New { participant_id } = entry.signup {
                if !entry.remove && !self.db.participants.exists(participant_id).await? {
                    return Err(TrailheadError::ParticipantNotFound { participant_id });
                }
            }
        }

        let mut tx = self.pool.begin().await?;

        let trip = self
            .db
            .trips
            .find_for_update(&mut tx, trip_id)
            .await?
            .ok_or(TrailheadError::TripNotFound { trip_id })?;

        trip.check_revision(believed_revision).map_err(|err| {
            logging::log_concurrent_edit(trip_id, believed_revision, trip.edit_revision);
            err
        })?;

        let capacity = maximum_participants.unwrap_or(trip.maximum_participants);
        let capacity_changed = capacity != trip.maximum_participants;

        let signups = self.db.signups.list_for_trip(&mut tx, trip_id).await?;
        let roster = Roster::new(trip, signups)?;
        let outcome = roster.reconcile(update, capacity)?;

        for &signup_id in &outcome.deleted {
            self.db.signups.delete(&mut tx, signup_id).await?;
        }
        for placement in &outcome.placements {
            let signup_id = match placement.signup {
                SignupRef::Existing { signup_id } => signup_id,
                SignupRef::New { participant_id } => {
                    let created = self
                        .db
                        .signups
                        .create(
                            &mut tx,
                            CreateSignupRequest {
                                trip_id,
                                participant_id,
                                notes: None,
                            },
                        )
                        .await?;
                    created.id
                }
            };
            self.db
                .signups
                .set_placement(&mut tx, signup_id, placement.on_trip, Some(placement.order))
                .await?;
        }
        if capacity_changed {
            self.db
                .trips
                .set_maximum_participants(&mut tx, trip_id, capacity)
                .await?;
        }

        let edit_revision = self
            .db
            .trips
            .bump_revision(&mut tx, trip_id, believed_revision)
            .await?;

        tx.commit().await?;

        let receipt = RosterReceipt {
            trip_id,
            edit_revision,
            confirmed: outcome.confirmed().len(),
            waitlisted: outcome.waitlisted().len(),
            deleted: outcome.deleted.len(),
        };
        logging::log_roster_edit(
            trip_id,
            edit_revision,
            update.entries.len(),
            receipt.deleted,
        );
        Ok(receipt)
    }

    /// Pure advisory preview of a capacity change: who would be pulled off
    /// the waitlist, or who would lose their seat. No mutation, no
    /// revision bump.
    pub async fn preview_capacity_change(
        &self,
        trip_id: i64,
        proposed: i32,
    ) -> Result<OverflowPreview> {
        let trip = self
            .db
            .trips
            .find_by_id(trip_id)
            .await?
            .ok_or(TrailheadError::TripNotFound { trip_id })?;

        let mut conn = self.pool.acquire().await?;
        let signups = self.db.signups.list_for_trip(&mut conn, trip_id).await?;
        let roster = Roster::new(trip, signups)?;

        let (direction, signup_ids) = match roster.preview_capacity_change(proposed)? {
            CapacityPreview::Unchanged => (OverflowDirection::None, vec![]),
            CapacityPreview::Promoted(ids) => (OverflowDirection::Promoted, ids),
            CapacityPreview::Displaced(ids) => (OverflowDirection::Displaced, ids),
        };

        let mut participants = Vec::with_capacity(signup_ids.len());
        let mut names = Vec::with_capacity(signup_ids.len());
        for signup_id in signup_ids {
            let signup = roster
                .get(signup_id)
                .ok_or(TrailheadError::SignupNotFound { signup_id })?;
            participants.push(signup.participant_id);
            let name = match self.db.participants.find_by_id(signup.participant_id).await? {
                Some(participant) => participant.name,
                None => format!("participant {}", signup.participant_id),
            };
            names.push(name);
        }

        let (message, message_type) = match direction {
            OverflowDirection::None => (String::new(), String::new()),
            OverflowDirection::Promoted => (
                format!(
                    "Expanding to {} participants would pull {} off the waitlist.",
                    proposed,
                    names.join(", ")
                ),
                "info".to_string(),
            ),
            OverflowDirection::Displaced => (
                format!(
                    "Reducing the trip to {} participants would move {} to the waitlist.",
                    proposed,
                    names.join(", ")
                ),
                "warning".to_string(),
            ),
        };

        Ok(OverflowPreview {
            direction,
            participants,
            message,
            message_type,
        })
    }

    /// Change a trip's capacity, promoting or displacing signups exactly
    /// as the preview described, under the revision guard.
    pub async fn change_capacity(
        &self,
        trip_id: i64,
        believed_revision: i32,
        new_capacity: i32,
    ) -> Result<(i32, CapacityChange)> {
        let mut tx = self.pool.begin().await?;

        let trip = self
            .db
            .trips
            .find_for_update(&mut tx, trip_id)
            .await?
            .ok_or(TrailheadError::TripNotFound { trip_id })?;

        trip.check_revision(believed_revision).map_err(|err| {
            logging::log_concurrent_edit(trip_id, believed_revision, trip.edit_revision);
            err
        })?;

        let signups = self.db.signups.list_for_trip(&mut tx, trip_id).await?;
        let mut roster = Roster::new(trip, signups)?;
        let change = roster.apply_capacity_change(new_capacity)?;

        // Placements and waitlist orders may have shifted for any entry;
        // write the whole (small) roster back
        for signup in roster.signups() {
            self.db
                .signups
                .set_placement(&mut tx, signup.id, signup.on_trip, signup.order)
                .await?;
        }
        self.db
            .trips
            .set_maximum_participants(&mut tx, trip_id, new_capacity)
            .await?;

        let edit_revision = self
            .db
            .trips
            .bump_revision(&mut tx, trip_id, believed_revision)
            .await?;

        tx.commit().await?;

        debug!(
            trip_id = trip_id,
            new_capacity = new_capacity,
            promoted = change.promoted.len(),
            displaced = change.displaced.len(),
            "Capacity change committed"
        );
        Ok((edit_revision, change))
    }

    /// Ordered membership view for the admin screen: confirmed signups
    /// first, then the waitlist.
    pub async fn roster_snapshot(&self, trip_id: i64) -> Result<RosterSnapshot> {
        let trip = self
            .db
            .trips
            .find_by_id(trip_id)
            .await?
            .ok_or(TrailheadError::TripNotFound { trip_id })?;
        let edit_revision = trip.edit_revision;

        let mut conn = self.pool.acquire().await?;
        let signups = self.db.signups.list_for_trip(&mut conn, trip_id).await?;
        let roster = Roster::new(trip, signups)?;

        let mut confirmed = Vec::new();
        let mut waitlisted = Vec::new();
        for signup in roster.derived_order() {
            let name_email = match self.db.participants.find_by_id(signup.participant_id).await? {
                Some(p) => (p.name, p.email),
                None => (format!("participant {}", signup.participant_id), String::new()),
            };
            let member = RosterMember {
                signup_id: signup.id,
                participant_id: signup.participant_id,
                name: name_email.0,
                email: name_email.1,
                order: signup.order,
                notes: signup.notes.clone(),
            };
            if signup.on_trip {
                confirmed.push(member);
            } else {
                waitlisted.push(member);
            }
        }

        Ok(RosterSnapshot {
            trip_id,
            edit_revision,
            confirmed,
            waitlisted,
        })
    }

    /// Visibility of the trip's itinerary detail as of `today`, per the
    /// configured grace period
    pub fn itinerary_access(&self, trip: &Trip, today: NaiveDate) -> ItineraryAccess {
        itinerary::itinerary_access(
            trip.trip_date,
            today,
            self.settings.trips.itinerary_grace_days,
        )
    }
}
