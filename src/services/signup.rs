//! Signup service implementation
//!
//! Participant self-service: signing up for a trip and withdrawing from
//! one. Each operation runs inside a single transaction so the ledger
//! mutation and its admission side effect commit together; a withdraw that
//! frees a seat and the resulting waitlist promotion are one indivisible
//! step.

use tracing::{debug, info};

use crate::database::{DatabasePool, DatabaseService};
use crate::models::{CreateSignupRequest, Signup};
use crate::roster::{Roster, Seat, Withdrawal};
use crate::utils::errors::{Result, TrailheadError};
use crate::utils::logging;

#[derive(Debug, Clone)]
pub struct SignupService {
    pool: DatabasePool,
    db: DatabaseService,
}

impl SignupService {
    /// Create a new SignupService instance
    pub fn new(pool: DatabasePool, db: DatabaseService) -> Self {
        Self { pool, db }
    }

    /// Sign a participant up for a trip and place them against capacity.
    ///
    /// Fails with `AlreadySignedUp` when the pair already has a signup and
    /// with `SignupsClosed` when signups are closed, unless
    /// `as_administrator` holds (leaders may add people to closed trips).
    pub async fn create(
        &self,
        request: CreateSignupRequest,
        as_administrator: bool,
    ) -> Result<(Signup, Seat)> {
        debug!(
            trip_id = request.trip_id,
            participant_id = request.participant_id,
            "Creating signup"
        );

        if !self.db.participants.exists(request.participant_id).await? {
            return Err(TrailheadError::ParticipantNotFound {
                participant_id: request.participant_id,
            });
        }

        let mut tx = self.pool.begin().await?;

        let trip = self
            .db
            .trips
            .find_for_update(&mut tx, request.trip_id)
            .await?
            .ok_or(TrailheadError::TripNotFound {
                trip_id: request.trip_id,
            })?;

        if !trip.signups_open && !as_administrator {
            return Err(TrailheadError::SignupsClosed { trip_id: trip.id });
        }

        let mut signups = self.db.signups.list_for_trip(&mut tx, trip.id).await?;
        if signups
            .iter()
            .any(|s| s.participant_id == request.participant_id)
        {
            return Err(TrailheadError::AlreadySignedUp {
                participant_id: request.participant_id,
                trip_id: trip.id,
            });
        }

        let signup = self.db.signups.create(&mut tx, request).await?;
        signups.push(signup.clone());

        let mut roster = Roster::new(trip, signups)?;
        let seat = roster.place(signup.id)?;
        let (on_trip, order) = match seat {
            Seat::Confirmed => (true, None),
            Seat::Waitlisted { order } => (false, Some(order)),
        };
        self.db
            .signups
            .set_placement(&mut tx, signup.id, on_trip, order)
            .await?;
        // Appending can renumber waitlist entries that had no explicit
        // order yet; persist those ranks alongside the new signup's
        if !on_trip {
            let renumbered: Vec<(i64, Option<i32>)> = roster
                .waitlist()
                .iter()
                .filter(|s| s.id != signup.id)
                .map(|s| (s.id, s.order))
                .collect();
            for (id, order) in renumbered {
                self.db.signups.set_order(&mut tx, id, order).await?;
            }
        }

        tx.commit().await?;

        let action = if on_trip { "confirmed" } else { "waitlisted" };
        logging::log_signup_action(signup.trip_id, signup.participant_id, action, None);

        Ok((
            Signup {
                on_trip,
                order,
                ..signup
            },
            seat,
        ))
    }

    /// Withdraw a signup. When the withdrawn signup was confirmed, the
    /// waitlist head is promoted into the freed seat within the same
    /// transaction.
    pub async fn withdraw(&self, signup_id: i64) -> Result<Withdrawal> {
        let signup = self
            .db
            .signups
            .find_by_id(signup_id)
            .await?
            .ok_or(TrailheadError::SignupNotFound { signup_id })?;

        let mut tx = self.pool.begin().await?;

        let trip = self
            .db
            .trips
            .find_for_update(&mut tx, signup.trip_id)
            .await?
            .ok_or(TrailheadError::TripNotFound {
                trip_id: signup.trip_id,
            })?;

        let signups = self.db.signups.list_for_trip(&mut tx, trip.id).await?;
        let mut roster = Roster::new(trip, signups)?;
        let withdrawal = roster.withdraw(signup_id, true)?;

        self.db.signups.delete(&mut tx, signup_id).await?;
        if let Some(promoted) = withdrawal.promoted {
            self.db
                .signups
                .set_placement(&mut tx, promoted, true, None)
                .await?;
        }

        tx.commit().await?;

        logging::log_signup_action(signup.trip_id, signup.participant_id, "withdrawn", None);
        if let Some(promoted) = withdrawal.promoted {
            info!(
                trip_id = signup.trip_id,
                signup_id = promoted,
                "Waitlist head promoted after withdrawal"
            );
        }

        Ok(withdrawal)
    }
}
