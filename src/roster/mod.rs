//! In-memory roster core
//!
//! This module contains the pure signup/waitlist state machine for one trip:
//! capacity-based admission, waitlist ordering, the batch reconciler used by
//! trip administrators, and lottery-pairing rank synchronization. All of it
//! operates on models loaded from the store; services apply the results
//! back inside a transaction.

pub mod admission;
pub mod pairing;
pub mod reconcile;
pub mod waitlist;

pub use admission::{CapacityChange, CapacityPreview, Seat, Withdrawal};
pub use pairing::{is_reciprocal, rank_signups, sync_paired_orders, OrderSync, RankUpdate};
pub use reconcile::{Placement, ReconcileOutcome, RosterEntry, RosterUpdate, SignupRef};

use crate::models::{Signup, Trip};
use crate::utils::errors::{Result, TrailheadError};

/// One trip's full membership state: the trip itself plus every signup,
/// confirmed and waitlisted.
#[derive(Debug, Clone)]
pub struct Roster {
    trip: Trip,
    signups: Vec<Signup>,
}

impl Roster {
    /// Build a roster from a trip and its signups.
    ///
    /// Signups belonging to a different trip are rejected rather than
    /// silently ignored.
    pub fn new(trip: Trip, signups: Vec<Signup>) -> Result<Self> {
        if let Some(stray) = signups.iter().find(|s| s.trip_id != trip.id) {
            return Err(TrailheadError::InvalidInput(format!(
                "signup {} belongs to trip {}, not trip {}",
                stray.id, stray.trip_id, trip.id
            )));
        }
        Ok(Self { trip, signups })
    }

    pub fn trip(&self) -> &Trip {
        &self.trip
    }

    pub fn signups(&self) -> &[Signup] {
        &self.signups
    }

    pub fn capacity(&self) -> i32 {
        self.trip.maximum_participants
    }

    /// Confirmed signups in admission-priority order
    pub fn confirmed(&self) -> Vec<&Signup> {
        let mut on_trip: Vec<&Signup> = self.signups.iter().filter(|s| s.on_trip).collect();
        on_trip.sort_by_key(|s| waitlist::order_key(s));
        on_trip
    }

    pub fn confirmed_count(&self) -> usize {
        self.signups.iter().filter(|s| s.on_trip).count()
    }

    pub fn get(&self, signup_id: i64) -> Option<&Signup> {
        self.signups.iter().find(|s| s.id == signup_id)
    }

    pub(crate) fn get_mut(&mut self, signup_id: i64) -> Option<&mut Signup> {
        self.signups.iter_mut().find(|s| s.id == signup_id)
    }

    pub fn contains_participant(&self, participant_id: i64) -> bool {
        self.signups.iter().any(|s| s.participant_id == participant_id)
    }

    pub fn signup_for_participant(&self, participant_id: i64) -> Option<&Signup> {
        self.signups.iter().find(|s| s.participant_id == participant_id)
    }

    /// The full roster in derived order: confirmed signups first, then the
    /// waitlist. This is the order administrators see and edit.
    pub fn derived_order(&self) -> Vec<&Signup> {
        let mut all = self.confirmed();
        all.extend(self.waitlist());
        all
    }

    pub(crate) fn remove_signup(&mut self, signup_id: i64) -> Option<Signup> {
        let idx = self.signups.iter().position(|s| s.id == signup_id)?;
        Some(self.signups.remove(idx))
    }

    pub(crate) fn trip_mut(&mut self) -> &mut Trip {
        &mut self.trip
    }
}
