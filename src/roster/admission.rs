//! Capacity-based admission
//!
//! Decides confirmed-vs-waitlisted placement for a trip, promotes the
//! waitlist head when a seat frees up, and computes the effect of capacity
//! changes before and after they are applied.

use serde::{Deserialize, Serialize};

use super::Roster;
use crate::utils::errors::{Result, TrailheadError};

/// Where a signup landed after placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    Confirmed,
    Waitlisted { order: i32 },
}

/// Outcome of withdrawing a signup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Withdrawal {
    pub was_on_trip: bool,
    /// Signup promoted from the waitlist head to fill the freed seat
    pub promoted: Option<i64>,
}

/// Non-mutating description of what a capacity change would do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapacityPreview {
    Unchanged,
    /// Waitlisted signups that would be confirmed, in promotion order
    Promoted(Vec<i64>),
    /// Confirmed signups that would be moved to the waitlist, lowest
    /// admission priority first
    Displaced(Vec<i64>),
}

/// Signups actually moved by an applied capacity change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityChange {
    pub promoted: Vec<i64>,
    pub displaced: Vec<i64>,
}

impl Roster {
    /// Place a signup against the trip's capacity: confirmed while seats
    /// remain, otherwise appended to the waitlist tail with an explicit
    /// order. Placing an already-confirmed signup is a no-op.
    ///
    /// The signups-open check belongs to the caller; administrators bypass
    /// it, participants do not.
    pub fn place(&mut self, signup_id: i64) -> Result<Seat> {
        let has_seat = self.confirmed_count() < self.capacity() as usize;

        let signup = self
            .get_mut(signup_id)
            .ok_or(TrailheadError::SignupNotFound { signup_id })?;

        if signup.on_trip {
            return Ok(Seat::Confirmed);
        }
        if has_seat {
            signup.on_trip = true;
            signup.order = None;
            Ok(Seat::Confirmed)
        } else {
            let order = self.renumber_waitlist(signup_id);
            Ok(Seat::Waitlisted { order })
        }
    }

    /// Confirm the waitlist head, returning its signup id, or `None` when
    /// the waitlist is empty.
    pub fn promote_head(&mut self) -> Option<i64> {
        let head = self.waitlist().first().map(|s| s.id)?;
        let signup = self.get_mut(head)?;
        signup.on_trip = true;
        signup.order = None;
        Some(head)
    }

    /// Delete a signup. When the withdrawn signup was confirmed and
    /// `promote` holds, the waitlist head fills the freed seat. The batch
    /// reconciler re-derives membership wholesale and never promotes here.
    pub fn withdraw(&mut self, signup_id: i64, promote: bool) -> Result<Withdrawal> {
        let removed = self
            .remove_signup(signup_id)
            .ok_or(TrailheadError::SignupNotFound { signup_id })?;

        let promoted = if removed.on_trip && promote {
            self.promote_head()
        } else {
            None
        };
        Ok(Withdrawal {
            was_on_trip: removed.on_trip,
            promoted,
        })
    }

    /// Pure preview of a capacity change: who would be promoted on growth,
    /// who would be displaced on shrink. Nothing is mutated.
    pub fn preview_capacity_change(&self, proposed: i32) -> Result<CapacityPreview> {
        if proposed < 1 {
            return Err(TrailheadError::CapacityValidation { capacity: proposed });
        }

        let confirmed = self.confirmed();
        let seats = proposed as usize;
        if seats > confirmed.len() {
            let open = seats - confirmed.len();
            let promoted: Vec<i64> = self.waitlist().iter().take(open).map(|s| s.id).collect();
            if promoted.is_empty() {
                return Ok(CapacityPreview::Unchanged);
            }
            return Ok(CapacityPreview::Promoted(promoted));
        }

        let displaced: Vec<i64> = confirmed[seats..].iter().map(|s| s.id).collect();
        if displaced.is_empty() {
            Ok(CapacityPreview::Unchanged)
        } else {
            Ok(CapacityPreview::Displaced(displaced))
        }
    }

    /// Change the trip's capacity and promote or displace signups per the
    /// preview. Displaced signups join the waitlist ahead of everyone
    /// already waiting, keeping their relative order. The caller commits
    /// this together with the edit-revision bump.
    pub fn apply_capacity_change(&mut self, new_capacity: i32) -> Result<CapacityChange> {
        let preview = self.preview_capacity_change(new_capacity)?;
        self.trip_mut().maximum_participants = new_capacity;

        match preview {
            CapacityPreview::Unchanged => Ok(CapacityChange {
                promoted: vec![],
                displaced: vec![],
            }),
            CapacityPreview::Promoted(ids) => {
                for &id in &ids {
                    if let Some(signup) = self.get_mut(id) {
                        signup.on_trip = true;
                        signup.order = None;
                    }
                }
                Ok(CapacityChange {
                    promoted: ids,
                    displaced: vec![],
                })
            }
            CapacityPreview::Displaced(ids) => {
                for &id in &ids {
                    if let Some(signup) = self.get_mut(id) {
                        signup.on_trip = false;
                        signup.order = None;
                    }
                }
                // Renumber with the displaced at the head of the waitlist
                let mut waiting: Vec<i64> = ids.clone();
                waiting.extend(
                    self.waitlist()
                        .iter()
                        .map(|s| s.id)
                        .filter(|id| !ids.contains(id)),
                );
                for (position, id) in waiting.into_iter().enumerate() {
                    if let Some(signup) = self.get_mut(id) {
                        signup.order = Some(position as i32);
                    }
                }
                Ok(CapacityChange {
                    promoted: vec![],
                    displaced: ids,
                })
            }
        }
    }
}
