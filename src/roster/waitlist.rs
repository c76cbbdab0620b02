//! Waitlist ordering
//!
//! The waitlist is a derived total order over a trip's non-confirmed
//! signups: explicit `order` ascending when present, otherwise first-come
//! first-served by `time_created`, with the signup id as a final tie-break
//! so no two entries ever compare equal.

use chrono::{DateTime, Utc};

use super::Roster;
use crate::models::Signup;
use crate::utils::errors::{Result, TrailheadError};

/// Sort key implementing the waitlist order. Signups without an explicit
/// order sort after every ranked entry, oldest first.
pub(crate) fn order_key(signup: &Signup) -> (i32, DateTime<Utc>, i64) {
    (
        signup.order.unwrap_or(i32::MAX),
        signup.time_created,
        signup.id,
    )
}

impl Roster {
    /// The waitlisted signups in order. The returned view is rebuilt on
    /// every call, so it always reflects the current state.
    pub fn waitlist(&self) -> Vec<&Signup> {
        let mut waiting: Vec<&Signup> = self.signups().iter().filter(|s| !s.on_trip).collect();
        waiting.sort_by_key(|s| order_key(s));
        waiting
    }

    /// Renumber every waitlisted signup with dense sequential orders in
    /// the current waitlist order, returning the position assigned to
    /// `signup_id`. Entries without an explicit order (legacy rows, or a
    /// signup placed just now) are ranked by their FIFO position, so a
    /// fresh signup always lands behind everyone already waiting.
    pub(crate) fn renumber_waitlist(&mut self, signup_id: i64) -> i32 {
        let waiting: Vec<i64> = self.waitlist().iter().map(|s| s.id).collect();
        let mut assigned = 0;
        for (position, id) in waiting.into_iter().enumerate() {
            if id == signup_id {
                assigned = position as i32;
            }
            if let Some(signup) = self.get_mut(id) {
                signup.order = Some(position as i32);
            }
        }
        assigned
    }

    /// Move a waitlisted signup to `target_position` in the waitlist, then
    /// renumber every waitlisted entry with dense sequential orders so the
    /// resulting order is strict. Positions beyond the tail clamp to it.
    pub fn reorder(&mut self, signup_id: i64, target_position: usize) -> Result<()> {
        let mut waiting: Vec<i64> = self.waitlist().iter().map(|s| s.id).collect();
        let current = waiting
            .iter()
            .position(|&id| id == signup_id)
            .ok_or(TrailheadError::SignupNotFound { signup_id })?;

        waiting.remove(current);
        let target = target_position.min(waiting.len());
        waiting.insert(target, signup_id);

        for (position, id) in waiting.into_iter().enumerate() {
            if let Some(signup) = self.get_mut(id) {
                signup.order = Some(position as i32);
            }
        }
        Ok(())
    }
}
