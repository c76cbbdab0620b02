//! Batch roster reconciliation
//!
//! An administrator submits the desired final roster as one ordered list of
//! instructions. Instead of diffing adds/removes/reorders against the
//! current state, membership is re-derived from scratch: every confirmed
//! signup is cleared, removals are applied, and the survivors are re-placed
//! in the supplied order. Confirmation becomes a pure function of position,
//! which stays consistent no matter how far the submitted order strays from
//! the stored one.
//!
//! Validation happens before anything is touched; the caller applies the
//! outcome inside a single transaction, so a failed batch leaves the trip
//! exactly as it was.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::Roster;
use crate::utils::errors::{Result, TrailheadError};

/// Reference to a roster entry: an existing signup, or a participant being
/// added by the administrator who has no signup yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignupRef {
    Existing { signup_id: i64 },
    New { participant_id: i64 },
}

/// One instruction in the administrator's ordered list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub signup: SignupRef,
    #[serde(default)]
    pub remove: bool,
}

/// The full batch-edit request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterUpdate {
    pub entries: Vec<RosterEntry>,
}

/// Final placement for one surviving entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub signup: SignupRef,
    pub on_trip: bool,
    pub order: i32,
}

/// Everything a reconciliation decided, ready to be written back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Surviving entries in final order: instructed entries first, then
    /// signups the administrator omitted, in their previous roster order
    pub placements: Vec<Placement>,
    /// Signup ids deleted by `remove` instructions
    pub deleted: Vec<i64>,
}

impl ReconcileOutcome {
    /// Signup refs that ended up confirmed, in order
    pub fn confirmed(&self) -> Vec<SignupRef> {
        self.placements
            .iter()
            .filter(|p| p.on_trip)
            .map(|p| p.signup)
            .collect()
    }

    /// Signup refs that ended up waitlisted, in order
    pub fn waitlisted(&self) -> Vec<SignupRef> {
        self.placements
            .iter()
            .filter(|p| !p.on_trip)
            .map(|p| p.signup)
            .collect()
    }
}

impl Roster {
    /// Re-derive the trip's entire membership from an ordered instruction
    /// list, against `capacity` seats.
    ///
    /// The first `capacity` surviving entries (in instruction order) come
    /// out confirmed; the rest are waitlisted in that same relative order.
    /// Signups omitted from the instructions are kept, appended after the
    /// instructed entries in their previous roster order, and placed by the
    /// same positional rule. Removing a participant who never signed up is
    /// skipped, not an error.
    ///
    /// This is a pure computation; no signup is mutated here.
    pub fn reconcile(&self, update: &RosterUpdate, capacity: i32) -> Result<ReconcileOutcome> {
        if capacity < 1 {
            return Err(TrailheadError::CapacityValidation { capacity });
        }

        let mut referenced: HashSet<i64> = HashSet::new();
        let mut survivors: Vec<SignupRef> = Vec::new();
        let mut surviving_participants: HashSet<i64> = HashSet::new();
        let mut deleted: Vec<i64> = Vec::new();

        for entry in &update.entries {
            match entry.signup {
                SignupRef::Existing { signup_id } => {
                    let signup = self
                        .get(signup_id)
                        .ok_or(TrailheadError::SignupNotFound { signup_id })?;
                    if !referenced.insert(signup_id) {
                        return Err(TrailheadError::InvalidInput(format!(
                            "signup {signup_id} referenced more than once"
                        )));
                    }
                    if entry.remove {
                        deleted.push(signup_id);
                    } else {
                        if !surviving_participants.insert(signup.participant_id) {
                            return Err(TrailheadError::AlreadySignedUp {
                                participant_id: signup.participant_id,
                                trip_id: self.trip().id,
                            });
                        }
                        survivors.push(entry.signup);
                    }
                }
                SignupRef::New { participant_id } => {
                    // No point creating a signup only to remove it
                    if entry.remove {
                        continue;
                    }
                    if !surviving_participants.insert(participant_id) {
                        return Err(TrailheadError::AlreadySignedUp {
                            participant_id,
                            trip_id: self.trip().id,
                        });
                    }
                    survivors.push(entry.signup);
                }
            }
        }

        // A participant added as new while their existing signup survives
        // (or was simply omitted) would break the one-signup-per-pair rule
        for signup_ref in &survivors {
            if let SignupRef::New { participant_id } = *signup_ref {
                if let Some(existing) = self.signup_for_participant(participant_id) {
                    if !deleted.contains(&existing.id) {
                        return Err(TrailheadError::AlreadySignedUp {
                            participant_id,
                            trip_id: self.trip().id,
                        });
                    }
                }
            }
        }

        // Omitted signups keep their seat in line after the instructed ones
        let omitted: Vec<SignupRef> = self
            .derived_order()
            .into_iter()
            .filter(|s| !referenced.contains(&s.id))
            .map(|s| SignupRef::Existing { signup_id: s.id })
            .collect();

        let placements: Vec<Placement> = survivors
            .into_iter()
            .chain(omitted)
            .enumerate()
            .map(|(position, signup)| Placement {
                signup,
                on_trip: position < capacity as usize,
                order: position as i32,
            })
            .collect();

        Ok(ReconcileOutcome {
            placements,
            deleted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{signup, trip};
    use super::super::Roster;
    use super::*;
    use assert_matches::assert_matches;

    fn keep(signup_id: i64) -> RosterEntry {
        RosterEntry {
            signup: SignupRef::Existing { signup_id },
            remove: false,
        }
    }

    fn remove(signup_id: i64) -> RosterEntry {
        RosterEntry {
            signup: SignupRef::Existing { signup_id },
            remove: true,
        }
    }

    fn add(participant_id: i64) -> RosterEntry {
        RosterEntry {
            signup: SignupRef::New { participant_id },
            remove: false,
        }
    }

    fn existing(signup_id: i64) -> SignupRef {
        SignupRef::Existing { signup_id }
    }

    /// Capacity 2, confirmed [S1=10, S2=11], waitlisted [S3=12, S4=13].
    fn example_roster() -> Roster {
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

    #[test]
    fn confirmation_is_a_pure_function_of_position() {
        let roster = example_roster();
        let update = RosterUpdate {
            entries: vec![keep(13), keep(12), keep(11), keep(10)],
        };

        let outcome = roster.reconcile(&update, 2).unwrap();
        assert_eq!(outcome.confirmed(), vec![existing(13), existing(12)]);
        assert_eq!(outcome.waitlisted(), vec![existing(11), existing(10)]);
        assert!(outcome.deleted.is_empty());

        // Orders are the instruction positions
        let orders: Vec<i32> = outcome.placements.iter().map(|p| p.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
    }

    #[test]
    fn worked_example_from_the_admin_flow() {
        // Instructions [(S3, keep), (S1, remove), (S4, keep)]:
        // S1 deleted, S3 confirmed, S4 waitlisted... and S2, omitted
        // entirely, is demoted behind the instructed entries.
        let roster = example_roster();
        let update = RosterUpdate {
            entries: vec![keep(12), remove(10), keep(13)],
        };

        let outcome = roster.reconcile(&update, 2).unwrap();
        assert_eq!(outcome.deleted, vec![10]);
        assert_eq!(outcome.confirmed(), vec![existing(12), existing(13)]);
        assert_eq!(outcome.waitlisted(), vec![existing(11)]);
    }

    #[test]
    fn omitted_signups_are_kept_not_deleted() {
        let roster = example_roster();
        let update = RosterUpdate {
            entries: vec![keep(13)],
        };

        let outcome = roster.reconcile(&update, 2).unwrap();
        assert!(outcome.deleted.is_empty());
        // Omitted entries follow in previous roster order: confirmed 10, 11
        // then waitlisted 12
        assert_eq!(outcome.confirmed(), vec![existing(13), existing(10)]);
        assert_eq!(outcome.waitlisted(), vec![existing(11), existing(12)]);
    }

    #[test]
    fn new_participants_get_signups_in_position() {
        let roster = example_roster();
        let update = RosterUpdate {
            entries: vec![add(200), keep(10), keep(11), keep(12), keep(13)],
        };

        let outcome = roster.reconcile(&update, 2).unwrap();
        assert_eq!(
            outcome.confirmed(),
            vec![SignupRef::New { participant_id: 200 }, existing(10)]
        );
        assert_eq!(outcome.placements.len(), 5);
    }

    #[test]
    fn removing_a_not_yet_existing_participant_is_skipped() {
        let roster = example_roster();
        let update = RosterUpdate {
            entries: vec![
                RosterEntry {
                    signup: SignupRef::New { participant_id: 300 },
                    remove: true,
                },
                keep(10),
                keep(11),
                keep(12),
                keep(13),
            ],
        };

        let outcome = roster.reconcile(&update, 2).unwrap();
        assert!(outcome.deleted.is_empty());
        assert_eq!(outcome.placements.len(), 4);
    }

    #[test]
    fn unknown_signup_id_aborts() {
        let roster = example_roster();
        let update = RosterUpdate {
            entries: vec![keep(999)],
        };

        assert_matches!(
            roster.reconcile(&update, 2),
            Err(TrailheadError::SignupNotFound { signup_id: 999 })
        );
    }

    #[test]
    fn duplicate_signup_reference_aborts() {
        let roster = example_roster();
        let update = RosterUpdate {
            entries: vec![keep(10), keep(10)],
        };

        assert_matches!(
            roster.reconcile(&update, 2),
            Err(TrailheadError::InvalidInput(_))
        );
    }

    #[test]
    fn new_entry_for_an_already_signed_up_participant_aborts() {
        let roster = example_roster();
        let update = RosterUpdate {
            entries: vec![add(100), keep(11), keep(12), keep(13)],
        };

        assert_matches!(
            roster.reconcile(&update, 2),
            Err(TrailheadError::AlreadySignedUp {
                participant_id: 100,
                ..
            })
        );
    }

    #[test]
    fn new_entry_is_fine_once_the_old_signup_is_removed() {
        let roster = example_roster();
        let update = RosterUpdate {
            entries: vec![remove(10), add(100), keep(11), keep(12), keep(13)],
        };

        let outcome = roster.reconcile(&update, 2).unwrap();
        assert_eq!(outcome.deleted, vec![10]);
        assert_eq!(
            outcome.confirmed(),
            vec![SignupRef::New { participant_id: 100 }, existing(11)]
        );
    }

    #[test]
    fn capacity_must_be_positive() {
        let roster = example_roster();
        let update = RosterUpdate { entries: vec![] };
        assert_matches!(
            roster.reconcile(&update, 0),
            Err(TrailheadError::CapacityValidation { capacity: 0 })
        );
    }

    #[test]
    fn capacity_invariant_holds_for_any_instruction_order() {
        let roster = example_roster();
        for capacity in 1..5 {
            let update = RosterUpdate {
                entries: vec![keep(13), keep(11), keep(10), keep(12)],
            };
            let outcome = roster.reconcile(&update, capacity).unwrap();
            assert!(outcome.confirmed().len() <= capacity as usize);
        }
    }
}
