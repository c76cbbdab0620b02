//! Batch reconciliation behavior, end to end over the roster core
//!
//! These tests pin the reconciliation protocol: positional confirmation,
//! the omission policy, validation-failure atomicity, and the wire shape
//! of the batch request.

mod common;

use assert_matches::assert_matches;
use common::*;
use trailhead::roster::{RosterEntry, RosterUpdate, SignupRef};
use trailhead::TrailheadError;

#[test]
fn first_capacity_entries_in_supplied_order_are_confirmed() {
    let roster = example_roster();
    // Reverse the whole roster: the old waitlist takes the seats
    let update = RosterUpdate {
        entries: vec![keep(13), keep(12), keep(11), keep(10)],
    };

    let outcome = roster.reconcile(&update, 2).unwrap();
    assert_eq!(outcome.confirmed(), vec![existing(13), existing(12)]);
    assert_eq!(outcome.waitlisted(), vec![existing(11), existing(10)]);
}

#[test]
fn admin_flow_example_removes_and_promotes_in_one_edit() {
    // capacity = 2, confirmed [S1=10, S2=11], waitlisted [S3=12, S4=13];
    // instructions [(S3, keep), (S1, remove), (S4, keep)]
    let roster = example_roster();
    let update = RosterUpdate {
        entries: vec![keep(12), remove(10), keep(13)],
    };

    let outcome = roster.reconcile(&update, 2).unwrap();
    assert_eq!(outcome.deleted, vec![10]);
    assert_eq!(outcome.confirmed(), vec![existing(12), existing(13)]);
    // S2, omitted from the instructions, is demoted behind them
    assert_eq!(outcome.waitlisted(), vec![existing(11)]);
}

#[test]
fn omitted_signups_are_kept_and_demoted() {
    let roster = example_roster();
    let update = RosterUpdate {
        entries: vec![keep(13), keep(12)],
    };

    let outcome = roster.reconcile(&update, 2).unwrap();
    // Nothing was removed, so nothing may be deleted
    assert!(outcome.deleted.is_empty());
    // Instructed entries take the seats; the omitted confirmed pair
    // follows in previous roster order, now waitlisted
    assert_eq!(outcome.confirmed(), vec![existing(13), existing(12)]);
    assert_eq!(outcome.waitlisted(), vec![existing(10), existing(11)]);
}

#[test]
fn validation_failure_leaves_the_roster_untouched() {
    let roster = example_roster();
    let before: Vec<(i64, bool, Option<i32>)> = roster
        .signups()
        .iter()
        .map(|s| (s.id, s.on_trip, s.order))
        .collect();

    let update = RosterUpdate {
        entries: vec![keep(12), keep(999)],
    };
    assert_matches!(
        roster.reconcile(&update, 2),
        Err(TrailheadError::SignupNotFound { signup_id: 999 })
    );

    let after: Vec<(i64, bool, Option<i32>)> = roster
        .signups()
        .iter()
        .map(|s| (s.id, s.on_trip, s.order))
        .collect();
    assert_eq!(before, after);
    assert_eq!(roster.trip().edit_revision, 0);
}

#[test]
fn reconciliation_is_deterministic() {
    let roster = example_roster();
    let update = RosterUpdate {
        entries: vec![keep(13), remove(11), keep(10), keep(12)],
    };

    let first = roster.reconcile(&update, 2).unwrap();
    let second = roster.reconcile(&update, 2).unwrap();
    assert_eq!(first, second);
}

#[test]
fn batch_request_round_trips_through_json() {
    let update = RosterUpdate {
        entries: vec![
            keep(12),
            remove(10),
            RosterEntry {
                signup: SignupRef::New { participant_id: 7 },
                remove: false,
            },
        ],
    };

    let encoded = serde_json::to_string(&update).unwrap();
    let decoded: RosterUpdate = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, update);

    // `remove` defaults to false when the client omits it
    let sparse: RosterEntry =
        serde_json::from_str(r#"{"signup":{"existing":{"signup_id":5}}}"#).unwrap();
    assert_eq!(sparse, keep(5));
}
