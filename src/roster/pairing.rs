//! Lottery pairing synchronization
//!
//! Two participants may request to be paired for lottery trips. A pairing
//! is reciprocal only when both requests point at each other; one-sided
//! requests do nothing. For a reciprocal pair, one partner's ranked
//! signups dictate the other's ranks, so the lottery offers them trips in
//! a mutually consistent order. The draw itself lives elsewhere; this
//! module only keeps its inputs consistent.

use std::collections::HashMap;

use crate::models::{LotteryInfo, Signup};

use super::waitlist::order_key;

/// True iff the pairing target's own request points back
pub fn is_reciprocal(mine: &LotteryInfo, partner: Option<&LotteryInfo>) -> bool {
    match (mine.paired_with, partner) {
        (Some(target), Some(partner)) => {
            partner.participant_id == target
                && partner.paired_with == Some(mine.participant_id)
        }
        _ => false,
    }
}

/// One partner signup whose rank gets overwritten
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankUpdate {
    pub signup_id: i64,
    pub order: Option<i32>,
}

/// Result of planning an order synchronization
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderSync {
    pub updates: Vec<RankUpdate>,
    /// Trips the participant ranked but the partner never signed up for.
    /// Advisory only; expected whenever the pair's signups diverge.
    pub missing_trips: Vec<i64>,
}

/// Sort signups into personal-rank order (explicit rank, then FIFO)
pub fn rank_signups(signups: &[Signup]) -> Vec<&Signup> {
    let mut ranked: Vec<&Signup> = signups.iter().collect();
    ranked.sort_by_key(|s| order_key(s));
    ranked
}

/// For each of the participant's ranked signups, overwrite the partner's
/// signup for the same trip with the same rank. Only run when the pairing
/// is reciprocal.
pub fn sync_paired_orders(ranked: &[Signup], partner_signups: &[Signup]) -> OrderSync {
    let by_trip: HashMap<i64, &Signup> =
        partner_signups.iter().map(|s| (s.trip_id, s)).collect();

    let mut sync = OrderSync::default();
    for signup in rank_signups(ranked) {
        match by_trip.get(&signup.trip_id) {
            Some(partner) => sync.updates.push(RankUpdate {
                signup_id: partner.id,
                order: signup.order,
            }),
            None => sync.missing_trips.push(signup.trip_id),
        }
    }
    sync
}

#[cfg(test)]
mod tests {
    use super::super::testing::signup;
    use super::*;
    use chrono::Utc;

    fn lottery_info(participant_id: i64, paired_with: Option<i64>) -> LotteryInfo {
        LotteryInfo {
            id: participant_id,
            participant_id,
            paired_with,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn reciprocity_requires_both_directions() {
        let a = lottery_info(1, Some(2));
        let b = lottery_info(2, Some(1));
        let c = lottery_info(3, None);

        assert!(is_reciprocal(&a, Some(&b)));
        assert!(is_reciprocal(&b, Some(&a)));
        assert!(!is_reciprocal(&a, Some(&c)));
        assert!(!is_reciprocal(&a, None));
        assert!(!is_reciprocal(&c, Some(&a)));
    }

    #[test]
    fn reciprocity_is_symmetric() {
        let a = lottery_info(1, Some(2));
        let b = lottery_info(2, Some(1));
        assert_eq!(is_reciprocal(&a, Some(&b)), is_reciprocal(&b, Some(&a)));
    }

    #[test]
    fn partner_ranks_follow_the_ranking_participant() {
        let mut mine_first = signup(10, 7, 1, false);
        mine_first.order = Some(0);
        let mut mine_second = signup(11, 8, 1, false);
        mine_second.order = Some(1);

        let partner_trip7 = signup(20, 7, 2, false);
        let partner_trip8 = signup(21, 8, 2, false);

        let sync = sync_paired_orders(
            &[mine_second.clone(), mine_first.clone()],
            &[partner_trip7, partner_trip8],
        );

        assert_eq!(
            sync.updates,
            vec![
                RankUpdate {
                    signup_id: 20,
                    order: Some(0)
                },
                RankUpdate {
                    signup_id: 21,
                    order: Some(1)
                },
            ]
        );
        assert!(sync.missing_trips.is_empty());
    }

    #[test]
    fn missing_partner_signup_is_advisory_not_fatal() {
        let mut mine = signup(10, 7, 1, false);
        mine.order = Some(0);
        let unmatched = signup(11, 9, 1, false);

        let partner_trip7 = signup(20, 7, 2, false);

        let sync = sync_paired_orders(&[mine, unmatched], &[partner_trip7]);
        assert_eq!(sync.updates.len(), 1);
        assert_eq!(sync.missing_trips, vec![9]);
    }
}
