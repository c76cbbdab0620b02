//! Lottery pairing service
//!
//! Handles pairing requests between participants and keeps reciprocally
//! paired participants' trip rankings aligned ahead of the lottery draw.
//! The draw itself is an external concern; this service only guarantees
//! its inputs are consistent for a pair.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::database::{DatabasePool, DatabaseService};
use crate::roster::{self, OrderSync};
use crate::utils::errors::{Result, TrailheadError};
use crate::utils::logging;

/// Outcome of a pairing request, with the message shown to the participant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingStatus {
    pub paired_with: Option<i64>,
    pub reciprocal: bool,
    pub message: String,
}

/// What a rank synchronization run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSyncReport {
    pub reciprocal: bool,
    pub updated: usize,
    /// Advisory notices for trips the partner never signed up for; these
    /// are surfaced to the participant, never treated as failures
    pub notices: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LotteryService {
    pool: DatabasePool,
    db: DatabaseService,
}

impl LotteryService {
    /// Create a new LotteryService instance
    pub fn new(pool: DatabasePool, db: DatabaseService) -> Self {
        Self { pool, db }
    }

    /// Record (or clear, with `None`) a participant's pairing request
    pub async fn request_pairing(
        &self,
        participant_id: i64,
        target: Option<i64>,
    ) -> Result<PairingStatus> {
        if target == Some(participant_id) {
            return Err(TrailheadError::SelfPairing);
        }
        if let Some(target_id) = target {
            if !self.db.participants.exists(target_id).await? {
                return Err(TrailheadError::ParticipantNotFound {
                    participant_id: target_id,
                });
            }
        }

        let info = self.db.lottery.upsert_pairing(participant_id, target).await?;
        let reciprocal = self.pairing_is_reciprocal(&info).await?;
        logging::log_pairing(participant_id, target, reciprocal);

        let message = match target {
            None => "Requested normal behavior (no pairing) in the lottery".to_string(),
            Some(target_id) => {
                let name = self
                    .db
                    .participants
                    .find_by_id(target_id)
                    .await?
                    .map(|p| p.name)
                    .unwrap_or_else(|| format!("participant {target_id}"));
                if reciprocal {
                    format!("Successfully paired with {name}")
                } else {
                    format!("Requested pairing with {name}; they must also select to be paired with you")
                }
            }
        };

        Ok(PairingStatus {
            paired_with: target,
            reciprocal,
            message,
        })
    }

    /// True iff the participant and their pairing target point at each other
    pub async fn is_reciprocal(&self, participant_id: i64) -> Result<bool> {
        match self.db.lottery.find_by_participant(participant_id).await? {
            Some(info) => self.pairing_is_reciprocal(&info).await,
            None => Ok(false),
        }
    }

    async fn pairing_is_reciprocal(&self, info: &crate::models::LotteryInfo) -> Result<bool> {
        let partner = match info.paired_with {
            Some(partner_id) => self.db.lottery.find_by_participant(partner_id).await?,
            None => None,
        };
        Ok(roster::is_reciprocal(info, partner.as_ref()))
    }

    /// Align the partner's future lottery-trip ranks with the
    /// participant's own ranking. One-sided pairings synchronize nothing.
    ///
    /// A trip the participant ranked that the partner never signed up for
    /// produces an advisory notice; it is the expected state whenever the
    /// pair's signups diverge.
    pub async fn sync_paired_orders(
        &self,
        participant_id: i64,
        today: NaiveDate,
    ) -> Result<OrderSyncReport> {
        let info = match self.db.lottery.find_by_participant(participant_id).await? {
            Some(info) => info,
            None => {
                return Ok(OrderSyncReport {
                    reciprocal: false,
                    updated: 0,
                    notices: vec![],
                })
            }
        };
        if !self.pairing_is_reciprocal(&info).await? {
            debug!(
                participant_id = participant_id,
                "Pairing not reciprocal; skipping order sync"
            );
            return Ok(OrderSyncReport {
                reciprocal: false,
                updated: 0,
                notices: vec![],
            });
        }
        // Reciprocity implies a target
        let partner_id = info.paired_with.ok_or(TrailheadError::InvalidInput(
            "reciprocal pairing without a target".to_string(),
        ))?;

        let ranked = self
            .db
            .signups
            .list_future_lottery(participant_id, today)
            .await?;
        let partner_signups = self
            .db
            .signups
            .list_future_lottery(partner_id, today)
            .await?;
        let sync: OrderSync = roster::sync_paired_orders(&ranked, &partner_signups);

        let mut tx = self.pool.begin().await?;
        for update in &sync.updates {
            self.db
                .signups
                .set_order(&mut tx, update.signup_id, update.order)
                .await?;
        }
        tx.commit().await?;

        let partner_name = self
            .db
            .participants
            .find_by_id(partner_id)
            .await?
            .map(|p| p.name)
            .unwrap_or_else(|| format!("participant {partner_id}"));
        let mut notices = Vec::with_capacity(sync.missing_trips.len());
        for trip_id in &sync.missing_trips {
            let trip_name = self
                .db
                .trips
                .find_by_id(*trip_id)
                .await?
                .map(|t| t.name)
                .unwrap_or_else(|| format!("trip {trip_id}"));
            warn!(
                participant_id = partner_id,
                trip_id = trip_id,
                "Paired participant has no signup for ranked trip"
            );
            notices.push(format!("{partner_name} hasn't signed up for {trip_name}."));
        }

        Ok(OrderSyncReport {
            reciprocal: true,
            updated: sync.updates.len(),
            notices,
        })
    }
}
