//! Lottery pairing repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::lottery::LotteryInfo;
use crate::utils::errors::TrailheadError;

#[derive(Debug, Clone)]
pub struct LotteryRepository {
    pool: PgPool,
}

impl LotteryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a participant's pairing request, replacing any previous one.
    /// `None` clears the request.
    pub async fn upsert_pairing(
        &self,
        participant_id: i64,
        paired_with: Option<i64>,
    ) -> Result<LotteryInfo, TrailheadError> {
        let info = sqlx::query_as::<_, LotteryInfo>(
            r#"
            INSERT INTO lottery_info (participant_id, paired_with, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (participant_id)
            DO UPDATE SET paired_with = EXCLUDED.paired_with, updated_at = EXCLUDED.updated_at
            RETURNING id, participant_id, paired_with, updated_at
            "#,
        )
        .bind(participant_id)
        .bind(paired_with)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(info)
    }

    /// Find a participant's lottery info, if any
    pub async fn find_by_participant(
        &self,
        participant_id: i64,
    ) -> Result<Option<LotteryInfo>, TrailheadError> {
        let info = sqlx::query_as::<_, LotteryInfo>(
            "SELECT id, participant_id, paired_with, updated_at FROM lottery_info WHERE participant_id = $1",
        )
        .bind(participant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(info)
    }

    /// Participants who have requested pairing with the given participant
    pub async fn pair_requests(&self, participant_id: i64) -> Result<Vec<LotteryInfo>, TrailheadError> {
        let requests = sqlx::query_as::<_, LotteryInfo>(
            "SELECT id, participant_id, paired_with, updated_at FROM lottery_info WHERE paired_with = $1",
        )
        .bind(participant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }
}
