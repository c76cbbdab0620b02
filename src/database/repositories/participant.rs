//! Participant repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::participant::{CreateParticipantRequest, Participant};
use crate::utils::errors::TrailheadError;

#[derive(Debug, Clone)]
pub struct ParticipantRepository {
    pool: PgPool,
}

impl ParticipantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new participant
    pub async fn create(
        &self,
        request: CreateParticipantRequest,
    ) -> Result<Participant, TrailheadError> {
        let participant = sqlx::query_as::<_, Participant>(
            r#"
            INSERT INTO participants (name, email, is_leader, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, is_leader, created_at
            "#,
        )
        .bind(request.name)
        .bind(request.email)
        .bind(request.is_leader)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(participant)
    }

    /// Find participant by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Participant>, TrailheadError> {
        let participant = sqlx::query_as::<_, Participant>(
            "SELECT id, name, email, is_leader, created_at FROM participants WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(participant)
    }

    /// Find participant by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Participant>, TrailheadError> {
        let participant = sqlx::query_as::<_, Participant>(
            "SELECT id, name, email, is_leader, created_at FROM participants WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(participant)
    }

    /// Check whether a participant exists
    pub async fn exists(&self, id: i64) -> Result<bool, TrailheadError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM participants WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0 > 0)
    }
}
