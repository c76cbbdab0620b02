//! Signup repository implementation

use chrono::{NaiveDate, Utc};
use sqlx::{PgConnection, PgPool};

use crate::models::signup::{CreateSignupRequest, Signup};
use crate::utils::errors::TrailheadError;

const SIGNUP_COLUMNS: &str =
    "id, trip_id, participant_id, on_trip, \"order\", time_created, notes";

#[derive(Debug, Clone)]
pub struct SignupRepository {
    pool: PgPool,
}

impl SignupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a signup, initially off-trip and unranked. Placement is a
    /// separate step decided by the roster core.
    pub async fn create(
        &self,
        conn: &mut PgConnection,
        request: CreateSignupRequest,
    ) -> Result<Signup, TrailheadError> {
        let signup = sqlx::query_as::<_, Signup>(&format!(
            r#"
            INSERT INTO signups (trip_id, participant_id, on_trip, "order", time_created, notes)
            VALUES ($1, $2, false, NULL, $3, $4)
            RETURNING {SIGNUP_COLUMNS}
            "#
        ))
        .bind(request.trip_id)
        .bind(request.participant_id)
        .bind(Utc::now())
        .bind(request.notes)
        .fetch_one(&mut *conn)
        .await?;

        Ok(signup)
    }

    /// Find signup by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Signup>, TrailheadError> {
        let signup = sqlx::query_as::<_, Signup>(&format!(
            "SELECT {SIGNUP_COLUMNS} FROM signups WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(signup)
    }

    /// Find the signup for a (participant, trip) pair, if any
    pub async fn find_by_pair(
        &self,
        trip_id: i64,
        participant_id: i64,
    ) -> Result<Option<Signup>, TrailheadError> {
        let signup = sqlx::query_as::<_, Signup>(&format!(
            "SELECT {SIGNUP_COLUMNS} FROM signups WHERE trip_id = $1 AND participant_id = $2"
        ))
        .bind(trip_id)
        .bind(participant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(signup)
    }

    /// All signups for a trip, inside the caller's transaction
    pub async fn list_for_trip(
        &self,
        conn: &mut PgConnection,
        trip_id: i64,
    ) -> Result<Vec<Signup>, TrailheadError> {
        let signups = sqlx::query_as::<_, Signup>(&format!(
            "SELECT {SIGNUP_COLUMNS} FROM signups WHERE trip_id = $1 ORDER BY time_created ASC, id ASC"
        ))
        .bind(trip_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(signups)
    }

    /// A participant's signups for future lottery-mode trips, ranked by
    /// personal preference
    pub async fn list_future_lottery(
        &self,
        participant_id: i64,
        today: NaiveDate,
    ) -> Result<Vec<Signup>, TrailheadError> {
        let signups = sqlx::query_as::<_, Signup>(
            r#"
            SELECT s.id, s.trip_id, s.participant_id, s.on_trip, s."order", s.time_created, s.notes
            FROM signups s
            INNER JOIN trips t ON t.id = s.trip_id
            WHERE s.participant_id = $1 AND t.algorithm = 'lottery' AND t.trip_date > $2
            ORDER BY s."order" ASC NULLS LAST, s.time_created ASC, s.id ASC
            "#,
        )
        .bind(participant_id)
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        Ok(signups)
    }

    /// Write back a placement decision
    pub async fn set_placement(
        &self,
        conn: &mut PgConnection,
        id: i64,
        on_trip: bool,
        order: Option<i32>,
    ) -> Result<(), TrailheadError> {
        sqlx::query(r#"UPDATE signups SET on_trip = $2, "order" = $3 WHERE id = $1"#)
            .bind(id)
            .bind(on_trip)
            .bind(order)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Overwrite only the ordering rank (lottery pairing sync)
    pub async fn set_order(
        &self,
        conn: &mut PgConnection,
        id: i64,
        order: Option<i32>,
    ) -> Result<(), TrailheadError> {
        sqlx::query(r#"UPDATE signups SET "order" = $2 WHERE id = $1"#)
            .bind(id)
            .bind(order)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Delete a signup inside the caller's transaction
    pub async fn delete(&self, conn: &mut PgConnection, id: i64) -> Result<(), TrailheadError> {
        sqlx::query("DELETE FROM signups WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Count confirmed signups for a trip
    pub async fn count_on_trip(&self, trip_id: i64) -> Result<i64, TrailheadError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM signups WHERE trip_id = $1 AND on_trip = true")
                .bind(trip_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }
}
