//! Trip repository implementation

use chrono::{NaiveDate, Utc};
use sqlx::{PgConnection, PgPool};

use crate::models::trip::{CreateTripRequest, Trip};
use crate::utils::errors::TrailheadError;

const TRIP_COLUMNS: &str = "id, name, description, trip_date, maximum_participants, algorithm, \
     signups_open, edit_revision, creator_id, notes, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct TripRepository {
    pool: PgPool,
}

impl TripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new trip. The edit revision starts at zero.
    pub async fn create(&self, request: CreateTripRequest) -> Result<Trip, TrailheadError> {
        let trip = sqlx::query_as::<_, Trip>(&format!(
            r#"
            INSERT INTO trips (name, description, trip_date, maximum_participants, algorithm,
                               signups_open, edit_revision, creator_id, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, 0, $7, $8, $9, $9)
            RETURNING {TRIP_COLUMNS}
            "#
        ))
        .bind(request.name)
        .bind(request.description)
        .bind(request.trip_date)
        .bind(request.maximum_participants)
        .bind(request.algorithm.as_str())
        .bind(request.signups_open)
        .bind(request.creator_id)
        .bind(request.notes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(trip)
    }

    /// Find trip by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Trip>, TrailheadError> {
        let trip = sqlx::query_as::<_, Trip>(&format!(
            "SELECT {TRIP_COLUMNS} FROM trips WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(trip)
    }

    /// Find trip by ID inside a transaction, locking the row so concurrent
    /// structural edits to the same trip serialize behind it
    pub async fn find_for_update(
        &self,
        conn: &mut PgConnection,
        id: i64,
    ) -> Result<Option<Trip>, TrailheadError> {
        let trip = sqlx::query_as::<_, Trip>(&format!(
            "SELECT {TRIP_COLUMNS} FROM trips WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(trip)
    }

    /// Get upcoming trips ordered by date
    pub async fn list_upcoming(&self, today: NaiveDate) -> Result<Vec<Trip>, TrailheadError> {
        let trips = sqlx::query_as::<_, Trip>(&format!(
            "SELECT {TRIP_COLUMNS} FROM trips WHERE trip_date >= $1 ORDER BY trip_date ASC, id ASC"
        ))
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        Ok(trips)
    }

    /// Set whether signups are open
    pub async fn set_signups_open(&self, id: i64, open: bool) -> Result<(), TrailheadError> {
        sqlx::query("UPDATE trips SET signups_open = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(open)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Update the capacity inside a transaction. The revision guard runs
    /// separately via [`bump_revision`](Self::bump_revision).
    pub async fn set_maximum_participants(
        &self,
        conn: &mut PgConnection,
        id: i64,
        maximum_participants: i32,
    ) -> Result<(), TrailheadError> {
        sqlx::query("UPDATE trips SET maximum_participants = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(maximum_participants)
            .bind(Utc::now())
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Compare-and-swap increment of the trip's edit revision.
    ///
    /// Succeeds only when the stored revision still equals `expected`,
    /// returning the new revision. A stale expectation means another edit
    /// committed first; the caller gets `ConcurrentEdit` and must re-read.
    pub async fn bump_revision(
        &self,
        conn: &mut PgConnection,
        id: i64,
        expected: i32,
    ) -> Result<i32, TrailheadError> {
        let row: Option<(i32,)> = sqlx::query_as(
            r#"
            UPDATE trips
            SET edit_revision = edit_revision + 1, updated_at = $3
            WHERE id = $1 AND edit_revision = $2
            RETURNING edit_revision
            "#,
        )
        .bind(id)
        .bind(expected)
        .bind(Utc::now())
        .fetch_optional(&mut *conn)
        .await?;

        match row {
            Some((revision,)) => Ok(revision),
            None => {
                let actual: Option<(i32,)> =
                    sqlx::query_as("SELECT edit_revision FROM trips WHERE id = $1")
                        .bind(id)
                        .fetch_optional(&mut *conn)
                        .await?;
                Err(revision_conflict(id, expected, actual.map(|(r,)| r)))
            }
        }
    }

    /// Delete trip
    pub async fn delete(&self, id: i64) -> Result<(), TrailheadError> {
        sqlx::query("DELETE FROM trips WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Map a failed compare-and-swap to its cause: the trip moved on without
/// us, or it no longer exists at all.
fn revision_conflict(trip_id: i64, expected: i32, current: Option<i32>) -> TrailheadError {
    match current {
        Some(actual) => TrailheadError::ConcurrentEdit {
            trip_id,
            expected,
            actual,
        },
        None => TrailheadError::TripNotFound { trip_id },
    }
}
