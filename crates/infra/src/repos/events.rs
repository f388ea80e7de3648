use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::Result as SqlxResult;
use uuid::Uuid;

use crate::db::Db;
use crate::models::EventRow;
use crate::pagination::LimitOffset;

#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub team_id: Option<Uuid>,
    pub season_id: Option<Uuid>,
    /// Only events starting at or after this wall-clock instant.
    pub starting_from: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub team_id: Uuid,
    pub season_id: Uuid,
    pub tournament_format_id: Uuid,
    pub title: String,
    pub event_type: String,
    pub opposition: Option<String>,
    pub location: String,
    pub notes: Option<String>,
    pub starts_at: NaiveDateTime,
    pub ends_at: Option<NaiveDateTime>,
    pub created_by: Option<String>,
}

const EVENT_COLUMNS: &str = "id, team_id, season_id, tournament_format_id, title, event_type, \
     opposition, location, notes, starts_at, ends_at, created_by, created_at, updated_at";

#[derive(Clone)]
pub struct EventRepo {
    pool: Db,
}

impl EventRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: EventFilter,
        page: Option<LimitOffset>,
    ) -> SqlxResult<Vec<EventRow>> {
        let p = page.unwrap_or_default();

        // Dynamic WHERE using the COALESCE pattern to keep a single
        // prepared statement.
        sqlx::query_as::<_, EventRow>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE ($1::uuid IS NULL OR team_id = $1)
              AND ($2::uuid IS NULL OR season_id = $2)
              AND ($3::timestamp IS NULL OR starts_at >= $3)
            ORDER BY starts_at ASC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(filter.team_id)
        .bind(filter.season_id)
        .bind(filter.starting_from)
        .bind(p.limit)
        .bind(p.offset)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get(&self, id: Uuid) -> SqlxResult<Option<EventRow>> {
        sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn create(&self, event: NewEvent) -> SqlxResult<EventRow> {
        sqlx::query_as::<_, EventRow>(&format!(
            r#"
            INSERT INTO events (team_id, season_id, tournament_format_id, title, event_type,
                                opposition, location, notes, starts_at, ends_at, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(event.team_id)
        .bind(event.season_id)
        .bind(event.tournament_format_id)
        .bind(&event.title)
        .bind(&event.event_type)
        .bind(&event.opposition)
        .bind(&event.location)
        .bind(&event.notes)
        .bind(event.starts_at)
        .bind(event.ends_at)
        .bind(&event.created_by)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn update(&self, id: Uuid, event: NewEvent) -> SqlxResult<Option<EventRow>> {
        sqlx::query_as::<_, EventRow>(&format!(
            r#"
            UPDATE events
            SET team_id = $2, season_id = $3, tournament_format_id = $4, title = $5,
                event_type = $6, opposition = $7, location = $8, notes = $9,
                starts_at = $10, ends_at = $11, updated_at = NOW()
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(event.team_id)
        .bind(event.season_id)
        .bind(event.tournament_format_id)
        .bind(&event.title)
        .bind(&event.event_type)
        .bind(&event.opposition)
        .bind(&event.location)
        .bind(&event.notes)
        .bind(event.starts_at)
        .bind(event.ends_at)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete(&self, id: Uuid) -> SqlxResult<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
