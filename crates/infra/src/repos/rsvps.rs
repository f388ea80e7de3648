use sqlx::Result as SqlxResult;
use uuid::Uuid;

use crate::db::Db;
use crate::models::{RsvpRow, TeamRsvpRow};

#[derive(Clone)]
pub struct RsvpRepo {
    pool: Db,
}

impl RsvpRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn get(&self, event_id: Uuid, member_id: Uuid) -> SqlxResult<Option<RsvpRow>> {
        sqlx::query_as::<_, RsvpRow>(
            r#"
            SELECT event_id, member_id, status, responded_at
            FROM rsvps
            WHERE event_id = $1 AND member_id = $2
            "#,
        )
        .bind(event_id)
        .bind(member_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Upsert on the (event, member) composite key; setting the same
    /// status twice leaves a single row.
    pub async fn upsert(
        &self,
        event_id: Uuid,
        member_id: Uuid,
        status: &str,
    ) -> SqlxResult<RsvpRow> {
        sqlx::query_as::<_, RsvpRow>(
            r#"
            INSERT INTO rsvps (event_id, member_id, status, responded_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (event_id, member_id)
            DO UPDATE SET status = EXCLUDED.status, responded_at = NOW()
            RETURNING event_id, member_id, status, responded_at
            "#,
        )
        .bind(event_id)
        .bind(member_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }

    /// The event team's full roster, LEFT JOINed with responses so
    /// members who have not answered still appear.
    pub async fn team_roster(&self, event_id: Uuid, team_id: Uuid) -> SqlxResult<Vec<TeamRsvpRow>> {
        sqlx::query_as::<_, TeamRsvpRow>(
            r#"
            SELECT m.id AS member_id, m.first_name, m.last_name, m.email,
                   r.status, r.responded_at
            FROM members m
            LEFT JOIN rsvps r ON r.member_id = m.id AND r.event_id = $1
            WHERE m.team_id = $2
            ORDER BY m.last_name ASC, m.first_name ASC
            "#,
        )
        .bind(event_id)
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
    }
}
