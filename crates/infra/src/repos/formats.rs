use sqlx::Result as SqlxResult;
use uuid::Uuid;

use crate::db::Db;
use crate::models::TournamentFormatRow;

#[derive(Clone)]
pub struct FormatRepo {
    pool: Db,
}

impl FormatRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn list_for_season(&self, season_id: Uuid) -> SqlxResult<Vec<TournamentFormatRow>> {
        sqlx::query_as::<_, TournamentFormatRow>(
            r#"
            SELECT id, season_id, name, description, created_at, updated_at
            FROM tournament_formats
            WHERE season_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(season_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get(&self, id: Uuid) -> SqlxResult<Option<TournamentFormatRow>> {
        sqlx::query_as::<_, TournamentFormatRow>(
            r#"
            SELECT id, season_id, name, description, created_at, updated_at
            FROM tournament_formats
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// How many of the given ids actually exist; referential check for
    /// dues creation.
    pub async fn count_existing(&self, ids: &[Uuid]) -> SqlxResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tournament_formats WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get_by_name(
        &self,
        season_id: Uuid,
        name: &str,
    ) -> SqlxResult<Option<TournamentFormatRow>> {
        sqlx::query_as::<_, TournamentFormatRow>(
            r#"
            SELECT id, season_id, name, description, created_at, updated_at
            FROM tournament_formats
            WHERE season_id = $1 AND name = $2
            "#,
        )
        .bind(season_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn create(
        &self,
        season_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> SqlxResult<TournamentFormatRow> {
        sqlx::query_as::<_, TournamentFormatRow>(
            r#"
            INSERT INTO tournament_formats (season_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, season_id, name, description, created_at, updated_at
            "#,
        )
        .bind(season_id)
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> SqlxResult<Option<TournamentFormatRow>> {
        sqlx::query_as::<_, TournamentFormatRow>(
            r#"
            UPDATE tournament_formats
            SET name = $2, description = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, season_id, name, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete(&self, id: Uuid) -> SqlxResult<bool> {
        let result = sqlx::query("DELETE FROM tournament_formats WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
