use sqlx::Result as SqlxResult;
use uuid::Uuid;

use crate::db::Db;
use crate::models::SeasonRow;

#[derive(Clone)]
pub struct SeasonRepo {
    pool: Db,
}

impl SeasonRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> SqlxResult<Vec<SeasonRow>> {
        sqlx::query_as::<_, SeasonRow>(
            r#"
            SELECT id, year, name, status, created_at, updated_at
            FROM seasons
            ORDER BY year DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get(&self, id: Uuid) -> SqlxResult<Option<SeasonRow>> {
        sqlx::query_as::<_, SeasonRow>(
            r#"
            SELECT id, year, name, status, created_at, updated_at
            FROM seasons
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Season years are unique; used by the create handler for a
    /// friendly 400 instead of a constraint violation.
    pub async fn get_by_year(&self, year: i32) -> SqlxResult<Option<SeasonRow>> {
        sqlx::query_as::<_, SeasonRow>(
            r#"
            SELECT id, year, name, status, created_at, updated_at
            FROM seasons
            WHERE year = $1
            "#,
        )
        .bind(year)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn create(&self, year: i32, name: &str, status: &str) -> SqlxResult<SeasonRow> {
        sqlx::query_as::<_, SeasonRow>(
            r#"
            INSERT INTO seasons (year, name, status)
            VALUES ($1, $2, $3)
            RETURNING id, year, name, status, created_at, updated_at
            "#,
        )
        .bind(year)
        .bind(name)
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        status: &str,
    ) -> SqlxResult<Option<SeasonRow>> {
        sqlx::query_as::<_, SeasonRow>(
            r#"
            UPDATE seasons
            SET name = $2, status = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, year, name, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
    }

    /// Formats hang off the season with ON DELETE CASCADE.
    pub async fn delete(&self, id: Uuid) -> SqlxResult<bool> {
        let result = sqlx::query("DELETE FROM seasons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
