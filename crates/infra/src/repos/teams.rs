use sqlx::Result as SqlxResult;
use uuid::Uuid;

use crate::db::Db;
use crate::models::TeamRow;

#[derive(Clone)]
pub struct TeamRepo {
    pool: Db,
}

impl TeamRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> SqlxResult<Vec<TeamRow>> {
        sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM teams
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get(&self, id: Uuid) -> SqlxResult<Option<TeamRow>> {
        sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn create(&self, name: &str, description: Option<&str>) -> SqlxResult<TeamRow> {
        sqlx::query_as::<_, TeamRow>(
            r#"
            INSERT INTO teams (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
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
    ) -> SqlxResult<Option<TeamRow>> {
        sqlx::query_as::<_, TeamRow>(
            r#"
            UPDATE teams
            SET name = $2, description = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete(&self, id: Uuid) -> SqlxResult<bool> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
