use serde::{Deserialize, Serialize};
use sqlx::Result as SqlxResult;

use crate::db::Db;
use crate::models::AccessRow;

#[derive(Clone)]
pub struct AccessRepo {
    pool: Db,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertAccess {
    pub email: String,
    pub name: String,
    /// NULL revokes access but keeps the row.
    pub role: Option<String>,
}

impl AccessRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> SqlxResult<Vec<AccessRow>> {
        sqlx::query_as::<_, AccessRow>(
            r#"
            SELECT id, email, name, role, created_at, updated_at
            FROM access
            ORDER BY email ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Lookup by email; the join is case-insensitive, emails are stored
    /// lowercased.
    pub async fn get_by_email(&self, email: &str) -> SqlxResult<Option<AccessRow>> {
        sqlx::query_as::<_, AccessRow>(
            r#"
            SELECT id, email, name, role, created_at, updated_at
            FROM access
            WHERE email = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    /// Assign or change a role. Upserts on email so repeated calls with
    /// the same payload are idempotent.
    pub async fn upsert(&self, access: UpsertAccess) -> SqlxResult<AccessRow> {
        sqlx::query_as::<_, AccessRow>(
            r#"
            INSERT INTO access (email, name, role)
            VALUES (LOWER($1), $2, $3)
            ON CONFLICT (email)
            DO UPDATE SET name = EXCLUDED.name, role = EXCLUDED.role, updated_at = NOW()
            RETURNING id, email, name, role, created_at, updated_at
            "#,
        )
        .bind(&access.email)
        .bind(&access.name)
        .bind(&access.role)
        .fetch_one(&self.pool)
        .await
    }

    /// All identities currently holding a given role, for notification
    /// fan-out.
    pub async fn list_by_role(&self, role: &str) -> SqlxResult<Vec<AccessRow>> {
        sqlx::query_as::<_, AccessRow>(
            r#"
            SELECT id, email, name, role, created_at, updated_at
            FROM access
            WHERE role = $1
            ORDER BY email ASC
            "#,
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await
    }
}
