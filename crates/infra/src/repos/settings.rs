use chrono::{DateTime, Utc};
use sqlx::Result as SqlxResult;

use crate::db::Db;

/// Generic key/value settings; the export gate keeps
/// `auto_export_enabled`, `export_cooldown_minutes` and
/// `last_export_time` here.
#[derive(Clone)]
pub struct SettingsRepo {
    pool: Db,
}

impl SettingsRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn get(&self, key: &str) -> SqlxResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT value FROM system_settings WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn set(&self, key: &str, value: &str) -> SqlxResult<()> {
        sqlx::query(
            r#"
            INSERT INTO system_settings (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Most recent `updated_at` across the three exported tables, or
    /// None when all of them are empty.
    pub async fn latest_change(&self) -> SqlxResult<Option<DateTime<Utc>>> {
        sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
            r#"
            SELECT GREATEST(
                (SELECT MAX(updated_at) FROM members),
                (SELECT MAX(updated_at) FROM member_dues),
                (SELECT MAX(updated_at) FROM general_expenses)
            )
            "#,
        )
        .fetch_one(&self.pool)
        .await
    }

    /// Per-table counts of rows touched after the given instant, for the
    /// daily change report.
    pub async fn changed_counts_since(
        &self,
        since: DateTime<Utc>,
    ) -> SqlxResult<(i64, i64, i64)> {
        let members: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE updated_at > $1")
                .bind(since)
                .fetch_one(&self.pool)
                .await?;
        let dues: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM member_dues WHERE updated_at > $1")
                .bind(since)
                .fetch_one(&self.pool)
                .await?;
        let expenses: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM general_expenses WHERE updated_at > $1")
                .bind(since)
                .fetch_one(&self.pool)
                .await?;
        Ok((members, dues, expenses))
    }
}
