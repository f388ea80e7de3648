use serde::{Deserialize, Serialize};
use sqlx::Result as SqlxResult;
use uuid::Uuid;

use crate::db::Db;
use crate::models::NotificationRow;
use crate::pagination::LimitOffset;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    pub event_id: Option<Uuid>,
    pub member_id: Option<Uuid>,
    pub admin_id: Uuid,
    pub kind: String,
    pub title: String,
    pub message: String,
}

#[derive(Clone)]
pub struct NotificationRepo {
    pool: Db,
}

impl NotificationRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn create(&self, notification: NewNotification) -> SqlxResult<NotificationRow> {
        sqlx::query_as::<_, NotificationRow>(
            r#"
            INSERT INTO notifications (event_id, member_id, admin_id, kind, title, message)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, event_id, member_id, admin_id, kind, title, message,
                      is_read, created_at
            "#,
        )
        .bind(notification.event_id)
        .bind(notification.member_id)
        .bind(notification.admin_id)
        .bind(&notification.kind)
        .bind(&notification.title)
        .bind(&notification.message)
        .fetch_one(&self.pool)
        .await
    }

    /// Unread first, newest first within each group.
    pub async fn list_for_admin(
        &self,
        admin_id: Uuid,
        page: Option<LimitOffset>,
    ) -> SqlxResult<Vec<NotificationRow>> {
        let p = page.unwrap_or_default();
        sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, event_id, member_id, admin_id, kind, title, message,
                   is_read, created_at
            FROM notifications
            WHERE admin_id = $1
            ORDER BY is_read ASC, created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(admin_id)
        .bind(p.limit)
        .bind(p.offset)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn mark_read(&self, id: Uuid, admin_id: Uuid) -> SqlxResult<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND admin_id = $2",
        )
        .bind(id)
        .bind(admin_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
