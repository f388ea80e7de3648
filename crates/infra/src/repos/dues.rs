use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::Result as SqlxResult;
use uuid::Uuid;

use crate::db::Db;
use crate::models::{DuesExportRow, MemberDuesRow};

#[derive(Debug, Clone, Default)]
pub struct DuesFilter {
    pub year: Option<i32>,
    pub member_id: Option<Uuid>,
    pub payment_status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMemberDues {
    pub member_id: Uuid,
    pub year: i32,
    pub tournament_format_ids: Vec<Uuid>,
    pub season_dues_cents: i64,
    pub extra_jersey_dues_cents: i64,
    pub extra_trouser_dues_cents: i64,
    pub credit_adjustment_cents: i64,
    pub total_dues_cents: i64,
    pub due_date: NaiveDate,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMemberDues {
    pub season_dues_cents: i64,
    pub extra_jersey_dues_cents: i64,
    pub extra_trouser_dues_cents: i64,
    pub credit_adjustment_cents: i64,
    pub total_dues_cents: i64,
    pub due_date: NaiveDate,
    pub payment_status: String,
    pub settlement_date: Option<NaiveDate>,
    pub comments: Option<String>,
}

const DUES_COLUMNS: &str = "id, member_id, year, tournament_format_ids, season_dues_cents, \
     extra_jersey_dues_cents, extra_trouser_dues_cents, credit_adjustment_cents, \
     total_dues_cents, due_date, payment_status, settlement_date, comments, \
     created_at, updated_at";

#[derive(Clone)]
pub struct DuesRepo {
    pool: Db,
}

impl DuesRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: DuesFilter) -> SqlxResult<Vec<MemberDuesRow>> {
        sqlx::query_as::<_, MemberDuesRow>(&format!(
            r#"
            SELECT {DUES_COLUMNS}
            FROM member_dues
            WHERE ($1::int IS NULL OR year = $1)
              AND ($2::uuid IS NULL OR member_id = $2)
              AND ($3::text IS NULL OR payment_status = $3)
            ORDER BY due_date ASC, created_at ASC
            "#
        ))
        .bind(filter.year)
        .bind(filter.member_id)
        .bind(filter.payment_status)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get(&self, id: Uuid) -> SqlxResult<Option<MemberDuesRow>> {
        sqlx::query_as::<_, MemberDuesRow>(&format!(
            "SELECT {DUES_COLUMNS} FROM member_dues WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// True when an unpaid row already exists for the member and year
    /// whose format set overlaps the given one. Partial overlap blocks.
    pub async fn has_unpaid_overlap(
        &self,
        member_id: Uuid,
        year: i32,
        format_ids: &[Uuid],
    ) -> SqlxResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM member_dues
                WHERE member_id = $1
                  AND year = $2
                  AND payment_status = 'Not Paid'
                  AND tournament_format_ids && $3
            )
            "#,
        )
        .bind(member_id)
        .bind(year)
        .bind(format_ids)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn create(&self, dues: NewMemberDues) -> SqlxResult<MemberDuesRow> {
        sqlx::query_as::<_, MemberDuesRow>(&format!(
            r#"
            INSERT INTO member_dues (member_id, year, tournament_format_ids,
                                     season_dues_cents, extra_jersey_dues_cents,
                                     extra_trouser_dues_cents, credit_adjustment_cents,
                                     total_dues_cents, due_date, payment_status, comments)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'Not Paid', $10)
            RETURNING {DUES_COLUMNS}
            "#
        ))
        .bind(dues.member_id)
        .bind(dues.year)
        .bind(&dues.tournament_format_ids)
        .bind(dues.season_dues_cents)
        .bind(dues.extra_jersey_dues_cents)
        .bind(dues.extra_trouser_dues_cents)
        .bind(dues.credit_adjustment_cents)
        .bind(dues.total_dues_cents)
        .bind(dues.due_date)
        .bind(&dues.comments)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn update(
        &self,
        id: Uuid,
        dues: UpdateMemberDues,
    ) -> SqlxResult<Option<MemberDuesRow>> {
        sqlx::query_as::<_, MemberDuesRow>(&format!(
            r#"
            UPDATE member_dues
            SET season_dues_cents = $2, extra_jersey_dues_cents = $3,
                extra_trouser_dues_cents = $4, credit_adjustment_cents = $5,
                total_dues_cents = $6, due_date = $7, payment_status = $8,
                settlement_date = $9, comments = $10, updated_at = NOW()
            WHERE id = $1
            RETURNING {DUES_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(dues.season_dues_cents)
        .bind(dues.extra_jersey_dues_cents)
        .bind(dues.extra_trouser_dues_cents)
        .bind(dues.credit_adjustment_cents)
        .bind(dues.total_dues_cents)
        .bind(dues.due_date)
        .bind(&dues.payment_status)
        .bind(dues.settlement_date)
        .bind(&dues.comments)
        .fetch_optional(&self.pool)
        .await
    }

    /// Unpaid rows joined with the member contact, for the reminder batch.
    pub async fn unpaid_with_members(&self) -> SqlxResult<Vec<DuesExportRow>> {
        sqlx::query_as::<_, DuesExportRow>(
            r#"
            SELECT m.first_name || ' ' || m.last_name AS member_name,
                   m.email AS member_email,
                   d.year,
                   (SELECT STRING_AGG(f.name, ', ' ORDER BY f.name)
                    FROM tournament_formats f
                    WHERE f.id = ANY(d.tournament_format_ids)) AS format_names,
                   d.season_dues_cents, d.extra_jersey_dues_cents,
                   d.extra_trouser_dues_cents, d.credit_adjustment_cents,
                   d.total_dues_cents, d.due_date, d.payment_status,
                   d.settlement_date, d.comments
            FROM member_dues d
            JOIN members m ON m.id = d.member_id
            WHERE d.payment_status = 'Not Paid'
            ORDER BY d.due_date ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn export_rows(&self) -> SqlxResult<Vec<DuesExportRow>> {
        sqlx::query_as::<_, DuesExportRow>(
            r#"
            SELECT m.first_name || ' ' || m.last_name AS member_name,
                   m.email AS member_email,
                   d.year,
                   (SELECT STRING_AGG(f.name, ', ' ORDER BY f.name)
                    FROM tournament_formats f
                    WHERE f.id = ANY(d.tournament_format_ids)) AS format_names,
                   d.season_dues_cents, d.extra_jersey_dues_cents,
                   d.extra_trouser_dues_cents, d.credit_adjustment_cents,
                   d.total_dues_cents, d.due_date, d.payment_status,
                   d.settlement_date, d.comments
            FROM member_dues d
            JOIN members m ON m.id = d.member_id
            ORDER BY d.year DESC, d.due_date ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
