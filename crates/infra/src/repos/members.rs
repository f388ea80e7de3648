use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::Result as SqlxResult;
use uuid::Uuid;

use crate::db::Db;
use crate::models::{MemberExportRow, MemberRow};
use crate::pagination::LimitOffset;

#[derive(Debug, Clone, Default)]
pub struct MemberFilter {
    pub team_id: Option<Uuid>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMember {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub team_id: Uuid,
    pub role: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMember {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub team_id: Uuid,
    pub role: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub last_updated_by: Option<String>,
}

const MEMBER_COLUMNS: &str = "id, first_name, last_name, email, phone, team_id, role, \
     date_of_birth, gender, created_by, last_updated_by, created_at, updated_at";

#[derive(Clone)]
pub struct MemberRepo {
    pool: Db,
}

impl MemberRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: MemberFilter,
        page: Option<LimitOffset>,
    ) -> SqlxResult<Vec<MemberRow>> {
        let p = page.unwrap_or_default();

        let mut query = sqlx::QueryBuilder::new(format!(
            "SELECT {MEMBER_COLUMNS} FROM members WHERE 1=1"
        ));

        if let Some(team_id) = filter.team_id {
            query.push(" AND team_id = ");
            query.push_bind(team_id);
        }

        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search.to_lowercase());
            query.push(" AND (");
            query.push("LOWER(first_name) LIKE ");
            query.push_bind(pattern.clone());
            query.push(" OR LOWER(last_name) LIKE ");
            query.push_bind(pattern.clone());
            query.push(" OR LOWER(email) LIKE ");
            query.push_bind(pattern);
            query.push(")");
        }

        query.push(" ORDER BY last_name ASC, first_name ASC");
        query.push(" LIMIT ");
        query.push_bind(p.limit);
        query.push(" OFFSET ");
        query.push_bind(p.offset);

        query
            .build_query_as::<MemberRow>()
            .fetch_all(&self.pool)
            .await
    }

    pub async fn get(&self, id: Uuid) -> SqlxResult<Option<MemberRow>> {
        sqlx::query_as::<_, MemberRow>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Matches the session identity against the roster, case-insensitive.
    pub async fn get_by_email(&self, email: &str) -> SqlxResult<Option<MemberRow>> {
        sqlx::query_as::<_, MemberRow>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn create(&self, member: NewMember) -> SqlxResult<MemberRow> {
        sqlx::query_as::<_, MemberRow>(&format!(
            r#"
            INSERT INTO members (first_name, last_name, email, phone, team_id, role,
                                 date_of_birth, gender, created_by, last_updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING {MEMBER_COLUMNS}
            "#
        ))
        .bind(&member.first_name)
        .bind(&member.last_name)
        .bind(&member.email)
        .bind(&member.phone)
        .bind(member.team_id)
        .bind(&member.role)
        .bind(member.date_of_birth)
        .bind(&member.gender)
        .bind(&member.created_by)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn update(&self, id: Uuid, member: UpdateMember) -> SqlxResult<Option<MemberRow>> {
        sqlx::query_as::<_, MemberRow>(&format!(
            r#"
            UPDATE members
            SET first_name = $2, last_name = $3, email = $4, phone = $5, team_id = $6,
                role = $7, date_of_birth = $8, gender = $9, last_updated_by = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {MEMBER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&member.first_name)
        .bind(&member.last_name)
        .bind(&member.email)
        .bind(&member.phone)
        .bind(member.team_id)
        .bind(&member.role)
        .bind(member.date_of_birth)
        .bind(&member.gender)
        .bind(&member.last_updated_by)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete(&self, id: Uuid) -> SqlxResult<bool> {
        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Roster flattened with the team name, ordered for the export sheet.
    pub async fn export_rows(&self) -> SqlxResult<Vec<MemberExportRow>> {
        sqlx::query_as::<_, MemberExportRow>(
            r#"
            SELECT m.first_name, m.last_name, m.email, m.phone,
                   t.name AS team_name, m.role, m.date_of_birth, m.gender
            FROM members m
            JOIN teams t ON t.id = m.team_id
            ORDER BY t.name ASC, m.last_name ASC, m.first_name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
