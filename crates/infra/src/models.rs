use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Access record: who may use the admin console, independent of the
/// membership roster. `role` is NULL once access has been revoked; the
/// row itself is kept.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AccessRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TeamRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MemberRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub team_id: Uuid,
    /// Playing role (batter, keeper, ...), unrelated to the access role.
    pub role: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub created_by: Option<String>,
    pub last_updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SeasonRow {
    pub id: Uuid,
    pub year: i32,
    pub name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TournamentFormatRow {
    pub id: Uuid,
    pub season_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Event times are wall-clock (no timezone). They are entered and read
/// back as local club time; see DESIGN.md for the limitation.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct EventRow {
    pub id: Uuid,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RsvpRow {
    pub event_id: Uuid,
    pub member_id: Uuid,
    pub status: String,
    pub responded_at: DateTime<Utc>,
}

/// RSVP joined with the member it belongs to, for the team roster view.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TeamRsvpRow {
    pub member_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub status: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
}

/// Amounts are integer cents. `credit_adjustment_cents` is signed and
/// added as-is; callers pass a negative value to reduce the total.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MemberDuesRow {
    pub id: Uuid,
    pub member_id: Uuid,
    pub year: i32,
    pub tournament_format_ids: Vec<Uuid>,
    pub season_dues_cents: i64,
    pub extra_jersey_dues_cents: i64,
    pub extra_trouser_dues_cents: i64,
    pub credit_adjustment_cents: i64,
    pub total_dues_cents: i64,
    pub due_date: NaiveDate,
    pub payment_status: String,
    pub settlement_date: Option<NaiveDate>,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GeneralExpenseRow {
    pub id: Uuid,
    pub year: i32,
    pub tournament_format_id: Option<Uuid>,
    pub category: String,
    pub description: Option<String>,
    pub amount_cents: i64,
    pub paid_by_member_id: Uuid,
    pub settlement_status: String,
    pub settlement_date: Option<NaiveDate>,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SettingRow {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct NotificationRow {
    pub id: Uuid,
    pub event_id: Option<Uuid>,
    pub member_id: Option<Uuid>,
    pub admin_id: Uuid,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

// Flattened rows for the spreadsheet export: display fields from the
// joined tables are resolved in SQL so the workbook writer stays dumb.

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MemberExportRow {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub team_name: String,
    pub role: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DuesExportRow {
    pub member_name: String,
    pub member_email: String,
    pub year: i32,
    pub format_names: Option<String>,
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

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExpenseExportRow {
    pub year: i32,
    pub format_name: Option<String>,
    pub category: String,
    pub description: Option<String>,
    pub amount_cents: i64,
    pub paid_by_name: String,
    pub settlement_status: String,
    pub settlement_date: Option<NaiveDate>,
    pub comments: Option<String>,
}
