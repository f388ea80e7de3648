use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use uuid::Uuid;

use infra::models::MemberDuesRow;
use infra::repos::{DuesFilter, DuesRepo, FormatRepo, MemberRepo, NewMemberDues, UpdateMemberDues};

use crate::auth::Claims;
use crate::error::AppError;
use crate::routes::{data, Data};
use crate::services::best_effort;
use crate::state::AppState;

pub const PAYMENT_STATUSES: [&str; 2] = ["Paid", "Not Paid"];

/// Straight sum. The adjustment is signed and added as-is; a credit is
/// passed as a negative amount.
fn compute_total_cents(season: i64, jersey: i64, trouser: i64, adjustment: i64) -> i64 {
    season + jersey + trouser + adjustment
}

/// The due date may be today but never in the past.
fn validate_due_date(due_date: NaiveDate, today: NaiveDate) -> Result<(), AppError> {
    if due_date < today {
        return Err(AppError::BadRequest(
            "Due date cannot be in the past".to_string(),
        ));
    }
    Ok(())
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub year: Option<i32>,
    pub member_id: Option<Uuid>,
    pub payment_status: Option<String>,
}

#[derive(Deserialize)]
pub struct NewDuesPayload {
    pub member_id: Uuid,
    pub year: i32,
    pub tournament_format_ids: Vec<Uuid>,
    pub season_dues_cents: i64,
    #[serde(default)]
    pub extra_jersey_dues_cents: i64,
    #[serde(default)]
    pub extra_trouser_dues_cents: i64,
    #[serde(default)]
    pub credit_adjustment_cents: i64,
    pub due_date: NaiveDate,
    pub comments: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateDuesPayload {
    pub season_dues_cents: i64,
    #[serde(default)]
    pub extra_jersey_dues_cents: i64,
    #[serde(default)]
    pub extra_trouser_dues_cents: i64,
    #[serde(default)]
    pub credit_adjustment_cents: i64,
    pub due_date: NaiveDate,
    pub payment_status: String,
    pub settlement_date: Option<NaiveDate>,
    pub comments: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Data<Vec<MemberDuesRow>>>, AppError> {
    claims.require(|p| p.can_view)?;
    if let Some(status) = query.payment_status.as_deref() {
        if !PAYMENT_STATUSES.contains(&status) {
            return Err(AppError::BadRequest(format!(
                "Payment status must be Paid or Not Paid; got '{status}'"
            )));
        }
    }
    let rows = DuesRepo::new(state.db.clone())
        .list(DuesFilter {
            year: query.year,
            member_id: query.member_id,
            payment_status: query.payment_status,
        })
        .await?;
    Ok(data(rows))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NewDuesPayload>,
) -> Result<Json<Data<MemberDuesRow>>, AppError> {
    claims.require(|p| p.can_create)?;

    if payload.tournament_format_ids.is_empty() {
        return Err(AppError::BadRequest(
            "At least one tournament format is required".to_string(),
        ));
    }
    if payload.season_dues_cents < 0 {
        return Err(AppError::BadRequest(
            "Season dues cannot be negative".to_string(),
        ));
    }
    validate_due_date(payload.due_date, Local::now().date_naive())?;

    let member = MemberRepo::new(state.db.clone())
        .get(payload.member_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Referenced member does not exist".to_string()))?;

    let existing = FormatRepo::new(state.db.clone())
        .count_existing(&payload.tournament_format_ids)
        .await?;
    if existing != payload.tournament_format_ids.len() as i64 {
        return Err(AppError::BadRequest(
            "One or more tournament formats do not exist".to_string(),
        ));
    }

    let repo = DuesRepo::new(state.db.clone());
    // Overlap with an unpaid row for the same member and year blocks the
    // insert; read-then-write, accepted race at this concurrency level.
    if repo
        .has_unpaid_overlap(payload.member_id, payload.year, &payload.tournament_format_ids)
        .await?
    {
        return Err(AppError::BadRequest(
            "An unpaid dues entry already exists for this member, year and format set"
                .to_string(),
        ));
    }

    let total = compute_total_cents(
        payload.season_dues_cents,
        payload.extra_jersey_dues_cents,
        payload.extra_trouser_dues_cents,
        payload.credit_adjustment_cents,
    );

    let row = repo
        .create(NewMemberDues {
            member_id: payload.member_id,
            year: payload.year,
            tournament_format_ids: payload.tournament_format_ids,
            season_dues_cents: payload.season_dues_cents,
            extra_jersey_dues_cents: payload.extra_jersey_dues_cents,
            extra_trouser_dues_cents: payload.extra_trouser_dues_cents,
            credit_adjustment_cents: payload.credit_adjustment_cents,
            total_dues_cents: total,
            due_date: payload.due_date,
            comments: payload.comments,
        })
        .await?;

    best_effort(
        "initial dues notification",
        state.notifier().initial_dues_notice(&member, &row).await,
    );

    Ok(data(row))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDuesPayload>,
) -> Result<Json<Data<MemberDuesRow>>, AppError> {
    claims.require(|p| p.can_edit)?;

    if !PAYMENT_STATUSES.contains(&payload.payment_status.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Payment status must be Paid or Not Paid; got '{}'",
            payload.payment_status
        )));
    }
    if payload.payment_status == "Paid" && payload.settlement_date.is_none() {
        return Err(AppError::BadRequest(
            "Settlement date is required when marking dues as Paid".to_string(),
        ));
    }

    let repo = DuesRepo::new(state.db.clone());
    repo.get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Dues entry not found".to_string()))?;

    let total = compute_total_cents(
        payload.season_dues_cents,
        payload.extra_jersey_dues_cents,
        payload.extra_trouser_dues_cents,
        payload.credit_adjustment_cents,
    );

    let row = repo
        .update(
            id,
            UpdateMemberDues {
                season_dues_cents: payload.season_dues_cents,
                extra_jersey_dues_cents: payload.extra_jersey_dues_cents,
                extra_trouser_dues_cents: payload.extra_trouser_dues_cents,
                credit_adjustment_cents: payload.credit_adjustment_cents,
                total_dues_cents: total,
                due_date: payload.due_date,
                payment_status: payload.payment_status,
                settlement_date: payload.settlement_date,
                comments: payload.comments,
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Dues entry not found".to_string()))?;
    Ok(data(row))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_a_straight_sum_including_the_adjustment() {
        // 100 + 20 + 0 + 10 = 130, in cents.
        assert_eq!(compute_total_cents(10000, 2000, 0, 1000), 13000);
    }

    #[test]
    fn negative_adjustment_reduces_the_total() {
        assert_eq!(compute_total_cents(10000, 0, 0, -2500), 7500);
    }

    #[test]
    fn due_date_boundary_is_inclusive_of_today() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert!(validate_due_date(today, today).is_ok());
        assert!(validate_due_date(today.succ_opt().unwrap(), today).is_ok());
        assert!(validate_due_date(today.pred_opt().unwrap(), today).is_err());
    }
}
