use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use infra::models::GeneralExpenseRow;
use infra::repos::{
    ExpenseFilter, ExpenseRepo, FormatRepo, MemberRepo, NewGeneralExpense, UpdateGeneralExpense,
};

use crate::auth::Claims;
use crate::error::AppError;
use crate::routes::{data, Data};
use crate::state::AppState;

pub const EXPENSE_CATEGORIES: [&str; 6] = [
    "Equipment",
    "Ground Booking",
    "Umpire Fees",
    "Food & Beverages",
    "Trophies & Awards",
    "Others",
];

pub const SETTLEMENT_STATUSES: [&str; 2] = ["Settled", "Not Settled"];

/// Category must come from the fixed set, and "Others" is only allowed
/// with a description saying what it was.
fn validate_category(category: &str, description: Option<&str>) -> Result<(), AppError> {
    if !EXPENSE_CATEGORIES.contains(&category) {
        return Err(AppError::BadRequest(format!(
            "Unknown expense category '{category}'"
        )));
    }
    if category == "Others" && description.map_or(true, |d| d.trim().is_empty()) {
        return Err(AppError::BadRequest(
            "A description is required for the Others category".to_string(),
        ));
    }
    Ok(())
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub year: Option<i32>,
    pub settlement_status: Option<String>,
}

#[derive(Deserialize)]
pub struct NewExpensePayload {
    pub year: i32,
    pub tournament_format_id: Option<Uuid>,
    pub category: String,
    pub description: Option<String>,
    pub amount_cents: i64,
    pub paid_by_member_id: Uuid,
    pub comments: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateExpensePayload {
    pub category: String,
    pub description: Option<String>,
    pub amount_cents: i64,
    pub settlement_status: String,
    pub settlement_date: Option<chrono::NaiveDate>,
    pub comments: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Data<Vec<GeneralExpenseRow>>>, AppError> {
    claims.require(|p| p.can_view)?;
    if let Some(status) = query.settlement_status.as_deref() {
        if !SETTLEMENT_STATUSES.contains(&status) {
            return Err(AppError::BadRequest(format!(
                "Settlement status must be Settled or Not Settled; got '{status}'"
            )));
        }
    }
    let rows = ExpenseRepo::new(state.db.clone())
        .list(ExpenseFilter {
            year: query.year,
            settlement_status: query.settlement_status,
        })
        .await?;
    Ok(data(rows))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NewExpensePayload>,
) -> Result<Json<Data<GeneralExpenseRow>>, AppError> {
    claims.require(|p| p.can_create)?;

    validate_category(&payload.category, payload.description.as_deref())?;
    if payload.amount_cents <= 0 {
        return Err(AppError::BadRequest(
            "Expense amount must be positive".to_string(),
        ));
    }

    MemberRepo::new(state.db.clone())
        .get(payload.paid_by_member_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Referenced member does not exist".to_string()))?;

    if let Some(format_id) = payload.tournament_format_id {
        FormatRepo::new(state.db.clone())
            .get(format_id)
            .await?
            .ok_or_else(|| {
                AppError::BadRequest("Referenced tournament format does not exist".to_string())
            })?;
    }

    let row = ExpenseRepo::new(state.db.clone())
        .create(NewGeneralExpense {
            year: payload.year,
            tournament_format_id: payload.tournament_format_id,
            category: payload.category,
            description: payload.description,
            amount_cents: payload.amount_cents,
            paid_by_member_id: payload.paid_by_member_id,
            comments: payload.comments,
        })
        .await?;
    Ok(data(row))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateExpensePayload>,
) -> Result<Json<Data<GeneralExpenseRow>>, AppError> {
    claims.require(|p| p.can_edit)?;

    validate_category(&payload.category, payload.description.as_deref())?;
    if payload.amount_cents <= 0 {
        return Err(AppError::BadRequest(
            "Expense amount must be positive".to_string(),
        ));
    }
    if !SETTLEMENT_STATUSES.contains(&payload.settlement_status.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Settlement status must be Settled or Not Settled; got '{}'",
            payload.settlement_status
        )));
    }
    if payload.settlement_status == "Settled" && payload.settlement_date.is_none() {
        return Err(AppError::BadRequest(
            "Settlement date is required when marking an expense as Settled".to_string(),
        ));
    }

    let row = ExpenseRepo::new(state.db.clone())
        .update(
            id,
            UpdateGeneralExpense {
                category: payload.category,
                description: payload.description,
                amount_cents: payload.amount_cents,
                settlement_status: payload.settlement_status,
                settlement_date: payload.settlement_date,
                comments: payload.comments,
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Expense not found".to_string()))?;
    Ok(data(row))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn others_requires_a_description() {
        assert!(validate_category("Others", None).is_err());
        assert!(validate_category("Others", Some("  ")).is_err());
        assert!(validate_category("Others", Some("Netting repair")).is_ok());
    }

    #[test]
    fn named_categories_do_not_require_a_description() {
        assert!(validate_category("Equipment", None).is_ok());
    }

    #[test]
    fn unknown_categories_are_rejected() {
        assert!(validate_category("Bribes", Some("x")).is_err());
    }
}
