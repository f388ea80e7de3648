use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use infra::models::NotificationRow;
use infra::repos::{EventRepo, MemberRepo, NotificationRepo};

use crate::auth::Claims;
use crate::error::AppError;
use crate::routes::{data, Data};
use crate::state::AppState;

/// Unread-first listing for the signed-in admin.
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Data<Vec<NotificationRow>>>, AppError> {
    claims.require(|p| p.can_manage_access)?;
    let rows = NotificationRepo::new(state.db.clone())
        .list_for_admin(claims.access_id()?, None)
        .await?;
    Ok(data(rows))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Data<bool>>, AppError> {
    claims.require(|p| p.can_manage_access)?;
    let updated = NotificationRepo::new(state.db.clone())
        .mark_read(id, claims.access_id()?)
        .await?;
    if !updated {
        return Err(AppError::NotFound("Notification not found".to_string()));
    }
    Ok(data(true))
}

#[derive(Deserialize)]
pub struct RsvpChangePayload {
    pub event_id: Uuid,
    pub member_id: Uuid,
    pub previous_status: Option<String>,
    pub status: String,
}

#[derive(Serialize)]
pub struct FanOutResult {
    pub notified: usize,
}

/// Explicit fan-out endpoint. The RSVP handler calls the same service
/// internally; this surface exists for admin-triggered re-sends.
pub async fn rsvp_change(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<RsvpChangePayload>,
) -> Result<Json<Data<FanOutResult>>, AppError> {
    claims.require(|p| p.can_manage_access)?;

    let event = EventRepo::new(state.db.clone())
        .get(payload.event_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
    let member = MemberRepo::new(state.db.clone())
        .get(payload.member_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;

    let notified = state
        .notifier()
        .rsvp_changed(
            &event,
            &member,
            payload.previous_status.as_deref(),
            &payload.status,
        )
        .await?;

    Ok(data(FanOutResult { notified }))
}

#[derive(Serialize)]
pub struct ReminderResult {
    pub attempted: usize,
    pub sent: usize,
}

pub async fn dues_reminder(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Data<ReminderResult>>, AppError> {
    claims.require(|p| p.can_manage_access)?;
    let (attempted, sent) = state.notifier().dues_reminders().await?;
    Ok(data(ReminderResult { attempted, sent }))
}

#[derive(Serialize)]
pub struct ReportResult {
    pub sent: bool,
    pub members_changed: i64,
    pub dues_changed: i64,
    pub expenses_changed: i64,
}

pub async fn daily_report(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Data<ReportResult>>, AppError> {
    claims.require(|p| p.can_manage_access)?;
    let counts = state.notifier().daily_report().await?;
    let result = match counts {
        Some((members, dues, expenses)) => ReportResult {
            sent: true,
            members_changed: members,
            dues_changed: dues,
            expenses_changed: expenses,
        },
        None => ReportResult {
            sent: false,
            members_changed: 0,
            dues_changed: 0,
            expenses_changed: 0,
        },
    };
    Ok(data(result))
}
