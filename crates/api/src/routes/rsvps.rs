use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use infra::models::{RsvpRow, TeamRsvpRow};
use infra::repos::{EventRepo, MemberRepo, RsvpRepo};

use crate::auth::Claims;
use crate::error::AppError;
use crate::routes::{data, Data};
use crate::services::best_effort;
use crate::state::AppState;

pub const RSVP_STATUSES: [&str; 3] = ["yes", "no", "maybe"];

#[derive(Deserialize)]
pub struct RsvpPayload {
    pub member_id: Uuid,
    pub status: String,
}

/// Full roster of the event's team with current responses.
pub async fn team_rsvps(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Data<Vec<TeamRsvpRow>>>, AppError> {
    claims.require(|p| p.can_view)?;
    let event = EventRepo::new(state.db.clone())
        .get(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
    let rows = RsvpRepo::new(state.db.clone())
        .team_roster(event_id, event.team_id)
        .await?;
    Ok(data(rows))
}

/// A member answers for themselves; an admin may answer for anyone on
/// the event's team. The write is authoritative, the admin notification
/// fan-out is advisory.
pub async fn upsert_rsvp(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<RsvpPayload>,
) -> Result<Json<Data<RsvpRow>>, AppError> {
    if !RSVP_STATUSES.contains(&payload.status.as_str()) {
        return Err(AppError::BadRequest(format!(
            "RSVP status must be yes, no or maybe; got '{}'",
            payload.status
        )));
    }

    let event = EventRepo::new(state.db.clone())
        .get(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    let member = MemberRepo::new(state.db.clone())
        .get(payload.member_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Referenced member does not exist".to_string()))?;

    let acting_for_self = member.email.eq_ignore_ascii_case(&claims.email);
    if !acting_for_self && !claims.is_admin() {
        return Err(AppError::Forbidden(
            "Only an admin may answer for another member".to_string(),
        ));
    }

    if member.team_id != event.team_id {
        return Err(AppError::Forbidden(
            "Member does not belong to the event's team".to_string(),
        ));
    }

    let repo = RsvpRepo::new(state.db.clone());
    let previous = repo.get(event_id, payload.member_id).await?;
    let row = repo
        .upsert(event_id, payload.member_id, &payload.status)
        .await?;

    // Only an actual change is worth telling the admins about.
    let changed = previous.as_ref().map(|p| p.status.as_str()) != Some(payload.status.as_str());
    if changed {
        best_effort(
            "rsvp change notification",
            state
                .notifier()
                .rsvp_changed(
                    &event,
                    &member,
                    previous.as_ref().map(|p| p.status.as_str()),
                    &payload.status,
                )
                .await,
        );
    }

    Ok(data(row))
}
