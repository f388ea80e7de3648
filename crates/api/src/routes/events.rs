use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use uuid::Uuid;

use infra::models::EventRow;
use infra::pagination::LimitOffset;
use infra::repos::{EventFilter, EventRepo, FormatRepo, NewEvent, SeasonRepo, TeamRepo};

use crate::auth::Claims;
use crate::error::AppError;
use crate::routes::{data, Data};
use crate::state::AppState;

const EVENT_TYPES: [&str; 2] = ["match", "practice"];

#[derive(Deserialize)]
pub struct ListQuery {
    pub team_id: Option<Uuid>,
    pub season_id: Option<Uuid>,
    /// Only events that have not started yet, by local wall-clock.
    #[serde(default)]
    pub upcoming: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct EventPayload {
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
}

impl EventPayload {
    fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::BadRequest("Event title is required".to_string()));
        }
        if self.location.trim().is_empty() {
            return Err(AppError::BadRequest("Event location is required".to_string()));
        }
        if !EVENT_TYPES.contains(&self.event_type.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Event type must be match or practice; got '{}'",
                self.event_type
            )));
        }
        if let Some(ends_at) = self.ends_at {
            if ends_at <= self.starts_at {
                return Err(AppError::BadRequest(
                    "Event end must be after its start".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Referential checks: the payload may only point at rows that exist.
async fn validate_references(state: &AppState, payload: &EventPayload) -> Result<(), AppError> {
    TeamRepo::new(state.db.clone())
        .get(payload.team_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Referenced team does not exist".to_string()))?;
    SeasonRepo::new(state.db.clone())
        .get(payload.season_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Referenced season does not exist".to_string()))?;
    let format = FormatRepo::new(state.db.clone())
        .get(payload.tournament_format_id)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest("Referenced tournament format does not exist".to_string())
        })?;
    if format.season_id != payload.season_id {
        return Err(AppError::BadRequest(
            "Tournament format belongs to a different season".to_string(),
        ));
    }
    Ok(())
}

pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Data<Vec<EventRow>>>, AppError> {
    claims.require(|p| p.can_view)?;
    let starting_from = query
        .upcoming
        .then(|| Local::now().naive_local());
    let rows = EventRepo::new(state.db.clone())
        .list(
            EventFilter {
                team_id: query.team_id,
                season_id: query.season_id,
                starting_from,
            },
            Some(LimitOffset::new(query.limit, query.offset)),
        )
        .await?;
    Ok(data(rows))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Data<EventRow>>, AppError> {
    claims.require(|p| p.can_view)?;
    let row = EventRepo::new(state.db.clone())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
    Ok(data(row))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<EventPayload>,
) -> Result<Json<Data<EventRow>>, AppError> {
    claims.require(|p| p.can_create)?;
    payload.validate()?;
    validate_references(&state, &payload).await?;

    let row = EventRepo::new(state.db.clone())
        .create(NewEvent {
            team_id: payload.team_id,
            season_id: payload.season_id,
            tournament_format_id: payload.tournament_format_id,
            title: payload.title.trim().to_string(),
            event_type: payload.event_type,
            opposition: payload.opposition,
            location: payload.location.trim().to_string(),
            notes: payload.notes,
            starts_at: payload.starts_at,
            ends_at: payload.ends_at,
            created_by: Some(claims.email.clone()),
        })
        .await?;
    Ok(data(row))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EventPayload>,
) -> Result<Json<Data<EventRow>>, AppError> {
    claims.require(|p| p.can_edit)?;
    payload.validate()?;
    validate_references(&state, &payload).await?;

    let row = EventRepo::new(state.db.clone())
        .update(
            id,
            NewEvent {
                team_id: payload.team_id,
                season_id: payload.season_id,
                tournament_format_id: payload.tournament_format_id,
                title: payload.title.trim().to_string(),
                event_type: payload.event_type,
                opposition: payload.opposition,
                location: payload.location.trim().to_string(),
                notes: payload.notes,
                starts_at: payload.starts_at,
                ends_at: payload.ends_at,
                created_by: None,
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
    Ok(data(row))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Data<bool>>, AppError> {
    claims.require(|p| p.can_delete)?;
    let deleted = EventRepo::new(state.db.clone()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Event not found".to_string()));
    }
    Ok(data(true))
}
