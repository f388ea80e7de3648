use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use infra::models::{SeasonRow, TournamentFormatRow};
use infra::repos::{FormatRepo, SeasonRepo};

use crate::auth::Claims;
use crate::error::AppError;
use crate::routes::{data, Data};
use crate::state::AppState;

const SEASON_STATUSES: [&str; 2] = ["Active", "Inactive"];

fn validate_status(status: &str) -> Result<(), AppError> {
    if SEASON_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Season status must be Active or Inactive; got '{status}'"
        )))
    }
}

#[derive(Deserialize)]
pub struct NewSeasonPayload {
    pub year: i32,
    pub name: String,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "Active".to_string()
}

#[derive(Deserialize)]
pub struct UpdateSeasonPayload {
    pub name: String,
    pub status: String,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Data<Vec<SeasonRow>>>, AppError> {
    claims.require(|p| p.can_view)?;
    let rows = SeasonRepo::new(state.db.clone()).list_all().await?;
    Ok(data(rows))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Data<SeasonRow>>, AppError> {
    claims.require(|p| p.can_view)?;
    let row = SeasonRepo::new(state.db.clone())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Season not found".to_string()))?;
    Ok(data(row))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NewSeasonPayload>,
) -> Result<Json<Data<SeasonRow>>, AppError> {
    claims.require(|p| p.can_create)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("Season name is required".to_string()));
    }
    validate_status(&payload.status)?;

    let repo = SeasonRepo::new(state.db.clone());
    if repo.get_by_year(payload.year).await?.is_some() {
        return Err(AppError::BadRequest(format!(
            "A season for {} already exists",
            payload.year
        )));
    }

    let row = repo
        .create(payload.year, payload.name.trim(), &payload.status)
        .await?;
    Ok(data(row))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSeasonPayload>,
) -> Result<Json<Data<SeasonRow>>, AppError> {
    claims.require(|p| p.can_edit)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("Season name is required".to_string()));
    }
    validate_status(&payload.status)?;

    let row = SeasonRepo::new(state.db.clone())
        .update(id, payload.name.trim(), &payload.status)
        .await?
        .ok_or_else(|| AppError::NotFound("Season not found".to_string()))?;
    Ok(data(row))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Data<bool>>, AppError> {
    claims.require(|p| p.can_delete)?;
    let deleted = SeasonRepo::new(state.db.clone()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Season not found".to_string()));
    }
    Ok(data(true))
}

// Tournament formats hang off a season.

#[derive(Deserialize)]
pub struct FormatPayload {
    pub name: String,
    pub description: Option<String>,
}

pub async fn list_formats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(season_id): Path<Uuid>,
) -> Result<Json<Data<Vec<TournamentFormatRow>>>, AppError> {
    claims.require(|p| p.can_view)?;
    SeasonRepo::new(state.db.clone())
        .get(season_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Season not found".to_string()))?;
    let rows = FormatRepo::new(state.db.clone())
        .list_for_season(season_id)
        .await?;
    Ok(data(rows))
}

pub async fn create_format(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(season_id): Path<Uuid>,
    Json(payload): Json<FormatPayload>,
) -> Result<Json<Data<TournamentFormatRow>>, AppError> {
    claims.require(|p| p.can_create)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("Format name is required".to_string()));
    }
    SeasonRepo::new(state.db.clone())
        .get(season_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Season not found".to_string()))?;

    let repo = FormatRepo::new(state.db.clone());
    if repo
        .get_by_name(season_id, payload.name.trim())
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest(format!(
            "Format '{}' already exists in this season",
            payload.name.trim()
        )));
    }

    let row = repo
        .create(season_id, payload.name.trim(), payload.description.as_deref())
        .await?;
    Ok(data(row))
}

pub async fn update_format(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FormatPayload>,
) -> Result<Json<Data<TournamentFormatRow>>, AppError> {
    claims.require(|p| p.can_edit)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("Format name is required".to_string()));
    }

    let repo = FormatRepo::new(state.db.clone());
    let existing = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tournament format not found".to_string()))?;

    if let Some(other) = repo.get_by_name(existing.season_id, payload.name.trim()).await? {
        if other.id != id {
            return Err(AppError::BadRequest(format!(
                "Format '{}' already exists in this season",
                payload.name.trim()
            )));
        }
    }

    let row = repo
        .update(id, payload.name.trim(), payload.description.as_deref())
        .await?
        .ok_or_else(|| AppError::NotFound("Tournament format not found".to_string()))?;
    Ok(data(row))
}

pub async fn delete_format(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Data<bool>>, AppError> {
    claims.require(|p| p.can_delete)?;
    let deleted = FormatRepo::new(state.db.clone()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Tournament format not found".to_string()));
    }
    Ok(data(true))
}
