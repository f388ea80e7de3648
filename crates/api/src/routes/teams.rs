use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use infra::models::TeamRow;
use infra::repos::TeamRepo;

use crate::auth::Claims;
use crate::error::AppError;
use crate::routes::{data, Data};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TeamPayload {
    pub name: String,
    pub description: Option<String>,
}

impl TeamPayload {
    fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("Team name is required".to_string()));
        }
        Ok(())
    }
}

pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Data<Vec<TeamRow>>>, AppError> {
    claims.require(|p| p.can_view)?;
    let rows = TeamRepo::new(state.db.clone()).list_all().await?;
    Ok(data(rows))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Data<TeamRow>>, AppError> {
    claims.require(|p| p.can_view)?;
    let row = TeamRepo::new(state.db.clone())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Team not found".to_string()))?;
    Ok(data(row))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<TeamPayload>,
) -> Result<Json<Data<TeamRow>>, AppError> {
    claims.require(|p| p.can_create)?;
    payload.validate()?;
    let row = TeamRepo::new(state.db.clone())
        .create(payload.name.trim(), payload.description.as_deref())
        .await?;
    Ok(data(row))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TeamPayload>,
) -> Result<Json<Data<TeamRow>>, AppError> {
    claims.require(|p| p.can_edit)?;
    payload.validate()?;
    let row = TeamRepo::new(state.db.clone())
        .update(id, payload.name.trim(), payload.description.as_deref())
        .await?
        .ok_or_else(|| AppError::NotFound("Team not found".to_string()))?;
    Ok(data(row))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Data<bool>>, AppError> {
    claims.require(|p| p.can_delete)?;
    let deleted = TeamRepo::new(state.db.clone()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Team not found".to_string()));
    }
    Ok(data(true))
}
