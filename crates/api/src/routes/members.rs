use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use infra::models::MemberRow;
use infra::pagination::LimitOffset;
use infra::repos::{MemberFilter, MemberRepo, NewMember, TeamRepo, UpdateMember};

use crate::auth::Claims;
use crate::error::AppError;
use crate::routes::{data, Data};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    pub team_id: Option<Uuid>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct MemberPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub team_id: Uuid,
    pub role: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
}

impl MemberPayload {
    fn validate(&self) -> Result<(), AppError> {
        for (value, field) in [
            (&self.first_name, "first_name"),
            (&self.last_name, "last_name"),
            (&self.phone, "phone"),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::BadRequest(format!("{field} is required")));
            }
        }
        if !self.email.contains('@') {
            return Err(AppError::BadRequest("A valid email is required".to_string()));
        }
        Ok(())
    }
}

async fn ensure_team_exists(state: &AppState, team_id: Uuid) -> Result<(), AppError> {
    TeamRepo::new(state.db.clone())
        .get(team_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::BadRequest("Referenced team does not exist".to_string()))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Data<Vec<MemberRow>>>, AppError> {
    claims.require(|p| p.can_view)?;
    let rows = MemberRepo::new(state.db.clone())
        .list(
            MemberFilter {
                team_id: query.team_id,
                search: query.search,
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
) -> Result<Json<Data<MemberRow>>, AppError> {
    claims.require(|p| p.can_view)?;
    let row = MemberRepo::new(state.db.clone())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;
    Ok(data(row))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<MemberPayload>,
) -> Result<Json<Data<MemberRow>>, AppError> {
    claims.require(|p| p.can_create)?;
    payload.validate()?;
    ensure_team_exists(&state, payload.team_id).await?;

    let row = MemberRepo::new(state.db.clone())
        .create(NewMember {
            first_name: payload.first_name.trim().to_string(),
            last_name: payload.last_name.trim().to_string(),
            email: payload.email.trim().to_string(),
            phone: payload.phone.trim().to_string(),
            team_id: payload.team_id,
            role: payload.role,
            date_of_birth: payload.date_of_birth,
            gender: payload.gender,
            created_by: Some(claims.email.clone()),
        })
        .await?;
    Ok(data(row))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<MemberPayload>,
) -> Result<Json<Data<MemberRow>>, AppError> {
    claims.require(|p| p.can_edit)?;
    payload.validate()?;
    ensure_team_exists(&state, payload.team_id).await?;

    let row = MemberRepo::new(state.db.clone())
        .update(
            id,
            UpdateMember {
                first_name: payload.first_name.trim().to_string(),
                last_name: payload.last_name.trim().to_string(),
                email: payload.email.trim().to_string(),
                phone: payload.phone.trim().to_string(),
                team_id: payload.team_id,
                role: payload.role,
                date_of_birth: payload.date_of_birth,
                gender: payload.gender,
                last_updated_by: Some(claims.email.clone()),
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;
    Ok(data(row))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Data<bool>>, AppError> {
    claims.require(|p| p.can_delete)?;
    let deleted = MemberRepo::new(state.db.clone()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Member not found".to_string()));
    }
    Ok(data(true))
}
