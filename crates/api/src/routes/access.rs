use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use infra::models::AccessRow;
use infra::repos::{AccessRepo, UpsertAccess};

use crate::auth::Claims;
use crate::error::AppError;
use crate::routes::{data, Data};
use crate::state::AppState;

const ASSIGNABLE_ROLES: [&str; 3] = ["admin", "editor", "viewer"];

pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Data<Vec<AccessRow>>>, AppError> {
    claims.require(|p| p.can_manage_access)?;
    let rows = AccessRepo::new(state.db.clone()).list_all().await?;
    Ok(data(rows))
}

#[derive(Deserialize)]
pub struct UpsertAccessPayload {
    pub email: String,
    pub name: String,
    /// None revokes access; the row is kept with a NULL role.
    pub role: Option<String>,
}

pub async fn upsert(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpsertAccessPayload>,
) -> Result<Json<Data<AccessRow>>, AppError> {
    claims.require(|p| p.can_manage_access)?;

    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("A valid email is required".to_string()));
    }
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }
    if let Some(role) = payload.role.as_deref() {
        if !ASSIGNABLE_ROLES.contains(&role) {
            return Err(AppError::BadRequest(format!(
                "Role must be one of admin, editor, viewer; got '{role}'"
            )));
        }
    }

    let row = AccessRepo::new(state.db.clone())
        .upsert(UpsertAccess {
            email,
            name: payload.name.trim().to_string(),
            role: payload.role,
        })
        .await?;

    Ok(data(row))
}
