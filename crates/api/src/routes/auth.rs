use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::permissions::{resolve_identity, Role};
use crate::error::AppError;
use crate::routes::{data, Data};
use crate::state::AppState;

#[derive(Serialize)]
pub struct AuthorizeUrl {
    pub auth_url: String,
    pub csrf_token: String,
}

/// Step one of sign-in: hand the browser the provider authorize URL.
pub async fn google_authorize(
    State(state): State<AppState>,
) -> Result<Json<Data<AuthorizeUrl>>, AppError> {
    let (auth_url, csrf_token) = state.oauth_service().get_authorize_url()?;
    Ok(data(AuthorizeUrl {
        auth_url,
        csrf_token,
    }))
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    pub code: String,
    #[allow(dead_code)]
    pub state: Option<String>,
}

#[derive(Serialize)]
pub struct SessionPayload {
    pub token: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// Step two: exchange the code, resolve the console role by email and
/// mint the session token. The role is baked in here and not re-read
/// until the next sign-in.
pub async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<Data<SessionPayload>>, AppError> {
    let user_info = state
        .oauth_service()
        .exchange_code_for_user_info(query.code)
        .await?;

    let (access_id, role) = resolve_identity(&state.db, &user_info.email).await?;
    // Identities without an access row still get a token; the route
    // guard turns them away from everything behind it.
    let access_id = access_id.unwrap_or_else(Uuid::nil);

    let token = state
        .jwt_service()
        .create_token(access_id, user_info.email.to_lowercase(), role)?;

    Ok(data(SessionPayload {
        token,
        email: user_info.email.to_lowercase(),
        name: user_info.name,
        role,
    }))
}
