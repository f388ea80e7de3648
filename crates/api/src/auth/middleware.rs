use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

pub struct AuthMiddleware;

impl AuthMiddleware {
    /// Decodes the bearer token once and inserts the typed claims into
    /// request extensions. Everything behind this layer works with
    /// `Claims`, never with the raw token.
    pub async fn jwt_auth(
        State(state): State<AppState>,
        mut request: Request,
        next: Next,
    ) -> Result<Response, AppError> {
        let jwt_service = state.jwt_service();

        let auth_header = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid authorization header format".to_string()))?;

        let claims = jwt_service.verify_token(token)?;

        // Route guard for the whole admin surface: only assigned roles
        // (viewer, editor, admin) get past this point.
        if !claims.role.is_assigned() {
            return Err(AppError::Forbidden(
                "No console access has been assigned to this account".to_string(),
            ));
        }

        request.extensions_mut().insert(claims);

        Ok(next.run(request).await)
    }
}
