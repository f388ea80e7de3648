use std::time::Duration;

use axum::{
    extract::State,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth::middleware::AuthMiddleware;
use crate::error::AppError;
use crate::routes;
use crate::state::AppState;

/// Build the Axum router: a public surface (health, sign-in, the cron
/// hook) plus the session-guarded console API.
pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        // Simple liveness check; also proves DB connectivity.
        .route("/health", get(health))
        .route("/api/auth/google/authorize", get(routes::auth::google_authorize))
        .route("/api/auth/google/callback", get(routes::auth::google_callback))
        // Shared-secret header auth, checked in the handler.
        .route("/api/export/run", post(routes::export::run));

    let console = Router::new()
        .route("/api/access", get(routes::access::list).post(routes::access::upsert))
        .route("/api/teams", get(routes::teams::list).post(routes::teams::create))
        .route(
            "/api/teams/:id",
            get(routes::teams::get)
                .put(routes::teams::update)
                .delete(routes::teams::delete),
        )
        .route("/api/members", get(routes::members::list).post(routes::members::create))
        .route(
            "/api/members/:id",
            get(routes::members::get)
                .put(routes::members::update)
                .delete(routes::members::delete),
        )
        .route("/api/seasons", get(routes::seasons::list).post(routes::seasons::create))
        .route(
            "/api/seasons/:id",
            get(routes::seasons::get)
                .put(routes::seasons::update)
                .delete(routes::seasons::delete),
        )
        .route(
            "/api/seasons/:id/formats",
            get(routes::seasons::list_formats).post(routes::seasons::create_format),
        )
        .route(
            "/api/formats/:id",
            put(routes::seasons::update_format).delete(routes::seasons::delete_format),
        )
        .route("/api/events", get(routes::events::list).post(routes::events::create))
        .route(
            "/api/events/:id",
            get(routes::events::get)
                .put(routes::events::update)
                .delete(routes::events::delete),
        )
        .route(
            "/api/events/:id/team-rsvps",
            get(routes::rsvps::team_rsvps).put(routes::rsvps::upsert_rsvp),
        )
        .route("/api/member-dues", get(routes::dues::list).post(routes::dues::create))
        .route("/api/member-dues/:id", put(routes::dues::update))
        .route(
            "/api/general-expenses",
            get(routes::expenses::list).post(routes::expenses::create),
        )
        .route("/api/general-expenses/:id", put(routes::expenses::update))
        .route("/api/notifications", get(routes::notifications::list))
        .route("/api/notifications/:id/read", put(routes::notifications::mark_read))
        .route("/api/notifications/rsvp-change", post(routes::notifications::rsvp_change))
        .route("/api/notifications/dues-reminder", post(routes::notifications::dues_reminder))
        .route("/api/notifications/daily-report", post(routes::notifications::daily_report))
        .route("/api/export/download", get(routes::export::download))
        // One enforcement point: decode the session and turn away
        // unassigned identities before any handler runs.
        .layer(middleware::from_fn_with_state(state.clone(), AuthMiddleware::jwt_auth));

    Router::new()
        .merge(public)
        .merge(console)
        .with_state(state)
        // Useful default middlewares
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(CorsLayer::permissive()) // tighten later
}

/// Liveness + quick DB probe.
async fn health(State(state): State<AppState>) -> Result<&'static str, AppError> {
    infra::db::ping(&state.db).await?;
    Ok("ok")
}
