use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
    Extension, Json,
};

use crate::auth::Claims;
use crate::error::AppError;
use crate::routes::{data, Data};
use crate::services::ExportOutcome;
use crate::state::AppState;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// On-demand workbook download for the console; no gating, no email.
pub async fn download(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    claims.require(|p| p.can_view)?;
    let (filename, content, _) = state.exporter().build_workbook().await?;
    let headers = [
        (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, content))
}

/// The scheduler's entry point; authenticated by the shared secret
/// header, not a session. Errors from the fetch or the send are logged
/// and surfaced as a failure result, never retried.
pub async fn run(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Data<ExportOutcome>>, AppError> {
    let secret = headers
        .get("x-cron-secret")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing X-Cron-Secret header".to_string()))?;
    if secret != state.config().cron_secret {
        return Err(AppError::Unauthorized("Invalid cron secret".to_string()));
    }

    let outcome = state.exporter().run_daily().await.map_err(|error| {
        tracing::error!(%error, "daily export failed");
        error
    })?;

    tracing::info!(?outcome, "daily export finished");
    Ok(data(outcome))
}
