//! Process and database health, plus the welcome envelope at `/`.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::ApiResponse;
use crate::{db, routes, AppState};

/// Body of `/health/ready`.
///
/// `status` is `ok` when the store answers and `degraded` otherwise; the
/// report endpoints stay mounted either way and fail per request.
#[derive(Debug, Serialize)]
pub struct Readiness {
    pub status: &'static str,
    pub database: String,
    pub deployment: &'static str,
    pub reports: Vec<&'static str>,
}

pub async fn live() -> &'static str {
    "OK"
}

pub async fn ready(State(state): State<AppState>) -> Json<ApiResponse<Readiness>> {
    let deployment = state.config.deployment;
    let (status, database) = match db::ping(&state.db).await {
        Ok(()) => ("ok", "connected".to_string()),
        Err(e) => {
            tracing::warn!(
                error = %e,
                deployment = deployment.as_str(),
                "Readiness check could not reach the database"
            );
            ("degraded", format!("error: {e}"))
        }
    };

    ApiResponse::success(
        format!("{} dashboard service", deployment.as_str()),
        Readiness {
            status,
            database,
            deployment: deployment.as_str(),
            reports: routes::mounted_reports(deployment),
        },
    )
}

pub async fn welcome() -> Json<ApiResponse<()>> {
    ApiResponse::message("Welcome to the dashboard service.")
}
