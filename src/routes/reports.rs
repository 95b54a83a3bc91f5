//! Report routes: one aggregate query per endpoint.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::{ApiResponse, AppError};
use crate::services::reports::{self, ReportQuery};
use crate::AppState;

type ReportResponse = Result<Json<ApiResponse<Vec<Value>>>, AppError>;

/// Query parameters for `/urgency`.
#[derive(Debug, Deserialize)]
pub struct UrgencyParams {
    pub level: Option<String>,
}

async fn respond(state: &AppState, report: &ReportQuery, filter: Option<&str>) -> ReportResponse {
    let result = reports::run(&state.db, report, filter).await?;
    Ok(ApiResponse::success(result.message, result.rows))
}

/// GET /yearly-projects — revision count per release year, ascending.
pub async fn yearly_projects(State(state): State<AppState>) -> ReportResponse {
    respond(&state, &reports::YEARLY_PROJECTS, None).await
}

/// GET /monthly-projects — revision count per `YYYY-MM`, ascending.
pub async fn monthly_projects(State(state): State<AppState>) -> ReportResponse {
    respond(&state, &reports::MONTHLY_PROJECTS, None).await
}

/// GET /department-count — revision count per releasing department.
pub async fn department_count(State(state): State<AppState>) -> ReportResponse {
    respond(&state, &reports::DEPARTMENT_COUNT, None).await
}

/// GET /cause-frequency — revision count per cause code.
pub async fn cause_frequency(State(state): State<AppState>) -> ReportResponse {
    respond(&state, &reports::CAUSE_FREQUENCY, None).await
}

/// GET /urgency?level= — raw design change requests at one urgency level.
///
/// Unknown levels are passed through and simply match nothing.
pub async fn urgency(
    State(state): State<AppState>,
    Query(params): Query<UrgencyParams>,
) -> ReportResponse {
    respond(&state, &reports::URGENCY, params.level.as_deref()).await
}

/// GET /status — design change request count per progress status.
pub async fn status(State(state): State<AppState>) -> ReportResponse {
    respond(&state, &reports::STATUS, None).await
}

/// GET /urgencyImportance — request count per (urgency, importance) pair.
pub async fn urgency_importance(State(state): State<AppState>) -> ReportResponse {
    respond(&state, &reports::URGENCY_IMPORTANCE, None).await
}
