//! Route definitions for the dashboard service.

pub mod health;
pub mod reports;

use axum::{http::Uri, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Deployment;
use crate::errors::AppError;
use crate::AppState;

const DRAWING_REPORTS: [&str; 4] = [
    "/yearly-projects",
    "/monthly-projects",
    "/department-count",
    "/cause-frequency",
];

const DESIGN_CHANGE_REPORTS: [&str; 3] = ["/urgency", "/status", "/urgencyImportance"];

/// Report paths mounted for a deployment, drawing reports first.
pub fn mounted_reports(deployment: Deployment) -> Vec<&'static str> {
    let mut paths = Vec::new();
    if deployment.serves_drawing() {
        paths.extend(DRAWING_REPORTS);
    }
    if deployment.serves_design_change() {
        paths.extend(DESIGN_CHANGE_REPORTS);
    }
    paths
}

/// Build the full router for the configured deployment.
pub fn router(state: AppState) -> Router {
    let deployment = state.config.deployment;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready));

    if deployment.serves_drawing() {
        let [yearly, monthly, department, cause] = DRAWING_REPORTS;
        app = app
            .route(yearly, get(reports::yearly_projects))
            .route(monthly, get(reports::monthly_projects))
            .route(department, get(reports::department_count))
            .route(cause, get(reports::cause_frequency));
    }

    if deployment.serves_design_change() {
        let [urgency, status, urgency_importance] = DESIGN_CHANGE_REPORTS;
        app = app
            .route("/", get(health::welcome))
            .route(urgency, get(reports::urgency))
            .route(status, get(reports::status))
            .route(urgency_importance, get(reports::urgency_importance));
    }

    app.fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
