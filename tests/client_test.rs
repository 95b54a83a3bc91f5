//! Dashboard client against an in-process stub of the report service.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use shipdash::client::dashboards::{
    ChartView, DesignChangeChart, DesignChangeDashboard, DrawingChart, DrawingDashboard,
};
use shipdash::client::state::ReportState;
use shipdash::client::{ClientError, DashboardClient};
use shipdash::models::report::PieSlice;
use tokio::net::TcpListener;

fn ok(data: Value) -> Json<Value> {
    Json(json!({"error": false, "message": "ok", "data": data}))
}

async fn urgency(Query(params): Query<std::collections::HashMap<String, String>>) -> Json<Value> {
    match params.get("level").map(String::as_str) {
        Some("상") => ok(json!([
            {"id": 1, "urgency_level": "상", "status_ongoing": "진행중"},
            {"id": 2, "urgency_level": "상", "status_ongoing": "완료"},
            {"id": 3, "urgency_level": "상", "status_ongoing": "진행중"},
        ])),
        Some("중") => ok(json!([{"id": 4, "urgency_level": "중", "status_ongoing": "완료"}])),
        _ => Json(json!({"error": false, "message": "No data found for level 하", "data": []})),
    }
}

/// Serve `app` on a random port and return its base URL.
async fn serve(app: Router) -> String {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Serve the stub on a random port and return its base URL.
async fn start_stub() -> String {
    let app = Router::new()
        .route(
            "/yearly-projects",
            get(|| async { ok(json!([{"year": 2022, "count": 3}, {"year": 2023, "count": 5}])) }),
        )
        .route(
            "/monthly-projects",
            get(|| async { ok(json!([{"month": "2023-01", "count": 5}])) }),
        )
        .route(
            "/department-count",
            get(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": true,
                        "message": "Internal Server Error",
                        "details": "Table 'status_revised_drawing' doesn't exist",
                    })),
                )
            }),
        )
        .route(
            "/cause-frequency",
            get(|| async { ok(json!([{"cause_code": "A1", "count": 2}, {"cause_code": "B7", "count": 9}])) }),
        )
        .route("/urgency", get(urgency))
        .route(
            "/status",
            get(|| async { ok(json!([{"status_ongoing": "진행중", "count": 2}, {"status_ongoing": "완료", "count": 1}])) }),
        )
        .route(
            "/urgencyImportance",
            get(|| async {
                ok(json!([
                    {"urgency_level": "상", "importance_level": "High", "count": 2},
                    {"urgency_level": "중", "importance_level": "Low", "count": 1},
                ]))
            }),
        );

    serve(app).await
}

#[tokio::test]
async fn fetch_report_returns_envelope_data() {
    let client = DashboardClient::new(start_stub().await).unwrap();
    let rows = client
        .fetch_report("/urgency", &[("level", "상")])
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn fetch_report_surfaces_status_and_message() {
    let client = DashboardClient::new(start_stub().await).unwrap();
    let err = client.fetch_report("/department-count", &[]).await.unwrap_err();
    match err {
        ClientError::Status { status, message, .. } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn one_failed_report_does_not_block_the_others() {
    let client = DashboardClient::new(start_stub().await).unwrap();
    let mut dashboard = DrawingDashboard::new();
    dashboard.load(&client).await;

    assert!(dashboard.department.is_failed());
    assert_eq!(dashboard.yearly.rows().len(), 2);
    assert_eq!(dashboard.monthly.rows().len(), 1);
    assert_eq!(dashboard.cause_frequency.rows().len(), 2);

    dashboard.select(DrawingChart::Department);
    assert!(matches!(dashboard.view(), ChartView::Loading { .. }));

    dashboard.select(DrawingChart::CauseFrequency);
    let ChartView::Bar { bars, .. } = dashboard.view() else {
        panic!("expected bar chart");
    };
    assert_eq!(bars[0].category, "B7");
}

#[tokio::test]
async fn design_change_dashboard_loads_all_reports() {
    let client = DashboardClient::new(start_stub().await).unwrap();
    let mut dashboard = DesignChangeDashboard::new();
    dashboard.load(&client).await;

    assert_eq!(dashboard.low_urgency, ReportState::Loaded(vec![]));
    assert_eq!(
        dashboard.view(),
        ChartView::Pie {
            title: "상 긴급도 차트".into(),
            slices: vec![PieSlice::new("진행중", 2), PieSlice::new("완료", 1)],
        }
    );

    dashboard.select(DesignChangeChart::LowUrgency);
    assert!(matches!(dashboard.view(), ChartView::Loading { .. }));

    dashboard.select(DesignChangeChart::UrgencyImportance);
    let ChartView::GroupedBar { rows, .. } = dashboard.view() else {
        panic!("expected grouped bar chart");
    };
    let counts: Vec<(i64, i64)> = rows
        .iter()
        .map(|r| (r.urgency_count, r.importance_count))
        .collect();
    assert_eq!(counts, vec![(3, 2), (1, 0), (0, 1)]);
}

#[tokio::test]
async fn unreachable_service_fails_every_report() {
    let client = DashboardClient::new("http://127.0.0.1:1").unwrap();
    let mut dashboard = DesignChangeDashboard::new();
    dashboard.load(&client).await;

    assert!(dashboard.high_urgency.is_failed());
    assert!(dashboard.status.is_failed());
    assert!(dashboard.urgency_importance.is_failed());
    assert!(matches!(dashboard.view(), ChartView::Loading { .. }));
}

#[tokio::test]
async fn hung_report_does_not_hold_back_the_others() {
    let app = Router::new()
        .route(
            "/yearly-projects",
            get(|| async { ok(json!([{"year": 2024, "count": 1}])) }),
        )
        .route(
            "/monthly-projects",
            get(|| async { std::future::pending::<Json<Value>>().await }),
        )
        .route(
            "/department-count",
            get(|| async { ok(json!([{"release_department": "선체설계", "count": 1}])) }),
        )
        .route(
            "/cause-frequency",
            get(|| async { ok(json!([{"cause_code": "A1", "count": 1}])) }),
        );
    let client = DashboardClient::new(serve(app).await).unwrap();
    let mut dashboard = DrawingDashboard::new();

    let outcome = tokio::time::timeout(Duration::from_secs(2), dashboard.load(&client)).await;
    assert!(outcome.is_err(), "load should still be waiting on the hung report");

    assert!(dashboard.monthly.is_loading());
    assert_eq!(dashboard.yearly.rows().len(), 1);
    assert_eq!(dashboard.department.rows().len(), 1);
    assert_eq!(dashboard.cause_frequency.rows().len(), 1);

    dashboard.select(DrawingChart::Yearly);
    assert!(matches!(dashboard.view(), ChartView::Line { .. }));
    dashboard.select(DrawingChart::Monthly);
    assert!(matches!(dashboard.view(), ChartView::Loading { .. }));
}
