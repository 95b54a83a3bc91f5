//! The two dashboards: report states, chart selection and the resulting view.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;

use super::state::ReportState;
use super::transform::{
    group_by_field, line_points, merge_status_counts, merge_urgency_importance,
    sort_by_count_desc, top_n, DEFAULT_TOP_N,
};
use super::DashboardClient;
use crate::models::design_change::UrgencyLevel;
use crate::models::report::{CategoryCount, LinePoint, PieSlice, UrgencyImportanceRow};

/// Shown when no chart is selected.
pub const SELECT_PROMPT: &str = "차트를 선택해 주세요.";

/// Shown while a chart has no data.
pub const LOADING_MESSAGE: &str = "데이터를 불러오는 중입니다...";

/// What the charting layer should draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartView {
    Unselected,
    Loading {
        title: String,
    },
    Line {
        title: String,
        series_id: String,
        points: Vec<LinePoint>,
    },
    Bar {
        title: String,
        index_by: String,
        bars: Vec<CategoryCount>,
    },
    GroupedBar {
        title: String,
        rows: Vec<UrgencyImportanceRow>,
    },
    Pie {
        title: String,
        slices: Vec<PieSlice>,
    },
}

impl ChartView {
    /// Placeholder text for views without chart data.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::Unselected => Some(SELECT_PROMPT),
            Self::Loading { .. } => Some(LOADING_MESSAGE),
            _ => None,
        }
    }

    fn line(title: &str, series_id: &str, points: Vec<LinePoint>) -> Self {
        if points.is_empty() {
            return Self::Loading { title: title.into() };
        }
        Self::Line {
            title: title.into(),
            series_id: series_id.into(),
            points,
        }
    }

    fn bar(title: &str, index_by: &str, bars: Vec<CategoryCount>) -> Self {
        if bars.is_empty() {
            return Self::Loading { title: title.into() };
        }
        Self::Bar {
            title: title.into(),
            index_by: index_by.into(),
            bars,
        }
    }

    fn pie(title: &str, slices: Vec<PieSlice>) -> Self {
        if slices.is_empty() {
            return Self::Loading { title: title.into() };
        }
        Self::Pie {
            title: title.into(),
            slices,
        }
    }
}

// -- Revised drawing dashboard --

/// Charts on the revised drawing dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DrawingChart {
    Yearly,
    Monthly,
    Department,
    CauseFrequency,
}

impl DrawingChart {
    pub const ALL: [DrawingChart; 4] = [
        Self::Yearly,
        Self::Monthly,
        Self::Department,
        Self::CauseFrequency,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Yearly => "yearly",
            Self::Monthly => "monthly",
            Self::Department => "department",
            Self::CauseFrequency => "causeFrequency",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Yearly => "연도별 프로젝트 수",
            Self::Monthly => "월별 프로젝트 수",
            Self::Department => "부서별 출도 수",
            Self::CauseFrequency => "원인코드별 발생빈도",
        }
    }

    /// Service path of the report this chart draws.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Yearly => "/yearly-projects",
            Self::Monthly => "/monthly-projects",
            Self::Department => "/department-count",
            Self::CauseFrequency => "/cause-frequency",
        }
    }
}

impl fmt::Display for DrawingChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for DrawingChart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|chart| chart.id() == s)
            .ok_or_else(|| format!("unknown drawing chart: {s}"))
    }
}

/// Revised drawing dashboard. Nothing is selected initially.
#[derive(Debug, Clone, Default)]
pub struct DrawingDashboard {
    pub yearly: ReportState,
    pub monthly: ReportState,
    pub department: ReportState,
    pub cause_frequency: ReportState,
    active: Option<DrawingChart>,
}

impl DrawingDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch every report concurrently.
    ///
    /// Each report settles as soon as its own response arrives, so dropping
    /// this future early leaves only the unanswered reports in `Loading`.
    pub async fn load(&mut self, client: &DashboardClient) {
        let mut pending = JoinSet::new();
        for chart in DrawingChart::ALL {
            self.report_mut(chart).start();
            let client = client.clone();
            pending.spawn(async move { (chart, client.fetch_report(chart.endpoint(), &[]).await) });
        }

        while let Some(joined) = pending.join_next().await {
            match joined {
                Ok((chart, result)) => self.report_mut(chart).finish(chart.endpoint(), result),
                Err(e) => tracing::error!(error = %e, "Report fetch task aborted"),
            }
        }
    }

    /// State of the report behind `chart`.
    pub fn report(&self, chart: DrawingChart) -> &ReportState {
        match chart {
            DrawingChart::Yearly => &self.yearly,
            DrawingChart::Monthly => &self.monthly,
            DrawingChart::Department => &self.department,
            DrawingChart::CauseFrequency => &self.cause_frequency,
        }
    }

    fn report_mut(&mut self, chart: DrawingChart) -> &mut ReportState {
        match chart {
            DrawingChart::Yearly => &mut self.yearly,
            DrawingChart::Monthly => &mut self.monthly,
            DrawingChart::Department => &mut self.department,
            DrawingChart::CauseFrequency => &mut self.cause_frequency,
        }
    }

    pub fn select(&mut self, chart: DrawingChart) {
        self.active = Some(chart);
    }

    pub fn active(&self) -> Option<DrawingChart> {
        self.active
    }

    pub fn view(&self) -> ChartView {
        let Some(chart) = self.active else {
            return ChartView::Unselected;
        };
        let title = chart.title();

        match chart {
            DrawingChart::Yearly => {
                ChartView::line(title, "Yearly Projects", line_points(self.yearly.rows(), "year"))
            }
            DrawingChart::Monthly => ChartView::line(
                title,
                "Monthly Projects",
                line_points(self.monthly.rows(), "month"),
            ),
            DrawingChart::Department => {
                let rows = CategoryCount::from_rows(self.department.rows(), "release_department");
                ChartView::bar(title, "release_department", top_n(&rows, DEFAULT_TOP_N))
            }
            DrawingChart::CauseFrequency => {
                let rows = CategoryCount::from_rows(self.cause_frequency.rows(), "cause_code");
                ChartView::bar(title, "cause_code", sort_by_count_desc(&rows))
            }
        }
    }
}

// -- Design change dashboard --

/// Charts on the design change dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DesignChangeChart {
    HighUrgency,
    MediumUrgency,
    LowUrgency,
    Status,
    UrgencyImportance,
}

impl DesignChangeChart {
    pub const ALL: [DesignChangeChart; 5] = [
        Self::HighUrgency,
        Self::MediumUrgency,
        Self::LowUrgency,
        Self::Status,
        Self::UrgencyImportance,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::HighUrgency => "highUrgency",
            Self::MediumUrgency => "mediumUrgency",
            Self::LowUrgency => "lowUrgency",
            Self::Status => "status",
            Self::UrgencyImportance => "urgencyImportance",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::HighUrgency => "상 긴급도 차트",
            Self::MediumUrgency => "중 긴급도 차트",
            Self::LowUrgency => "하 긴급도 차트",
            Self::Status => "진행상태 차트",
            Self::UrgencyImportance => "긴급도/중요도 차트",
        }
    }

    /// Service path of the report this chart draws.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::HighUrgency | Self::MediumUrgency | Self::LowUrgency => "/urgency",
            Self::Status => "/status",
            Self::UrgencyImportance => "/urgencyImportance",
        }
    }

    /// Urgency level filter sent with `/urgency`.
    pub fn urgency(self) -> Option<UrgencyLevel> {
        match self {
            Self::HighUrgency => Some(UrgencyLevel::High),
            Self::MediumUrgency => Some(UrgencyLevel::Medium),
            Self::LowUrgency => Some(UrgencyLevel::Low),
            Self::Status | Self::UrgencyImportance => None,
        }
    }
}

impl fmt::Display for DesignChangeChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for DesignChangeChart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|chart| chart.id() == s)
            .ok_or_else(|| format!("unknown design change chart: {s}"))
    }
}

/// Design change dashboard. Opens on the high urgency chart.
#[derive(Debug, Clone)]
pub struct DesignChangeDashboard {
    pub high_urgency: ReportState,
    pub medium_urgency: ReportState,
    pub low_urgency: ReportState,
    pub status: ReportState,
    pub urgency_importance: ReportState,
    active: Option<DesignChangeChart>,
}

impl Default for DesignChangeDashboard {
    fn default() -> Self {
        Self {
            high_urgency: ReportState::default(),
            medium_urgency: ReportState::default(),
            low_urgency: ReportState::default(),
            status: ReportState::default(),
            urgency_importance: ReportState::default(),
            active: Some(DesignChangeChart::HighUrgency),
        }
    }
}

impl DesignChangeDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch every report concurrently.
    ///
    /// Each report settles as soon as its own response arrives, so dropping
    /// this future early leaves only the unanswered reports in `Loading`.
    pub async fn load(&mut self, client: &DashboardClient) {
        let mut pending = JoinSet::new();
        for chart in DesignChangeChart::ALL {
            self.report_mut(chart).start();
            let client = client.clone();
            pending.spawn(async move {
                let params: Vec<(&str, &str)> = chart
                    .urgency()
                    .map(|level| vec![("level", level.as_str())])
                    .unwrap_or_default();
                (chart, client.fetch_report(chart.endpoint(), &params).await)
            });
        }

        while let Some(joined) = pending.join_next().await {
            match joined {
                Ok((chart, result)) => self.report_mut(chart).finish(chart.id(), result),
                Err(e) => tracing::error!(error = %e, "Report fetch task aborted"),
            }
        }
    }

    /// State of the report behind `chart`.
    pub fn report(&self, chart: DesignChangeChart) -> &ReportState {
        match chart {
            DesignChangeChart::HighUrgency => &self.high_urgency,
            DesignChangeChart::MediumUrgency => &self.medium_urgency,
            DesignChangeChart::LowUrgency => &self.low_urgency,
            DesignChangeChart::Status => &self.status,
            DesignChangeChart::UrgencyImportance => &self.urgency_importance,
        }
    }

    fn report_mut(&mut self, chart: DesignChangeChart) -> &mut ReportState {
        match chart {
            DesignChangeChart::HighUrgency => &mut self.high_urgency,
            DesignChangeChart::MediumUrgency => &mut self.medium_urgency,
            DesignChangeChart::LowUrgency => &mut self.low_urgency,
            DesignChangeChart::Status => &mut self.status,
            DesignChangeChart::UrgencyImportance => &mut self.urgency_importance,
        }
    }

    pub fn select(&mut self, chart: DesignChangeChart) {
        self.active = Some(chart);
    }

    pub fn active(&self) -> Option<DesignChangeChart> {
        self.active
    }

    pub fn view(&self) -> ChartView {
        let Some(chart) = self.active else {
            return ChartView::Unselected;
        };
        let title = chart.title();

        match chart {
            DesignChangeChart::HighUrgency => {
                ChartView::pie(title, group_by_field(self.high_urgency.rows(), "status_ongoing"))
            }
            DesignChangeChart::MediumUrgency => ChartView::pie(
                title,
                group_by_field(self.medium_urgency.rows(), "status_ongoing"),
            ),
            DesignChangeChart::LowUrgency => {
                ChartView::pie(title, group_by_field(self.low_urgency.rows(), "status_ongoing"))
            }
            DesignChangeChart::Status => {
                ChartView::pie(title, merge_status_counts(self.status.rows()))
            }
            DesignChangeChart::UrgencyImportance => ChartView::GroupedBar {
                title: title.into(),
                rows: merge_urgency_importance(
                    self.high_urgency.rows(),
                    self.medium_urgency.rows(),
                    self.low_urgency.rows(),
                    self.urgency_importance.rows(),
                )
                .to_vec(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn loaded(rows: Vec<serde_json::Value>) -> ReportState {
        ReportState::Loaded(rows)
    }

    #[test]
    fn drawing_dashboard_starts_unselected() {
        let dashboard = DrawingDashboard::new();
        assert_eq!(dashboard.active(), None);
        assert_eq!(dashboard.view(), ChartView::Unselected);
        assert_eq!(dashboard.view().placeholder(), Some(SELECT_PROMPT));
    }

    #[test]
    fn selected_chart_without_data_is_loading() {
        let mut dashboard = DrawingDashboard::new();
        dashboard.select(DrawingChart::Department);
        let view = dashboard.view();
        assert_eq!(
            view,
            ChartView::Loading {
                title: "부서별 출도 수".into()
            }
        );
        assert_eq!(view.placeholder(), Some(LOADING_MESSAGE));
    }

    #[test]
    fn yearly_chart_is_a_line_series() {
        let mut dashboard = DrawingDashboard::new();
        dashboard.yearly = loaded(vec![
            json!({"year": 2022, "count": 4}),
            json!({"year": 2023, "count": 6}),
        ]);
        dashboard.select(DrawingChart::Yearly);
        match dashboard.view() {
            ChartView::Line {
                series_id, points, ..
            } => {
                assert_eq!(series_id, "Yearly Projects");
                assert_eq!(points.len(), 2);
                assert_eq!(points[1], LinePoint { x: "2023".into(), y: 6 });
            }
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn department_chart_collapses_past_ten() {
        let rows = (0..12)
            .map(|i| json!({"release_department": format!("D{i}"), "count": 20 - i}))
            .collect();
        let mut dashboard = DrawingDashboard::new();
        dashboard.department = loaded(rows);
        dashboard.select(DrawingChart::Department);
        let ChartView::Bar { bars, index_by, .. } = dashboard.view() else {
            panic!("expected bar chart");
        };
        assert_eq!(index_by, "release_department");
        assert_eq!(bars.len(), 11);
        assert_eq!(bars[10], CategoryCount::new("기타", 10 + 9));
    }

    #[test]
    fn cause_chart_sorted_descending_without_collapse() {
        let mut dashboard = DrawingDashboard::new();
        dashboard.cause_frequency = loaded(vec![
            json!({"cause_code": "C1", "count": 1}),
            json!({"cause_code": "C2", "count": 7}),
            json!({"cause_code": "C3", "count": 3}),
        ]);
        dashboard.select(DrawingChart::CauseFrequency);
        let ChartView::Bar { bars, .. } = dashboard.view() else {
            panic!("expected bar chart");
        };
        let order: Vec<&str> = bars.iter().map(|b| b.category.as_str()).collect();
        assert_eq!(order, vec!["C2", "C3", "C1"]);
    }

    #[test]
    fn design_change_defaults_to_high_urgency() {
        let mut dashboard = DesignChangeDashboard::new();
        assert_eq!(dashboard.active(), Some(DesignChangeChart::HighUrgency));
        dashboard.high_urgency = loaded(vec![
            json!({"id": 1, "status_ongoing": "진행중"}),
            json!({"id": 2, "status_ongoing": "완료"}),
        ]);
        assert_eq!(
            dashboard.view(),
            ChartView::Pie {
                title: "상 긴급도 차트".into(),
                slices: vec![PieSlice::new("진행중", 1), PieSlice::new("완료", 1)],
            }
        );
    }

    #[test]
    fn failed_report_renders_placeholder() {
        let mut dashboard = DesignChangeDashboard::new();
        dashboard.status = ReportState::Failed("connection refused".into());
        dashboard.select(DesignChangeChart::Status);
        assert!(matches!(dashboard.view(), ChartView::Loading { .. }));
    }

    #[test]
    fn urgency_importance_chart_always_has_three_rows() {
        let mut dashboard = DesignChangeDashboard::new();
        dashboard.select(DesignChangeChart::UrgencyImportance);
        let ChartView::GroupedBar { rows, .. } = dashboard.view() else {
            panic!("expected grouped bar chart");
        };
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn chart_ids_parse_back() {
        for chart in DrawingChart::ALL {
            assert_eq!(chart.id().parse::<DrawingChart>(), Ok(chart));
        }
        for chart in DesignChangeChart::ALL {
            assert_eq!(chart.to_string().parse::<DesignChangeChart>(), Ok(chart));
        }
        assert!("pie".parse::<DesignChangeChart>().is_err());
    }

    #[test]
    fn view_serializes_with_kind_tag() {
        let view = ChartView::Loading {
            title: "진행상태 차트".into(),
        };
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            json!({"kind": "loading", "title": "진행상태 차트"})
        );
    }

    #[test]
    fn urgency_charts_share_one_endpoint_with_distinct_levels() {
        let levels: Vec<_> = DesignChangeChart::ALL
            .into_iter()
            .filter(|chart| chart.endpoint() == "/urgency")
            .map(|chart| chart.urgency().map(UrgencyLevel::as_str))
            .collect();
        assert_eq!(levels, vec![Some("상"), Some("중"), Some("하")]);
        assert_eq!(DesignChangeChart::Status.urgency(), None);
    }

    #[test]
    fn report_follows_chart() {
        let mut dashboard = DrawingDashboard::new();
        dashboard.report_mut(DrawingChart::Monthly).start();
        assert!(dashboard.report(DrawingChart::Monthly).is_loading());
        assert!(!dashboard.report(DrawingChart::Yearly).is_loading());
    }
}
