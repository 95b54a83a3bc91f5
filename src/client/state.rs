//! Per-report view state.

use serde_json::Value;

use super::ClientError;

/// Lifecycle of one report on a dashboard: `Idle → Loading → Loaded | Failed`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ReportState {
    #[default]
    Idle,
    Loading,
    Loaded(Vec<Value>),
    Failed(String),
}

impl ReportState {
    /// Mark the report as requested.
    pub fn start(&mut self) {
        *self = Self::Loading;
    }

    /// Settle a request. Failures are logged and leave the report without rows.
    pub fn finish(&mut self, report: &str, result: Result<Vec<Value>, ClientError>) {
        *self = match result {
            Ok(rows) => Self::Loaded(rows),
            Err(e) => {
                tracing::warn!(report, error = %e, "Report fetch failed");
                Self::Failed(e.to_string())
            }
        };
    }

    /// Rows available for rendering; empty unless loaded.
    pub fn rows(&self) -> &[Value] {
        match self {
            Self::Loaded(rows) => rows,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}
