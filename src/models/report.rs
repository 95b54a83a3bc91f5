//! Report rows as the dashboards consume them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::design_change::UrgencyLevel;

/// Label used for rows whose grouping field is missing or blank.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// One `GROUP BY` bucket: a category and how many rows fell into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

impl CategoryCount {
    pub fn new(category: impl Into<String>, count: i64) -> Self {
        Self {
            category: category.into(),
            count,
        }
    }

    /// Read `{<label_field>, count}` objects as returned by the aggregate endpoints.
    pub fn from_rows(rows: &[Value], label_field: &str) -> Vec<Self> {
        rows.iter()
            .map(|row| Self {
                category: field_label(row, label_field)
                    .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
                count: row_count(row).unwrap_or(0),
            })
            .collect()
    }
}

/// Pie chart slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieSlice {
    pub id: String,
    pub label: String,
    pub value: i64,
}

impl PieSlice {
    pub fn new(label: impl Into<String>, value: i64) -> Self {
        let label = label.into();
        Self {
            id: label.clone(),
            label,
            value,
        }
    }
}

/// Point on a time series line chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinePoint {
    pub x: String,
    pub y: i64,
}

/// Urgency and importance counts side by side for one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgencyImportanceRow {
    pub level: UrgencyLevel,
    pub urgency_count: i64,
    pub importance_count: i64,
}

/// Display label of a JSON field. Missing, null, empty, `0` and `false` values have none.
pub fn field_label(row: &Value, field: &str) -> Option<String> {
    match row.get(field)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// The `count` column of an aggregate row, if present.
///
/// MySQL `SUM`/`DECIMAL` values may arrive as strings, so those are parsed too.
pub fn row_count(row: &Value) -> Option<i64> {
    match row.get("count")? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
