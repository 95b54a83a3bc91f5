//! Report descriptors and their aggregate queries.
//!
//! Every endpoint is one `ReportQuery`: a table, what to select from it, an
//! optional equality filter and whether rows come back ordered by bucket.
//! SQL text is generated from the descriptor; filter values are always bound.

use serde_json::{Map, Value};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

use crate::db;
use crate::errors::AppError;

/// Table holding one row per drawing revision event.
pub const REVISED_DRAWING_TABLE: &str = "status_revised_drawing";

/// Table holding one row per design change request.
pub const DESIGN_CHANGE_TABLE: &str = "request_design_change";

/// How a bucket column is decoded into JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Text,
}

/// A grouping expression and the name it is returned under.
#[derive(Debug, Clone, Copy)]
pub struct Bucket {
    pub expr: &'static str,
    pub alias: &'static str,
    pub kind: ValueKind,
}

/// What a report selects.
#[derive(Debug, Clone, Copy)]
pub enum Selection {
    /// Every column of every matching row.
    Rows,
    /// `COUNT(*)` per distinct combination of the buckets.
    GroupCount(&'static [Bucket]),
}

/// Declarative description of one report endpoint.
#[derive(Debug, Clone, Copy)]
pub struct ReportQuery {
    pub name: &'static str,
    pub table: &'static str,
    pub selection: Selection,
    /// Column compared for equality against the request's filter value.
    pub filter: Option<&'static str>,
    /// Order rows ascending by the bucket expressions.
    pub ordered: bool,
    /// `{value}` is replaced with the filter value.
    pub success_message: &'static str,
    pub empty_message: Option<&'static str>,
}

pub const YEARLY_PROJECTS: ReportQuery = ReportQuery {
    name: "yearly-projects",
    table: REVISED_DRAWING_TABLE,
    selection: Selection::GroupCount(&[Bucket {
        expr: "CAST(YEAR(release_date) AS SIGNED)",
        alias: "year",
        kind: ValueKind::Integer,
    }]),
    filter: None,
    ordered: true,
    success_message: "Successfully retrieved yearly projects data",
    empty_message: None,
};

pub const MONTHLY_PROJECTS: ReportQuery = ReportQuery {
    name: "monthly-projects",
    table: REVISED_DRAWING_TABLE,
    selection: Selection::GroupCount(&[Bucket {
        expr: "DATE_FORMAT(release_date, '%Y-%m')",
        alias: "month",
        kind: ValueKind::Text,
    }]),
    filter: None,
    ordered: true,
    success_message: "Successfully retrieved monthly projects data",
    empty_message: None,
};

pub const DEPARTMENT_COUNT: ReportQuery = ReportQuery {
    name: "department-count",
    table: REVISED_DRAWING_TABLE,
    selection: Selection::GroupCount(&[Bucket {
        expr: "release_department",
        alias: "release_department",
        kind: ValueKind::Text,
    }]),
    filter: None,
    ordered: false,
    success_message: "Successfully retrieved department count data",
    empty_message: None,
};

pub const CAUSE_FREQUENCY: ReportQuery = ReportQuery {
    name: "cause-frequency",
    table: REVISED_DRAWING_TABLE,
    selection: Selection::GroupCount(&[Bucket {
        expr: "cause_code",
        alias: "cause_code",
        kind: ValueKind::Text,
    }]),
    filter: None,
    ordered: false,
    success_message: "Successfully retrieved cause frequency data",
    empty_message: None,
};

pub const URGENCY: ReportQuery = ReportQuery {
    name: "urgency",
    table: DESIGN_CHANGE_TABLE,
    selection: Selection::Rows,
    filter: Some("urgency_level"),
    ordered: false,
    success_message: "Successfully retrieved data for level {value}",
    empty_message: Some("No data found for level {value}"),
};

pub const STATUS: ReportQuery = ReportQuery {
    name: "status",
    table: DESIGN_CHANGE_TABLE,
    selection: Selection::GroupCount(&[Bucket {
        expr: "status_ongoing",
        alias: "status_ongoing",
        kind: ValueKind::Text,
    }]),
    filter: None,
    ordered: false,
    success_message: "Successfully retrieved all status data",
    empty_message: Some("Status data is empty"),
};

pub const URGENCY_IMPORTANCE: ReportQuery = ReportQuery {
    name: "urgencyImportance",
    table: DESIGN_CHANGE_TABLE,
    selection: Selection::GroupCount(&[
        Bucket {
            expr: "urgency_level",
            alias: "urgency_level",
            kind: ValueKind::Text,
        },
        Bucket {
            expr: "importance_level",
            alias: "importance_level",
            kind: ValueKind::Text,
        },
    ]),
    filter: None,
    ordered: false,
    success_message: "Successfully retrieved all urgency/importance data",
    empty_message: Some("Urgency/Importance data is empty"),
};

/// Rows of one report plus the envelope message describing them.
#[derive(Debug)]
pub struct ReportResult {
    pub rows: Vec<Value>,
    pub message: String,
}

impl ReportQuery {
    /// Generate the SQL statement for this report.
    pub fn sql(&self) -> String {
        let mut sql = match self.selection {
            Selection::Rows => format!("SELECT * FROM {}", self.table),
            Selection::GroupCount(buckets) => {
                let columns: Vec<String> = buckets
                    .iter()
                    .map(|b| format!("{} AS {}", b.expr, b.alias))
                    .collect();
                format!(
                    "SELECT {}, COUNT(*) AS count FROM {}",
                    columns.join(", "),
                    self.table
                )
            }
        };

        if let Some(column) = self.filter {
            sql.push_str(&format!(" WHERE {column} = ?"));
        }

        if let Selection::GroupCount(buckets) = self.selection {
            let exprs: Vec<&str> = buckets.iter().map(|b| b.expr).collect();
            let exprs = exprs.join(", ");
            sql.push_str(&format!(" GROUP BY {exprs}"));
            if self.ordered {
                sql.push_str(&format!(" ORDER BY {exprs}"));
            }
        }

        sql
    }

    /// Envelope message for a result of `row_count` rows.
    pub fn message(&self, row_count: usize, filter_value: Option<&str>) -> String {
        let template = match self.empty_message {
            Some(empty) if row_count == 0 => empty,
            _ => self.success_message,
        };
        template.replace("{value}", filter_value.unwrap_or_default())
    }

    /// Value bound to the filter placeholder, `None` when the report has no filter.
    ///
    /// The caller's value is passed through untouched; an absent value binds
    /// `NULL`.
    pub fn binding(&self, filter_value: Option<&str>) -> Option<Option<String>> {
        self.filter.map(|_| filter_value.map(str::to_owned))
    }

    /// Pair decoded rows with their envelope message.
    pub fn settle(&self, rows: Vec<Value>, filter_value: Option<&str>) -> ReportResult {
        ReportResult {
            message: self.message(rows.len(), filter_value),
            rows,
        }
    }

    fn decode(&self, row: &MySqlRow) -> Result<Value, AppError> {
        let Selection::GroupCount(buckets) = self.selection else {
            return Ok(Value::Object(db::row_to_json(row)));
        };

        let mut object = Map::new();
        for bucket in buckets {
            let value = match bucket.kind {
                ValueKind::Integer => row
                    .try_get::<Option<i64>, _>(bucket.alias)
                    .map_err(|e| AppError::query(self.name, e))?
                    .map(Value::from),
                ValueKind::Text => row
                    .try_get::<Option<String>, _>(bucket.alias)
                    .map_err(|e| AppError::query(self.name, e))?
                    .map(Value::String),
            };
            object.insert(bucket.alias.to_string(), value.unwrap_or(Value::Null));
        }
        let count: i64 = row
            .try_get("count")
            .map_err(|e| AppError::query(self.name, e))?;
        object.insert("count".to_string(), Value::from(count));

        Ok(Value::Object(object))
    }
}

/// Execute a report, binding `filter_value` when the report declares a filter.
///
/// A missing filter value binds `NULL`, which matches no rows.
pub async fn run(
    pool: &MySqlPool,
    report: &ReportQuery,
    filter_value: Option<&str>,
) -> Result<ReportResult, AppError> {
    let sql = report.sql();
    let mut query = sqlx::query(&sql);
    if let Some(value) = report.binding(filter_value) {
        query = query.bind(value);
    }

    let raw = query
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::query(report.name, e))?;

    let rows = raw
        .iter()
        .map(|row| report.decode(row))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(report = report.name, rows = rows.len(), "Report query completed");

    Ok(report.settle(rows, filter_value))
}
