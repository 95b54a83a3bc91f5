//! Pure transforms from fetched report rows to chart data.

use std::collections::HashMap;

use serde_json::Value;

use crate::models::design_change::{ImportanceLevel, UrgencyLevel};
use crate::models::report::{
    field_label, row_count, CategoryCount, LinePoint, PieSlice, UrgencyImportanceRow,
    UNKNOWN_LABEL,
};

/// Label of the bucket collecting everything past the top N.
pub const OTHER_LABEL: &str = "기타";

/// Default number of categories kept by [`top_n`].
pub const DEFAULT_TOP_N: usize = 10;

/// Stable sort, largest count first. Equal counts keep their input order.
pub fn sort_by_count_desc(rows: &[CategoryCount]) -> Vec<CategoryCount> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| b.count.cmp(&a.count));
    sorted
}

/// Keep the `n` largest categories and fold the rest into one "기타" bucket.
///
/// The bucket is only appended when the folded counts sum to more than zero.
pub fn top_n(rows: &[CategoryCount], n: usize) -> Vec<CategoryCount> {
    let mut sorted = sort_by_count_desc(rows);
    let rest: i64 = sorted.iter().skip(n).map(|row| row.count).sum();
    sorted.truncate(n);
    if rest > 0 {
        sorted.push(CategoryCount::new(OTHER_LABEL, rest));
    }
    sorted
}

/// Count rows per distinct value of `field`, in order of first appearance.
pub fn group_by_field(rows: &[Value], field: &str) -> Vec<PieSlice> {
    let mut grouper = OrderedCounts::default();
    for row in rows {
        let key = field_label(row, field).unwrap_or_else(|| UNKNOWN_LABEL.to_string());
        grouper.add(key, 1);
    }
    grouper.into_slices()
}

/// Sum status counts by label.
///
/// The label comes from `status`, then `status_ongoing`. Rows without a
/// `count` contribute one.
pub fn merge_status_counts(rows: &[Value]) -> Vec<PieSlice> {
    let mut grouper = OrderedCounts::default();
    for row in rows {
        let key = field_label(row, "status")
            .or_else(|| field_label(row, "status_ongoing"))
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string());
        grouper.add(key, row_count(row).unwrap_or(1));
    }
    grouper.into_slices()
}

/// Combine per-level request lists with the urgency × importance aggregate.
///
/// Always one row per urgency level. Importance counts are keyed by the
/// translated importance label only; unknown labels are dropped.
pub fn merge_urgency_importance(
    high: &[Value],
    medium: &[Value],
    low: &[Value],
    importance_rows: &[Value],
) -> [UrgencyImportanceRow; 3] {
    let mut merged = UrgencyLevel::ALL.map(|level| {
        let requests = match level {
            UrgencyLevel::High => high,
            UrgencyLevel::Medium => medium,
            UrgencyLevel::Low => low,
        };
        UrgencyImportanceRow {
            level,
            urgency_count: requests.len() as i64,
            importance_count: 0,
        }
    });

    for row in importance_rows {
        let Some(level) = row
            .get("importance_level")
            .and_then(Value::as_str)
            .and_then(ImportanceLevel::from_label)
            .map(ImportanceLevel::as_urgency)
        else {
            continue;
        };
        if let Some(target) = merged.iter_mut().find(|r| r.level == level) {
            target.importance_count += row_count(row).unwrap_or(1);
        }
    }

    merged
}

/// Series points from `{<x_field>, count}` rows, keeping input order.
pub fn line_points(rows: &[Value], x_field: &str) -> Vec<LinePoint> {
    rows.iter()
        .map(|row| LinePoint {
            x: field_label(row, x_field).unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            y: row_count(row).unwrap_or(0),
        })
        .collect()
}

/// Insertion-ordered label counter.
#[derive(Default)]
struct OrderedCounts {
    index: HashMap<String, usize>,
    slices: Vec<PieSlice>,
}

impl OrderedCounts {
    fn add(&mut self, key: String, amount: i64) {
        match self.index.get(&key) {
            Some(&i) => self.slices[i].value += amount,
            None => {
                self.index.insert(key.clone(), self.slices.len());
                self.slices.push(PieSlice::new(key, amount));
            }
        }
    }

    fn into_slices(self) -> Vec<PieSlice> {
        self.slices
    }
}
