//! Database connection pool and row decoding utilities.

use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::{Map, Value};
use sqlx::mysql::{MySqlPoolOptions, MySqlRow};
use sqlx::{Column, MySqlPool, Row, TypeInfo};

/// Create a MySQL connection pool.
///
/// Connections are opened on first use and pinged before every acquisition,
/// so a database that is down at startup or drops a connection later only
/// fails the queries issued while it is unreachable.
pub fn create_pool(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<MySqlPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .test_before_acquire(true)
        .connect_lazy(database_url)
}

/// Round-trip a trivial statement through the pool.
pub async fn ping(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}

/// Check the database once and log the outcome. Never fails the caller.
pub async fn check_connection(pool: &MySqlPool) -> bool {
    match ping(pool).await {
        Ok(_) => {
            tracing::info!("Connected to database");
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Database connection failed");
            false
        }
    }
}

/// Decode every column of a row into a JSON object, keyed by column name.
///
/// Used for `SELECT *` reports where the column set is owned by the store.
pub fn row_to_json(row: &MySqlRow) -> Map<String, Value> {
    row.columns()
        .iter()
        .map(|col| {
            let value = match col.type_info().name() {
                "DECIMAL" => decimal_value(row, col.ordinal()),
                "YEAR" => year_value(row, col.ordinal()),
                "BIT" => bit_value(row, col.ordinal()),
                _ => column_value(row, col.ordinal()),
            };
            (col.name().to_string(), value)
        })
        .collect()
}

/// DECIMAL keeps its exact text form; going through `f64` would round it.
fn decimal_value(row: &MySqlRow, idx: usize) -> Value {
    match row.try_get_unchecked::<Option<String>, _>(idx) {
        Ok(v) => v.map(Value::String).unwrap_or(Value::Null),
        Err(e) => undecodable(idx, "DECIMAL", e),
    }
}

fn year_value(row: &MySqlRow, idx: usize) -> Value {
    match row.try_get_unchecked::<Option<u16>, _>(idx) {
        Ok(v) => v.map(Value::from).unwrap_or(Value::Null),
        Err(e) => undecodable(idx, "YEAR", e),
    }
}

fn bit_value(row: &MySqlRow, idx: usize) -> Value {
    match row.try_get_unchecked::<Option<Vec<u8>>, _>(idx) {
        Ok(v) => v.map(|bytes| bit_to_json(&bytes)).unwrap_or(Value::Null),
        Err(e) => undecodable(idx, "BIT", e),
    }
}

/// MySQL sends `BIT(n)` as big-endian bytes, at most eight of them.
fn bit_to_json(bytes: &[u8]) -> Value {
    let n = bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
    Value::from(n)
}

fn undecodable(idx: usize, type_name: &str, error: sqlx::Error) -> Value {
    tracing::warn!(
        column = idx,
        column_type = type_name,
        error = %error,
        "Column could not be decoded, emitting null"
    );
    Value::Null
}

fn column_value(row: &MySqlRow, idx: usize) -> Value {
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return v.map(Value::String).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<u64>, _>(idx) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<NaiveDate>, _>(idx) {
        return v
            .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
            .unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<NaiveDateTime>, _>(idx) {
        return v
            .map(|d| Value::String(d.format("%Y-%m-%dT%H:%M:%S").to_string()))
            .unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<NaiveTime>, _>(idx) {
        return v
            .map(|t| Value::String(t.format("%H:%M:%S").to_string()))
            .unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<Value>, _>(idx) {
        return v.unwrap_or(Value::Null);
    }
    tracing::warn!(
        column = idx,
        column_type = row.column(idx).type_info().name(),
        "Unsupported column type, emitting null"
    );
    Value::Null
}
