//! Common test utilities and setup

#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use llm::stub::FixedCompletion;
use rxnarrative::config::{PromptTemplates, ReportSettings, TableConfig};
use rxnarrative::{Database, NarrativeGenerator, NarrativePipeline, PromptBuilder, SqlWarehouse};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

static TEST_DB_COUNTER: AtomicUsize = AtomicUsize::new(0);

const SOURCE_TABLES: &str = include_str!("../../migrations/source_tables.sql");

/// Sqlite URL for a fresh on-disk database inside `dir`
pub fn db_url(dir: &TempDir) -> String {
    let counter = TEST_DB_COUNTER.fetch_add(1, Ordering::SeqCst);
    let path = dir.path().join(format!("test_{}.db", counter));
    format!("sqlite:{}", path.display())
}

/// Create a test database with the upstream tables in place
pub async fn setup_test_db() -> (TempDir, Arc<Database>) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db = Database::connect(&db_url(&temp_dir), 5)
        .await
        .expect("Failed to create test database");

    create_source_tables(&db).await;
    (temp_dir, Arc::new(db))
}

pub async fn create_source_tables(db: &Database) {
    let script = SOURCE_TABLES
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");

    for statement in script.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        sqlx::query(statement)
            .execute(db.pool())
            .await
            .expect("Failed to create source table");
    }
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// `days` consecutive sales rows ending at `last`, volumes counting up from
/// `first_volume`.
pub async fn seed_sales(
    db: &Database,
    last: NaiveDate,
    days: u64,
    first_volume: f64,
    spend: f64,
    satisfaction: f64,
) {
    for offset in 0..days {
        let date = last - Days::new(days - 1 - offset);
        sqlx::query(
            r#"INSERT INTO PRESCRIPTION_SALES
               (DATE, "prescription volume", "marketing spend (usd)", "patient satisfaction score")
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(date.format("%Y-%m-%d").to_string())
        .bind(first_volume + offset as f64)
        .bind(spend)
        .bind(satisfaction)
        .execute(db.pool())
        .await
        .expect("Failed to seed sales");
    }
}

pub async fn seed_forecast(db: &Database, ts: &str, forecast: f64, lower: f64, upper: f64) {
    sqlx::query(
        "INSERT INTO PRESCRIPTION_FORECAST_30DAYS (TS, FORECAST, LOWER_BOUND, UPPER_BOUND)
         VALUES (?, ?, ?, ?)",
    )
    .bind(ts)
    .bind(forecast)
    .bind(lower)
    .bind(upper)
    .execute(db.pool())
    .await
    .expect("Failed to seed forecast");
}

pub async fn seed_anomaly(
    db: &Database,
    ts: &str,
    actual: f64,
    forecast: f64,
    distance: f64,
    is_anomaly: bool,
) {
    sqlx::query(
        "INSERT INTO DETECTED_ANOMALIES
         (TS, Y, FORECAST, LOWER_BOUND, UPPER_BOUND, IS_ANOMALY, PERCENTILE, DISTANCE)
         VALUES (?, ?, ?, ?, ?, ?, 0.5, ?)",
    )
    .bind(ts)
    .bind(actual)
    .bind(forecast)
    .bind(forecast - 10.0)
    .bind(forecast + 10.0)
    .bind(i64::from(is_anomaly))
    .bind(distance)
    .execute(db.pool())
    .await
    .expect("Failed to seed anomaly");
}

pub async fn seed_driver(db: &Database, contributor: &str, relative: f64) {
    sqlx::query(
        "INSERT INTO HEALTHCARE_INSIGHT_DRIVERS
         (CONTRIBUTOR, METRIC_CONTROL, METRIC_TEST, CONTRIBUTION, RELATIVE_CONTRIBUTION, GROWTH_RATE)
         VALUES (?, 100.0, 110.0, 10.0, ?, 0.1)",
    )
    .bind(contributor)
    .bind(relative)
    .execute(db.pool())
    .await
    .expect("Failed to seed driver");
}

/// Seed one full, healthy data set: 30 sales days ending at `run_date`
/// (volumes 100..=129), a 30-row forecast (106..=135, +/-8), two anomalies
/// and four drivers.
pub async fn seed_all(db: &Database, run_date: NaiveDate) {
    seed_sales(db, run_date, 30, 100.0, 500.0, 4.2).await;

    for offset in 1..=30u64 {
        let ts = (run_date + Days::new(offset)).format("%Y-%m-%d").to_string();
        let forecast = 105.0 + offset as f64;
        seed_forecast(db, &ts, forecast, forecast - 8.0, forecast + 8.0).await;
    }

    let recent = (run_date - Days::new(5)).format("%Y-%m-%d 00:00:00").to_string();
    let older = (run_date - Days::new(12)).format("%Y-%m-%d 00:00:00").to_string();
    seed_anomaly(db, &older, 150.4, 118.0, 2.0, true).await;
    seed_anomaly(db, &recent, 171.8, 118.4, 3.1, true).await;

    seed_driver(db, "Rep visits", 0.183).await;
    seed_driver(db, "Formulary status", 0.412).await;
    seed_driver(db, "Samples", 0.05).await;
    seed_driver(db, "Digital spend", 0.26).await;
}

/// Pipeline over the default tables with `stub` as the model
pub fn pipeline(
    db: Arc<Database>,
    stub: &FixedCompletion,
    settings: ReportSettings,
) -> NarrativePipeline<SqlWarehouse> {
    NarrativePipeline::new(
        SqlWarehouse::new(db, &TableConfig::default()),
        NarrativeGenerator::new(Arc::new(stub.clone())),
        PromptBuilder::new(PromptTemplates::default()),
        settings,
    )
}
