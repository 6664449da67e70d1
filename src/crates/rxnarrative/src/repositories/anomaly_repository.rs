//! Anomaly repository: flagged rows inside a trailing window

use super::{format_date, parse_timestamp};
use crate::db::Database;
use crate::error::{ReportError, Result};
use crate::models::{AnomalyObservation, Section};
use chrono::NaiveDate;
use sqlx::Row;
use std::sync::Arc;

/// Read-only access to the anomaly-detection results
#[derive(Clone, Debug)]
pub struct AnomalyRepository {
    db: Arc<Database>,
    table: String,
}

impl AnomalyRepository {
    pub fn new(db: Arc<Database>, table: impl Into<String>) -> Self {
        Self {
            db,
            table: table.into(),
        }
    }

    /// Every row flagged as anomalous with a timestamp on or after `since`,
    /// oldest first.
    pub async fn flagged_since(&self, since: NaiveDate) -> Result<Vec<AnomalyObservation>> {
        let sql = format!(
            "SELECT CAST(TS AS TEXT) AS ts,
                    CAST(Y AS REAL) AS actual,
                    CAST(FORECAST AS REAL) AS forecast,
                    CAST(DISTANCE AS REAL) AS distance
             FROM {}
             WHERE IS_ANOMALY = 1 AND date(TS) >= ?
             ORDER BY TS",
            self.table
        );

        let rows = sqlx::query(&sql)
            .bind(format_date(since))
            .fetch_all(self.db.pool())
            .await
            .map_err(|e| ReportError::Database(format!("Failed to load anomalies: {}", e)))?;

        rows.iter()
            .map(|row| -> Result<AnomalyObservation> {
                let raw_ts: String = row.try_get("ts")?;
                let ts = parse_timestamp(&raw_ts)?;

                let value = |column: &str| -> Result<f64> {
                    row.try_get::<Option<f64>, _>(column)?
                        .ok_or_else(|| ReportError::DataGap {
                            section: Section::Anomaly,
                            detail: format!("flagged row at {} has no {} value", raw_ts, column),
                        })
                };

                Ok(AnomalyObservation {
                    ts,
                    actual: value("actual")?,
                    forecast: value("forecast")?,
                    distance: value("distance")?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::{exec, seeded_db};

    #[tokio::test]
    async fn test_only_flagged_rows_inside_window() {
        let db = seeded_db().await;
        exec(
            &db,
            "INSERT INTO DETECTED_ANOMALIES (TS, Y, FORECAST, IS_ANOMALY, DISTANCE) VALUES
                ('2026-09-10 00:00:00', 200, 100, 1, 9.0),
                ('2026-09-20 00:00:00', 150, 110, 1, 4.0),
                ('2026-09-21 00:00:00', 111, 110, 0, 0.1),
                ('2026-10-02T00:00:00', 60, 115, 1, -5.5)",
        )
        .await;

        let repo = AnomalyRepository::new(db, "DETECTED_ANOMALIES");
        let since = NaiveDate::from_ymd_opt(2026, 9, 18).unwrap();
        let flagged = repo.flagged_since(since).await.unwrap();

        assert_eq!(flagged.len(), 2);
        assert_eq!(flagged[0].actual, 150.0);
        assert_eq!(flagged[1].distance, -5.5);
        assert_eq!(flagged[1].ts.date(), NaiveDate::from_ymd_opt(2026, 10, 2).unwrap());
    }

    #[tokio::test]
    async fn test_window_start_is_inclusive() {
        let db = seeded_db().await;
        exec(
            &db,
            "INSERT INTO DETECTED_ANOMALIES (TS, Y, FORECAST, IS_ANOMALY, DISTANCE) VALUES
                ('2026-09-18 06:00:00', 150, 110, 1, 4.0)",
        )
        .await;

        let repo = AnomalyRepository::new(db, "DETECTED_ANOMALIES");
        let since = NaiveDate::from_ymd_opt(2026, 9, 18).unwrap();
        assert_eq!(repo.flagged_since(since).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_no_flagged_rows() {
        let db = seeded_db().await;
        let repo = AnomalyRepository::new(db, "DETECTED_ANOMALIES");
        let since = NaiveDate::from_ymd_opt(2026, 9, 18).unwrap();
        assert!(repo.flagged_since(since).await.unwrap().is_empty());
    }
}
