//! Narrative repository: the append-only output table

use super::{format_date, parse_date};
use crate::db::Database;
use crate::error::{ReportError, Result};
use crate::models::NarrativeRecord;
use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::sync::Arc;
use tracing::debug;

/// Repository for narrative rows
#[derive(Clone, Debug)]
pub struct NarrativeRepository {
    db: Arc<Database>,
    table: String,
}

impl NarrativeRepository {
    pub fn new(db: Arc<Database>, table: impl Into<String>) -> Self {
        Self {
            db,
            table: table.into(),
        }
    }

    /// Create the output table if it does not exist yet
    pub async fn ensure_table(&self) -> Result<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                RUN_DATE TEXT NOT NULL,
                KPI_NARRATIVE TEXT NOT NULL,
                FORECAST_NARRATIVE TEXT NOT NULL,
                ANOMALY_NARRATIVE TEXT NOT NULL,
                INSIGHT_NARRATIVE TEXT NOT NULL
            )",
            self.table
        );

        sqlx::query(&sql)
            .execute(self.db.pool())
            .await
            .map_err(|e| ReportError::Database(format!("Failed to create {}: {}", self.table, e)))?;

        Ok(())
    }

    /// Append one row. Existing rows are never updated.
    pub async fn append(&self, record: &NarrativeRecord) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} (RUN_DATE, KPI_NARRATIVE, FORECAST_NARRATIVE, ANOMALY_NARRATIVE, INSIGHT_NARRATIVE)
             VALUES (?, ?, ?, ?, ?)",
            self.table
        );

        sqlx::query(&sql)
            .bind(format_date(record.run_date))
            .bind(&record.kpi_narrative)
            .bind(&record.forecast_narrative)
            .bind(&record.anomaly_narrative)
            .bind(&record.insight_narrative)
            .execute(self.db.pool())
            .await
            .map_err(|e| ReportError::Database(format!("Failed to insert narratives: {}", e)))?;

        debug!(table = %self.table, run_date = %record.run_date, "Narrative row appended");
        Ok(())
    }

    /// Most recently written row
    pub async fn latest(&self) -> Result<Option<NarrativeRecord>> {
        let sql = format!(
            "SELECT RUN_DATE, KPI_NARRATIVE, FORECAST_NARRATIVE, ANOMALY_NARRATIVE, INSIGHT_NARRATIVE
             FROM {} ORDER BY RUN_DATE DESC, rowid DESC LIMIT 1",
            self.table
        );

        let row = sqlx::query(&sql)
            .fetch_optional(self.db.pool())
            .await
            .map_err(|e| ReportError::Database(format!("Failed to get latest narratives: {}", e)))?;

        row.map(|r| Self::row_to_record(&r)).transpose()
    }

    /// Every row for one run date, in insertion order
    pub async fn list_for_date(&self, run_date: NaiveDate) -> Result<Vec<NarrativeRecord>> {
        let sql = format!(
            "SELECT RUN_DATE, KPI_NARRATIVE, FORECAST_NARRATIVE, ANOMALY_NARRATIVE, INSIGHT_NARRATIVE
             FROM {} WHERE date(RUN_DATE) = ? ORDER BY rowid",
            self.table
        );

        let rows = sqlx::query(&sql)
            .bind(format_date(run_date))
            .fetch_all(self.db.pool())
            .await
            .map_err(|e| ReportError::Database(format!("Failed to list narratives: {}", e)))?;

        rows.iter().map(Self::row_to_record).collect()
    }

    /// Number of rows already written for a run date
    pub async fn count_for_date(&self, run_date: NaiveDate) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE date(RUN_DATE) = ?", self.table);

        let (count,): (i64,) = sqlx::query_as(&sql)
            .bind(format_date(run_date))
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| ReportError::Database(format!("Failed to count narratives: {}", e)))?;

        Ok(count)
    }

    fn row_to_record(row: &SqliteRow) -> Result<NarrativeRecord> {
        let run_date: String = row.try_get("RUN_DATE")?;

        Ok(NarrativeRecord {
            run_date: parse_date(&run_date)?,
            kpi_narrative: row.try_get("KPI_NARRATIVE")?,
            forecast_narrative: row.try_get("FORECAST_NARRATIVE")?,
            anomaly_narrative: row.try_get("ANOMALY_NARRATIVE")?,
            insight_narrative: row.try_get("INSIGHT_NARRATIVE")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup() -> NarrativeRepository {
        let db = Arc::new(Database::in_memory().await.unwrap());
        let repo = NarrativeRepository::new(db, "PRESCRIPTION_NARRATIVES");
        repo.ensure_table().await.unwrap();
        repo
    }

    fn record(day: u32, tag: &str) -> NarrativeRecord {
        NarrativeRecord {
            run_date: NaiveDate::from_ymd_opt(2026, 10, day).unwrap(),
            kpi_narrative: format!("kpi {}", tag),
            forecast_narrative: format!("forecast {}", tag),
            anomaly_narrative: format!("anomaly {}", tag),
            insight_narrative: format!("insight {}", tag),
        }
    }

    #[tokio::test]
    async fn test_append_and_latest() {
        let repo = setup().await;
        assert!(repo.latest().await.unwrap().is_none());

        repo.append(&record(17, "a")).await.unwrap();
        repo.append(&record(18, "b")).await.unwrap();

        let latest = repo.latest().await.unwrap().unwrap();
        assert_eq!(latest, record(18, "b"));
    }

    #[tokio::test]
    async fn test_same_day_runs_are_appended() {
        let repo = setup().await;
        let day = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

        repo.append(&record(18, "first")).await.unwrap();
        repo.append(&record(18, "second")).await.unwrap();

        assert_eq!(repo.count_for_date(day).await.unwrap(), 2);

        let rows = repo.list_for_date(day).await.unwrap();
        assert_eq!(rows[0].kpi_narrative, "kpi first");
        assert_eq!(rows[1].kpi_narrative, "kpi second");

        // ties on RUN_DATE resolve to the newest insert
        assert_eq!(repo.latest().await.unwrap().unwrap().kpi_narrative, "kpi second");
    }

    #[tokio::test]
    async fn test_ensure_table_is_idempotent() {
        let repo = setup().await;
        repo.ensure_table().await.unwrap();
        repo.append(&record(1, "x")).await.unwrap();
        repo.ensure_table().await.unwrap();

        let day = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        assert_eq!(repo.count_for_date(day).await.unwrap(), 1);
    }
}
