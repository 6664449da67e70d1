//! Sales repository: rolling-window KPI aggregate

use super::format_date;
use crate::db::Database;
use crate::error::{ReportError, Result};
use crate::models::{KpiSnapshot, Section};
use chrono::NaiveDate;
use sqlx::Row;
use std::sync::Arc;

/// Read-only access to the daily sales table
#[derive(Clone, Debug)]
pub struct SalesRepository {
    db: Arc<Database>,
    table: String,
}

impl SalesRepository {
    pub fn new(db: Arc<Database>, table: impl Into<String>) -> Self {
        Self {
            db,
            table: table.into(),
        }
    }

    /// Max, min and mean volume plus mean spend and satisfaction over
    /// `start..=end`.
    ///
    /// Returns `None` when no rows fall inside the window.
    pub async fn kpi_window(&self, start: NaiveDate, end: NaiveDate) -> Result<Option<KpiSnapshot>> {
        let sql = format!(
            r#"SELECT COUNT(*) AS row_count,
                      CAST(MAX("prescription volume") AS REAL) AS max_volume,
                      CAST(MIN("prescription volume") AS REAL) AS min_volume,
                      CAST(AVG("prescription volume") AS REAL) AS avg_volume,
                      CAST(AVG("marketing spend (usd)") AS REAL) AS avg_spend,
                      CAST(AVG("patient satisfaction score") AS REAL) AS avg_satisfaction
               FROM {}
               WHERE date(DATE) >= ? AND date(DATE) <= ?"#,
            self.table
        );

        let row = sqlx::query(&sql)
            .bind(format_date(start))
            .bind(format_date(end))
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| ReportError::Database(format!("Failed to aggregate sales: {}", e)))?;

        let row_count: i64 = row.try_get("row_count")?;
        if row_count == 0 {
            return Ok(None);
        }

        let metric = |column: &str| -> Result<f64> {
            row.try_get::<Option<f64>, _>(column)?
                .ok_or_else(|| ReportError::DataGap {
                    section: Section::Kpi,
                    detail: format!(
                        "{} is NULL for every sales row between {} and {}",
                        column, start, end
                    ),
                })
        };

        Ok(Some(KpiSnapshot {
            row_count,
            max_volume: metric("max_volume")?,
            min_volume: metric("min_volume")?,
            avg_volume: metric("avg_volume")?,
            avg_spend: metric("avg_spend")?,
            avg_satisfaction: metric("avg_satisfaction")?,
        }))
    }
}
