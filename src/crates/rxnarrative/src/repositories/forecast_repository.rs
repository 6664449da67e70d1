//! Forecast repository: summary over the forward-looking forecast table

use crate::db::Database;
use crate::error::{ReportError, Result};
use crate::models::{ForecastSnapshot, Section};
use sqlx::Row;
use std::sync::Arc;

/// Read-only access to the forecast table
#[derive(Clone, Debug)]
pub struct ForecastRepository {
    db: Arc<Database>,
    table: String,
}

impl ForecastRepository {
    pub fn new(db: Arc<Database>, table: impl Into<String>) -> Self {
        Self {
            db,
            table: table.into(),
        }
    }

    /// Mean, min and max forecast plus the mean interval width, over every
    /// row of the table.
    ///
    /// Returns `None` when the table is empty.
    pub async fn summary(&self) -> Result<Option<ForecastSnapshot>> {
        let sql = format!(
            "SELECT COUNT(*) AS row_count,
                    CAST(AVG(FORECAST) AS REAL) AS avg_forecast,
                    CAST(MIN(FORECAST) AS REAL) AS min_forecast,
                    CAST(MAX(FORECAST) AS REAL) AS max_forecast,
                    CAST(AVG(UPPER_BOUND - LOWER_BOUND) AS REAL) AS avg_interval_width
             FROM {}",
            self.table
        );

        let row = sqlx::query(&sql)
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| ReportError::Database(format!("Failed to summarize forecast: {}", e)))?;

        let row_count: i64 = row.try_get("row_count")?;
        if row_count == 0 {
            return Ok(None);
        }

        let metric = |column: &str| -> Result<f64> {
            row.try_get::<Option<f64>, _>(column)?
                .ok_or_else(|| ReportError::DataGap {
                    section: Section::Forecast,
                    detail: format!("{} is NULL for every forecast row", column),
                })
        };

        Ok(Some(ForecastSnapshot {
            row_count,
            avg_forecast: metric("avg_forecast")?,
            min_forecast: metric("min_forecast")?,
            max_forecast: metric("max_forecast")?,
            avg_interval_width: metric("avg_interval_width")?,
        }))
    }
}
