//! Driver repository: strongest contributors to the overall change

use crate::db::Database;
use crate::error::{ReportError, Result};
use crate::models::DriverContribution;
use sqlx::Row;
use std::sync::Arc;

/// Read-only access to the contribution-analysis table
#[derive(Clone, Debug)]
pub struct DriverRepository {
    db: Arc<Database>,
    table: String,
}

impl DriverRepository {
    pub fn new(db: Arc<Database>, table: impl Into<String>) -> Self {
        Self {
            db,
            table: table.into(),
        }
    }

    /// Up to `limit` contributors by descending relative contribution.
    ///
    /// Ties are broken by contributor name so the result is stable.
    pub async fn top(&self, limit: usize) -> Result<Vec<DriverContribution>> {
        let sql = format!(
            "SELECT CONTRIBUTOR AS contributor,
                    CAST(RELATIVE_CONTRIBUTION AS REAL) AS relative_contribution
             FROM {}
             WHERE CONTRIBUTOR IS NOT NULL AND RELATIVE_CONTRIBUTION IS NOT NULL
             ORDER BY RELATIVE_CONTRIBUTION DESC, CONTRIBUTOR ASC
             LIMIT ?",
            self.table
        );

        let rows = sqlx::query(&sql)
            .bind(limit as i64)
            .fetch_all(self.db.pool())
            .await
            .map_err(|e| ReportError::Database(format!("Failed to load drivers: {}", e)))?;

        rows.iter()
            .map(|row| -> Result<DriverContribution> {
                Ok(DriverContribution {
                    contributor: row.try_get("contributor")?,
                    relative_contribution: row.try_get("relative_contribution")?,
                })
            })
            .collect()
    }
}
