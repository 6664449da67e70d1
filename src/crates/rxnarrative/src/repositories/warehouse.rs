//! The data seam between the pipeline and storage

use super::{
    AnomalyRepository, DriverRepository, ForecastRepository, NarrativeRepository,
    SalesRepository,
};
use crate::config::TableConfig;
use crate::db::Database;
use crate::error::Result;
use crate::models::{
    AnomalyObservation, DriverContribution, ForecastSnapshot, KpiSnapshot, NarrativeRecord,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

/// Everything a narrative run reads and writes.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Create the output table if missing
    async fn ensure_output(&self) -> Result<()>;
    async fn kpi_window(&self, start: NaiveDate, end: NaiveDate) -> Result<Option<KpiSnapshot>>;
    async fn forecast_summary(&self) -> Result<Option<ForecastSnapshot>>;
    async fn flagged_anomalies(&self, since: NaiveDate) -> Result<Vec<AnomalyObservation>>;
    async fn top_drivers(&self, limit: usize) -> Result<Vec<DriverContribution>>;
    async fn count_for_date(&self, run_date: NaiveDate) -> Result<i64>;
    async fn store_narratives(&self, record: &NarrativeRecord) -> Result<()>;
}

/// `Warehouse` over the SQLite tables named in `[tables]`
#[derive(Clone, Debug)]
pub struct SqlWarehouse {
    sales: SalesRepository,
    forecast: ForecastRepository,
    anomalies: AnomalyRepository,
    drivers: DriverRepository,
    narratives: NarrativeRepository,
}

impl SqlWarehouse {
    pub fn new(db: Arc<Database>, tables: &TableConfig) -> Self {
        Self {
            sales: SalesRepository::new(db.clone(), &tables.sales),
            forecast: ForecastRepository::new(db.clone(), &tables.forecast),
            anomalies: AnomalyRepository::new(db.clone(), &tables.anomalies),
            drivers: DriverRepository::new(db.clone(), &tables.drivers),
            narratives: NarrativeRepository::new(db, &tables.narratives),
        }
    }

    /// Output table access for reporting commands
    pub fn narratives(&self) -> &NarrativeRepository {
        &self.narratives
    }
}

#[async_trait]
impl Warehouse for SqlWarehouse {
    async fn ensure_output(&self) -> Result<()> {
        self.narratives.ensure_table().await
    }

    async fn kpi_window(&self, start: NaiveDate, end: NaiveDate) -> Result<Option<KpiSnapshot>> {
        self.sales.kpi_window(start, end).await
    }

    async fn forecast_summary(&self) -> Result<Option<ForecastSnapshot>> {
        self.forecast.summary().await
    }

    async fn flagged_anomalies(&self, since: NaiveDate) -> Result<Vec<AnomalyObservation>> {
        self.anomalies.flagged_since(since).await
    }

    async fn top_drivers(&self, limit: usize) -> Result<Vec<DriverContribution>> {
        self.drivers.top(limit).await
    }

    async fn count_for_date(&self, run_date: NaiveDate) -> Result<i64> {
        self.narratives.count_for_date(run_date).await
    }

    async fn store_narratives(&self, record: &NarrativeRecord) -> Result<()> {
        self.narratives.append(record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::{exec, seeded_db};

    #[tokio::test]
    async fn test_custom_table_names_are_used() {
        let db = seeded_db().await;
        exec(&db, "CREATE TABLE DRIVERS_V2 (CONTRIBUTOR TEXT, RELATIVE_CONTRIBUTION REAL)").await;
        exec(&db, "INSERT INTO DRIVERS_V2 VALUES ('Formulary status', 0.5)").await;

        let tables = TableConfig {
            drivers: "DRIVERS_V2".to_string(),
            narratives: "NARRATIVES_V2".to_string(),
            ..TableConfig::default()
        };
        let warehouse = SqlWarehouse::new(db, &tables);

        let drivers = warehouse.top_drivers(3).await.unwrap();
        assert_eq!(drivers.len(), 1);

        let run_date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        warehouse.ensure_output().await.unwrap();
        assert_eq!(warehouse.count_for_date(run_date).await.unwrap(), 0);
        warehouse
            .store_narratives(&NarrativeRecord {
                run_date,
                kpi_narrative: "k".into(),
                forecast_narrative: "f".into(),
                anomaly_narrative: "a".into(),
                insight_narrative: "i".into(),
            })
            .await
            .unwrap();
        assert_eq!(warehouse.count_for_date(run_date).await.unwrap(), 1);
    }
}
