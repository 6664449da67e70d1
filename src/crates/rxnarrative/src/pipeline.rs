//! Narrative pipeline
//!
//! A run is a fixed sequence: ensure the output table, then for each of the
//! KPI, forecast, anomaly and insight sections aggregate, build a prompt and
//! generate a narrative, then append a single row. Sections run one after
//! another. Any failure aborts the run before the write, so a run either
//! stores all four narratives or nothing.

use crate::config::{EmptyWindowPolicy, ReportSettings};
use crate::error::{ReportError, Result};
use crate::generator::NarrativeGenerator;
use crate::models::{AnomalySnapshot, DriverSnapshot, Narrative, NarrativeSet, Prompt, Section};
use crate::prompt::PromptBuilder;
use crate::repositories::Warehouse;
use chrono::{Days, Months, NaiveDate};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runs the four sections against one warehouse and one completion model
pub struct NarrativePipeline<W: Warehouse> {
    warehouse: W,
    generator: NarrativeGenerator,
    builder: PromptBuilder,
    settings: ReportSettings,
}

impl<W: Warehouse> NarrativePipeline<W> {
    pub fn new(
        warehouse: W,
        generator: NarrativeGenerator,
        builder: PromptBuilder,
        settings: ReportSettings,
    ) -> Self {
        // Prompt wording always describes the windows actually queried
        let builder =
            builder.with_windows(settings.kpi_window_days, settings.anomaly_window_months);
        Self {
            warehouse,
            generator,
            builder,
            settings,
        }
    }

    pub fn warehouse(&self) -> &W {
        &self.warehouse
    }

    /// `[run_date - kpi_window_days, run_date]`, both ends inclusive
    pub fn kpi_window(&self, run_date: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
        let start = run_date
            .checked_sub_days(Days::new(u64::from(self.settings.kpi_window_days)))
            .ok_or_else(|| ReportError::Config(format!("KPI window underflows {}", run_date)))?;
        Ok((start, run_date))
    }

    /// First day of the anomaly window, in calendar months (clamped to month end)
    pub fn anomaly_window_start(&self, run_date: NaiveDate) -> Result<NaiveDate> {
        run_date
            .checked_sub_months(Months::new(self.settings.anomaly_window_months))
            .ok_or_else(|| ReportError::Config(format!("Anomaly window underflows {}", run_date)))
    }

    /// Generate, store and return the four narratives for `run_date`
    pub async fn run(&self, run_date: NaiveDate) -> Result<NarrativeSet> {
        info!(run_date = %run_date, model = %self.generator.model_name(), "Starting narrative run");
        let started = Instant::now();

        self.warehouse.ensure_output().await?;

        let kpi = self.generate(Section::Kpi, run_date).await?;
        let forecast = self.generate(Section::Forecast, run_date).await?;
        let anomaly = self.generate(Section::Anomaly, run_date).await?;
        let insight = self.generate(Section::Insight, run_date).await?;

        let set = NarrativeSet {
            run_date,
            kpi,
            forecast,
            anomaly,
            insight,
        };

        let existing = self.warehouse.count_for_date(run_date).await?;
        if existing > 0 {
            warn!(
                run_date = %run_date,
                existing_rows = existing,
                "Narratives already stored for this date; appending another row"
            );
        }

        self.warehouse.store_narratives(&set.to_record()).await?;

        info!(
            run_date = %run_date,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Narrative run complete"
        );
        Ok(set)
    }

    /// Build every prompt without calling the model or writing anything
    pub async fn prompts(&self, run_date: NaiveDate) -> Result<Vec<Prompt>> {
        let mut prompts = Vec::with_capacity(Section::ALL.len());
        for section in Section::ALL {
            prompts.push(self.prompt(section, run_date).await?);
        }
        Ok(prompts)
    }

    async fn generate(&self, section: Section, run_date: NaiveDate) -> Result<Narrative> {
        let prompt = self.prompt(section, run_date).await?;
        self.generator.generate(&prompt).await
    }

    /// Aggregate one section and render its prompt
    pub async fn prompt(&self, section: Section, run_date: NaiveDate) -> Result<Prompt> {
        match section {
            Section::Kpi => {
                let (start, end) = self.kpi_window(run_date)?;
                debug!(start = %start, end = %end, "KPI window");

                match self.warehouse.kpi_window(start, end).await? {
                    Some(kpi) => Ok(self.builder.kpi(&kpi)),
                    None => self.empty(
                        section,
                        format!("no sales rows between {} and {}", start, end),
                    ),
                }
            }
            Section::Forecast => match self.warehouse.forecast_summary().await? {
                Some(forecast) => Ok(self.builder.forecast(&forecast)),
                None => self.empty(section, "forecast table is empty".to_string()),
            },
            Section::Anomaly => {
                let since = self.anomaly_window_start(run_date)?;
                debug!(since = %since, "Anomaly window");

                let flagged = self.warehouse.flagged_anomalies(since).await?;
                let snapshot = AnomalySnapshot::from_observations(flagged);
                debug!(count = snapshot.count, "Flagged anomalies");
                Ok(self.builder.anomaly(&snapshot))
            }
            Section::Insight => {
                let required = self.settings.driver_count;
                let rows = self.warehouse.top_drivers(required).await?;
                let drivers = DriverSnapshot::top(rows, required)?;
                Ok(self.builder.insight(&drivers))
            }
        }
    }

    fn empty(&self, section: Section, detail: String) -> Result<Prompt> {
        match self.settings.empty_window {
            EmptyWindowPolicy::Fail => Err(ReportError::DataGap { section, detail }),
            EmptyWindowPolicy::Describe => {
                warn!(section = %section, detail = %detail, "No source data; sending no-data prompt");
                Ok(self.builder.no_data(section))
            }
        }
    }
}
