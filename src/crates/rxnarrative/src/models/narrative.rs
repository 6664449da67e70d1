//! Narrative models

use crate::models::Section;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Text the completion model produced for one section's prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    pub section: Section,
    pub text: String,
    /// Model identifier reported by the provider
    pub model: String,
}

/// One row of the output table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeRecord {
    pub run_date: NaiveDate,
    pub kpi_narrative: String,
    pub forecast_narrative: String,
    pub anomaly_narrative: String,
    pub insight_narrative: String,
}

impl NarrativeRecord {
    pub fn narrative(&self, section: Section) -> &str {
        match section {
            Section::Kpi => &self.kpi_narrative,
            Section::Forecast => &self.forecast_narrative,
            Section::Anomaly => &self.anomaly_narrative,
            Section::Insight => &self.insight_narrative,
        }
    }
}

/// The four narratives of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeSet {
    pub run_date: NaiveDate,
    pub kpi: Narrative,
    pub forecast: Narrative,
    pub anomaly: Narrative,
    pub insight: Narrative,
}

impl NarrativeSet {
    pub fn get(&self, section: Section) -> &Narrative {
        match section {
            Section::Kpi => &self.kpi,
            Section::Forecast => &self.forecast,
            Section::Anomaly => &self.anomaly,
            Section::Insight => &self.insight,
        }
    }

    /// The row persisted for this run.
    pub fn to_record(&self) -> NarrativeRecord {
        NarrativeRecord {
            run_date: self.run_date,
            kpi_narrative: self.kpi.text.clone(),
            forecast_narrative: self.forecast.text.clone(),
            anomaly_narrative: self.anomaly.text.clone(),
            insight_narrative: self.insight.text.clone(),
        }
    }

    /// Narratives keyed by section name (`kpi_narrative`, ...).
    pub fn into_map(self) -> BTreeMap<&'static str, String> {
        [self.kpi, self.forecast, self.anomaly, self.insight]
            .into_iter()
            .map(|n| (n.section.key(), n.text))
            .collect()
    }
}
