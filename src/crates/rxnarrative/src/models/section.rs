//! Report sections

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four independent report sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Kpi,
    Forecast,
    Anomaly,
    Insight,
}

impl Section {
    /// All sections in the order a run processes them.
    pub const ALL: [Section; 4] = [
        Section::Kpi,
        Section::Forecast,
        Section::Anomaly,
        Section::Insight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Kpi => "kpi",
            Section::Forecast => "forecast",
            Section::Anomaly => "anomaly",
            Section::Insight => "insight",
        }
    }

    /// Key used in the routine's returned mapping.
    pub fn key(&self) -> &'static str {
        match self {
            Section::Kpi => "kpi_narrative",
            Section::Forecast => "forecast_narrative",
            Section::Anomaly => "anomaly_narrative",
            Section::Insight => "insight_narrative",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
