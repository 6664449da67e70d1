//! Prompt builder
//!
//! Turns snapshots into the exact instruction strings sent to the completion
//! model. Everything here is pure; the same snapshot always yields the same
//! bytes.

use crate::config::PromptTemplates;
use crate::models::{
    AnomalySnapshot, DriverContribution, DriverSnapshot, ForecastSnapshot, KpiSnapshot, Prompt,
    Section,
};

/// Volume bounds and anomaly values are truncated toward zero, not rounded.
pub fn truncate_int(value: f64) -> i64 {
    value.trunc() as i64
}

/// Fixed one-decimal rendering used for averages and scores.
pub fn one_decimal(value: f64) -> String {
    format!("{:.1}", value)
}

/// Currency-style rendering with no cents: `$500`.
pub fn whole_dollars(value: f64) -> String {
    format!("${:.0}", value)
}

/// A fraction rendered as a one-decimal percentage: `0.183` -> `18.3%`.
pub fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

fn driver_label(driver: &DriverContribution) -> String {
    format!("{} (+{})", driver.contributor, percent(driver.relative_contribution))
}

/// `a`, `a and b`, `a, b, and c`, ...
fn join_series(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{} and {}", first, second),
        [head @ .., last] => format!("{}, and {}", head.join(", "), last),
    }
}

/// Builds one prompt per section from its snapshot
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    templates: PromptTemplates,
    kpi_window_days: u32,
    anomaly_window_months: u32,
}

impl PromptBuilder {
    pub fn new(templates: PromptTemplates) -> Self {
        Self {
            templates,
            kpi_window_days: 30,
            anomaly_window_months: 1,
        }
    }

    /// Window lengths quoted in the KPI and anomaly facts
    pub fn with_windows(mut self, kpi_window_days: u32, anomaly_window_months: u32) -> Self {
        self.kpi_window_days = kpi_window_days;
        self.anomaly_window_months = anomaly_window_months;
        self
    }

    fn past_days(&self) -> String {
        match self.kpi_window_days {
            1 => "past day".to_string(),
            n => format!("past {} days", n),
        }
    }

    fn last_months(&self) -> String {
        match self.anomaly_window_months {
            1 => "last month".to_string(),
            n => format!("last {} months", n),
        }
    }

    pub fn kpi(&self, kpi: &KpiSnapshot) -> Prompt {
        let text = format!(
            "{}Over the {}, prescription volume ranged from {} down to {}, averaging {} per day, \
             with daily marketing spend around {} and an average satisfaction score of {}.",
            self.templates.kpi,
            self.past_days(),
            truncate_int(kpi.max_volume),
            truncate_int(kpi.min_volume),
            one_decimal(kpi.avg_volume),
            whole_dollars(kpi.avg_spend),
            one_decimal(kpi.avg_satisfaction),
        );
        Prompt::new(Section::Kpi, text)
    }

    pub fn forecast(&self, forecast: &ForecastSnapshot) -> Prompt {
        let text = format!(
            "{}Our 30\u{2011}day forecast projects daily prescriptions between {:.0} and {:.0}, \
             averaging {}, with prediction intervals about \u{00b1}{}.",
            self.templates.forecast,
            forecast.min_forecast,
            forecast.max_forecast,
            one_decimal(forecast.avg_forecast),
            one_decimal(forecast.half_interval()),
        );
        Prompt::new(Section::Forecast, text)
    }

    /// Short fixed prompt when nothing was flagged, detailed one otherwise
    pub fn anomaly(&self, anomalies: &AnomalySnapshot) -> Prompt {
        let text = match anomalies.worst {
            Some(ref worst) if anomalies.count > 0 => format!(
                "{}In the {}, {} days deviated from forecast; the largest outlier on {} \
                 saw actual {} vs forecast {}.",
                self.templates.anomaly,
                self.last_months(),
                anomalies.count,
                worst.ts.date().format("%Y-%m-%d"),
                truncate_int(worst.actual),
                truncate_int(worst.forecast),
            ),
            _ => format!(
                "{}No anomalies were detected in the {}.",
                self.templates.anomaly_none,
                self.last_months()
            ),
        };
        Prompt::new(Section::Anomaly, text)
    }

    pub fn insight(&self, drivers: &DriverSnapshot) -> Prompt {
        let labels: Vec<String> = drivers.drivers.iter().map(driver_label).collect();
        let text = format!(
            "{}The leading influences are: {}, explaining shifts in overall prescription trends.",
            self.templates.insight,
            join_series(&labels),
        );
        Prompt::new(Section::Insight, text)
    }

    /// Fixed prompt for a section whose source data is empty
    pub fn no_data(&self, section: Section) -> Prompt {
        let text = match section {
            Section::Kpi => format!(
                "{}No prescription sales were recorded in the {}.",
                self.templates.kpi,
                self.past_days()
            ),
            Section::Forecast => format!(
                "{}No forecast is currently available for the next 30 days.",
                self.templates.forecast
            ),
            Section::Anomaly => return self.anomaly(&AnomalySnapshot::from_observations(Vec::new())),
            Section::Insight => format!(
                "{}No driver analysis is currently available.",
                self.templates.insight
            ),
        };
        Prompt::new(section, text)
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(PromptTemplates::default())
    }
}
