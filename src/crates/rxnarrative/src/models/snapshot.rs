//! Metric snapshots
//!
//! A snapshot is the result of one read-only aggregate over one dataset.

use crate::error::{ReportError, Result};
use crate::models::Section;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Rolling-window sales statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    /// Rows inside the window
    pub row_count: i64,
    pub max_volume: f64,
    pub min_volume: f64,
    pub avg_volume: f64,
    pub avg_spend: f64,
    pub avg_satisfaction: f64,
}

/// Statistics over the forward-looking forecast table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSnapshot {
    pub row_count: i64,
    pub avg_forecast: f64,
    pub min_forecast: f64,
    pub max_forecast: f64,
    /// Mean of `upper_bound - lower_bound`
    pub avg_interval_width: f64,
}

impl ForecastSnapshot {
    /// Half the mean interval width, reported as a ± figure.
    pub fn half_interval(&self) -> f64 {
        self.avg_interval_width / 2.0
    }
}

/// One flagged row from the anomaly-detection results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyObservation {
    pub ts: NaiveDateTime,
    pub actual: f64,
    pub forecast: f64,
    /// Signed deviation score
    pub distance: f64,
}

impl AnomalyObservation {
    /// Ordering used to pick the worst day: larger `|distance|` first, then
    /// the later timestamp, then the larger actual value.
    fn severity_cmp(&self, other: &Self) -> Ordering {
        self.distance
            .abs()
            .total_cmp(&other.distance.abs())
            .then_with(|| self.ts.cmp(&other.ts))
            .then_with(|| self.actual.total_cmp(&other.actual))
    }
}

/// Flagged anomalies inside the trailing window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalySnapshot {
    pub count: usize,
    /// Observation with the largest absolute deviation, `None` when `count == 0`
    pub worst: Option<AnomalyObservation>,
}

impl AnomalySnapshot {
    pub fn from_observations(observations: Vec<AnomalyObservation>) -> Self {
        let count = observations.len();
        let worst = observations
            .into_iter()
            .max_by(|a, b| a.severity_cmp(b));

        Self { count, worst }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// One row of the driver-contribution table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverContribution {
    pub contributor: String,
    /// Fraction of the overall change, e.g. `0.183` for 18.3%
    pub relative_contribution: f64,
}

/// The top contributors, strongest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverSnapshot {
    pub drivers: Vec<DriverContribution>,
}

impl DriverSnapshot {
    /// Keep the `required` strongest contributors.
    ///
    /// Fails with `InsufficientData` rather than padding when fewer rows exist.
    pub fn top(mut rows: Vec<DriverContribution>, required: usize) -> Result<Self> {
        if rows.len() < required {
            return Err(ReportError::InsufficientData {
                section: Section::Insight,
                required,
                found: rows.len(),
            });
        }

        rows.sort_by(|a, b| {
            b.relative_contribution
                .total_cmp(&a.relative_contribution)
                .then_with(|| a.contributor.cmp(&b.contributor))
        });
        rows.truncate(required);

        Ok(Self { drivers: rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(day: u32, actual: f64, distance: f64) -> AnomalyObservation {
        AnomalyObservation {
            ts: NaiveDate::from_ymd_opt(2026, 10, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            actual,
            forecast: 100.0,
            distance,
        }
    }

    fn driver(name: &str, share: f64) -> DriverContribution {
        DriverContribution {
            contributor: name.to_string(),
            relative_contribution: share,
        }
    }

    #[test]
    fn test_worst_uses_absolute_distance() {
        let snapshot = AnomalySnapshot::from_observations(vec![
            obs(3, 140.0, 12.0),
            obs(5, 60.0, -25.0),
            obs(7, 120.0, 8.0),
        ]);

        assert_eq!(snapshot.count, 3);
        assert_eq!(snapshot.worst.unwrap().distance, -25.0);
    }

    #[test]
    fn test_worst_tie_breaks_on_latest_timestamp() {
        let snapshot = AnomalySnapshot::from_observations(vec![
            obs(9, 130.0, 20.0),
            obs(4, 70.0, -20.0),
            obs(2, 135.0, 20.0),
        ]);

        let worst = snapshot.worst.unwrap();
        assert_eq!(worst.ts.date(), NaiveDate::from_ymd_opt(2026, 10, 9).unwrap());
    }

    #[test]
    fn test_worst_tie_break_is_order_independent() {
        let a = AnomalySnapshot::from_observations(vec![obs(4, 70.0, -20.0), obs(9, 130.0, 20.0)]);
        let b = AnomalySnapshot::from_observations(vec![obs(9, 130.0, 20.0), obs(4, 70.0, -20.0)]);
        assert_eq!(a.worst, b.worst);
    }

    #[test]
    fn test_empty_anomalies() {
        let snapshot = AnomalySnapshot::from_observations(Vec::new());
        assert!(snapshot.is_empty());
        assert!(snapshot.worst.is_none());
    }

    #[test]
    fn test_driver_top_orders_descending() {
        let snapshot = DriverSnapshot::top(
            vec![
                driver("Rep visits", 0.21),
                driver("Formulary status", 0.44),
                driver("Copay cards", 0.09),
                driver("Digital spend", 0.26),
            ],
            3,
        )
        .unwrap();

        let names: Vec<_> = snapshot.drivers.iter().map(|d| d.contributor.as_str()).collect();
        assert_eq!(names, vec!["Formulary status", "Digital spend", "Rep visits"]);
    }

    #[test]
    fn test_driver_shortage_is_an_error() {
        let err = DriverSnapshot::top(vec![driver("Only", 1.0), driver("Two", 0.5)], 3).unwrap_err();
        assert!(matches!(
            err,
            ReportError::InsufficientData {
                section: Section::Insight,
                required: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_half_interval() {
        let snapshot = ForecastSnapshot {
            row_count: 30,
            avg_forecast: 120.0,
            min_forecast: 110.0,
            max_forecast: 131.0,
            avg_interval_width: 17.0,
        };
        assert_eq!(snapshot.half_interval(), 8.5);
    }
}
