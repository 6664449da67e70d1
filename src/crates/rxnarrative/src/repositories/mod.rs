//! Database repositories
//!
//! One repository per table. The four source repositories are read-only
//! aggregates; `NarrativeRepository` owns the output table. `SqlWarehouse`
//! composes them behind the `Warehouse` trait the pipeline depends on.

pub mod anomaly_repository;
pub mod driver_repository;
pub mod forecast_repository;
pub mod narrative_repository;
pub mod sales_repository;
pub mod warehouse;

pub use anomaly_repository::AnomalyRepository;
pub use driver_repository::DriverRepository;
pub use forecast_repository::ForecastRepository;
pub use narrative_repository::NarrativeRepository;
pub use sales_repository::SalesRepository;
pub use warehouse::{SqlWarehouse, Warehouse};

use crate::error::{ReportError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Dates are bound and stored as `YYYY-MM-DD`.
pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a stored date, tolerating a trailing time part.
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate> {
    let day = raw.trim().get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| ReportError::Database(format!("Invalid date {:?}: {}", raw, e)))
}

/// Parse a stored timestamp: `YYYY-MM-DD HH:MM:SS[.f]`, the `T`-separated
/// form, RFC 3339 with an offset, or a bare date (midnight).
pub(crate) fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(ts);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.naive_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ReportError::Database(format!("Invalid timestamp {:?}", raw)))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 10, 3)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();

        assert_eq!(parse_timestamp("2026-10-03 14:30:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2026-10-03T14:30:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2026-10-03T14:30:00+00:00").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2026-10-03").unwrap(),
            expected.date().and_hms_opt(0, 0, 0).unwrap()
        );
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_parse_date_ignores_time_part() {
        assert_eq!(
            parse_date("2026-10-18 00:00:00").unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
        );
        assert_eq!(format_date(parse_date("2026-01-05").unwrap()), "2026-01-05");
    }
}
