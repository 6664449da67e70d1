//! # rxnarrative - Prescription Sales Narratives
//!
//! Reads four aggregates from a prescription-sales warehouse, turns each into
//! a fixed-format prompt, asks a completion model for a short plain-language
//! summary, and appends the four summaries as one row.
//!
//! ## Sections
//!
//! - **KPI** - rolling sales window: peak and trough volume, average volume,
//!   spend and satisfaction
//! - **Forecast** - next-30-day forecast average and interval width
//! - **Anomaly** - flagged days in the lookback window and the worst one
//! - **Insight** - top contributors from the driver analysis
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rxnarrative::{load_config, NarrativeGenerator, NarrativePipeline, PromptBuilder};
//! use rxnarrative::{Database, SqlWarehouse};
//! use rxnarrative::provider::completion_model_from_config;
//! use std::sync::Arc;
//!
//! # async fn example() -> rxnarrative::Result<()> {
//! let config = load_config(None).await?;
//! let db = Arc::new(Database::connect(&config.database.url, 1).await?);
//! let warehouse = SqlWarehouse::new(db, &config.tables);
//! let generator = NarrativeGenerator::new(completion_model_from_config(&config.llm)?)
//!     .with_settings(&config.llm);
//!
//! let pipeline = NarrativePipeline::new(
//!     warehouse,
//!     generator,
//!     PromptBuilder::new(config.prompts.clone()),
//!     config.report.clone(),
//! );
//! let set = pipeline.run(chrono::Utc::now().date_naive()).await?;
//! println!("{}", set.kpi.text);
//! # Ok(())
//! # }
//! ```
//!
//! A run is all-or-nothing: if any aggregate is missing or any completion
//! call fails, nothing is written.

pub mod cli;
pub mod config;
pub mod db;
pub mod generator;
pub mod init;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod repositories;
pub mod version;

// Error types and utilities
mod error;

// Error types
pub use error::{ReportError, Result};

// Re-export version utilities
pub use version::{full_version as version_info, short_version};

// Re-export database and config types
pub use config::{load_config, ConfigLoader, NarrativeConfig};
pub use db::Database;

// Core routine
pub use generator::NarrativeGenerator;
pub use pipeline::NarrativePipeline;
pub use prompt::PromptBuilder;
pub use repositories::{SqlWarehouse, Warehouse};

// Re-export models
pub use models::{Narrative, NarrativeRecord, NarrativeSet, Prompt, Section};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        let info = version_info();
        assert!(info.contains("rxnarrative"));
        assert!(info.contains(version::VERSION));
    }
}
