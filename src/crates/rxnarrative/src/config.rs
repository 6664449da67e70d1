//! Configuration management for rxnarrative
//!
//! Supports layered configuration:
//! - User-level: ~/.rxnarrative/rxnarrative.toml
//! - Project-level: ./.rxnarrative/rxnarrative.toml
//! - Explicit: `--config <PATH>`
//!
//! Later layers override earlier ones section by section.

mod loader;
mod schema;

pub use loader::ConfigLoader;
pub use schema::{
    instruction, DatabaseConfig, EmptyWindowPolicy, LlmConfig, LoggingConfig, NarrativeConfig,
    PartialConfig, PromptTemplates, ReportSettings, TableConfig,
};

use crate::Result;
use std::path::PathBuf;

/// Load configuration from every location, with an optional explicit file last
pub async fn load_config(explicit: Option<PathBuf>) -> Result<NarrativeConfig> {
    let loader = match explicit {
        Some(path) => ConfigLoader::new().with_explicit(path),
        None => ConfigLoader::new(),
    };
    loader.load().await
}
