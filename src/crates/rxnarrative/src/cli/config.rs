//! Shared setup for CLI commands
//!
//! Turns a loaded configuration into a connected warehouse and a ready
//! pipeline.

use crate::config::NarrativeConfig;
use crate::db::Database;
use crate::error::Result;
use crate::generator::NarrativeGenerator;
use crate::init;
use crate::pipeline::NarrativePipeline;
use crate::prompt::PromptBuilder;
use crate::provider::completion_model_from_config;
use crate::repositories::SqlWarehouse;
use llm::stub::FixedCompletion;
use llm::CompletionModel;
use std::sync::Arc;
use tracing::info;

/// Connect to the configured database
pub async fn open_database(config: &NarrativeConfig) -> Result<Arc<Database>> {
    info!(url = %config.database.url, "Opening database");
    let db = Database::connect(&config.database.url, config.database.max_connections).await?;
    Ok(Arc::new(db))
}

/// Warehouse over the configured tables
pub async fn open_warehouse(config: &NarrativeConfig) -> Result<SqlWarehouse> {
    let db = open_database(config).await?;
    Ok(SqlWarehouse::new(db, &config.tables))
}

/// Build a pipeline from configuration.
///
/// `offline` swaps the configured provider for an echoing stub so prompts
/// can be inspected without credentials or network access.
pub async fn build_pipeline(
    config: &NarrativeConfig,
    offline: bool,
) -> Result<NarrativePipeline<SqlWarehouse>> {
    let warehouse = open_warehouse(config).await?;

    let model: Arc<dyn CompletionModel> = if offline {
        Arc::new(FixedCompletion::echo(config.llm.model.clone()))
    } else {
        completion_model_from_config(&config.llm)?
    };
    let generator = NarrativeGenerator::new(model).with_settings(&config.llm);

    let builder = PromptBuilder::new(config.prompts.clone());

    Ok(NarrativePipeline::new(
        warehouse,
        generator,
        builder,
        config.report.clone(),
    ))
}

/// Check if a user or project configuration exists
pub fn is_initialized() -> bool {
    let user = init::get_user_config_path()
        .map(|p| p.exists())
        .unwrap_or(false);
    user || init::get_project_config_path().exists()
}

/// Get initialization instructions
pub fn get_init_instructions() -> String {
    "No rxnarrative configuration found; using built-in defaults. \
     Run 'rxnarrative init' to write one."
        .to_string()
}
