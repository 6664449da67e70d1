//! First-time setup: writes a commented default configuration file.

use crate::error::{ReportError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default configuration directory name
pub const CONFIG_DIR: &str = ".rxnarrative";

/// Default configuration file name
pub const CONFIG_FILE: &str = "rxnarrative.toml";

/// Get the rxnarrative home directory (~/.rxnarrative)
pub fn get_home() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR))
        .ok_or_else(|| ReportError::Config("Could not determine home directory".to_string()))
}

/// Get the path to the user-level configuration file
pub fn get_user_config_path() -> Result<PathBuf> {
    Ok(get_home()?.join(CONFIG_FILE))
}

/// Get the path to the project-level configuration file
pub fn get_project_config_path() -> PathBuf {
    PathBuf::from(".").join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Write the default configuration to `path`, creating parent directories.
///
/// An existing file is left alone unless `force` is set. Returns whether the
/// file was written.
pub fn initialize(path: &Path, force: bool) -> Result<bool> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .map_err(|e| ReportError::Config(format!("Failed to create directory: {}", e)))?;
            info!(path = %parent.display(), "Created configuration directory");
        }
    }

    if path.exists() && !force {
        warn!(path = %path.display(), "Configuration already exists (use --force to overwrite)");
        return Ok(false);
    }

    fs::write(path, DEFAULT_CONFIG)
        .map_err(|e| ReportError::Config(format!("Failed to write configuration: {}", e)))?;
    info!(path = %path.display(), "Created default configuration");

    Ok(true)
}

const DEFAULT_CONFIG: &str = r#"# rxnarrative configuration
#
# User-level file: ~/.rxnarrative/rxnarrative.toml
# Project-level file: ./.rxnarrative/rxnarrative.toml (overrides user-level)
# Any section present in a later file replaces the whole section.

[database]
# sqlx SQLite URL holding the analytics tables and the narrative table
url = "sqlite:rxnarrative.db"
max_connections = 5

[tables]
# Plain identifiers only
sales = "PRESCRIPTION_SALES"
forecast = "PRESCRIPTION_FORECAST_30DAYS"
anomalies = "DETECTED_ANOMALIES"
drivers = "HEALTHCARE_INSIGHT_DRIVERS"
narratives = "PRESCRIPTION_NARRATIVES"

[llm]
# Provider: "openai" (any OpenAI-compatible endpoint), "ollama", "stub"
provider = "openai"

# Model identifier sent on every call
model = "llama3.1-8b"

# API key (can use environment variables like ${OPENAI_API_KEY})
api_key = "${OPENAI_API_KEY}"

# Base URL; defaults to https://api.openai.com/v1 or http://localhost:11434
# api_base = "https://api.openai.com/v1"

# OpenAI organization header (openai provider only)
# organization = "org-..."

# Sampling settings; provider defaults when unset
# temperature = 0.2
# max_tokens = 256

# Request timeout in seconds
timeout_secs = 60

# Fixed reply for the "stub" provider (echoes the prompt when unset)
# stub_reply = "Prescription volume held steady."

[report]
# Trailing sales window in days (both ends inclusive)
kpi_window_days = 30

# Trailing anomaly window in calendar months
anomaly_window_months = 1

# Contributors named in the insight narrative
driver_count = 3

# Empty sales window or forecast table: "fail" aborts the run,
# "describe" sends a fixed no-data prompt instead
empty_window = "fail"

# [prompts]
# Instruction headers prepended to each section's facts. Defaults ask for
# one or two sentences (kpi, anomaly_none) or three or four (forecast,
# anomaly, insight) with no placeholders, for a non-specialist audience.
# kpi = "..."
# forecast = "..."
# anomaly = "..."
# anomaly_none = "..."
# insight = "..."

[logging]
# Log level or filter: "trace", "debug", "info", "warn", "error",
# or directives like "rxnarrative=debug,sqlx=warn". RUST_LOG wins.
level = "info"

# Log format: "compact", "pretty", "json"
format = "compact"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NarrativeConfig, PartialConfig};
    use tempfile::TempDir;

    #[test]
    fn test_config_paths() {
        assert!(get_user_config_path()
            .map(|p| p.ends_with(".rxnarrative/rxnarrative.toml"))
            .unwrap_or(true));
        assert!(get_project_config_path().ends_with(".rxnarrative/rxnarrative.toml"));
    }

    #[test]
    fn test_initialize_writes_and_respects_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join(CONFIG_FILE);

        assert!(initialize(&path, false).unwrap());
        assert!(path.exists());

        fs::write(&path, "# edited").unwrap();
        assert!(!initialize(&path, false).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "# edited");

        assert!(initialize(&path, true).unwrap());
        assert!(fs::read_to_string(&path).unwrap().contains("[report]"));
    }

    #[test]
    fn test_default_file_matches_built_in_defaults() {
        let file: PartialConfig = toml::from_str(DEFAULT_CONFIG).unwrap();

        let mut config = NarrativeConfig::default();
        config.merge(file);

        assert_eq!(config, NarrativeConfig::default());
    }
}
