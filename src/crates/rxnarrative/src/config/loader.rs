//! Configuration loader with layered locations
//!
//! Loads configuration from:
//! 1. Default values
//! 2. User-level config: ~/.rxnarrative/rxnarrative.toml
//! 3. Project-level config: ./.rxnarrative/rxnarrative.toml
//! 4. An explicit `--config` file
//!
//! Later files replace whole sections of earlier ones.

use crate::config::schema::{NarrativeConfig, PartialConfig};
use crate::error::{ReportError, Result};
use crate::init;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Configuration loader that handles user, project and explicit configs
pub struct ConfigLoader {
    user_config_path: Option<PathBuf>,
    project_config_path: PathBuf,
    explicit_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self {
            user_config_path: init::get_user_config_path().ok(),
            project_config_path: init::get_project_config_path(),
            explicit_path: None,
        }
    }

    /// Add a file that is loaded last and must exist
    pub fn with_explicit(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_path = Some(path.into());
        self
    }

    /// Override both discovered locations
    pub fn with_paths(mut self, user: Option<PathBuf>, project: PathBuf) -> Self {
        self.user_config_path = user;
        self.project_config_path = project;
        self
    }

    /// Load every layer, expand `${VAR}` references and validate
    pub async fn load(&self) -> Result<NarrativeConfig> {
        let mut config = NarrativeConfig::default();
        info!("Loading configuration with defaults");

        if let Some(ref user_path) = self.user_config_path {
            if let Some(user_config) = self.load_optional(user_path).await? {
                debug!(path = %user_path.display(), "Loaded user-level config");
                config.merge(user_config);
            }
        }

        if let Some(project_config) = self.load_optional(&self.project_config_path).await? {
            debug!(path = %self.project_config_path.display(), "Loaded project-level config");
            config.merge(project_config);
        }

        if let Some(ref explicit) = self.explicit_path {
            let explicit_config = self.load_from_path(explicit).await?;
            debug!(path = %explicit.display(), "Loaded explicit config");
            config.merge(explicit_config);
        }

        config.resolve_env_vars();
        config.validate()?;

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Missing files are skipped; unreadable or malformed ones are errors
    async fn load_optional(&self, path: &Path) -> Result<Option<PartialConfig>> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not present, skipping");
            return Ok(None);
        }
        self.load_from_path(path).await.map(Some)
    }

    /// Load configuration from a specific path
    async fn load_from_path(&self, path: &Path) -> Result<PartialConfig> {
        if !path.exists() {
            return Err(ReportError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| ReportError::Config(format!("Failed to read config: {}", e)))?;

        toml::from_str(&content).map_err(|e| {
            ReportError::Config(format!("Failed to parse config {}: {}", path.display(), e))
        })
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
