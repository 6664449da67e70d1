//! Configuration schema for rxnarrative

use crate::error::{ReportError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct NarrativeConfig {
    /// Store connection
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Source and output table names
    #[serde(default)]
    pub tables: TableConfig,

    /// Completion provider
    #[serde(default)]
    pub llm: LlmConfig,

    /// Windows, driver count, empty-window policy
    #[serde(default)]
    pub report: ReportSettings,

    /// Instruction headers prepended to every prompt
    #[serde(default)]
    pub prompts: PromptTemplates,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// A config file as written on disk: every section optional.
///
/// Present sections replace the corresponding section of the config being
/// merged into; absent sections leave it untouched.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PartialConfig {
    pub database: Option<DatabaseConfig>,
    pub tables: Option<TableConfig>,
    pub llm: Option<LlmConfig>,
    pub report: Option<ReportSettings>,
    pub prompts: Option<PromptTemplates>,
    pub logging: Option<LoggingConfig>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx connection URL, e.g. `sqlite:rxnarrative.db` or `sqlite::memory:`
    pub url: String,

    /// Pool size
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:rxnarrative.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Table names. Plain identifiers only; they are spliced into SQL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TableConfig {
    pub sales: String,
    pub forecast: String,
    pub anomalies: String,
    pub drivers: String,
    pub narratives: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            sales: "PRESCRIPTION_SALES".to_string(),
            forecast: "PRESCRIPTION_FORECAST_30DAYS".to_string(),
            anomalies: "DETECTED_ANOMALIES".to_string(),
            drivers: "HEALTHCARE_INSIGHT_DRIVERS".to_string(),
            narratives: "PRESCRIPTION_NARRATIVES".to_string(),
        }
    }
}

impl TableConfig {
    fn validate(&self) -> Result<()> {
        let ident = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$")
            .map_err(|e| ReportError::Config(format!("identifier pattern: {}", e)))?;

        for (key, name) in [
            ("sales", &self.sales),
            ("forecast", &self.forecast),
            ("anomalies", &self.anomalies),
            ("drivers", &self.drivers),
            ("narratives", &self.narratives),
        ] {
            if !ident.is_match(name) {
                return Err(ReportError::Config(format!(
                    "tables.{} = {:?} is not a plain SQL identifier",
                    key, name
                )));
            }
        }
        Ok(())
    }
}

/// Completion provider configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    /// "openai" (any OpenAI-compatible endpoint), "ollama", or "stub"
    pub provider: String,

    /// Model identifier sent on every call
    pub model: String,

    /// API key (supports `${VAR}` expansion)
    pub api_key: Option<String>,

    /// API base URL (supports `${VAR}` expansion)
    pub api_base: Option<String>,

    /// `OpenAI-Organization` header for the "openai" provider
    pub organization: Option<String>,

    /// Sampling temperature; provider default when unset
    pub temperature: Option<f32>,

    /// Generated-token cap; provider default when unset
    pub max_tokens: Option<usize>,

    /// HTTP request timeout in seconds
    pub timeout_secs: u64,

    /// Fixed reply for the "stub" provider; echoes the prompt when unset
    pub stub_reply: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "llama3.1-8b".to_string(),
            api_key: Some("${OPENAI_API_KEY}".to_string()),
            api_base: None,
            organization: None,
            temperature: None,
            max_tokens: None,
            timeout_secs: 60,
            stub_reply: None,
        }
    }
}

/// What to do when the KPI window or forecast table is empty.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmptyWindowPolicy {
    /// Abort the run with a data-gap error; nothing is written
    #[default]
    Fail,
    /// Send a fixed "no data" prompt for the section instead
    Describe,
}

/// Report windows and thresholds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportSettings {
    /// Trailing sales window in days, inclusive of both ends
    pub kpi_window_days: u32,

    /// Trailing anomaly window in calendar months
    pub anomaly_window_months: u32,

    /// Number of drivers named in the insight section
    pub driver_count: usize,

    pub empty_window: EmptyWindowPolicy,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            kpi_window_days: 30,
            anomaly_window_months: 1,
            driver_count: 3,
            empty_window: EmptyWindowPolicy::Fail,
        }
    }
}

impl ReportSettings {
    fn validate(&self) -> Result<()> {
        if self.anomaly_window_months == 0 {
            return Err(ReportError::Config(
                "report.anomaly_window_months must be at least 1".to_string(),
            ));
        }
        if self.driver_count == 0 {
            return Err(ReportError::Config(
                "report.driver_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Build a header in the house style.
///
/// `length` is the sentence-count target ("one or two"), `subject` what the
/// narrative describes ("the KPI summary").
pub fn instruction(length: &str, subject: &str) -> String {
    format!(
        "No Placeholders: Write exactly {} sentences describing {}, \
         using no placeholders or suggestions, suitable for a non\u{2011}specialist audience. ",
        length, subject
    )
}

/// Instruction headers. Each is prepended verbatim to the section's facts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PromptTemplates {
    pub kpi: String,
    pub forecast: String,
    /// Used when at least one anomaly was flagged
    pub anomaly: String,
    /// Used when no anomaly was flagged
    pub anomaly_none: String,
    pub insight: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            kpi: instruction("one or two", "the KPI summary"),
            forecast: instruction("three or four", "the forecast overview"),
            anomaly: instruction("three or four", "the anomaly summary"),
            anomaly_none: instruction("one or two", "the anomaly summary"),
            insight: instruction("three or four", "the top\u{2011}drivers insight"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directive: "info", "rxnarrative=debug,sqlx=warn", ...
    pub level: String,

    /// Log format: "compact", "pretty", "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl NarrativeConfig {
    /// Merge a file's sections into this config (file takes precedence)
    pub fn merge(&mut self, other: PartialConfig) {
        if let Some(database) = other.database {
            self.database = database;
        }
        if let Some(tables) = other.tables {
            self.tables = tables;
        }
        if let Some(llm) = other.llm {
            self.llm = llm;
        }
        if let Some(report) = other.report {
            self.report = report;
        }
        if let Some(prompts) = other.prompts {
            self.prompts = prompts;
        }
        if let Some(logging) = other.logging {
            self.logging = logging;
        }
    }

    /// Resolve environment variables in configuration values
    ///
    /// Supports ${VAR_NAME} syntax in the API key, API base and database URL.
    /// An API key that names an unset variable is dropped.
    pub fn resolve_env_vars(&mut self) {
        self.llm.api_key = self
            .llm
            .api_key
            .as_deref()
            .and_then(|key| Self::expand_env_var(key));

        if let Some(ref api_base) = self.llm.api_base {
            self.llm.api_base = Some(
                Self::expand_env_var(api_base).unwrap_or_else(|| api_base.clone()),
            );
        }

        if let Some(url) = Self::expand_env_var(&self.database.url) {
            self.database.url = url;
        }
    }

    /// Expand a `${VAR_NAME}` value; other strings pass through unchanged.
    ///
    /// Returns `None` when the variable is referenced but not set.
    fn expand_env_var(value: &str) -> Option<String> {
        match value.strip_prefix("${").and_then(|v| v.strip_suffix('}')) {
            Some(var_name) => std::env::var(var_name).ok(),
            None => Some(value.to_string()),
        }
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        self.tables.validate()?;
        self.report.validate()?;
        if self.database.max_connections == 0 {
            return Err(ReportError::Config(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NarrativeConfig::default();
        assert_eq!(config.database.url, "sqlite:rxnarrative.db");
        assert_eq!(config.llm.model, "llama3.1-8b");
        assert_eq!(config.report.kpi_window_days, 30);
        assert_eq!(config.report.driver_count, 3);
        assert_eq!(config.report.empty_window, EmptyWindowPolicy::Fail);
        assert_eq!(config.tables.narratives, "PRESCRIPTION_NARRATIVES");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_headers_match_house_style() {
        let prompts = PromptTemplates::default();
        assert_eq!(
            prompts.kpi,
            "No Placeholders: Write exactly one or two sentences describing the KPI summary, \
             using no placeholders or suggestions, suitable for a non\u{2011}specialist audience. "
        );
        assert!(prompts.insight.contains("the top\u{2011}drivers insight"));
        assert!(prompts.anomaly.contains("three or four"));
        assert!(prompts.anomaly_none.contains("one or two"));
    }

    #[test]
    fn test_merge_replaces_present_sections_only() {
        let mut base = NarrativeConfig::default();
        let file: PartialConfig = toml::from_str(
            r#"
            [llm]
            provider = "ollama"
            model = "llama3.1:8b"
            "#,
        )
        .unwrap();

        base.merge(file);

        assert_eq!(base.llm.provider, "ollama");
        assert_eq!(base.llm.timeout_secs, 60); // serde default inside the section
        assert_eq!(base.database.url, "sqlite:rxnarrative.db"); // untouched
    }

    #[test]
    fn test_env_var_expansion() {
        let mut config = NarrativeConfig::default();
        config.llm.api_key = Some("${RXN_TEST_API_KEY}".to_string());
        config.database.url = "${RXN_TEST_DB_URL}".to_string();

        std::env::set_var("RXN_TEST_API_KEY", "test-key-123");
        std::env::set_var("RXN_TEST_DB_URL", "sqlite::memory:");
        config.resolve_env_vars();

        assert_eq!(config.llm.api_key, Some("test-key-123".to_string()));
        assert_eq!(config.database.url, "sqlite::memory:");

        std::env::remove_var("RXN_TEST_API_KEY");
        std::env::remove_var("RXN_TEST_DB_URL");
    }

    #[test]
    fn test_unset_api_key_variable_is_dropped() {
        let mut config = NarrativeConfig::default();
        config.llm.api_key = Some("${RXN_TEST_NEVER_SET}".to_string());
        config.resolve_env_vars();
        assert_eq!(config.llm.api_key, None);
    }

    #[test]
    fn test_table_names_must_be_identifiers() {
        let mut config = NarrativeConfig::default();
        config.tables.sales = "sales; DROP TABLE x".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tables.sales"));
    }

    #[test]
    fn test_empty_window_policy_deserializes() {
        let settings: ReportSettings = toml::from_str(
            r#"
            empty_window = "describe"
            kpi_window_days = 14
            "#,
        )
        .unwrap();

        assert_eq!(settings.empty_window, EmptyWindowPolicy::Describe);
        assert_eq!(settings.kpi_window_days, 14);
        assert_eq!(settings.anomaly_window_months, 1);
    }

    #[test]
    fn test_zero_driver_count_rejected() {
        let mut config = NarrativeConfig::default();
        config.report.driver_count = 0;
        assert!(config.validate().is_err());
    }
}
