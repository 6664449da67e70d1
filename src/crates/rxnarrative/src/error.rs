//! Error types for rxnarrative
//!
//! One error type for the whole routine. The first three variants are the
//! domain failures a run can hit; the rest wrap infrastructure errors.

use crate::models::Section;
use llm::LlmError;
use std::fmt;

/// Result type alias for rxnarrative operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// Main error type for rxnarrative operations
#[derive(Debug)]
pub enum ReportError {
    /// An aggregate over an empty window came back NULL
    DataGap { section: Section, detail: String },

    /// Fewer rows than the section needs
    InsufficientData {
        section: Section,
        required: usize,
        found: usize,
    },

    /// The completion capability failed for a section
    ExternalService { section: Section, source: LlmError },

    /// Configuration error
    Config(String),

    /// Database error with context
    Database(String),

    /// IO error
    Io(std::io::Error),

    /// Serialization/deserialization error
    Serde(serde_json::Error),

    /// SQL error
    Sqlx(sqlx::Error),

    /// Generic error with message
    Other(String),
}

impl ReportError {
    /// The report section this error belongs to, if any.
    pub fn section(&self) -> Option<Section> {
        match self {
            Self::DataGap { section, .. }
            | Self::InsufficientData { section, .. }
            | Self::ExternalService { section, .. } => Some(*section),
            _ => None,
        }
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataGap { section, detail } => {
                write!(f, "Data gap in {} section: {}", section, detail)
            }
            Self::InsufficientData {
                section,
                required,
                found,
            } => write!(
                f,
                "Insufficient data for {} section: need {} rows, found {}",
                section, required, found
            ),
            Self::ExternalService { section, source } => {
                write!(f, "Completion failed for {} section: {}", section, source)
            }
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Database(msg) => write!(f, "Database error: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Serde(err) => write!(f, "Serialization error: {}", err),
            Self::Sqlx(err) => write!(f, "SQL error: {}", err),
            Self::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ExternalService { source, .. } => Some(source),
            Self::Io(err) => Some(err),
            Self::Serde(err) => Some(err),
            Self::Sqlx(err) => Some(err),
            _ => None,
        }
    }
}

// Conversions from common error types
impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err)
    }
}

impl From<sqlx::Error> for ReportError {
    fn from(err: sqlx::Error) -> Self {
        Self::Sqlx(err)
    }
}

impl From<anyhow::Error> for ReportError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<String> for ReportError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}

impl From<&str> for ReportError {
    fn from(msg: &str) -> Self {
        Self::Other(msg.to_string())
    }
}
