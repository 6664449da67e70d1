//! CLI command implementations
//!
//! Provides command handlers for the rxnarrative binary.

pub mod config;
pub mod health;
pub mod report;
pub mod run;

pub use config::{build_pipeline, get_init_instructions, is_initialized, open_warehouse};

use clap::ValueEnum;

/// Output format shared by the reporting commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Shorten to `max` characters, marking the cut with `...`
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
