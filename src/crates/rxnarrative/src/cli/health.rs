//! `rxnarrative health`

use super::config::open_database;
use super::OutputFormat;
use crate::config::NarrativeConfig;
use crate::error::{ReportError, Result};
use crate::generator::NarrativeGenerator;
use crate::provider::completion_model_from_config;
use colored::Colorize;
use serde::Serialize;
use std::time::Instant;

#[derive(Debug, Serialize)]
struct ComponentCheck {
    name: &'static str,
    healthy: bool,
    response_time_ms: u64,
    message: String,
}

/// Ping the database and the completion provider
pub async fn handle_health(config: &NarrativeConfig, format: OutputFormat) -> Result<()> {
    let mut checks = Vec::with_capacity(2);

    let started = Instant::now();
    let database = match open_database(config).await {
        Ok(db) => db
            .health_check()
            .await
            .map(|_| config.database.url.clone()),
        Err(e) => Err(e),
    };
    checks.push(ComponentCheck {
        name: "database",
        healthy: database.is_ok(),
        response_time_ms: started.elapsed().as_millis() as u64,
        message: database.unwrap_or_else(|e| e.to_string()),
    });

    let started = Instant::now();
    let provider = match completion_model_from_config(&config.llm) {
        Ok(model) => {
            let generator = NarrativeGenerator::new(model).with_settings(&config.llm);
            if generator.is_available().await {
                Ok(format!(
                    "{} ({}) reachable",
                    config.llm.provider,
                    generator.model_name()
                ))
            } else {
                Err(format!("{} not reachable", config.llm.provider))
            }
        }
        Err(e) => Err(e.to_string()),
    };
    checks.push(ComponentCheck {
        name: "completion",
        healthy: provider.is_ok(),
        response_time_ms: started.elapsed().as_millis() as u64,
        message: provider.unwrap_or_else(|e| e),
    });

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&checks)?),
        OutputFormat::Text => {
            println!("{}", "System Health Check".bold().underline());
            println!();
            println!("{:<12} {:<12} {:<10} {}", "Component", "Status", "Time (ms)", "Message");
            println!("{}", "-".repeat(72));
            for check in &checks {
                let status = if check.healthy {
                    "✓ healthy".green()
                } else {
                    "✗ failing".red()
                };
                println!(
                    "{:<12} {:<12} {:<10} {}",
                    check.name, status, check.response_time_ms, check.message
                );
            }
        }
    }

    if checks.iter().all(|c| c.healthy) {
        Ok(())
    } else {
        Err(ReportError::Other("health check failed".to_string()))
    }
}
