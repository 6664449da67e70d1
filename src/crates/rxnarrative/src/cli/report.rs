//! `rxnarrative latest` and `rxnarrative history`

use super::{open_warehouse, truncate_chars, OutputFormat};
use crate::config::NarrativeConfig;
use crate::error::Result;
use crate::models::{NarrativeRecord, Section};
use chrono::NaiveDate;
use colored::Colorize;
use tabled::{Table, Tabled};

/// History row for table output
#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Section")]
    section: String,
    #[tabled(rename = "Narrative")]
    narrative: String,
}

/// Print the most recently stored narratives
pub async fn handle_latest(config: &NarrativeConfig, format: OutputFormat) -> Result<()> {
    let warehouse = open_warehouse(config).await?;
    let repo = warehouse.narratives();
    repo.ensure_table().await?;

    let Some(record) = repo.latest().await? else {
        println!("{}", "No narratives stored yet".yellow());
        return Ok(());
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
        OutputFormat::Text => print_record(&record),
    }
    Ok(())
}

/// List every row stored for one run date
pub async fn handle_history(config: &NarrativeConfig, date: NaiveDate) -> Result<()> {
    let warehouse = open_warehouse(config).await?;
    let repo = warehouse.narratives();
    repo.ensure_table().await?;

    let records = repo.list_for_date(date).await?;
    if records.is_empty() {
        println!("{}", format!("No narratives stored for {}", date).yellow());
        return Ok(());
    }

    let rows: Vec<HistoryRow> = records
        .iter()
        .enumerate()
        .flat_map(|(i, record)| {
            Section::ALL.into_iter().map(move |section| HistoryRow {
                index: i + 1,
                section: section.to_string(),
                narrative: truncate_chars(record.narrative(section), 80),
            })
        })
        .collect();

    println!("{}", Table::new(rows));
    if records.len() > 1 {
        println!(
            "\n{}",
            format!("{} runs stored for {}", records.len(), date).yellow()
        );
    } else {
        println!("\nTotal: 1 run");
    }

    Ok(())
}

fn print_record(record: &NarrativeRecord) {
    println!(
        "{}",
        format!("Narratives for {}", record.run_date).bold().underline()
    );
    for section in Section::ALL {
        println!("\n{}", section.key().cyan().bold());
        println!("{}", record.narrative(section));
    }
}
