//! `rxnarrative run`

use super::{build_pipeline, OutputFormat};
use crate::config::NarrativeConfig;
use crate::error::Result;
use crate::models::{NarrativeSet, Prompt};
use chrono::{NaiveDate, Utc};
use colored::Colorize;

/// Generate and store today's (or `date`'s) narratives, or print the prompts
pub async fn handle_run(
    config: &NarrativeConfig,
    date: Option<NaiveDate>,
    dry_run: bool,
    format: OutputFormat,
) -> Result<()> {
    let run_date = date.unwrap_or_else(|| Utc::now().date_naive());
    let pipeline = build_pipeline(config, dry_run).await?;

    if dry_run {
        let prompts = pipeline.prompts(run_date).await?;
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&prompts)?),
            OutputFormat::Text => print_prompts(run_date, &prompts),
        }
        return Ok(());
    }

    let set = pipeline.run(run_date).await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&set.into_map())?),
        OutputFormat::Text => print_narratives(&set),
    }

    Ok(())
}

fn print_prompts(run_date: NaiveDate, prompts: &[Prompt]) {
    println!(
        "{}",
        format!("Prompts for {} (dry run, nothing sent or stored)", run_date)
            .bold()
            .underline()
    );
    for prompt in prompts {
        println!("\n{}", prompt.section.key().cyan().bold());
        println!("{}", prompt.text);
    }
}

pub(crate) fn print_narratives(set: &NarrativeSet) {
    println!(
        "{}",
        format!("✓ Narratives stored for {}", set.run_date).green().bold()
    );
    for section in crate::models::Section::ALL {
        let narrative = set.get(section);
        println!("\n{}", section.key().cyan().bold());
        println!("{}", narrative.text);
    }
}
