//! rxnarrative CLI - daily prescription-sales narratives
//!
//! Main entry point for the rxnarrative command-line tool.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rxnarrative::cli::{self, OutputFormat};
use rxnarrative::{init, load_config, logging, version};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rxnarrative")]
#[command(about = "Turn rolling prescription-sales summaries into short narratives", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Config file applied on top of the user and project files
    #[arg(short, long, global = true, env = "RXNARRATIVE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a commented default configuration file
    Init {
        /// Write ./.rxnarrative/rxnarrative.toml instead of the user file
        #[arg(long)]
        project: bool,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Build the four narratives for a run date and append them
    Run {
        /// Run date (YYYY-MM-DD), defaults to today in UTC
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Print the prompts without calling the model or writing anything
        #[arg(long)]
        dry_run: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show the most recently stored narratives
    Latest {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List every row stored for a run date
    History {
        /// Run date (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,
    },

    /// Check database and completion provider
    Health {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { project, force } => {
            let path = if project {
                init::get_project_config_path()
            } else {
                init::get_user_config_path()?
            };
            if init::initialize(&path, force)? {
                println!("✓ Configuration written to {}", path.display());
                println!("\nSet OPENAI_API_KEY or edit [llm] before running.");
            } else {
                println!(
                    "Configuration already exists at {} (use --force to overwrite)",
                    path.display()
                );
            }
            Ok(())
        }
        Commands::Version => {
            println!("{}", version::full_version());
            Ok(())
        }
        command => {
            let config = load_config(cli.config).await?;
            logging::init_logging(&config.logging);

            if !cli::is_initialized() {
                tracing::debug!("{}", cli::get_init_instructions());
            }

            match command {
                Commands::Run {
                    date,
                    dry_run,
                    format,
                } => cli::run::handle_run(&config, date, dry_run, format).await?,
                Commands::Latest { format } => cli::report::handle_latest(&config, format).await?,
                Commands::History { date } => cli::report::handle_history(&config, date).await?,
                Commands::Health { format } => cli::health::handle_health(&config, format).await?,
                Commands::Init { .. } | Commands::Version => {}
            }
            Ok(())
        }
    }
}
