use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rca_core::analysis::AnalysisType;
use rca_core::config::Config;
use rca_core::service::AnalysisService;
use rca_core::storage::SqliteStore;

/// Inspect and manage root-cause analysis records.
#[derive(Parser)]
#[command(name = "rca-core", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a subject's analysis record as JSON
    Show {
        /// The subject (e.g., corrective action item) id
        subject_id: String,
    },
    /// Select a subject's analysis type (five_whys, ishikawa, fta, none)
    Select {
        /// The subject id
        subject_id: String,
        /// The analysis type to activate
        analysis_type: String,
    },
    /// Delete a subject's analysis record
    Clear {
        /// The subject id
        subject_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&config);

    // Initialize storage
    let store = match SqliteStore::new(&config.database).await {
        Ok(s) => {
            info!(path = %config.database.path.display(), "Database initialized");
            s
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize database");
            return Err(e.into());
        }
    };

    let mut service = AnalysisService::new(store);

    match cli.command {
        Command::Show { subject_id } => match service.analysis(&subject_id).await? {
            Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            None => println!("No analysis recorded for subject {}", subject_id),
        },
        Command::Select {
            subject_id,
            analysis_type,
        } => {
            let analysis_type = analysis_type
                .parse::<AnalysisType>()
                .map_err(|e| anyhow::anyhow!(e))?;
            service.select(&subject_id, analysis_type).await?;
            println!("Subject {} now uses {}", subject_id, analysis_type);
        }
        Command::Clear { subject_id } => {
            service.clear(&subject_id).await?;
            println!("Cleared analysis for subject {}", subject_id);
        }
    }

    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        rca_core::config::LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        rca_core::config::LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
