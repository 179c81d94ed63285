use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(
    name = "kitis",
    version,
    about = "Schedule extraction engine for the KITIS college timetable",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the configured format
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// TOML configuration file (defaults to KITIS_* environment variables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the schedule of a group, lecturer or room as JSON
    Schedule {
        /// Schedule viewpoint (group, lecturer, room)
        #[arg(short, long)]
        role: String,

        /// Entity name exactly as listed on the site
        #[arg(short, long)]
        entity: String,
    },

    /// Build the link directory from the index pages
    Links {
        /// Write the directory snapshot to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Ping the timetable host
    Ping {
        /// URL to ping (defaults to the probe page)
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Start the schedule API server
    Serve {
        /// Address to listen on
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    // Initialize tracing/logging
    let format = cli.log_format.as_deref().unwrap_or(&config.logging.format);
    setup_tracing(format, &config.logging.level, cli.verbose)?;

    match cli.command {
        Commands::Schedule { role, entity } => {
            tracing::info!(role = %role, entity = %entity, "Starting schedule command");
            commands::schedule(config, role, entity).await?;
        }

        Commands::Links { output } => {
            tracing::info!(output = ?output, "Starting links command");
            commands::links(config, output).await?;
        }

        Commands::Ping { url } => {
            tracing::info!(url = ?url, "Starting ping command");
            commands::ping(config, url).await?;
        }

        Commands::Serve { bind } => {
            tracing::info!(bind = ?bind, "Starting serve command");
            commands::serve(config, bind).await?;
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("kitis=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("kitis={level},warn")))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
