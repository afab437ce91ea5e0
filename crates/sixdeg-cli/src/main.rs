//! Sixdeg CLI - Find the shortest connection between two entities

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{completions, entity, find, group, location, path};
use config::Config;
use output::OutputFormat;
use sixdeg_source::{Dataset, MemorySource};

#[derive(Parser)]
#[command(name = "sixdeg")]
#[command(author, version, about = "Shortest chain of relationships between two entities")]
pub struct Cli {
    /// Dataset file (JSON)
    #[arg(short, long, env = "SIXDEG_DATA", global = true)]
    pub data: Option<PathBuf>,

    /// Output format: table, json
    #[arg(short, long, global = true)]
    pub format: Option<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find the shortest connection between two entities
    Path(path::PathArgs),
    /// Show an entity and its relationships
    Entity(entity::EntityArgs),
    /// Show a group and its members
    Group(group::GroupArgs),
    /// Show a location and its residents
    Location(location::LocationArgs),
    /// Search entities by name
    Find(find::FindArgs),
    /// Manage dataset, output and search defaults
    Config(commands::config::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Application context with the loaded entity source
pub struct AppContext {
    pub source: Arc<MemorySource>,
    pub config: Config,
    pub format: OutputFormat,
}

impl AppContext {
    pub fn new(cli: &Cli) -> anyhow::Result<Self> {
        let config = Config::load()?;

        let data = cli
            .data
            .clone()
            .or_else(|| config.dataset.clone())
            .context("No dataset given; pass --data or run `sixdeg config set dataset <file>`")?;
        tracing::debug!("Using dataset at: {:?}", data);

        let dataset = Dataset::from_path(&data)
            .with_context(|| format!("Failed to load dataset {}", data.display()))?;
        let source = MemorySource::from_dataset(dataset)?;

        let format = cli
            .format
            .as_deref()
            .or(config.format.as_deref())
            .map(OutputFormat::from)
            .unwrap_or_default();

        Ok(Self {
            source: Arc::new(source),
            config,
            format,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting sixdeg CLI");

    match &cli.command {
        Commands::Path(args) => path::run(args, &cli, &AppContext::new(&cli)?).await?,
        Commands::Entity(args) => entity::run(args, &AppContext::new(&cli)?).await?,
        Commands::Group(args) => group::run(args, &AppContext::new(&cli)?)?,
        Commands::Location(args) => location::run(args, &AppContext::new(&cli)?)?,
        Commands::Find(args) => find::run(args, &AppContext::new(&cli)?)?,
        Commands::Config(args) => commands::config::run(args)?,
        Commands::Completions(args) => completions::run(args)?,
    }

    Ok(())
}
