//! Config command: dataset, output and search defaults

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Subcommand, ValueEnum};

use crate::config::{config_file_path, Config, ConfigKey};
use sixdeg_source::Dataset;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show stored settings and the search limits they give
    Show,
    /// Print one setting, empty when unset
    Get { key: ConfigKey },
    /// Store a setting; search limits are checked before saving
    Set { key: ConfigKey, value: String },
    /// Remove a setting
    Unset { key: ConfigKey },
    /// Check that the stored settings and dataset are usable
    Check,
    /// Print the config file location
    Path,
    /// Create the config file
    Init {
        /// Dataset to use by default
        #[arg(long)]
        dataset: Option<PathBuf>,
        /// Longest connection to search for, in hops
        #[arg(long)]
        max_depth: Option<u32>,
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: &ConfigArgs) -> anyhow::Result<()> {
    match &args.command {
        ConfigCommands::Show => show(&Config::load()?),
        ConfigCommands::Get { key } => {
            println!("{}", Config::load()?.get(*key).unwrap_or_default());
            Ok(())
        }
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(*key, value)?;
            config.save()?;
            println!("Set {} = {}", key.as_str(), value);
            Ok(())
        }
        ConfigCommands::Unset { key } => {
            let mut config = Config::load()?;
            config.unset(*key);
            config.save()?;
            println!("Unset {}", key.as_str());
            Ok(())
        }
        ConfigCommands::Check => check(&Config::load()?),
        ConfigCommands::Path => {
            println!("{}", config_file_path().display());
            Ok(())
        }
        ConfigCommands::Init {
            dataset,
            max_depth,
            force,
        } => init(dataset.clone(), *max_depth, *force),
    }
}

fn show(config: &Config) -> anyhow::Result<()> {
    println!("Config file: {}", config_file_path().display());
    println!();
    for key in ConfigKey::value_variants() {
        let value = config.get(*key).unwrap_or_else(|| "(not set)".to_string());
        println!("{} = {}", key.as_str(), value);
    }

    let search = config.search_config();
    let depth = match search.max_depth {
        Some(hops) => format!("up to {} hops", hops),
        None => "unbounded depth".to_string(),
    };
    let timeout = match search.lookup_timeout_ms {
        Some(ms) => format!("{}ms per lookup", ms),
        None => "no lookup timeout".to_string(),
    };
    println!();
    println!("Search: {}, {}", depth, timeout);
    Ok(())
}

fn check(config: &Config) -> anyhow::Result<()> {
    config
        .search_config()
        .validate()
        .context("Stored search settings are out of range")?;
    println!("search settings: ok");

    match &config.dataset {
        Some(path) => {
            let dataset = Dataset::from_path(path)
                .with_context(|| format!("Dataset {} is not usable", path.display()))?;
            println!(
                "dataset: ok ({} entities, {} groups, {} locations)",
                dataset.entities.len(),
                dataset.groups.len(),
                dataset.locations.len()
            );
        }
        None => println!("dataset: not set"),
    }
    Ok(())
}

fn init(dataset: Option<PathBuf>, max_depth: Option<u32>, force: bool) -> anyhow::Result<()> {
    let path = config_file_path();
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    let config = Config {
        dataset,
        max_depth,
        ..Config::default()
    };
    config.save()?;
    println!("Created config file at {}", path.display());
    Ok(())
}
