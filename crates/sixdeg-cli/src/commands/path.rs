//! Path command

use clap::Args;
use serde::Serialize;

use crate::output::{path_lines, to_json, OutputFormat};
use crate::{AppContext, Cli};
use sixdeg_core::{EntityId, PathFinder, ResolvedPath, SearchStats};

#[derive(Args)]
pub struct PathArgs {
    /// Reference entity id
    pub from: u64,

    /// Target entity id
    pub to: u64,

    /// Longest connection to look for, in hops
    #[arg(short, long)]
    pub max_depth: Option<u32>,

    /// Timeout for each relationship lookup, in milliseconds
    #[arg(short, long)]
    pub timeout_ms: Option<u64>,
}

#[derive(Serialize)]
struct PathReport<'a> {
    from: u64,
    to: u64,
    found: bool,
    hops: Option<usize>,
    path: Option<&'a ResolvedPath>,
    stats: &'a SearchStats,
}

pub async fn run(args: &PathArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let mut config = ctx.config.search_config();
    if let Some(depth) = args.max_depth {
        config.max_depth = Some(depth);
    }
    if let Some(timeout) = args.timeout_ms {
        config.lookup_timeout_ms = Some(timeout);
    }

    let finder = PathFinder::with_config(ctx.source.clone(), config)?;
    let (path, stats) = finder
        .find_with_stats(EntityId(args.from), EntityId(args.to))
        .await?;

    match ctx.format {
        OutputFormat::Json => {
            let report = PathReport {
                from: args.from,
                to: args.to,
                found: path.is_some(),
                hops: path.as_ref().map(ResolvedPath::hops),
                path: path.as_ref(),
                stats: &stats,
            };
            println!("{}", to_json(&report)?);
        }
        OutputFormat::Table => match &path {
            Some(path) => {
                let name_of = |i: usize| {
                    path.steps()
                        .get(i)
                        .map(|s| s.name.clone())
                        .unwrap_or_default()
                };
                println!(
                    "Connection from '{}' to '{}' ({} hops):",
                    name_of(0),
                    name_of(path.len().saturating_sub(1)),
                    path.hops()
                );
                for line in path_lines(path) {
                    println!("{}", line);
                }
            }
            None => {
                println!("No connection found between {} and {}", args.from, args.to);
            }
        },
    }

    if cli.verbose > 0 && ctx.format == OutputFormat::Table {
        println!(
            "  Stats: {} attempts, {} nodes expanded, {} edges admitted, depth {}",
            stats.attempts, stats.nodes_expanded, stats.edges_admitted, stats.max_depth_reached
        );
    }

    Ok(())
}
