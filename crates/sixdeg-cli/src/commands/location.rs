//! Location command

use clap::Args;

use crate::output::{entity_table, to_json, OutputFormat};
use crate::AppContext;

#[derive(Args)]
pub struct LocationArgs {
    /// Location id
    pub id: u64,
}

pub fn run(args: &LocationArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let location = ctx.source.location(args.id)?;

    match (ctx.format, location) {
        (OutputFormat::Json, location) => println!("{}", to_json(&location)?),
        (OutputFormat::Table, None) => println!("Location {} not found", args.id),
        (OutputFormat::Table, Some(location)) => {
            tracing::info!(
                "Location {} has {} residents",
                location.id,
                location.residents.len()
            );
            println!("Location: {} ({})", location.name, location.id);
            if location.residents.is_empty() {
                println!("  No residents");
            } else {
                println!("  Residents ({}):", location.residents.len());
                for line in entity_table(&location.residents) {
                    println!("  {}", line);
                }
            }
        }
    }

    Ok(())
}
