//! Group command

use clap::Args;

use crate::output::{entity_table, to_json, OutputFormat};
use crate::AppContext;

#[derive(Args)]
pub struct GroupArgs {
    /// Group id
    pub id: u64,
}

pub fn run(args: &GroupArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let group = ctx.source.group(args.id)?;

    match (ctx.format, group) {
        (OutputFormat::Json, group) => println!("{}", to_json(&group)?),
        (OutputFormat::Table, None) => println!("Group {} not found", args.id),
        (OutputFormat::Table, Some(group)) => {
            tracing::info!("Group {} has {} members", group.id, group.members.len());
            println!("Group: {} ({})", group.title, group.id);
            if group.members.is_empty() {
                println!("  No members");
            } else {
                println!("  Members ({}):", group.members.len());
                for line in entity_table(&group.members) {
                    println!("  {}", line);
                }
            }
        }
    }

    Ok(())
}
