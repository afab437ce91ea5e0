//! Find command

use clap::Args;

use crate::output::{entity_table, to_json, OutputFormat};
use crate::AppContext;

#[derive(Args)]
pub struct FindArgs {
    /// Part of the entity name, case-insensitive
    pub query: String,

    /// Page to show, starting at 1
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Results per page
    #[arg(long, default_value = "10")]
    pub per_page: usize,
}

pub fn run(args: &FindArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let page = ctx.source.find_page(&args.query, args.page, args.per_page)?;
    tracing::info!("Found {} entities, showing {}", page.count, page.results.len());

    match ctx.format {
        OutputFormat::Json => println!("{}", to_json(&page)?),
        OutputFormat::Table => {
            if page.count == 0 {
                println!("No entities matching '{}'", args.query);
                return Ok(());
            }

            println!(
                "Entities matching '{}' ({} found, page {} of {}):",
                args.query,
                page.count,
                page.page,
                page.pages(args.per_page)
            );
            for line in entity_table(&page.results) {
                println!("{}", line);
            }
            if let Some(next) = page.next_page {
                println!("  More: --page {}", next);
            }
        }
    }

    Ok(())
}
