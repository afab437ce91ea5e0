//! Shell completions for `sixdeg`

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use crate::Cli;

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Completion script for `shell`, covering every sixdeg subcommand
pub fn render(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, out);
}

pub fn run(args: &CompletionsArgs) -> anyhow::Result<()> {
    match &args.output {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            render(args.shell, &mut file);
            eprintln!("Wrote {} completions to {}", args.shell, path.display());
        }
        None => render(args.shell, &mut std::io::stdout()),
    }
    Ok(())
}
