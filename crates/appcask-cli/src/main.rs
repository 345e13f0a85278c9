mod completion;
mod dispatch;
mod render;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(name = "appcask")]
#[command(about = "AppImage and .deb lifecycle manager", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    Install {
        file: PathBuf,
    },
    List {
        #[arg(long)]
        json: bool,
    },
    Launch {
        name: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    Uninstall {
        name: String,
    },
    UninstallPackage {
        name: String,
    },
    Logs {
        app: Option<String>,
        #[arg(long)]
        tail: Option<usize>,
        #[arg(long)]
        clear: bool,
        #[arg(long)]
        summary: bool,
    },
    Doctor,
    Completions {
        shell: Shell,
    },
}

fn main() -> Result<()> {
    dispatch::run_cli(Cli::parse())
}
