use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "stint", about = "Short-lived task tracking in local storage", version)]
pub struct GlobalCli {
    /// Alternate config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory override.
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q warnings off, -qq errors only).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a task.
    Add {
        /// Task name.
        name: String,

        /// Task description.
        #[arg(long)]
        desc: Option<String>,

        /// Due day: today or tomorrow.
        #[arg(long)]
        day: Option<String>,

        /// Priority: high, medium or low.
        #[arg(long)]
        priority: Option<String>,

        /// Tag label; repeat for several.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// List tasks, optionally narrowed by a search term.
    List {
        /// Substring matched against name and description.
        term: Option<String>,
    },

    /// Show one task in full.
    Show { id: Uuid },

    /// Edit fields of a task; unset fields keep their value.
    Edit {
        id: Uuid,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        desc: Option<String>,

        #[arg(long)]
        day: Option<String>,

        #[arg(long)]
        priority: Option<String>,

        /// Replacement tag label; repeat for several. Omitting keeps the
        /// existing tags.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Delete a task after confirmation.
    Rm {
        id: Uuid,

        /// Confirm the deletion.
        #[arg(long)]
        force: bool,
    },
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
