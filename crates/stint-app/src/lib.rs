pub mod cli;
pub mod commands;
pub mod config;
pub mod coordinator;
pub mod navigation;
pub mod notify;
pub mod render;

use std::ffi::OsString;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = cli::GlobalCli::parse_from(raw_args);
    cli::init_tracing(cli.verbose, cli.quiet)?;
    info!(verbose = cli.verbose, quiet = cli.quiet, "starting stint CLI");

    let cfg = config::Config::load(cli.config.as_deref())?;
    let data_dir = config::resolve_data_dir(&cfg, cli.data.as_deref())
        .context("failed to resolve data directory")?;
    debug!(data_dir = %data_dir.display(), "resolved data directory");

    let store = stint_core::store::FileStore::open(&data_dir)
        .with_context(|| format!("failed to open task store at {}", data_dir.display()))?;
    let repo = stint_core::repository::TaskRepository::new(store);
    let coordinator =
        coordinator::Coordinator::with_notifier(repo, Box::new(notify::ConsoleNotify));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(commands::dispatch(&coordinator, cli.command))?;

    info!("done");
    Ok(())
}
