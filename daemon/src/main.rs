//! tokenledger: command-line host for a fungible-token ledger stored in LMDB.

mod cli;
mod commands;
mod config;
mod report;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokenledger_store_lmdb::LmdbEnvironment;

use crate::cli::{Cli, Command};
use crate::config::DaemonConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => DaemonConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DaemonConfig::default(),
    };
    let config = cli.apply_overrides(file_config);

    tokenledger_utils::init_logging(config.log_format, &config.log_level);
    tracing::debug!(
        data_dir = %config.data_dir.display(),
        map_size = config.map_size,
        "configuration loaded"
    );

    let report = match cli.command {
        Command::VerifySnapshot { path } => commands::verify_snapshot(&path)?,
        command => {
            let env = LmdbEnvironment::open(&config.data_dir, config.map_size).with_context(
                || format!("opening ledger database in {}", config.data_dir.display()),
            )?;
            commands::execute(command, Arc::new(env.ledger_store()))?
        }
    };
    println!("{}", report.render(config.json_output)?);
    Ok(())
}
