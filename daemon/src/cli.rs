//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tokenledger_types::AccountId;
use tokenledger_utils::LogFormat;

use crate::config::DaemonConfig;

#[derive(Parser, Debug)]
#[command(name = "tokenledger", version, about = "Fungible-token ledger")]
pub struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "TOKENLEDGER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Data directory for ledger storage.
    #[arg(long, env = "TOKENLEDGER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// LMDB map size in bytes.
    #[arg(long, env = "TOKENLEDGER_MAP_SIZE")]
    pub map_size: Option<usize>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "TOKENLEDGER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "TOKENLEDGER_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Print results as JSON.
    #[arg(long, env = "TOKENLEDGER_JSON")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Apply flags and environment overrides on top of a base config.
    pub fn apply_overrides(&self, mut config: DaemonConfig) -> DaemonConfig {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(map_size) = self.map_size {
            config.map_size = map_size;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        config.json_output |= self.json;
        config
    }
}

/// A token amount argument.
#[derive(Args, Debug, Clone)]
pub struct AmountArg {
    /// Amount in whole-token units, e.g. "12.5" (or raw units with --raw).
    pub amount: String,

    /// Interpret the amount as raw base units.
    #[arg(long)]
    pub raw: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new ledger in the data directory.
    Init {
        /// Creator and administrator of the ledger.
        #[arg(long)]
        from: AccountId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        symbol: String,
        #[arg(long, default_value_t = 18)]
        decimals: u8,
        /// Initial supply in whole tokens.
        #[arg(long)]
        supply: u128,
    },

    /// Show token metadata and ledger state.
    Info,

    /// Show the total supply.
    TotalSupply,

    /// Show an account's balance.
    Balance { account: AccountId },

    /// Transfer tokens from the caller to another account.
    Transfer {
        #[arg(long)]
        from: AccountId,
        to: AccountId,
        #[command(flatten)]
        amount: AmountArg,
    },

    /// Administrator transfer that ignores the transfer gate.
    Distribute {
        #[arg(long)]
        from: AccountId,
        to: AccountId,
        #[command(flatten)]
        amount: AmountArg,
    },

    /// Create new tokens in an account.
    Mint {
        #[arg(long)]
        from: AccountId,
        to: AccountId,
        #[command(flatten)]
        amount: AmountArg,
    },

    /// Destroy tokens held by an account.
    Burn {
        #[arg(long)]
        from: AccountId,
        account: AccountId,
        #[command(flatten)]
        amount: AmountArg,
    },

    /// Close (true) or open (false) the transfer gate.
    Suspend {
        #[arg(long)]
        from: AccountId,
        #[arg(action = clap::ArgAction::Set, value_parser = clap::builder::BoolishValueParser::new())]
        enabled: bool,
    },

    /// Forbid an account from sending ordinary transfers.
    Lock {
        #[arg(long)]
        from: AccountId,
        account: AccountId,
    },

    /// Lift an account lock.
    Unlock {
        #[arg(long)]
        from: AccountId,
        account: AccountId,
    },

    /// Show whether an account is locked.
    IsLocked { account: AccountId },

    /// Write a verifiable snapshot of the ledger to a file.
    Snapshot { out: PathBuf },

    /// Check a snapshot file's integrity.
    VerifySnapshot { path: PathBuf },
}
