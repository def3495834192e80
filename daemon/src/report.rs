//! Command results, printable as text or JSON.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use tokenledger_types::{format_units, AccountId};

/// An amount shown both in raw base units and formatted with decimals.
/// Raw values are strings so JSON consumers never lose precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Amount {
    pub raw: String,
    pub formatted: String,
}

impl Amount {
    pub fn new(raw: u128, decimals: u8) -> Self {
        Self {
            raw: raw.to_string(),
            formatted: format_units(raw, decimals),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Report {
    Info {
        name: String,
        symbol: String,
        decimals: u8,
        administrator: AccountId,
        total_supply: Amount,
        suspended: bool,
        holders: usize,
        locked: Vec<AccountId>,
    },
    TotalSupply {
        symbol: String,
        total_supply: Amount,
    },
    Balance {
        account: AccountId,
        symbol: String,
        balance: Amount,
    },
    Locked {
        account: AccountId,
        locked: bool,
    },
    Done {
        operation: &'static str,
    },
    Snapshot {
        path: PathBuf,
        hash: String,
        accounts: usize,
    },
    Verified {
        hash: String,
        valid: bool,
        symbol: String,
        total_supply: Amount,
        accounts: usize,
    },
}

impl Report {
    /// Render for stdout.
    pub fn render(&self, json: bool) -> Result<String, serde_json::Error> {
        if json {
            serde_json::to_string_pretty(self)
        } else {
            Ok(self.to_string())
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Info {
                name,
                symbol,
                decimals,
                administrator,
                total_supply,
                suspended,
                holders,
                locked,
            } => {
                writeln!(f, "name:          {name}")?;
                writeln!(f, "symbol:        {symbol}")?;
                writeln!(f, "decimals:      {decimals}")?;
                writeln!(f, "administrator: {administrator}")?;
                writeln!(f, "total supply:  {} {symbol}", total_supply.formatted)?;
                writeln!(f, "suspended:     {suspended}")?;
                writeln!(f, "holders:       {holders}")?;
                write!(f, "locked:        {}", locked.len())
            }
            Report::TotalSupply {
                symbol,
                total_supply,
            } => write!(f, "{} {symbol}", total_supply.formatted),
            Report::Balance {
                account,
                symbol,
                balance,
            } => write!(f, "{account}: {} {symbol}", balance.formatted),
            Report::Locked { account, locked } => write!(f, "{account}: locked={locked}"),
            Report::Done { operation } => write!(f, "{operation}: ok"),
            Report::Snapshot {
                path,
                hash,
                accounts,
            } => write!(
                f,
                "snapshot written to {} ({accounts} accounts, hash {hash})",
                path.display()
            ),
            Report::Verified {
                hash,
                valid,
                symbol,
                total_supply,
                accounts,
            } => {
                let status = if *valid { "valid" } else { "INVALID" };
                write!(
                    f,
                    "{status}: {accounts} accounts, total supply {} {symbol}, hash {hash}",
                    total_supply.formatted
                )
            }
        }
    }
}
