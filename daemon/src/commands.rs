//! Subcommand execution against a ledger store.

use std::sync::Arc;

use anyhow::{bail, Context};
use tokenledger_ledger::{Ledger, LedgerSnapshot, SharedLedger};
use tokenledger_store::LedgerStore;
use tokenledger_types::parse_units;

use crate::cli::{AmountArg, Command};
use crate::report::{Amount, Report};

fn parse_amount(arg: &AmountArg, decimals: u8) -> anyhow::Result<u128> {
    if arg.raw {
        arg.amount
            .replace('_', "")
            .parse::<u128>()
            .with_context(|| format!("invalid raw amount '{}'", arg.amount))
    } else {
        Ok(parse_units(&arg.amount, decimals)?)
    }
}

fn open(store: Arc<dyn LedgerStore>) -> anyhow::Result<SharedLedger> {
    SharedLedger::open(store).context("no ledger found; run `tokenledger init` first")
}

/// Run one command. Ledger operations are committed to `store` before this
/// returns.
pub fn execute(command: Command, store: Arc<dyn LedgerStore>) -> anyhow::Result<Report> {
    if let Command::Init {
        from,
        name,
        symbol,
        decimals,
        supply,
    } = command
    {
        let ledger = Ledger::create(from, &name, &symbol, decimals, supply)?;
        SharedLedger::create_in(ledger, store)?;
        return Ok(Report::Done { operation: "init" });
    }
    if let Command::VerifySnapshot { path } = command {
        return verify_snapshot(&path);
    }

    let ledger = open(store)?;
    let decimals = ledger.metadata().decimals;
    let symbol = ledger.metadata().symbol;

    let report = match command {
        Command::Info => ledger.with_ledger(|l| Report::Info {
            name: l.name().to_string(),
            symbol: l.symbol().to_string(),
            decimals: l.decimals(),
            administrator: l.administrator().clone(),
            total_supply: Amount::new(l.total_supply(), decimals),
            suspended: l.is_suspended(),
            holders: l.holders(),
            locked: l.locked_accounts(),
        }),
        Command::TotalSupply => Report::TotalSupply {
            symbol,
            total_supply: Amount::new(ledger.total_supply(), decimals),
        },
        Command::Balance { account } => Report::Balance {
            balance: Amount::new(ledger.balance_of(&account), decimals),
            account,
            symbol,
        },
        Command::Transfer { from, to, amount } => {
            ledger.transfer(&from, &to, parse_amount(&amount, decimals)?)?;
            Report::Done {
                operation: "transfer",
            }
        }
        Command::Distribute { from, to, amount } => {
            ledger.distribute(&from, &to, parse_amount(&amount, decimals)?)?;
            Report::Done {
                operation: "distribute",
            }
        }
        Command::Mint { from, to, amount } => {
            ledger.mint(&from, &to, parse_amount(&amount, decimals)?)?;
            Report::Done { operation: "mint" }
        }
        Command::Burn {
            from,
            account,
            amount,
        } => {
            ledger.burn(&from, &account, parse_amount(&amount, decimals)?)?;
            Report::Done { operation: "burn" }
        }
        Command::Suspend { from, enabled } => {
            ledger.suspend(&from, enabled)?;
            Report::Done {
                operation: "suspend",
            }
        }
        Command::Lock { from, account } => {
            ledger.lock(&from, &account)?;
            Report::Done { operation: "lock" }
        }
        Command::Unlock { from, account } => {
            ledger.unlock(&from, &account)?;
            Report::Done {
                operation: "unlock",
            }
        }
        Command::IsLocked { account } => Report::Locked {
            locked: ledger.is_lock(&account),
            account,
        },
        Command::Snapshot { out } => {
            let snapshot = ledger.snapshot();
            std::fs::write(&out, snapshot.to_bytes()?)
                .with_context(|| format!("failed to write snapshot to {}", out.display()))?;
            tracing::info!(path = %out.display(), hash = %snapshot.hash_hex(), "snapshot written");
            Report::Snapshot {
                path: out,
                hash: snapshot.hash_hex(),
                accounts: snapshot.account_count(),
            }
        }
        Command::Init { .. } | Command::VerifySnapshot { .. } => {
            bail!("command does not operate on an open ledger")
        }
    };
    Ok(report)
}

/// Check a snapshot file without touching any store.
pub fn verify_snapshot(path: &std::path::Path) -> anyhow::Result<Report> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let snapshot = LedgerSnapshot::from_bytes(&bytes)?;
    let valid = Ledger::from_snapshot(&snapshot).is_ok();
    if !valid {
        tracing::warn!(path = %path.display(), "snapshot failed verification");
    }
    Ok(Report::Verified {
        hash: snapshot.hash_hex(),
        valid,
        symbol: snapshot.metadata.symbol.clone(),
        total_supply: Amount::new(snapshot.total_supply, snapshot.metadata.decimals),
        accounts: snapshot.account_count(),
    })
}
