//! The ledger state machine.
//!
//! Per-account eligibility to send through [`Ledger::transfer`]:
//!
//! ```text
//! {UNLOCKED, LOCKED} x {OPEN, SUSPENDED}
//! may send  <=>  UNLOCKED and OPEN
//! lock/unlock toggle the account, suspend(bool) toggles the gate;
//! both are administrator-only.
//! ```
//!
//! Administrator operations (`distribute`, `mint`, `burn`) ignore both the
//! gate and the lock set.

use std::collections::{HashMap, HashSet};

use tokenledger_types::{AccountId, TokenMetadata};

use crate::error::LedgerError;

/// Balances, supply and access-control flags of a single asset.
///
/// Every mutating method checks all of its preconditions before touching any
/// field, so a returned error always means "nothing changed".
#[derive(Clone, Debug)]
pub struct Ledger {
    metadata: TokenMetadata,
    administrator: AccountId,
    total_supply: u128,
    suspended: bool,
    balances: HashMap<AccountId, u128>,
    locked: HashSet<AccountId>,
}

impl Ledger {
    /// Create a ledger whose whole initial supply belongs to `creator`, who
    /// also becomes the administrator.
    ///
    /// `initial_supply_whole` is in whole tokens; the stored supply is
    /// `initial_supply_whole * 10^decimals`. Transfers start suspended.
    pub fn create(
        creator: AccountId,
        name: &str,
        symbol: &str,
        decimals: u8,
        initial_supply_whole: u128,
    ) -> Result<Self, LedgerError> {
        let metadata = TokenMetadata::new(name, symbol, decimals)?;
        Self::with_metadata(metadata, creator, initial_supply_whole)
    }

    /// Like [`Ledger::create`] with pre-validated metadata.
    pub fn with_metadata(
        metadata: TokenMetadata,
        creator: AccountId,
        initial_supply_whole: u128,
    ) -> Result<Self, LedgerError> {
        metadata.validate()?;
        creator.validate().map_err(LedgerError::InvalidAccount)?;
        let total_supply = tokenledger_types::to_raw(initial_supply_whole, metadata.decimals)
            .ok_or(LedgerError::InvalidAmount("initial supply overflows"))?;

        let mut balances = HashMap::new();
        balances.insert(creator.clone(), total_supply);

        tracing::info!(
            name = %metadata.name,
            symbol = %metadata.symbol,
            decimals = metadata.decimals,
            total_supply,
            administrator = %creator,
            "ledger created"
        );

        Ok(Self {
            metadata,
            administrator: creator,
            total_supply,
            suspended: true,
            balances,
            locked: HashSet::new(),
        })
    }

    /// Rebuild a ledger from stored or snapshotted parts, enforcing the
    /// metadata and account id rules and the supply invariant.
    pub(crate) fn from_parts(
        metadata: TokenMetadata,
        administrator: AccountId,
        total_supply: u128,
        suspended: bool,
        balances: HashMap<AccountId, u128>,
        locked: HashSet<AccountId>,
    ) -> Result<Self, LedgerError> {
        metadata.validate()?;
        std::iter::once(&administrator)
            .chain(balances.keys())
            .chain(locked.iter())
            .try_for_each(AccountId::validate)
            .map_err(LedgerError::InvalidAccount)?;
        let sum = balances
            .values()
            .try_fold(0u128, |acc, b| acc.checked_add(*b))
            .ok_or(LedgerError::SupplyMismatch {
                total_supply,
                sum: u128::MAX,
            })?;
        if sum != total_supply {
            return Err(LedgerError::SupplyMismatch { total_supply, sum });
        }
        Ok(Self {
            metadata,
            administrator,
            total_supply,
            suspended,
            balances,
            locked,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    pub fn administrator(&self) -> &AccountId {
        &self.administrator
    }

    pub fn is_administrator(&self, account: &AccountId) -> bool {
        self.administrator == *account
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Balance of `account`; zero for accounts that never held tokens.
    pub fn balance_of(&self, account: &AccountId) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn is_lock(&self, account: &AccountId) -> bool {
        self.locked.contains(account)
    }

    /// Number of accounts holding a non-zero balance.
    pub fn holders(&self) -> usize {
        self.balances.values().filter(|b| **b > 0).count()
    }

    /// Locked accounts in ascending order.
    pub fn locked_accounts(&self) -> Vec<AccountId> {
        let mut accounts: Vec<_> = self.locked.iter().cloned().collect();
        accounts.sort();
        accounts
    }

    /// Every account with a balance entry, including drained ones.
    pub(crate) fn balances(&self) -> &HashMap<AccountId, u128> {
        &self.balances
    }

    // ── Transfers ────────────────────────────────────────────────────────

    /// Move `amount` from `sender` to `recipient`.
    ///
    /// Fails, in this order, with `TransfersSuspended` while the gate is
    /// closed, `AccountLocked` if the sender is locked, `InvalidAmount` for a
    /// zero amount and `InsufficientBalance` if the sender cannot cover it.
    /// The gate applies to the administrator too; its gate-free path is
    /// [`Ledger::distribute`].
    pub fn transfer(
        &mut self,
        sender: &AccountId,
        recipient: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        if self.suspended {
            return Err(LedgerError::TransfersSuspended);
        }
        if self.locked.contains(sender) {
            return Err(LedgerError::AccountLocked(sender.clone()));
        }
        self.move_balance(sender, recipient, amount)
    }

    /// Administrator transfer from its own balance. Ignores the gate and the
    /// lock set, including a lock placed on the administrator itself.
    pub fn distribute(
        &mut self,
        administrator: &AccountId,
        recipient: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.ensure_administrator(administrator)?;
        self.move_balance(administrator, recipient, amount)
    }

    fn move_balance(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount("amount must be non-zero"));
        }
        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        if from == to {
            return Ok(());
        }
        // Cannot overflow while balances sum to total_supply, checked anyway
        // so the sender is never debited without the matching credit.
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::InvalidAmount("recipient balance overflows"))?;

        self.balances.insert(from.clone(), available - amount);
        self.balances.insert(to.clone(), credited);
        Ok(())
    }

    // ── Supply control ───────────────────────────────────────────────────

    /// Create `amount` new tokens in `account`. Not gated by suspension or locks.
    pub fn mint(
        &mut self,
        administrator: &AccountId,
        account: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.ensure_administrator(administrator)?;
        if amount == 0 {
            return Err(LedgerError::InvalidAmount("amount must be non-zero"));
        }
        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::InvalidAmount("total supply overflows"))?;
        // Bounded by new_supply, so this cannot overflow.
        let credited = self.balance_of(account) + amount;

        self.total_supply = new_supply;
        self.balances.insert(account.clone(), credited);
        Ok(())
    }

    /// Destroy `amount` tokens held by `account`.
    ///
    /// Draining an account leaves a zero entry; it reads exactly like an
    /// account that never held tokens.
    pub fn burn(
        &mut self,
        administrator: &AccountId,
        account: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.ensure_administrator(administrator)?;
        if amount == 0 {
            return Err(LedgerError::InvalidAmount("amount must be non-zero"));
        }
        let available = self.balance_of(account);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available,
            });
        }

        self.balances.insert(account.clone(), available - amount);
        self.total_supply -= amount;
        Ok(())
    }

    // ── Access control ───────────────────────────────────────────────────

    /// Close (`true`) or open (`false`) the transfer gate. Idempotent.
    pub fn suspend(&mut self, administrator: &AccountId, enabled: bool) -> Result<(), LedgerError> {
        self.ensure_administrator(administrator)?;
        self.suspended = enabled;
        Ok(())
    }

    /// Forbid `account` from sending via [`Ledger::transfer`]. Idempotent.
    pub fn lock(&mut self, administrator: &AccountId, account: &AccountId) -> Result<(), LedgerError> {
        self.ensure_administrator(administrator)?;
        self.locked.insert(account.clone());
        Ok(())
    }

    /// Lift a lock. Unlocking an account that is not locked succeeds.
    pub fn unlock(
        &mut self,
        administrator: &AccountId,
        account: &AccountId,
    ) -> Result<(), LedgerError> {
        self.ensure_administrator(administrator)?;
        self.locked.remove(account);
        Ok(())
    }

    fn ensure_administrator(&self, caller: &AccountId) -> Result<(), LedgerError> {
        if self.is_administrator(caller) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized {
                caller: caller.clone(),
            })
        }
    }

    // ── Rollback support ─────────────────────────────────────────────────

    /// Record the parts of the state an operation on `touched` may change.
    pub(crate) fn checkpoint(&self, touched: &[&AccountId]) -> Checkpoint {
        Checkpoint {
            total_supply: self.total_supply,
            suspended: self.suspended,
            accounts: touched
                .iter()
                .map(|a| {
                    (
                        (*a).clone(),
                        self.balances.get(*a).copied(),
                        self.locked.contains(*a),
                    )
                })
                .collect(),
        }
    }

    /// Undo everything since `checkpoint` was taken.
    pub(crate) fn restore(&mut self, checkpoint: Checkpoint) {
        self.total_supply = checkpoint.total_supply;
        self.suspended = checkpoint.suspended;
        for (account, balance, locked) in checkpoint.accounts {
            match balance {
                Some(b) => self.balances.insert(account.clone(), b),
                None => self.balances.remove(&account),
            };
            if locked {
                self.locked.insert(account);
            } else {
                self.locked.remove(&account);
            }
        }
    }
}

/// Pre-operation values of the fields an operation can touch.
#[derive(Debug)]
pub(crate) struct Checkpoint {
    total_supply: u128,
    suspended: bool,
    accounts: Vec<(AccountId, Option<u128>, bool)>,
}
