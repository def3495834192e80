//! Ledger state storage trait.

use crate::{StoreBatch, StoreError};
use tokenledger_types::AccountId;

/// Well-known meta keys written by the ledger.
pub mod keys {
    /// Bincode-encoded `TokenMetadata`. Its presence marks an initialised store.
    pub const METADATA: &str = "metadata";
    /// Bincode-encoded administrator `AccountId`.
    pub const ADMINISTRATOR: &str = "administrator";
    /// Total supply as 16 big-endian bytes.
    pub const TOTAL_SUPPLY: &str = "total_supply";
    /// Transfer gate, one byte (`1` = suspended).
    pub const SUSPENDED: &str = "suspended";
}

/// Durable storage for ledger state: meta values, balances and the lock set.
///
/// All writes go through [`LedgerStore::commit`], which must apply the whole
/// batch or nothing.
pub trait LedgerStore: Send + Sync {
    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    fn iter_balances(&self) -> Result<Vec<(AccountId, u128)>, StoreError>;

    fn iter_locked(&self) -> Result<Vec<AccountId>, StoreError>;

    /// Atomically apply every entry in the batch.
    fn commit(&self, batch: &StoreBatch) -> Result<(), StoreError>;

    /// Whether a ledger has been created in this store.
    fn is_initialized(&self) -> Result<bool, StoreError> {
        Ok(self.get_meta(keys::METADATA)?.is_some())
    }
}
