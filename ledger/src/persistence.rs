//! Saving and restoring a [`Ledger`] through a [`LedgerStore`].
//!
//! The store is type-agnostic: metadata and the administrator are bincode
//! encoded, the supply is 16 big-endian bytes and the gate a single byte.

use std::collections::{HashMap, HashSet};

use serde::{de::DeserializeOwned, Serialize};
use tokenledger_store::{keys, LedgerStore, StoreBatch, StoreError};
use tokenledger_types::{AccountId, TokenMetadata};

use crate::error::LedgerError;
use crate::ledger::Ledger;

impl Ledger {
    /// Persist the complete ledger state in one atomic batch.
    pub fn save_to_store(&self, store: &dyn LedgerStore) -> Result<(), LedgerError> {
        let batch = self.full_batch()?;
        store.commit(&batch)?;
        tracing::debug!(
            entries = batch.len(),
            accounts = self.balances().len(),
            "ledger state saved"
        );
        Ok(())
    }

    /// Restore a ledger from a store. Returns `None` if the store has never
    /// held a ledger.
    pub fn load_from_store(store: &dyn LedgerStore) -> Result<Option<Self>, LedgerError> {
        let metadata: TokenMetadata = match store.get_meta(keys::METADATA)? {
            Some(bytes) => decode(&bytes)?,
            None => return Ok(None),
        };
        let administrator: AccountId = decode(&required_meta(store, keys::ADMINISTRATOR)?)?;
        let total_supply = decode_supply(&required_meta(store, keys::TOTAL_SUPPLY)?)?;
        let suspended = decode_flag(&required_meta(store, keys::SUSPENDED)?)?;

        let balances: HashMap<AccountId, u128> = store.iter_balances()?.into_iter().collect();
        let locked: HashSet<AccountId> = store.iter_locked()?.into_iter().collect();

        let ledger = Ledger::from_parts(
            metadata,
            administrator,
            total_supply,
            suspended,
            balances,
            locked,
        )?;
        tracing::debug!(
            accounts = ledger.balances().len(),
            total_supply,
            suspended,
            "ledger state loaded"
        );
        Ok(Some(ledger))
    }

    /// Every key the ledger owns.
    pub(crate) fn full_batch(&self) -> Result<StoreBatch, LedgerError> {
        let mut batch = StoreBatch::new();
        batch.put_meta(keys::METADATA, encode(self.metadata())?);
        batch.put_meta(keys::ADMINISTRATOR, encode(self.administrator())?);
        self.put_globals(&mut batch);
        for (account, balance) in self.balances() {
            batch.put_balance(account.clone(), *balance);
        }
        for account in self.locked_accounts() {
            batch.set_locked(account, true);
        }
        Ok(batch)
    }

    /// The keys an operation on `touched` can have changed.
    pub(crate) fn batch_for(&self, touched: &[&AccountId]) -> StoreBatch {
        let mut batch = StoreBatch::new();
        self.put_globals(&mut batch);
        for account in touched {
            if let Some(balance) = self.balances().get(*account) {
                batch.put_balance((*account).clone(), *balance);
            }
            batch.set_locked((*account).clone(), self.is_lock(account));
        }
        batch
    }

    fn put_globals(&self, batch: &mut StoreBatch) {
        batch.put_meta(keys::TOTAL_SUPPLY, self.total_supply().to_be_bytes().to_vec());
        batch.put_meta(keys::SUSPENDED, vec![u8::from(self.is_suspended())]);
    }
}

fn required_meta(store: &dyn LedgerStore, key: &str) -> Result<Vec<u8>, StoreError> {
    store
        .get_meta(key)?
        .ok_or_else(|| StoreError::Corruption(format!("missing meta key '{key}'")))
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, StoreError> {
    bincode::serialize(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
    bincode::deserialize(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn decode_supply(bytes: &[u8]) -> Result<u128, StoreError> {
    let raw: [u8; 16] = bytes
        .try_into()
        .map_err(|_| StoreError::Corruption(format!("total supply has {} bytes", bytes.len())))?;
    Ok(u128::from_be_bytes(raw))
}

fn decode_flag(bytes: &[u8]) -> Result<bool, StoreError> {
    match bytes {
        [0] => Ok(false),
        [1] => Ok(true),
        other => Err(StoreError::Corruption(format!(
            "suspended flag has unexpected value {other:?}"
        ))),
    }
}
