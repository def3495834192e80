//! LMDB implementation of LedgerStore.
//!
//! Balances are keyed by the account id bytes with a 16-byte big-endian value.
//! The lock set stores locked account ids with an empty value; unlocking
//! deletes the key.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use tokenledger_store::{LedgerStore, StoreBatch, StoreError};
use tokenledger_types::AccountId;

use crate::LmdbError;

pub struct LmdbLedgerStore {
    pub(crate) env: Arc<Env>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
    pub(crate) balances_db: Database<Bytes, Bytes>,
    pub(crate) locks_db: Database<Bytes, Bytes>,
}

fn decode_balance(bytes: &[u8]) -> Result<u128, LmdbError> {
    let raw: [u8; 16] = bytes.try_into().map_err(|_| {
        LmdbError::Serialization(format!("balance has {} bytes, expected 16", bytes.len()))
    })?;
    Ok(u128::from_be_bytes(raw))
}

// Keys are the id bytes exactly as written; ids are opaque, so nothing is
// trimmed or re-validated on the way back.
fn decode_account(bytes: &[u8]) -> Result<AccountId, LmdbError> {
    let s = std::str::from_utf8(bytes)
        .map_err(|e| LmdbError::Serialization(format!("account key is not utf-8: {e}")))?;
    Ok(AccountId::new(s))
}

impl LedgerStore for LmdbLedgerStore {
    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .meta_db
            .get(&rtxn, key.as_bytes())
            .map_err(LmdbError::from)?;
        Ok(val.map(<[u8]>::to_vec))
    }

    fn iter_balances(&self) -> Result<Vec<(AccountId, u128)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        for item in self.balances_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (key, value) = item.map_err(LmdbError::from)?;
            out.push((decode_account(key)?, decode_balance(value)?));
        }
        Ok(out)
    }

    fn iter_locked(&self) -> Result<Vec<AccountId>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        for item in self.locks_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (key, _) = item.map_err(LmdbError::from)?;
            out.push(decode_account(key)?);
        }
        Ok(out)
    }

    fn commit(&self, batch: &StoreBatch) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        for (key, value) in &batch.meta {
            self.meta_db
                .put(&mut wtxn, key.as_bytes(), value)
                .map_err(LmdbError::from)?;
        }
        for (account, balance) in &batch.balances {
            self.balances_db
                .put(&mut wtxn, account.as_bytes(), &balance.to_be_bytes())
                .map_err(LmdbError::from)?;
        }
        for (account, locked) in &batch.locks {
            if *locked {
                self.locks_db
                    .put(&mut wtxn, account.as_bytes(), &[])
                    .map_err(LmdbError::from)?;
            } else {
                self.locks_db
                    .delete(&mut wtxn, account.as_bytes())
                    .map_err(LmdbError::from)?;
            }
        }
        // Dropping the transaction on an earlier error aborts it.
        wtxn.commit().map_err(LmdbError::from)?;
        tracing::trace!(entries = batch.len(), "ledger batch committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LmdbEnvironment;
    use tokenledger_store::keys;

    fn open(dir: &tempfile::TempDir) -> LmdbEnvironment {
        LmdbEnvironment::open(dir.path(), 10 * 1024 * 1024).unwrap()
    }

    fn balance(store: &LmdbLedgerStore, account: &AccountId) -> Option<u128> {
        store
            .iter_balances()
            .unwrap()
            .into_iter()
            .find(|(a, _)| a == account)
            .map(|(_, b)| b)
    }

    #[test]
    fn fresh_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir).ledger_store();
        assert!(!store.is_initialized().unwrap());
        assert!(store.iter_balances().unwrap().is_empty());
        assert!(store.iter_locked().unwrap().is_empty());
        assert_eq!(balance(&store, &AccountId::new("alice")), None);
    }

    #[test]
    fn commit_writes_all_databases() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir).ledger_store();
        let alice = AccountId::new("alice");
        let bob = AccountId::new("bob");

        let mut batch = StoreBatch::new();
        batch.put_meta(keys::METADATA, vec![9, 9]);
        batch.put_balance(alice.clone(), u128::MAX);
        batch.put_balance(bob.clone(), 0);
        batch.set_locked(bob.clone(), true);
        store.commit(&batch).unwrap();

        assert!(store.is_initialized().unwrap());
        assert_eq!(store.get_meta(keys::METADATA).unwrap(), Some(vec![9, 9]));
        assert_eq!(balance(&store, &alice), Some(u128::MAX));
        assert_eq!(balance(&store, &bob), Some(0));
        assert_eq!(store.iter_locked().unwrap(), vec![bob.clone()]);

        let mut balances = store.iter_balances().unwrap();
        balances.sort();
        assert_eq!(balances, vec![(alice, u128::MAX), (bob, 0)]);
    }

    #[test]
    fn unlock_deletes_lock_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir).ledger_store();
        let carol = AccountId::new("carol");

        let mut lock = StoreBatch::new();
        lock.set_locked(carol.clone(), true);
        store.commit(&lock).unwrap();

        let mut unlock = StoreBatch::new();
        unlock.set_locked(carol, false);
        store.commit(&unlock).unwrap();
        assert!(store.iter_locked().unwrap().is_empty());
    }

    #[test]
    fn state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let dave = AccountId::new("dave");
        {
            let store = open(&dir).ledger_store();
            let mut batch = StoreBatch::new();
            batch.put_balance(dave.clone(), 1_234);
            store.commit(&batch).unwrap();
        }
        let store = open(&dir).ledger_store();
        assert_eq!(balance(&store, &dave), Some(1_234));
    }

    #[test]
    fn corrupt_balance_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir).ledger_store();
        {
            let mut wtxn = store.env.write_txn().unwrap();
            store
                .balances_db
                .put(&mut wtxn, b"eve", &[1, 2, 3])
                .unwrap();
            wtxn.commit().unwrap();
        }
        assert!(matches!(
            store.iter_balances(),
            Err(StoreError::Corruption(_))
        ));
    }

    #[test]
    fn ids_reload_byte_for_byte() {
        let dir = tempfile::tempdir().unwrap();
        let spaced = AccountId::new("alice smith");
        let padded = AccountId::new(" bob");
        {
            let store = open(&dir).ledger_store();
            let mut batch = StoreBatch::new();
            batch.put_balance(spaced.clone(), 10);
            batch.put_balance(padded.clone(), 20);
            batch.set_locked(padded.clone(), true);
            store.commit(&batch).unwrap();
        }
        let store = open(&dir).ledger_store();
        assert_eq!(balance(&store, &spaced), Some(10));
        assert_eq!(balance(&store, &padded), Some(20));
        assert_eq!(balance(&store, &AccountId::new("bob")), None);
        assert_eq!(store.iter_locked().unwrap(), vec![padded]);
    }

    #[test]
    fn ledger_with_opaque_ids_reopens() {
        use std::sync::Arc;
        use tokenledger_ledger::{Ledger, SharedLedger};

        let dir = tempfile::tempdir().unwrap();
        let admin = AccountId::new("admin");
        let spaced = AccountId::new("alice smith");
        {
            let store: Arc<dyn LedgerStore> = Arc::new(open(&dir).ledger_store());
            let ledger = Ledger::create(admin.clone(), "Token", "TKN", 0, 100).unwrap();
            let shared = SharedLedger::create_in(ledger, store).unwrap();
            shared.distribute(&admin, &spaced, 10).unwrap();
            shared.lock(&admin, &spaced).unwrap();
        }
        let store: Arc<dyn LedgerStore> = Arc::new(open(&dir).ledger_store());
        let reopened = SharedLedger::open(store).unwrap();
        assert_eq!(reopened.balance_of(&spaced), 10);
        assert_eq!(reopened.balance_of(&admin), 90);
        assert!(reopened.is_lock(&spaced));
    }
}
