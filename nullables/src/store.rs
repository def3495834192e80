//! Nullable store: thread-safe in-memory ledger storage for testing.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use tokenledger_store::{LedgerStore, StoreBatch, StoreError};
use tokenledger_types::AccountId;

#[derive(Default)]
struct State {
    meta: HashMap<String, Vec<u8>>,
    balances: HashMap<AccountId, u128>,
    locked: HashSet<AccountId>,
}

/// An in-memory [`LedgerStore`].
///
/// Commits apply under a single mutex, so they are atomic with respect to
/// readers. [`NullLedgerStore::fail_next_commit`] makes the next commit fail
/// without applying anything.
#[derive(Default)]
pub struct NullLedgerStore {
    state: Mutex<State>,
    fail_next: AtomicBool,
    commits: AtomicUsize,
}

impl NullLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `commit` return a backend error.
    pub fn fail_next_commit(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Number of successful commits so far.
    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }
}

impl LedgerStore for NullLedgerStore {
    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.state.lock().unwrap().meta.get(key).cloned())
    }

    fn iter_balances(&self) -> Result<Vec<(AccountId, u128)>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .balances
            .iter()
            .map(|(a, b)| (a.clone(), *b))
            .collect())
    }

    fn iter_locked(&self) -> Result<Vec<AccountId>, StoreError> {
        Ok(self.state.lock().unwrap().locked.iter().cloned().collect())
    }

    fn commit(&self, batch: &StoreBatch) -> Result<(), StoreError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Backend("injected commit failure".into()));
        }
        let mut state = self.state.lock().unwrap();
        for (key, value) in &batch.meta {
            state.meta.insert(key.clone(), value.clone());
        }
        for (account, balance) in &batch.balances {
            state.balances.insert(account.clone(), *balance);
        }
        for (account, locked) in &batch.locks {
            if *locked {
                state.locked.insert(account.clone());
            } else {
                state.locked.remove(account);
            }
        }
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_applies_every_entry() {
        let store = NullLedgerStore::new();
        let alice = AccountId::new("alice");
        let mut batch = StoreBatch::new();
        batch.put_meta("metadata", vec![1, 2, 3]);
        batch.put_balance(alice.clone(), 42);
        batch.set_locked(alice.clone(), true);
        store.commit(&batch).unwrap();

        assert!(store.is_initialized().unwrap());
        assert_eq!(store.iter_balances().unwrap(), vec![(alice.clone(), 42)]);
        assert_eq!(store.iter_locked().unwrap(), vec![alice.clone()]);

        let mut unlock = StoreBatch::new();
        unlock.set_locked(alice, false);
        store.commit(&unlock).unwrap();
        assert!(store.iter_locked().unwrap().is_empty());
        assert_eq!(store.commit_count(), 2);
    }

    #[test]
    fn injected_failure_applies_nothing_once() {
        let store = NullLedgerStore::new();
        let mut batch = StoreBatch::new();
        batch.put_balance(AccountId::new("bob"), 7);

        store.fail_next_commit();
        assert!(store.commit(&batch).is_err());
        assert!(store.iter_balances().unwrap().is_empty());

        store.commit(&batch).unwrap();
        assert_eq!(store.iter_balances().unwrap().len(), 1);
    }
}
