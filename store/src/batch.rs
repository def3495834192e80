//! Write batches: the unit of atomic persistence.

use tokenledger_types::AccountId;

/// A set of writes applied together by [`crate::LedgerStore::commit`].
///
/// Later entries for the same key win, matching the order in which the
/// ledger applied the changes in memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreBatch {
    pub meta: Vec<(String, Vec<u8>)>,
    pub balances: Vec<(AccountId, u128)>,
    pub locks: Vec<(AccountId, bool)>,
}

impl StoreBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_meta(&mut self, key: impl Into<String>, value: Vec<u8>) {
        self.meta.push((key.into(), value));
    }

    pub fn put_balance(&mut self, account: AccountId, balance: u128) {
        self.balances.push((account, balance));
    }

    pub fn set_locked(&mut self, account: AccountId, locked: bool) {
        self.locks.push((account, locked));
    }

    pub fn is_empty(&self) -> bool {
        self.meta.is_empty() && self.balances.is_empty() && self.locks.is_empty()
    }

    /// Total number of entries in the batch.
    pub fn len(&self) -> usize {
        self.meta.len() + self.balances.len() + self.locks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_counts_all_entries() {
        let mut batch = StoreBatch::new();
        assert!(batch.is_empty());
        batch.put_meta("suspended", vec![1]);
        batch.put_balance(AccountId::new("alice"), 10);
        batch.set_locked(AccountId::new("bob"), true);
        assert_eq!(batch.len(), 3);
        assert!(!batch.is_empty());
    }
}
