//! Ledger snapshots: a portable, verifiable copy of the complete state.
//!
//! The snapshot hash is computed deterministically from the state (accounts
//! sorted by id, creation time excluded) so two snapshots of the same state
//! always hash the same and any tampering is detectable.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tokenledger_types::{AccountId, Timestamp, TokenMetadata};

use crate::error::LedgerError;
use crate::ledger::Ledger;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// The complete ledger state at a point in time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Blake2b-256 over everything except `hash` and `created_at`.
    pub hash: [u8; 32],
    pub created_at: Timestamp,
    pub version: u32,
    pub metadata: TokenMetadata,
    pub administrator: AccountId,
    pub total_supply: u128,
    pub suspended: bool,
    /// Sorted by account id.
    pub accounts: Vec<AccountSnapshot>,
}

/// One account in a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub account: AccountId,
    pub balance: u128,
    pub locked: bool,
}

impl LedgerSnapshot {
    /// Compute the Blake2b-256 hash of this snapshot's state.
    fn compute_hash(&self) -> [u8; 32] {
        use blake2::digest::consts::U32;
        use blake2::{Blake2b, Digest};

        fn put_str(hasher: &mut Blake2b<U32>, s: &str) {
            hasher.update((s.len() as u64).to_le_bytes());
            hasher.update(s.as_bytes());
        }

        let mut hasher = Blake2b::<U32>::new();

        hasher.update(self.version.to_le_bytes());
        put_str(&mut hasher, &self.metadata.name);
        put_str(&mut hasher, &self.metadata.symbol);
        hasher.update([self.metadata.decimals]);
        put_str(&mut hasher, self.administrator.as_str());
        hasher.update(self.total_supply.to_le_bytes());
        hasher.update([u8::from(self.suspended)]);
        hasher.update((self.accounts.len() as u64).to_le_bytes());
        for entry in &self.accounts {
            put_str(&mut hasher, entry.account.as_str());
            hasher.update(entry.balance.to_le_bytes());
            hasher.update([u8::from(entry.locked)]);
        }

        let result = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&result);
        out
    }

    /// Verify the snapshot hash matches the state.
    pub fn verify(&self) -> bool {
        self.hash == self.compute_hash()
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Serialize the snapshot to bytes (bincode).
    pub fn to_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        bincode::serialize(self).map_err(|e| {
            LedgerError::Storage(tokenledger_store::StoreError::Serialization(e.to_string()))
        })
    }

    /// Deserialize a snapshot from bytes. The hash is not checked here; see
    /// [`LedgerSnapshot::verify`] and [`Ledger::from_snapshot`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        bincode::deserialize(bytes).map_err(|e| {
            LedgerError::Storage(tokenledger_store::StoreError::Serialization(e.to_string()))
        })
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }
}

impl Ledger {
    /// Capture the current state. Accounts appear if they have a balance
    /// entry or are locked.
    pub fn snapshot(&self) -> LedgerSnapshot {
        let mut accounts: BTreeMap<AccountId, AccountSnapshot> = self
            .balances()
            .iter()
            .map(|(account, balance)| {
                let entry = AccountSnapshot {
                    account: account.clone(),
                    balance: *balance,
                    locked: self.is_lock(account),
                };
                (account.clone(), entry)
            })
            .collect();
        for account in self.locked_accounts() {
            accounts
                .entry(account.clone())
                .or_insert(AccountSnapshot {
                    account,
                    balance: 0,
                    locked: true,
                });
        }

        let mut snap = LedgerSnapshot {
            hash: [0u8; 32],
            created_at: Timestamp::now(),
            version: SNAPSHOT_VERSION,
            metadata: self.metadata().clone(),
            administrator: self.administrator().clone(),
            total_supply: self.total_supply(),
            suspended: self.is_suspended(),
            accounts: accounts.into_values().collect(),
        };
        snap.hash = snap.compute_hash();
        snap
    }

    /// Rebuild a ledger from a snapshot after checking its version, hash and
    /// supply invariant.
    pub fn from_snapshot(snapshot: &LedgerSnapshot) -> Result<Self, LedgerError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(LedgerError::UnsupportedSnapshotVersion(snapshot.version));
        }
        if !snapshot.verify() {
            return Err(LedgerError::SnapshotHashMismatch);
        }

        let mut balances = HashMap::with_capacity(snapshot.accounts.len());
        let mut locked = HashSet::new();
        for entry in &snapshot.accounts {
            balances.insert(entry.account.clone(), entry.balance);
            if entry.locked {
                locked.insert(entry.account.clone());
            }
        }

        Ledger::from_parts(
            snapshot.metadata.clone(),
            snapshot.administrator.clone(),
            snapshot.total_supply,
            snapshot.suspended,
            balances,
            locked,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> AccountId {
        AccountId::new("0xadmin")
    }

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::create(admin(), "My Custom Token", "MTX", 0, 1_000).unwrap();
        ledger.distribute(&admin(), &AccountId::new("bob"), 300).unwrap();
        ledger.lock(&admin(), &AccountId::new("bob")).unwrap();
        ledger.lock(&admin(), &AccountId::new("zed")).unwrap();
        ledger
    }

    #[test]
    fn snapshot_is_sorted_and_verifies() {
        let snap = sample_ledger().snapshot();
        assert!(snap.verify());
        assert_eq!(snap.version, SNAPSHOT_VERSION);
        let ids: Vec<&str> = snap.accounts.iter().map(|a| a.account.as_str()).collect();
        assert_eq!(ids, vec!["0xadmin", "bob", "zed"]);
        assert_eq!(
            snap.accounts[2],
            AccountSnapshot {
                account: AccountId::new("zed"),
                balance: 0,
                locked: true
            }
        );
    }

    #[test]
    fn tampered_snapshot_fails_verify() {
        let mut snap = sample_ledger().snapshot();
        snap.accounts[1].balance += 1;
        assert!(!snap.verify());
        assert!(matches!(
            Ledger::from_snapshot(&snap),
            Err(LedgerError::SnapshotHashMismatch)
        ));
    }

    #[test]
    fn hash_ignores_creation_time() {
        let ledger = sample_ledger();
        let a = ledger.snapshot();
        let mut b = ledger.snapshot();
        b.created_at = Timestamp::new(a.created_at.as_secs() + 3_600);
        assert_eq!(a.hash, b.hash);
        assert!(b.verify());
    }

    #[test]
    fn bytes_roundtrip_rebuilds_ledger() {
        let ledger = sample_ledger();
        let snap = ledger.snapshot();
        let restored = LedgerSnapshot::from_bytes(&snap.to_bytes().unwrap()).unwrap();
        assert_eq!(restored.hash_hex(), snap.hash_hex());

        let rebuilt = Ledger::from_snapshot(&restored).unwrap();
        assert_eq!(rebuilt.total_supply(), 1_000);
        assert_eq!(rebuilt.balance_of(&AccountId::new("bob")), 300);
        assert!(rebuilt.is_lock(&AccountId::new("zed")));
        assert!(rebuilt.is_suspended());
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut snap = sample_ledger().snapshot();
        snap.version = 99;
        assert!(matches!(
            Ledger::from_snapshot(&snap),
            Err(LedgerError::UnsupportedSnapshotVersion(99))
        ));
    }

    #[test]
    fn garbage_bytes_do_not_decode() {
        assert!(LedgerSnapshot::from_bytes(&[0xff, 0x01]).is_err());
    }

    #[test]
    fn rehashed_snapshot_with_invalid_metadata_is_rejected() {
        let mut snap = sample_ledger().snapshot();
        snap.metadata.decimals = 200;
        snap.metadata.name = String::new();
        snap.hash = snap.compute_hash();
        assert!(snap.verify());

        assert!(matches!(
            Ledger::from_snapshot(&snap),
            Err(LedgerError::InvalidMetadata(_))
        ));
        // The encoded form does not decode either.
        assert!(LedgerSnapshot::from_bytes(&snap.to_bytes().unwrap()).is_err());
    }

    #[test]
    fn rehashed_snapshot_with_empty_account_is_rejected() {
        let mut snap = sample_ledger().snapshot();
        snap.accounts.push(AccountSnapshot {
            account: AccountId::new(""),
            balance: 0,
            locked: true,
        });
        snap.hash = snap.compute_hash();

        assert!(matches!(
            Ledger::from_snapshot(&snap),
            Err(LedgerError::InvalidAccount(_))
        ));
    }
}
