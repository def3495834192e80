use proptest::prelude::*;

use tokenledger_ledger::Ledger;
use tokenledger_types::AccountId;

const ACCOUNTS: [&str; 4] = ["admin", "alice", "bob", "carol"];

#[derive(Clone, Debug)]
enum Op {
    Transfer { from: usize, to: usize, amount: u128 },
    Distribute { caller: usize, to: usize, amount: u128 },
    Mint { caller: usize, to: usize, amount: u128 },
    Burn { caller: usize, from: usize, amount: u128 },
    Suspend { caller: usize, enabled: bool },
    Lock { caller: usize, account: usize },
    Unlock { caller: usize, account: usize },
}

fn account() -> impl Strategy<Value = usize> {
    0..ACCOUNTS.len()
}

fn amount() -> impl Strategy<Value = u128> {
    prop_oneof![Just(0u128), 1u128..2_000, Just(u128::MAX)]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (account(), account(), amount()).prop_map(|(from, to, amount)| Op::Transfer { from, to, amount }),
        (account(), account(), amount()).prop_map(|(caller, to, amount)| Op::Distribute { caller, to, amount }),
        (account(), account(), amount()).prop_map(|(caller, to, amount)| Op::Mint { caller, to, amount }),
        (account(), account(), amount()).prop_map(|(caller, from, amount)| Op::Burn { caller, from, amount }),
        (account(), any::<bool>()).prop_map(|(caller, enabled)| Op::Suspend { caller, enabled }),
        (account(), account()).prop_map(|(caller, account)| Op::Lock { caller, account }),
        (account(), account()).prop_map(|(caller, account)| Op::Unlock { caller, account }),
    ]
}

fn id(index: usize) -> AccountId {
    AccountId::new(ACCOUNTS[index])
}

fn apply(ledger: &mut Ledger, op: &Op) -> bool {
    let result = match *op {
        Op::Transfer { from, to, amount } => ledger.transfer(&id(from), &id(to), amount),
        Op::Distribute { caller, to, amount } => ledger.distribute(&id(caller), &id(to), amount),
        Op::Mint { caller, to, amount } => ledger.mint(&id(caller), &id(to), amount),
        Op::Burn { caller, from, amount } => ledger.burn(&id(caller), &id(from), amount),
        Op::Suspend { caller, enabled } => ledger.suspend(&id(caller), enabled),
        Op::Lock { caller, account } => ledger.lock(&id(caller), &id(account)),
        Op::Unlock { caller, account } => ledger.unlock(&id(caller), &id(account)),
    };
    result.is_ok()
}

fn balance_sum(ledger: &Ledger) -> Option<u128> {
    ACCOUNTS
        .iter()
        .try_fold(0u128, |acc, a| acc.checked_add(ledger.balance_of(&AccountId::new(*a))))
}

proptest! {
    /// Total supply always equals the sum of every balance.
    #[test]
    fn supply_matches_balance_sum(ops in prop::collection::vec(op(), 0..64)) {
        let mut ledger = Ledger::create(id(0), "Prop", "PRP", 0, 1_000).unwrap();
        for op in &ops {
            apply(&mut ledger, op);
            prop_assert_eq!(balance_sum(&ledger), Some(ledger.total_supply()));
        }
    }

    /// A rejected operation leaves the state untouched.
    #[test]
    fn failed_ops_change_nothing(ops in prop::collection::vec(op(), 0..64)) {
        let mut ledger = Ledger::create(id(0), "Prop", "PRP", 0, 1_000).unwrap();
        for op in &ops {
            let before = ledger.snapshot().hash;
            if !apply(&mut ledger, op) {
                prop_assert_eq!(ledger.snapshot().hash, before);
            }
        }
    }

    /// Only the administrator ever succeeds at privileged operations.
    #[test]
    fn privileged_ops_need_administrator(caller in 1usize..ACCOUNTS.len(), target in account()) {
        let mut ledger = Ledger::create(id(0), "Prop", "PRP", 0, 1_000).unwrap();
        prop_assert!(ledger.mint(&id(caller), &id(target), 1).is_err());
        prop_assert!(ledger.burn(&id(caller), &id(0), 1).is_err());
        prop_assert!(ledger.distribute(&id(caller), &id(target), 1).is_err());
        prop_assert!(ledger.suspend(&id(caller), false).is_err());
        prop_assert!(ledger.lock(&id(caller), &id(target)).is_err());
        prop_assert!(ledger.unlock(&id(caller), &id(target)).is_err());
    }

    /// Applying suspend or lock twice is the same as applying it once.
    #[test]
    fn suspend_and_lock_are_idempotent(enabled in any::<bool>(), target in account()) {
        let mut once = Ledger::create(id(0), "Prop", "PRP", 0, 1_000).unwrap();
        once.suspend(&id(0), enabled).unwrap();
        once.lock(&id(0), &id(target)).unwrap();

        let mut twice = once.clone();
        twice.suspend(&id(0), enabled).unwrap();
        twice.lock(&id(0), &id(target)).unwrap();

        prop_assert_eq!(once.snapshot().hash, twice.snapshot().hash);
    }

    /// Snapshots rebuild an identical ledger.
    #[test]
    fn snapshot_rebuilds_same_state(ops in prop::collection::vec(op(), 0..32)) {
        let mut ledger = Ledger::create(id(0), "Prop", "PRP", 0, 1_000).unwrap();
        for op in &ops {
            apply(&mut ledger, op);
        }
        let snap = ledger.snapshot();
        let rebuilt = Ledger::from_snapshot(&snap).unwrap();
        prop_assert_eq!(rebuilt.snapshot().hash, snap.hash);
    }
}
