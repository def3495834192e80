#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use tokenledger_ledger::Ledger;
use tokenledger_types::AccountId;

const ACCOUNTS: [&str; 4] = ["admin", "alice", "bob", "carol"];

#[derive(Arbitrary, Debug)]
enum Op {
    Transfer { from: u8, to: u8, amount: u128 },
    Distribute { caller: u8, to: u8, amount: u128 },
    Mint { caller: u8, to: u8, amount: u128 },
    Burn { caller: u8, from: u8, amount: u128 },
    Suspend { caller: u8, enabled: bool },
    Lock { caller: u8, account: u8 },
    Unlock { caller: u8, account: u8 },
}

fn id(index: u8) -> AccountId {
    AccountId::new(ACCOUNTS[usize::from(index) % ACCOUNTS.len()])
}

// Random operation sequences must never panic and must keep the total supply
// equal to the sum of all balances. Failed operations must change nothing.
fuzz_target!(|input: (u16, Vec<Op>)| {
    let (supply, ops) = input;
    let Ok(mut ledger) = Ledger::create(id(0), "Fuzz", "FZZ", 2, u128::from(supply)) else {
        return;
    };

    for op in &ops {
        let before = ledger.snapshot().hash;
        let result = match *op {
            Op::Transfer { from, to, amount } => ledger.transfer(&id(from), &id(to), amount),
            Op::Distribute { caller, to, amount } => ledger.distribute(&id(caller), &id(to), amount),
            Op::Mint { caller, to, amount } => ledger.mint(&id(caller), &id(to), amount),
            Op::Burn { caller, from, amount } => ledger.burn(&id(caller), &id(from), amount),
            Op::Suspend { caller, enabled } => ledger.suspend(&id(caller), enabled),
            Op::Lock { caller, account } => ledger.lock(&id(caller), &id(account)),
            Op::Unlock { caller, account } => ledger.unlock(&id(caller), &id(account)),
        };
        if result.is_err() {
            assert_eq!(ledger.snapshot().hash, before, "failed op changed state: {op:?}");
        }

        let sum = ACCOUNTS
            .iter()
            .map(|a| ledger.balance_of(&AccountId::new(*a)))
            .try_fold(0u128, u128::checked_add);
        assert_eq!(sum, Some(ledger.total_supply()));
    }
});
