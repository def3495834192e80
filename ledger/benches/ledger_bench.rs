use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tokenledger_ledger::{Ledger, SharedLedger};
use tokenledger_nullables::NullLedgerStore;
use tokenledger_types::AccountId;

fn populated(holders: usize) -> Ledger {
    let admin = AccountId::new("admin");
    let mut ledger = Ledger::create(admin.clone(), "Bench", "BNC", 18, 1_000_000).unwrap();
    ledger.suspend(&admin, false).unwrap();
    for i in 0..holders {
        ledger
            .distribute(&admin, &AccountId::new(format!("holder-{i}")), 1_000)
            .unwrap();
    }
    ledger
}

fn transfer_bench(c: &mut Criterion) {
    let mut ledger = populated(1_000);
    let a = AccountId::new("holder-1");
    let b = AccountId::new("holder-2");

    c.bench_function("ledger_transfer_roundtrip", |bench| {
        bench.iter(|| {
            ledger.transfer(&a, &b, black_box(10)).unwrap();
            ledger.transfer(&b, &a, black_box(10)).unwrap();
        })
    });
}

fn balance_of_bench(c: &mut Criterion) {
    let ledger = populated(10_000);
    let holder = AccountId::new("holder-5000");

    c.bench_function("ledger_balance_of_10k", |bench| {
        bench.iter(|| ledger.balance_of(black_box(&holder)))
    });
}

fn shared_transfer_bench(c: &mut Criterion) {
    let store = Arc::new(NullLedgerStore::new());
    let shared = SharedLedger::create_in(populated(1_000), store).unwrap();
    let a = AccountId::new("holder-1");
    let b = AccountId::new("holder-2");

    c.bench_function("shared_transfer_with_commit", |bench| {
        bench.iter(|| {
            shared.transfer(&a, &b, black_box(10)).unwrap();
            shared.transfer(&b, &a, black_box(10)).unwrap();
        })
    });
}

fn snapshot_bench(c: &mut Criterion) {
    let ledger = populated(10_000);

    c.bench_function("ledger_snapshot_10k", |bench| bench.iter(|| ledger.snapshot()));
}

criterion_group!(
    benches,
    transfer_bench,
    balance_of_bench,
    shared_transfer_bench,
    snapshot_bench
);
criterion_main!(benches);
