#![no_main]

use libfuzzer_sys::fuzz_target;

use tokenledger_ledger::{Ledger, LedgerSnapshot};

// Decoding arbitrary bytes as a snapshot must never panic, and anything that
// rebuilds into a ledger must have passed hash verification.
fuzz_target!(|data: &[u8]| {
    let Ok(snapshot) = LedgerSnapshot::from_bytes(data) else {
        return;
    };
    if let Ok(ledger) = Ledger::from_snapshot(&snapshot) {
        assert!(snapshot.verify());
        assert_eq!(ledger.snapshot().hash, snapshot.hash);
    }
});
