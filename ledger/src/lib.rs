//! Fungible-token ledger with administrative controls.
//!
//! The [`Ledger`] tracks raw-unit balances of a single fixed-decimal asset and
//! keeps `total_supply` equal to the sum of all balances at every observable
//! point. An administrator, fixed at creation, can mint, burn, distribute,
//! open or close the global transfer gate and lock individual senders.
//!
//! [`SharedLedger`] serializes mutations behind a reader/writer lock, persists
//! each change through a [`tokenledger_store::LedgerStore`] and fans out
//! [`LedgerEvent`]s to subscribers.

pub mod error;
pub mod event;
pub mod ledger;
pub mod persistence;
pub mod shared;
pub mod snapshot;

pub use error::LedgerError;
pub use event::{EventBus, LedgerEvent};
pub use ledger::Ledger;
pub use shared::SharedLedger;
pub use snapshot::{AccountSnapshot, LedgerSnapshot, SNAPSHOT_VERSION};
