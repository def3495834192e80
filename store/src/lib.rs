//! Abstract storage traits for the token ledger.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these traits.
//! The ledger depends only on the traits and serializes its own values, so the
//! store never needs to know about ledger types beyond account ids.

pub mod batch;
pub mod error;
pub mod ledger;
pub mod meta;

pub use batch::StoreBatch;
pub use error::StoreError;
pub use ledger::{keys, LedgerStore};
pub use meta::MetaStore;
