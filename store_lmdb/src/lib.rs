//! LMDB storage backend for the token ledger.
//!
//! Implements the storage traits from `tokenledger-store` using the `heed`
//! LMDB bindings. Meta values, balances and the lock set each live in their
//! own database within a single environment, so a ledger commit is one write
//! transaction.

pub mod environment;
pub mod error;
pub mod ledger;
pub mod meta;
pub mod migration;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use ledger::LmdbLedgerStore;
pub use meta::LmdbMetaStore;
pub use migration::{Migrator, CURRENT_SCHEMA_VERSION};
