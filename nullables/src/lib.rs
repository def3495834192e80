//! Nullable infrastructure for deterministic testing.
//!
//! Storage is abstracted behind the `tokenledger-store` traits. This crate
//! provides an implementation that never touches the filesystem and can be
//! told to fail, so rollback paths are testable without a real backend.

pub mod store;

pub use store::NullLedgerStore;
