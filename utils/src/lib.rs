//! Shared utilities for the token ledger.

pub mod logging;

pub use logging::{init_logging, LogFormat};
