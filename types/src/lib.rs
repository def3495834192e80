//! Fundamental types for the token ledger.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account identifiers, token metadata, fixed-decimal unit conversion and timestamps.

pub mod account;
pub mod error;
pub mod metadata;
pub mod time;
pub mod units;

pub use account::AccountId;
pub use error::TypesError;
pub use metadata::{TokenMetadata, MAX_DECIMALS};
pub use time::Timestamp;
pub use units::{format_units, parse_units, to_raw};
