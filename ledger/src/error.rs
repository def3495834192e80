use thiserror::Error;
use tokenledger_types::{AccountId, TypesError};

/// Failure of a ledger operation.
///
/// Every failed operation leaves the ledger exactly as it was before the call.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("unauthorized: {caller} is not the administrator")]
    Unauthorized { caller: AccountId },

    #[error("transfers are suspended")]
    TransfersSuspended,

    #[error("account {0} is locked")]
    AccountLocked(AccountId),

    #[error("insufficient balance: need {needed}, available {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("invalid amount: {0}")]
    InvalidAmount(&'static str),

    #[error(transparent)]
    InvalidMetadata(#[from] TypesError),

    #[error("invalid account: {0}")]
    InvalidAccount(TypesError),

    #[error("supply invariant violated: balances sum to {sum}, total supply is {total_supply}")]
    SupplyMismatch { total_supply: u128, sum: u128 },

    #[error("snapshot hash does not match its contents")]
    SnapshotHashMismatch,

    #[error("unsupported snapshot version {0}")]
    UnsupportedSnapshotVersion(u32),

    #[error("store already holds a ledger")]
    AlreadyInitialized,

    #[error("store does not hold a ledger")]
    NotInitialized,

    #[error("storage error: {0}")]
    Storage(#[from] tokenledger_store::StoreError),
}
