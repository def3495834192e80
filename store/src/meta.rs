//! Metadata storage trait.

use crate::StoreError;

/// Database bookkeeping that does not belong to the ledger state itself
/// (currently only the schema version).
pub trait MetaStore {
    /// Get the stored schema version, `0` for a fresh database.
    fn get_schema_version(&self) -> Result<u32, StoreError>;

    /// Record the schema version.
    fn set_schema_version(&self, version: u32) -> Result<(), StoreError>;
}
