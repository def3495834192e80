//! Display metadata for the ledger's single asset.

use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// Largest supported decimal precision. `10^18` is the usual chain-token precision
/// and keeps `10^decimals` comfortably inside `u128`.
pub const MAX_DECIMALS: u8 = 18;

/// Name, symbol and decimal precision of the asset, fixed at ledger creation.
///
/// Deserialization goes through [`TokenMetadata::new`], so stored or
/// snapshotted metadata obeys the same rules as freshly created metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedMetadata")]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenMetadata {
    /// Validate and build metadata.
    ///
    /// Name and symbol must contain at least one non-whitespace character and
    /// `decimals` must not exceed [`MAX_DECIMALS`].
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        decimals: u8,
    ) -> Result<Self, TypesError> {
        let name = name.into();
        let symbol = symbol.into();
        if name.trim().is_empty() {
            return Err(TypesError::InvalidMetadata("name must not be empty".into()));
        }
        if symbol.trim().is_empty() {
            return Err(TypesError::InvalidMetadata("symbol must not be empty".into()));
        }
        if decimals > MAX_DECIMALS {
            return Err(TypesError::InvalidMetadata(format!(
                "decimals {decimals} exceeds maximum of {MAX_DECIMALS}"
            )));
        }
        Ok(Self {
            name,
            symbol,
            decimals,
        })
    }

    /// Re-check metadata that was built or modified field by field.
    pub fn validate(&self) -> Result<(), TypesError> {
        Self::new(self.name.as_str(), self.symbol.as_str(), self.decimals).map(|_| ())
    }
}

#[derive(Deserialize)]
struct UncheckedMetadata {
    name: String,
    symbol: String,
    decimals: u8,
}

impl TryFrom<UncheckedMetadata> for TokenMetadata {
    type Error = TypesError;

    fn try_from(raw: UncheckedMetadata) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.symbol, raw.decimals)
    }
}
