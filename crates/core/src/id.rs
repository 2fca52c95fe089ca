//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Client-generated identity of a stock-keeping record.
///
/// Generated once when a record is constructed and never reassigned. The store
/// keeps it in the `uuid` column next to its own surrogate key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductUuid(Uuid);

impl ProductUuid {
    /// Create a new random identifier (UUIDv4).
    ///
    /// Prefer passing IDs explicitly in tests for determinism.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ProductUuid {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for ProductUuid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for ProductUuid {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<ProductUuid> for Uuid {
    fn from(value: ProductUuid) -> Self {
        value.0
    }
}

impl FromStr for ProductUuid {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::from_str(s)
            .map_err(|e| DomainError::invalid_id(format!("ProductUuid: {e}")))?;
        Ok(Self(uuid))
    }
}
