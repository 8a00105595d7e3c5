//! Type-safe banner identifier.
//!
//! [`BannerId`] is a newtype wrapper around [`uuid::Uuid`] (v4) providing
//! type safety so that banner identifiers cannot be confused with other UUIDs.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Unique identifier for a banner record of either family.
///
/// Wraps a UUID v4 assigned by the store on insert and immutable
/// thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct BannerId(uuid::Uuid);

impl BannerId {
    /// Creates a new random `BannerId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a `BannerId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for BannerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BannerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for BannerId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

impl From<BannerId> for uuid::Uuid {
    fn from(id: BannerId) -> Self {
        id.0
    }
}
