//! Core error types.
//!
//! Gameplay never fails: invalid player input degrades to a no-op. The only
//! fatal condition is a catalog that cannot serve every rarity tier.

use thiserror::Error;

use crate::types::Rarity;

/// Catalog validation failure, detected at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A rarity tier has no item definitions
    #[error("catalog has no items in the {} tier", .0.as_str())]
    EmptyTier(Rarity),

    /// An item would award nothing
    #[error("item '{name}' has zero base points")]
    ZeroPoints { name: &'static str },

    /// Two definitions share an id
    #[error("duplicate item id {0}")]
    DuplicateId(u16),
}
