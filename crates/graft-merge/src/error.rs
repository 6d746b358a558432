//! Error types for the `graft-merge` crate.
//!
//! A [`MergeError`] marks a configuration defect in one descriptor. The
//! pipeline records it against that descriptor and moves on, unless the run
//! is configured to fail fast.

use graft_types::ItemId;

/// Errors that stop the processing of a single descriptor.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// The template an item is cloned from does not exist.
    #[error("item {item}: base template {template} not found")]
    MissingTemplate {
        /// The item being created.
        item: ItemId,
        /// The unresolved base template.
        template: String,
    },

    /// A barter cost names neither a currency nor a known item.
    #[error("item {item}: barter reference {reference} is not a currency or item")]
    UnresolvedBarterReference {
        /// The item being stocked.
        item: ItemId,
        /// The unresolved cost reference.
        reference: String,
    },

    /// Property overrides do not fit the item property schema.
    #[error("item {item}: invalid override properties: {source}")]
    InvalidOverrides {
        /// The item being created.
        item: ItemId,
        /// The underlying conversion error.
        source: serde_json::Error,
    },
}

impl MergeError {
    /// The item whose descriptor failed.
    pub const fn item(&self) -> &ItemId {
        match self {
            Self::MissingTemplate { item, .. }
            | Self::UnresolvedBarterReference { item, .. }
            | Self::InvalidOverrides { item, .. } => item,
        }
    }
}
