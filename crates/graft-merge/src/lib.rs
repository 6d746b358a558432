//! Descriptor-to-graph merge pipeline for the Graft content engine.
//!
//! A merge takes a set of custom item descriptors and wires each new item
//! into the content graph: clone the base template, then patch slot filters,
//! loot tables, traders, masteries, presets and hideout records. Once every
//! item is present, bot loadouts are derived from the items they were
//! cloned from. Every patcher is idempotent, so merging the same descriptors
//! twice leaves the graph unchanged.
//!
//! # Modules
//!
//! - [`pipeline`] -- The two-phase merge run and the configurable [`Merger`]
//! - [`clone`] -- Clone synthesis and the [`ItemCloner`] seam
//! - [`slots`] -- Slot and filter patchers
//! - [`loot`] -- Loose-loot and static-container placement
//! - [`forced`] -- Forced quest spawns
//! - [`trader`] -- Trader assortment writer
//! - [`mastery`] -- Mastery sections and weapon presets
//! - [`bots`] -- Bot loadout derivation and mod propagation
//! - [`crafts`] -- Hideout craft writer
//! - [`keys`] -- Identifier generation
//! - [`context`] -- State shared by every patcher
//! - [`config`] -- `graft.yaml` configuration
//! - [`report`] -- Run report and warnings
//! - [`error`] -- Error types for descriptor failures

pub mod bots;
pub mod clone;
pub mod config;
pub mod context;
pub mod crafts;
pub mod error;
pub mod forced;
pub mod keys;
pub mod loot;
pub mod mastery;
pub mod pipeline;
pub mod report;
pub mod slots;
pub mod trader;

#[cfg(test)]
mod fixtures;

pub use bots::{BotDerivation, derive_bot_loadouts, propagate_mods};
pub use clone::{CloneOutcome, CloneSpec, ItemCloner, TemplateCloner, synthesize};
pub use config::{ConfigError, MergeConfig};
pub use context::MergeContext;
pub use crafts::add_recipes;
pub use error::MergeError;
pub use keys::{KeyGenerator, SequentialKeys, TimeOrderedKeys};
pub use pipeline::{Merger, merge};
pub use report::{MergeReport, MergeWarning, WarningKind};
