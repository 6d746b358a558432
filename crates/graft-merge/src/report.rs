//! Merge run reporting.
//!
//! A [`MergeReport`] summarizes one run: how many descriptors merged, which
//! optional targets were missing (warnings) and which descriptors failed.

use std::fmt;

use graft_types::{BotTypeId, ItemId, MapId};

use crate::error::MergeError;

/// Outcome of a merge run.
#[derive(Debug, Default)]
pub struct MergeReport {
    /// Descriptors whose structural merge completed.
    pub items_merged: usize,
    /// Missing optional targets and ignored input.
    pub warnings: Vec<MergeWarning>,
    /// Descriptors that failed, with their errors.
    pub failures: Vec<MergeError>,
}

impl MergeReport {
    /// Record a warning against `item`.
    pub fn warn(&mut self, item: &ItemId, kind: WarningKind) {
        self.warnings.push(MergeWarning {
            item: item.clone(),
            kind,
        });
    }

    /// Whether the run produced neither warnings nor failures.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.failures.is_empty()
    }

    /// Whether `item` failed in this run.
    pub fn failed(&self, item: &str) -> bool {
        self.failures.iter().any(|e| e.item() == item)
    }

    /// Warnings recorded against `item`.
    pub fn warnings_for<'a>(&'a self, item: &'a str) -> impl Iterator<Item = &'a WarningKind> {
        self.warnings
            .iter()
            .filter(move |w| w.item == item)
            .map(|w| &w.kind)
    }
}

/// A warning recorded against one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeWarning {
    /// The descriptor's item id.
    pub item: ItemId,
    /// What was missing or ignored.
    pub kind: WarningKind,
}

impl fmt::Display for MergeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.item, self.kind)
    }
}

/// The kinds of merge warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// A forced-spawn map name matched no known map.
    UnknownMapAlias {
        /// The name as written.
        alias: String,
    },
    /// A resolved map is not present in the graph.
    MapNotLoaded {
        /// The resolved map.
        map: MapId,
    },
    /// A map has no loose-loot table to place forced spawns in.
    MapWithoutLooseLoot {
        /// The map.
        map: MapId,
    },
    /// A well-known record the patcher targets is absent.
    MissingRecord {
        /// What the record is used for.
        role: &'static str,
        /// The record id.
        record: String,
    },
    /// The trader to stock does not exist.
    MissingTrader {
        /// The resolved trader id.
        trader: String,
    },
    /// A weapon has no preset, so bot equipment derivation was skipped.
    MissingPreset {
        /// The bot archetype being derived.
        bot: BotTypeId,
    },
    /// No map has the named static container.
    MissingStaticContainer {
        /// The resolved container id.
        container: String,
    },
    /// A descriptor key the engine does not recognize.
    UnrecognizedKey {
        /// The key as written.
        key: String,
    },
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMapAlias { alias } => write!(f, "unknown map alias {alias:?}"),
            Self::MapNotLoaded { map } => write!(f, "map {map} is not loaded"),
            Self::MapWithoutLooseLoot { map } => write!(f, "map {map} has no loose loot"),
            Self::MissingRecord { role, record } => write!(f, "{role} record {record} not found"),
            Self::MissingTrader { trader } => write!(f, "trader {trader} not found"),
            Self::MissingPreset { bot } => {
                write!(f, "no preset rooted at the weapon; skipped {bot} equipment")
            }
            Self::MissingStaticContainer { container } => {
                write!(f, "static container {container} not found on any map")
            }
            Self::UnrecognizedKey { key } => write!(f, "unrecognized descriptor key {key:?}"),
        }
    }
}
