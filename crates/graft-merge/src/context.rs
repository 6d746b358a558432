//! Shared state handed to every patcher.

use graft_content::{AliasKind, AliasTables};
use graft_types::ItemId;
use tracing::warn;

use crate::config::MergeConfig;
use crate::keys::KeyGenerator;
use crate::report::{MergeReport, WarningKind};

/// Configuration, alias tables, key source and report of the current run.
pub struct MergeContext<'a> {
    /// Merge configuration.
    pub config: &'a MergeConfig,
    /// Alias tables descriptors are resolved through.
    pub aliases: &'a AliasTables,
    /// Source of fresh identifiers.
    pub keys: &'a mut dyn KeyGenerator,
    /// Report of the current run.
    pub report: &'a mut MergeReport,
}

impl MergeContext<'_> {
    /// Resolve an item name through the item alias table.
    pub fn item_ref(&self, name: &str) -> ItemId {
        ItemId::from(self.aliases.resolve(AliasKind::Item, name))
    }

    /// Log a warning and record it in the report.
    pub fn warn(&mut self, item: &ItemId, kind: WarningKind) {
        warn!(item = %item, warning = %kind, "Merge warning");
        self.report.warn(item, kind);
    }
}
