//! Slot and filter patching.
//!
//! Every slot patcher reduces to one primitive: pick target records, pick
//! matching slots on them, and permit the new item in the first or every
//! filter of each slot. Filters are sets; an id already present is never
//! added twice, so every patcher is idempotent.
//!
//! # Modules
//!
//! - [`mods`] -- Mod, inventory and special slots keyed off item records
//! - [`fixed`] -- Hall of fame, hideout customization and generator records
//! - [`patch`] -- Descriptor-driven slot patch with optional slot creation

pub mod fixed;
pub mod mods;
pub mod patch;

use graft_content::ContentGraph;
use graft_types::{ItemId, ItemTemplate, Slot};

/// Which filters of a matching slot receive the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterScope {
    /// Only the first filter.
    First,
    /// Every filter.
    Every,
}

/// How slots are selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotMatch<'a> {
    /// Name equals one of the listed names exactly.
    Named(&'a [String]),
    /// Name equals one of the listed names, ignoring ASCII case.
    NamedIgnoreCase(&'a [String]),
    /// Name starts with the prefix.
    Prefix(&'a str),
}

impl SlotMatch<'_> {
    /// Whether a slot called `name` is selected.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Named(names) => names.iter().any(|n| n == name),
            Self::NamedIgnoreCase(names) => names.iter().any(|n| n.eq_ignore_ascii_case(name)),
            Self::Prefix(prefix) => name.starts_with(prefix),
        }
    }
}

/// A slot selection plus the filter scope to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPatcher<'a> {
    /// Slot selection.
    pub matcher: SlotMatch<'a>,
    /// Filters written on each selected slot.
    pub scope: FilterScope,
}

impl<'a> SlotPatcher<'a> {
    /// A patcher writing `scope` filters of slots selected by `matcher`.
    pub const fn new(matcher: SlotMatch<'a>, scope: FilterScope) -> Self {
        Self { matcher, scope }
    }

    /// Permit `item` on the selected slots of one record.
    ///
    /// Returns the number of filters the id was inserted into.
    pub fn patch_record(&self, record: &mut ItemTemplate, item: &ItemId) -> usize {
        record
            .props
            .slots
            .iter_mut()
            .flatten()
            .filter(|slot| self.matcher.matches(&slot.name))
            .map(|slot| permit(slot, item, self.scope))
            .sum()
    }

    /// Permit `item` on the selected slots of every record in the graph.
    pub fn patch_all(&self, graph: &mut ContentGraph, item: &ItemId) -> usize {
        graph
            .items
            .values_mut()
            .map(|record| self.patch_record(record, item))
            .sum()
    }
}

/// Permit `item` on `slot`, creating an empty filter first if it has none.
///
/// Returns the number of filters the id was inserted into.
pub fn permit(slot: &mut Slot, item: &ItemId, scope: FilterScope) -> usize {
    match scope {
        FilterScope::First => usize::from(slot.permit(item)),
        FilterScope::Every => slot.permit_everywhere(item),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn matchers_select_by_name() {
        let names = vec!["Mod_Muzzle".to_owned()];
        assert!(SlotMatch::NamedIgnoreCase(&names).matches("mod_muzzle"));
        assert!(!SlotMatch::Named(&names).matches("mod_muzzle"));
        assert!(SlotMatch::Prefix("bigTrophies").matches("bigTrophies_3"));
        assert!(!SlotMatch::Prefix("bigTrophies").matches("smallTrophies_3"));
    }

    #[test]
    fn patch_all_is_idempotent() {
        let mut graph = fixtures::graph();
        let names = vec!["SpecialSlot1".to_owned(), "SpecialSlot2".to_owned()];
        let patcher = SlotPatcher::new(SlotMatch::Named(&names), FilterScope::First);
        let item = ItemId::from("new");
        assert_eq!(patcher.patch_all(&mut graph, &item), 2);
        assert_eq!(patcher.patch_all(&mut graph, &item), 0);
    }

    #[test]
    fn every_scope_writes_all_filters_and_creates_missing_one() {
        let mut graph = fixtures::graph();
        let item = ItemId::from("new");
        let names = vec!["Statuette_Gym_1".to_owned()];
        let patcher = SlotPatcher::new(SlotMatch::Named(&names), FilterScope::Every);
        if let Some(record) = graph.item_mut("673c7b00cbf4b984b5099181") {
            assert_eq!(patcher.patch_record(record, &item), 1);
            let slot = record.slot("Statuette_Gym_1");
            assert_eq!(slot.map(|s| s.props.filters.len()), Some(1));
        }

        let dogtags = SlotPatcher::new(SlotMatch::Prefix("dogtag"), FilterScope::Every);
        if let Some(record) = graph.item_mut("63dbd45917fff4dee40fe16e") {
            assert_eq!(dogtags.patch_record(record, &item), 2);
        }
    }
}
