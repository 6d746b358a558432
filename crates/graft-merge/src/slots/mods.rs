//! Mod, inventory and special slots.

use graft_content::ContentGraph;
use graft_types::{ItemDescriptor, ItemId, ItemTemplate};
use tracing::debug;

use super::{FilterScope, SlotMatch, SlotPatcher};
use crate::context::MergeContext;
use crate::report::WarningKind;

/// Permit `item` on other items' mod slots named in `modSlot`.
///
/// A record is patched when it is whitelisted, or when one of its listed
/// slots already accepts the cloned-from item in its first filter.
/// Blacklisted records are never patched. Returns the number of records
/// that received the item.
pub fn add_to_mod_slots(
    ctx: &MergeContext<'_>,
    graph: &mut ContentGraph,
    item: &ItemId,
    descriptor: &ItemDescriptor,
) -> usize {
    if descriptor.mod_slot.is_empty() {
        return 0;
    }
    let clone_from = ctx.item_ref(&descriptor.item_tpl_to_clone);
    let whitelist: Vec<ItemId> = descriptor
        .moddable_item_whitelist
        .iter()
        .map(|name| ctx.item_ref(name))
        .collect();
    let blacklist: Vec<ItemId> = descriptor
        .moddable_item_blacklist
        .iter()
        .map(|name| ctx.item_ref(name))
        .collect();
    let patcher = SlotPatcher::new(
        SlotMatch::NamedIgnoreCase(&descriptor.mod_slot),
        FilterScope::First,
    );

    let mut patched = 0_usize;
    for record in graph.items.values_mut() {
        if blacklist.contains(&record.id) {
            continue;
        }
        if !whitelist.contains(&record.id) && !accepts_in_slot(record, &patcher, &clone_from) {
            continue;
        }
        if patcher.patch_record(record, item) > 0 {
            patched = patched.saturating_add(1);
            debug!(item = %item, record = %record.id, "Added to mod slots");
        }
    }
    patched
}

fn accepts_in_slot(record: &ItemTemplate, patcher: &SlotPatcher<'_>, clone_from: &ItemId) -> bool {
    record
        .props
        .slots()
        .iter()
        .any(|slot| patcher.matcher.matches(&slot.name) && slot.first_filter_accepts(clone_from.as_str()))
}

/// Permit `item` on the default inventory's slots named in
/// `addtoInventorySlots`, directly or through the inventory-slot aliases.
pub fn add_to_inventory_slots(
    ctx: &mut MergeContext<'_>,
    graph: &mut ContentGraph,
    item: &ItemId,
    descriptor: &ItemDescriptor,
) -> usize {
    let config = ctx.config;
    let record_id = &config.records.default_inventory;
    let Some(record) = graph.items.get_mut(record_id) else {
        let record = record_id.to_string();
        ctx.warn(
            item,
            WarningKind::MissingRecord {
                role: "default inventory",
                record,
            },
        );
        return 0;
    };

    let wanted = &descriptor.add_to_inventory_slots;
    let mut added = 0_usize;
    for slot in record.props.slots.iter_mut().flatten() {
        if ctx.aliases.inventory_slot_selected(&slot.name, wanted) && slot.permit(item) {
            added = added.saturating_add(1);
            debug!(item = %item, slot = %slot.name, "Added to inventory slot");
        }
    }
    added
}

/// Permit `item` in the special slots of every record that has them.
pub fn add_to_special_slots(ctx: &MergeContext<'_>, graph: &mut ContentGraph, item: &ItemId) -> usize {
    let patcher = SlotPatcher::new(SlotMatch::Named(&ctx.config.slots.special), FilterScope::First);
    let added = patcher.patch_all(graph, item);
    debug!(item = %item, filters = added, "Added to special slots");
    added
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::fixtures::{self, Harness};

    fn accepts(graph: &ContentGraph, record: &str, slot: &str, item: &str) -> bool {
        graph
            .item(record)
            .and_then(|r| r.slot(slot))
            .is_some_and(|s| s.first_filter_accepts(item))
    }

    #[test]
    fn mod_slots_follow_the_cloned_from_item() {
        let mut harness = Harness::new();
        let mut graph = fixtures::graph();
        let descriptor = fixtures::descriptor(json!({
            "itemTplToClone": "muzzle_a",
            "addtoModSlots": true,
            "modSlot": "MOD_MUZZLE"
        }));
        let item = ItemId::from("new_muzzle");
        let patched = add_to_mod_slots(&harness.ctx(), &mut graph, &item, &descriptor);

        assert_eq!(patched, 2);
        assert!(accepts(&graph, "rifle", "mod_muzzle", "new_muzzle"));
        assert!(accepts(&graph, "other_rifle", "mod_muzzle", "new_muzzle"));
        assert!(!accepts(&graph, "pistol", "mod_muzzle", "new_muzzle"));
        assert!(!accepts(&graph, "rifle", "mod_magazine", "new_muzzle"));

        let again = add_to_mod_slots(&harness.ctx(), &mut graph, &item, &descriptor);
        assert_eq!(again, 0);
    }

    #[test]
    fn whitelist_forces_and_blacklist_wins() {
        let mut harness = Harness::new();
        let mut graph = fixtures::graph();
        let descriptor = fixtures::descriptor(json!({
            "itemTplToClone": "muzzle_a",
            "addtoModSlots": true,
            "modSlot": ["mod_muzzle"],
            "ModdableItemWhitelist": "pistol",
            "ModdableItemBlacklist": ["other_rifle"]
        }));
        let item = ItemId::from("new_muzzle");
        add_to_mod_slots(&harness.ctx(), &mut graph, &item, &descriptor);

        assert!(accepts(&graph, "pistol", "mod_muzzle", "new_muzzle"));
        assert!(accepts(&graph, "rifle", "mod_muzzle", "new_muzzle"));
        assert!(!accepts(&graph, "other_rifle", "mod_muzzle", "new_muzzle"));
    }

    #[test]
    fn inventory_slots_match_names_and_aliases() {
        let mut harness = Harness::new();
        let mut graph = fixtures::graph();
        let descriptor = fixtures::descriptor(json!({
            "itemTplToClone": "pistol",
            "addtoInventorySlots": ["pistol", "Backpack"]
        }));
        let item = ItemId::from("new_pistol");
        let added = add_to_inventory_slots(&mut harness.ctx(), &mut graph, &item, &descriptor);

        assert_eq!(added, 2);
        let inventory = "55d7217a4bdc2d86028b456d";
        assert!(accepts(&graph, inventory, "Holster", "new_pistol"));
        assert!(accepts(&graph, inventory, "Backpack", "new_pistol"));
        assert!(!accepts(&graph, inventory, "FirstPrimaryWeapon", "new_pistol"));
    }

    #[test]
    fn missing_inventory_record_is_reported() {
        let mut harness = Harness::new();
        let mut graph = fixtures::graph();
        graph.items.remove("55d7217a4bdc2d86028b456d");
        let descriptor = fixtures::descriptor(json!({
            "itemTplToClone": "pistol",
            "addtoInventorySlots": "Holster"
        }));
        let item = ItemId::from("new_pistol");
        let added = add_to_inventory_slots(&mut harness.ctx(), &mut graph, &item, &descriptor);

        assert_eq!(added, 0);
        assert!(matches!(
            harness.report.warnings.first().map(|w| &w.kind),
            Some(WarningKind::MissingRecord { role: "default inventory", .. })
        ));
    }

    #[test]
    fn special_slots_take_the_item_once() {
        let mut harness = Harness::new();
        let mut graph = fixtures::graph();
        let item = ItemId::from("new_key");
        assert_eq!(add_to_special_slots(&harness.ctx(), &mut graph, &item), 2);
        assert_eq!(add_to_special_slots(&harness.ctx(), &mut graph, &item), 0);
        assert!(accepts(&graph, "pockets", "SpecialSlot1", "new_key"));
        assert!(accepts(&graph, "pockets", "SpecialSlot2", "bolts"));
    }
}
