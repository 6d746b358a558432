//! Descriptor-driven slot patch on specific parent templates.
//!
//! The slot is found by `slotName` (ignoring case) or, without a name, by
//! the supplied slot id and then by [`DEFAULT_SLOT_NAME`]. When no slot
//! matches and creation is enabled, a slot with one empty filter is appended
//! to the parent first.

use graft_content::ContentGraph;
use graft_types::{ItemId, ItemTemplate, PatchTarget, Slot, SlotPatch};
use tracing::debug;

use crate::context::MergeContext;

/// Slot looked up, and created, when the patch names none.
pub const DEFAULT_SLOT_NAME: &str = "mod_muzzle";

/// Apply `patch` for `item`. Returns the number of parents whose slot
/// received the item.
pub fn apply_slot_patch(
    ctx: &mut MergeContext<'_>,
    graph: &mut ContentGraph,
    item: &ItemId,
    patch: &SlotPatch,
) -> usize {
    let mut patched = 0_usize;
    for target in &patch.parent_tpl {
        let parent = ctx.item_ref(target.tpl());
        let Some(record) = graph.items.get_mut(&parent) else {
            debug!(item = %item, parent = %parent, "Slot patch parent not found");
            continue;
        };
        let Some(slot) = find_or_create(ctx, record, target, patch) else {
            debug!(item = %item, parent = %parent, "Slot patch found no slot");
            continue;
        };
        if slot.permit(item) {
            patched = patched.saturating_add(1);
            debug!(item = %item, parent = %parent, slot = %slot.name, "Patched slot");
        }
    }
    patched
}

fn find_or_create<'r>(
    ctx: &mut MergeContext<'_>,
    record: &'r mut ItemTemplate,
    target: &PatchTarget,
    patch: &SlotPatch,
) -> Option<&'r mut Slot> {
    let position = find_slot(record.props.slots(), target, patch.slot_name.as_deref());
    if let Some(index) = position {
        return record.props.slots_mut().get_mut(index);
    }
    if !patch.create_if_missing {
        return None;
    }

    let id = target
        .new_slot_id()
        .map_or_else(|| ctx.keys.slot_id(), str::to_owned);
    let name = target
        .name()
        .or(patch.slot_name.as_deref())
        .unwrap_or(DEFAULT_SLOT_NAME);
    let proto = target
        .proto()
        .unwrap_or(ctx.config.records.default_slot_proto.as_str());
    let slot = Slot::new(id, name, record.id.clone(), proto);
    debug!(parent = %record.id, slot = %slot.name, id = %slot.id, "Created slot");
    let slots = record.props.slots_mut();
    slots.push(slot);
    slots.last_mut()
}

fn find_slot(slots: &[Slot], target: &PatchTarget, slot_name: Option<&str>) -> Option<usize> {
    if let Some(name) = slot_name {
        return slots.iter().position(|s| s.name.eq_ignore_ascii_case(name));
    }
    target
        .new_slot_id()
        .and_then(|id| slots.iter().position(|s| s.id == id))
        .or_else(|| slots.iter().position(|s| s.name.eq_ignore_ascii_case(DEFAULT_SLOT_NAME)))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::fixtures::{self, Harness};

    fn patch_of(raw: serde_json::Value) -> SlotPatch {
        fixtures::descriptor(json!({ "itemTplToClone": "x", "slotPatch": raw }))
            .slot_patch
            .unwrap_or_default()
    }

    #[test]
    fn existing_slot_is_found_by_name_ignoring_case() {
        let mut harness = Harness::new();
        let mut graph = fixtures::graph();
        let patch = patch_of(json!({ "parentTpl": ["rifle", "pistol"], "slotName": "MOD_MAGAZINE" }));
        let item = ItemId::from("new_mag");
        let patched = apply_slot_patch(&mut harness.ctx(), &mut graph, &item, &patch);

        assert_eq!(patched, 2);
        let rifle = graph.item("rifle").cloned().unwrap_or_default();
        assert!(rifle.slot("mod_magazine").is_some_and(|s| s.first_filter_accepts("new_mag")));
        let pistol = graph.item("pistol").cloned().unwrap_or_default();
        let created = pistol.slot("MOD_MAGAZINE");
        assert!(created.is_some_and(|s| s.first_filter_accepts("new_mag") && s.parent == "pistol"));
        assert_eq!(created.map(|s| s.id.as_str()), Some("000000000000000000000001"));
    }

    #[test]
    fn unnamed_patch_falls_back_to_default_slot() {
        let mut harness = Harness::new();
        let mut graph = fixtures::graph();
        let patch = patch_of(json!({ "parentTpl": "other_rifle" }));
        let item = ItemId::from("new_muzzle");
        assert_eq!(apply_slot_patch(&mut harness.ctx(), &mut graph, &item, &patch), 1);
        assert_eq!(apply_slot_patch(&mut harness.ctx(), &mut graph, &item, &patch), 0);

        let record = graph.item("other_rifle").cloned().unwrap_or_default();
        assert_eq!(record.props.slots().len(), 1);
        assert!(record.slot("mod_muzzle").is_some_and(|s| s.first_filter_accepts("new_muzzle")));
    }

    #[test]
    fn default_slot_fallback_ignores_case() {
        let mut harness = Harness::new();
        let mut graph = fixtures::graph();
        if let Some(slot) = graph
            .items
            .get_mut("other_rifle")
            .and_then(|record| record.props.slots_mut().first_mut())
        {
            slot.name = "Mod_Muzzle".to_owned();
        }
        let patch = patch_of(json!({ "parentTpl": "other_rifle" }));
        let item = ItemId::from("new_muzzle");
        assert_eq!(apply_slot_patch(&mut harness.ctx(), &mut graph, &item, &patch), 1);

        let record = graph.item("other_rifle").cloned().unwrap_or_default();
        assert_eq!(record.props.slots().len(), 1);
        assert!(record.slot("Mod_Muzzle").is_some_and(|s| s.first_filter_accepts("new_muzzle")));
    }

    #[test]
    fn detailed_target_creates_slot_with_supplied_fields() {
        let mut harness = Harness::new();
        let mut graph = fixtures::graph();
        let patch = patch_of(json!({
            "parentTpl": { "tpl": "bolts", "newSlotId": "slot123", "name": "mod_tactical", "proto": "proto1" }
        }));
        let item = ItemId::from("new_light");
        assert_eq!(apply_slot_patch(&mut harness.ctx(), &mut graph, &item, &patch), 1);
        assert_eq!(apply_slot_patch(&mut harness.ctx(), &mut graph, &item, &patch), 0);

        let bolts = graph.item("bolts").cloned().unwrap_or_default();
        assert_eq!(bolts.props.slots().len(), 1);
        let slot = bolts.slot("mod_tactical").cloned().unwrap_or_default();
        assert_eq!(slot.id, "slot123");
        assert_eq!(slot.proto, "proto1");
        assert!(slot.first_filter_accepts("new_light"));
    }

    #[test]
    fn creation_can_be_disabled_and_missing_parents_are_skipped() {
        let mut harness = Harness::new();
        let mut graph = fixtures::graph();
        let patch = patch_of(json!({
            "parentTpl": ["bolts", "not_an_item"],
            "slotName": "mod_scope",
            "createIfMissing": false
        }));
        let item = ItemId::from("new_scope");
        assert_eq!(apply_slot_patch(&mut harness.ctx(), &mut graph, &item, &patch), 0);
        assert!(!graph.item("bolts").is_some_and(ItemTemplate::has_slots));
        assert!(harness.report.is_clean());
    }
}
