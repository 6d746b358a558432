//! Bot loadout derivation.
//!
//! Runs after every descriptor's structural patches, so slot filters already
//! list the new items. For each bot archetype the new item inherits the
//! cloned-from item's weights in `items` and `equipment`; weapons also feed
//! their caliber and chamber ammo into `Ammo`. After each mirrored table the
//! new item's attachment tree is propagated into `mods`.
//!
//! Mod propagation walks the slot-filter graph with an explicit worklist and
//! a visited set, so cyclic filter graphs terminate.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use graft_content::ContentGraph;
use graft_types::{BotInventory, ItemDescriptor, ItemId, ItemTemplate, ModTable, Weight, WeightTable};
use tracing::{debug, trace};

use crate::context::MergeContext;
use crate::report::WarningKind;
use crate::slots::SlotMatch;

/// What derivation wrote for one descriptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BotDerivation {
    /// Archetypes whose tables received the item.
    pub archetypes: usize,
    /// Weight entries mirrored from the cloned-from item.
    pub weights: usize,
    /// Mod ids added to `mods`.
    pub mods: usize,
    /// Ammo entries added to `Ammo`.
    pub ammo: usize,
}

/// Derive every bot archetype's loadout entries for `item`.
pub fn derive_bot_loadouts(
    ctx: &mut MergeContext<'_>,
    graph: &mut ContentGraph,
    item: &ItemId,
    descriptor: &ItemDescriptor,
) -> BotDerivation {
    let config = ctx.config;
    let clone_from = ctx.item_ref(&descriptor.item_tpl_to_clone);
    let mirror_mod_slots = descriptor.add_to_mod_slots && !descriptor.mod_slot.is_empty();
    let items = &graph.items;
    let mut total = BotDerivation::default();

    for (bot_id, bot) in &mut graph.bot_types {
        let inventory = &mut bot.inventory;
        let mut derived = BotDerivation::default();

        let mirrored = mirror_weights(&mut inventory.items, &clone_from, item);
        if mirrored > 0 {
            derived.weights = derived.weights.saturating_add(mirrored);
            derived.mods = derived.mods.saturating_add(propagate_mods(items, &mut inventory.mods, item));
        }

        let weapon = inventory.equips_in_any(&config.slots.weapon_equipment, clone_from.as_str());
        if weapon && !graph.globals.has_preset_rooted_at(item.as_str()) {
            ctx.warn(item, WarningKind::MissingPreset { bot: bot_id.clone() });
        } else {
            if weapon && let Some(template) = items.get(item) {
                derived.ammo = add_ammo(inventory, template);
            }
            let mirrored = mirror_weights(&mut inventory.equipment, &clone_from, item);
            if mirrored > 0 {
                derived.weights = derived.weights.saturating_add(mirrored);
                derived.mods = derived.mods.saturating_add(propagate_mods(items, &mut inventory.mods, item));
            }
        }

        if mirror_mod_slots {
            let added = mirror_mod_slot_entries(&mut inventory.mods, &descriptor.mod_slot, &clone_from, item);
            if added > 0 {
                derived.mods = derived
                    .mods
                    .saturating_add(added)
                    .saturating_add(propagate_mods(items, &mut inventory.mods, item));
            }
        }

        if derived != BotDerivation::default() {
            debug!(
                item = %item,
                bot = %bot_id,
                weights = derived.weights,
                mods = derived.mods,
                ammo = derived.ammo,
                "Derived bot loadout"
            );
            total.archetypes = total.archetypes.saturating_add(1);
            total.weights = total.weights.saturating_add(derived.weights);
            total.mods = total.mods.saturating_add(derived.mods);
            total.ammo = total.ammo.saturating_add(derived.ammo);
        }
    }
    total
}

/// Give `item` the weight `clone_from` has in every slot category listing it.
fn mirror_weights(table: &mut WeightTable, clone_from: &ItemId, item: &ItemId) -> usize {
    let mut mirrored = 0_usize;
    for weights in table.values_mut() {
        if let Some(weight) = weights.get(clone_from).cloned() {
            weights.insert(item.clone(), weight);
            mirrored = mirrored.saturating_add(1);
        }
    }
    mirrored
}

/// Add the weapon's caliber and chamber ammo to `Ammo`, weight 0 when new.
fn add_ammo(inventory: &mut BotInventory, weapon: &ItemTemplate) -> usize {
    let Some(caliber) = weapon.props.ammo_caliber.as_ref() else {
        return 0;
    };
    let ammo = inventory.ammo.entry(caliber.clone()).or_default();
    let mut added = 0_usize;
    for id in weapon.props.chambers().iter().flat_map(|chamber| chamber.permitted()) {
        if !ammo.contains_key(id) {
            ammo.insert(id.clone(), Weight::from(0));
            added = added.saturating_add(1);
        }
    }
    added
}

/// Add `item` next to `clone_from` in every listed mod slot of every mod
/// entry. Slot names match ignoring ASCII case.
fn mirror_mod_slot_entries(
    mods: &mut ModTable,
    slot_names: &[String],
    clone_from: &ItemId,
    item: &ItemId,
) -> usize {
    let matcher = SlotMatch::NamedIgnoreCase(slot_names);
    let mut added = 0_usize;
    for (owner, slots) in mods.iter_mut() {
        for (name, entries) in slots.iter_mut() {
            if !matcher.matches(name) {
                continue;
            }
            if entries.contains(clone_from) && !entries.contains(item) {
                entries.push(item.clone());
                added = added.saturating_add(1);
                trace!(item = %item, owner = %owner, slot = %name, "Mirrored bot mod slot entry");
            }
        }
    }
    added
}

/// Record the attachment tree below `root` in `mods`.
///
/// Every filter id of every slot of a visited item that is itself a known
/// item is listed under `mods[item][slot]`. Items with slots are visited in
/// turn, each at most once. Returns the number of mod ids added.
pub fn propagate_mods(items: &BTreeMap<ItemId, ItemTemplate>, mods: &mut ModTable, root: &ItemId) -> usize {
    let mut added = 0_usize;
    let mut visited: BTreeSet<&ItemId> = BTreeSet::new();
    let mut queue: VecDeque<&ItemId> = VecDeque::new();
    let Some((root_key, _)) = items.get_key_value(root) else {
        return 0;
    };
    visited.insert(root_key);
    queue.push_back(root_key);

    while let Some(node) = queue.pop_front() {
        let Some(template) = items.get(node) else {
            continue;
        };
        for slot in template.props.slots() {
            for id in slot.permitted() {
                let Some((mod_key, mod_template)) = items.get_key_value(id) else {
                    continue;
                };
                let entries = mods
                    .entry(node.clone())
                    .or_default()
                    .entry(slot.name.clone())
                    .or_default();
                if !entries.contains(id) {
                    entries.push(id.clone());
                    added = added.saturating_add(1);
                }
                if mod_template.has_slots() && visited.insert(mod_key) {
                    queue.push_back(mod_key);
                }
            }
        }
    }
    added
}
