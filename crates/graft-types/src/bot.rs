//! Bot archetypes and their weighted inventories.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::ids::ItemId;

/// A spawn weight, kept as the exact JSON number the host supplied.
pub type Weight = Number;

/// Slot category -> item id -> spawn weight.
pub type WeightTable = BTreeMap<String, BTreeMap<ItemId, Weight>>;

/// Item id -> slot name -> permitted mod ids.
pub type ModTable = BTreeMap<ItemId, BTreeMap<String, Vec<ItemId>>>;

/// A bot archetype in the `botTypes` collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BotType {
    /// Weighted loadout tables.
    #[serde(default)]
    pub inventory: BotInventory,
    /// Fields the engine does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A bot archetype's inventory tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BotInventory {
    /// Loot slot (`Pockets`, `Backpack`, ...) -> item weights.
    #[serde(default)]
    pub items: WeightTable,
    /// Equipment slot (`FirstPrimaryWeapon`, `Headwear`, ...) -> item weights.
    #[serde(default)]
    pub equipment: WeightTable,
    /// Derived mod compatibility table.
    #[serde(default)]
    pub mods: ModTable,
    /// Caliber -> ammo id -> weight.
    #[serde(rename = "Ammo", default)]
    pub ammo: WeightTable,
    /// Fields the engine does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BotInventory {
    /// Whether any of `slots` in the equipment table lists `item`.
    pub fn equips_in_any(&self, slots: &[String], item: &str) -> bool {
        slots.iter().any(|slot| {
            self.equipment
                .get(slot.as_str())
                .is_some_and(|weights| weights.contains_key(item))
        })
    }
}
