//! Global tables: weapon masteries, presets, handbook and hideout areas.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::ItemId;
use crate::item::ItemInstance;

/// The `globals` record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Globals {
    /// Global configuration block.
    #[serde(default)]
    pub config: GlobalsConfig,
    /// Weapon presets keyed by preset id.
    #[serde(rename = "ItemPresets", default)]
    pub item_presets: BTreeMap<String, Preset>,
    /// Fields the engine does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Globals {
    /// Whether some preset uses `item` as its root component.
    pub fn has_preset_rooted_at(&self, item: &str) -> bool {
        self.item_presets
            .values()
            .any(|preset| preset.items.first().is_some_and(|root| root.tpl.as_str() == item))
    }
}

/// The `globals.config` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalsConfig {
    /// Weapon mastery sections.
    #[serde(rename = "Mastering", default)]
    pub mastering: Vec<Mastering>,
    /// Fields the engine does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A weapon mastery section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mastering {
    /// Section name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Weapons counted towards this mastery.
    #[serde(rename = "Templates", default)]
    pub templates: Vec<ItemId>,
    /// Fields the engine does not interpret (`Level2`, `Level3`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A named composition of a root item and its attached components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Whether the preset renames the weapon.
    #[serde(rename = "_changeWeaponName", default)]
    pub change_weapon_name: bool,
    /// Encyclopedia entry, when the preset is a default preset.
    #[serde(rename = "_encyclopedia", default, skip_serializing_if = "Option::is_none")]
    pub encyclopedia: Option<ItemId>,
    /// Preset identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Components; the first one is the root.
    #[serde(rename = "_items", default)]
    pub items: Vec<ItemInstance>,
    /// Preset name.
    #[serde(rename = "_name", default)]
    pub name: String,
    /// Root instance id.
    #[serde(rename = "_parent", default)]
    pub parent: String,
    /// Record type, always `Preset`.
    #[serde(rename = "_type", default)]
    pub kind: String,
}

/// The handbook record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Handbook {
    /// Priced item entries.
    #[serde(rename = "Items", default)]
    pub items: Vec<HandbookEntry>,
    /// Fields the engine does not interpret (`Categories`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A handbook price entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandbookEntry {
    /// Item template.
    #[serde(rename = "Id")]
    pub id: ItemId,
    /// Handbook category.
    #[serde(rename = "ParentId")]
    pub parent_id: String,
    /// Base price in roubles.
    #[serde(rename = "Price", serialize_with = "crate::number::serialize")]
    pub price: f64,
}

/// The hideout record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hideout {
    /// Hideout areas.
    #[serde(default)]
    pub areas: Vec<HideoutArea>,
    /// Crafting recipes.
    #[serde(default)]
    pub production: Production,
    /// Fields the engine does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A hideout area with its upgrade stages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HideoutArea {
    /// Area identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Stage key -> stage.
    #[serde(default)]
    pub stages: BTreeMap<String, AreaStage>,
    /// Fields the engine does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One upgrade stage of a hideout area.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaStage {
    /// Bonuses granted at this stage.
    #[serde(default)]
    pub bonuses: Vec<StageBonus>,
    /// Fields the engine does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A stage bonus; `AdditionalSlots` bonuses carry an item filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageBonus {
    /// Bonus identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Bonus type.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Items accepted by the bonus slots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Vec<ItemId>>,
    /// Fields the engine does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The production (crafting) table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Production {
    /// Recipes, kept opaque.
    #[serde(default)]
    pub recipes: Vec<Value>,
    /// Fields the engine does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
