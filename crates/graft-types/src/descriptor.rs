//! Custom item descriptors.
//!
//! A descriptor file is a JSON object mapping a new item id to an
//! [`ItemDescriptor`]. Key names follow the descriptor authoring format used
//! by content packs (`itemTplToClone`, `addtoModSlots`, `LootLocation`, ...).
//! Several parameters accept either a single value or a list; both forms
//! deserialize into a `Vec`. Keys the engine does not recognize are collected
//! in [`ItemDescriptor::unrecognized`] so they can be reported instead of
//! silently dropped.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use crate::globals::Mastering;
use crate::ids::ItemId;
use crate::location::Xyz;

/// Descriptors keyed by new item id, iterated in sorted id order.
pub type DescriptorSet = BTreeMap<ItemId, ItemDescriptor>;

/// Declarative description of one new item and the subsystems it joins.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ItemDescriptor {
    /// Template (id or alias) the new item is cloned from.
    #[serde(rename = "itemTplToClone")]
    pub item_tpl_to_clone: String,
    /// Base class (id or alias) of the new item.
    #[serde(rename = "parentId", default)]
    pub parent_id: String,
    /// Handbook category (id or alias).
    #[serde(rename = "handbookParentId", default)]
    pub handbook_parent_id: String,
    /// Property overrides shallow-merged into the clone's `_props`.
    #[serde(rename = "overrideProperties", default)]
    pub override_properties: Option<Map<String, Value>>,
    /// Flea market price in roubles.
    #[serde(rename = "fleaPriceRoubles", default)]
    pub flea_price_roubles: Option<f64>,
    /// Handbook price in roubles.
    #[serde(rename = "handbookPriceRoubles", default)]
    pub handbook_price_roubles: Option<f64>,
    /// Language -> display strings.
    #[serde(default)]
    pub locales: BTreeMap<String, LocaleStrings>,

    /// Add the item to static loot containers.
    #[serde(rename = "addtoStaticLootContainers", default)]
    pub add_to_static_loot_containers: bool,
    /// Target container(s).
    #[serde(rename = "StaticLootContainers", default)]
    pub static_loot_containers: Option<StaticContainers>,
    /// Relative probability used with a single container name.
    #[serde(rename = "Probability", default)]
    pub probability: Option<f64>,

    /// Add the item to other items' mod slots.
    #[serde(rename = "addtoModSlots", default)]
    pub add_to_mod_slots: bool,
    /// Slot names the item fits into (case-insensitive).
    #[serde(rename = "modSlot", default, deserialize_with = "one_or_many")]
    pub mod_slot: Vec<String>,
    /// Items that always receive the new item in their mod slots.
    #[serde(rename = "ModdableItemWhitelist", default, deserialize_with = "one_or_many")]
    pub moddable_item_whitelist: Vec<String>,
    /// Items that never receive the new item.
    #[serde(rename = "ModdableItemBlacklist", default, deserialize_with = "one_or_many")]
    pub moddable_item_blacklist: Vec<String>,

    /// Player inventory slots (names or aliases) accepting the item.
    #[serde(rename = "addtoInventorySlots", default, deserialize_with = "one_or_many")]
    pub add_to_inventory_slots: Vec<String>,

    /// Register weapon mastery sections.
    #[serde(default)]
    pub masteries: bool,
    /// Mastery sections to add or extend.
    #[serde(rename = "masterySections", default, deserialize_with = "one_or_many")]
    pub mastery_sections: Vec<Mastering>,

    /// Register weapon presets.
    #[serde(rename = "addweaponpreset", default)]
    pub add_weapon_preset: bool,
    /// Presets to register.
    #[serde(rename = "weaponpresets", default)]
    pub weapon_presets: Vec<PresetSpec>,

    /// Stock the item at a trader.
    #[serde(rename = "addtoTraders", default)]
    pub add_to_traders: bool,
    /// Trader id or alias.
    #[serde(rename = "traderId", default)]
    pub trader_id: String,
    /// Stock entries.
    #[serde(rename = "traderItems", default)]
    pub trader_items: Vec<TraderStock>,
    /// Cost alternatives.
    #[serde(rename = "barterScheme", default)]
    pub barter_scheme: Vec<CostSpec>,
    /// Required loyalty tier.
    #[serde(rename = "loyallevelitems", default)]
    pub loyal_level_items: u32,

    /// Allow the item in `SpecialSlot1..3`.
    #[serde(rename = "addtoSpecialSlots", default)]
    pub add_to_special_slots: bool,
    /// Allow the item on small hall-of-fame trophy slots.
    #[serde(rename = "addToHallOfFameSmall", default)]
    pub add_to_hall_of_fame_small: bool,
    /// Allow the item on big hall-of-fame trophy slots.
    #[serde(rename = "addToHallOfFameBig", default)]
    pub add_to_hall_of_fame_big: bool,
    /// Allow the item on hall-of-fame dogtag slots.
    #[serde(rename = "addToHallOfFameDogtag", default)]
    pub add_to_hall_of_fame_dogtag: bool,
    /// Allow the item on hideout poster slots.
    #[serde(rename = "addtoPosterSlots", default)]
    pub add_to_poster_slots: bool,
    /// Allow the item on hideout statuette slots.
    #[serde(rename = "addtoStatuetteSlots", default)]
    pub add_to_statuette_slots: bool,
    /// Spawn the item at `flyer` loose-loot points on every map.
    #[serde(rename = "addPosterToMaps", default)]
    pub add_poster_to_maps: bool,
    /// Accept the item as generator fuel.
    #[serde(rename = "addtoGenerator", default)]
    pub add_to_generator: bool,

    /// Spawn the item at tag-matched loose-loot points.
    #[serde(rename = "addtoLootLocation", default)]
    pub add_to_loot_location: bool,
    /// Tag rules for loose-loot matching.
    #[serde(rename = "LootLocation", default)]
    pub loot_location: Vec<LootRule>,

    /// Guaranteed quest placements.
    #[serde(rename = "QuestLocation", default)]
    pub quest_location: Vec<QuestPlacement>,
    /// Prefix of generated forced-spawn template names.
    #[serde(rename = "QuestTemplatePrefix", default)]
    pub quest_template_prefix: Option<String>,

    /// Targeted slot patch on specific parent templates.
    #[serde(rename = "slotPatch", default)]
    pub slot_patch: Option<SlotPatch>,

    /// Derive bot loadout entries from the cloned-from item.
    #[serde(rename = "addtoBots", default)]
    pub add_to_bots: bool,

    /// Keys the engine does not recognize.
    #[serde(flatten)]
    pub unrecognized: BTreeMap<String, Value>,
}

impl ItemDescriptor {
    /// Subsystems this descriptor opts into, in processing order.
    pub fn enabled_features(&self) -> Vec<Feature> {
        [
            (self.add_to_static_loot_containers, Feature::StaticLoot),
            (self.add_to_mod_slots, Feature::ModSlots),
            (!self.add_to_inventory_slots.is_empty(), Feature::InventorySlots),
            (self.masteries, Feature::Masteries),
            (self.add_weapon_preset, Feature::Presets),
            (self.add_to_traders, Feature::Trader),
            (self.add_to_special_slots, Feature::SpecialSlots),
            (
                self.add_to_hall_of_fame_small
                    || self.add_to_hall_of_fame_big
                    || self.add_to_hall_of_fame_dogtag,
                Feature::HallOfFame,
            ),
            (self.add_to_poster_slots, Feature::PosterSlots),
            (self.add_to_statuette_slots, Feature::StatuetteSlots),
            (self.add_poster_to_maps, Feature::PosterPlacement),
            (self.add_to_loot_location, Feature::LootLocations),
            (self.add_to_generator, Feature::Generator),
            (!self.quest_location.is_empty(), Feature::ForcedSpawns),
            (self.slot_patch.is_some(), Feature::SlotPatch),
            (self.add_to_bots, Feature::Bots),
        ]
        .into_iter()
        .filter_map(|(on, feature)| on.then_some(feature))
        .collect()
    }
}

/// A subsystem a descriptor can opt into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Static loot containers.
    StaticLoot,
    /// Other items' mod slots.
    ModSlots,
    /// Player inventory slots.
    InventorySlots,
    /// Weapon mastery sections.
    Masteries,
    /// Weapon presets.
    Presets,
    /// Trader assortment.
    Trader,
    /// Special slots.
    SpecialSlots,
    /// Hall-of-fame slots.
    HallOfFame,
    /// Hideout poster slots.
    PosterSlots,
    /// Hideout statuette slots.
    StatuetteSlots,
    /// Poster loose-loot placement.
    PosterPlacement,
    /// Tag-based loose-loot placement.
    LootLocations,
    /// Generator fuel filter.
    Generator,
    /// Forced quest spawns.
    ForcedSpawns,
    /// Targeted slot patch.
    SlotPatch,
    /// Bot loadout derivation.
    Bots,
}

/// Display strings for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LocaleStrings {
    /// Full name.
    #[serde(default)]
    pub name: String,
    /// Short name.
    #[serde(rename = "shortName", default)]
    pub short_name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
}

/// Static loot container target(s).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StaticContainers {
    /// Several containers with their own probabilities.
    Many(Vec<ContainerRef>),
    /// A single container name; probability comes from `Probability`.
    One(String),
}

/// A static loot container with a relative probability.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContainerRef {
    /// Container template (id or alias).
    #[serde(rename = "ContainerName")]
    pub container_name: String,
    /// Relative probability.
    #[serde(rename = "Probability", default)]
    pub probability: Option<f64>,
}

/// A preset as written in a descriptor.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PresetSpec {
    /// Whether the preset renames the weapon.
    #[serde(rename = "_changeWeaponName", default)]
    pub change_weapon_name: bool,
    /// Encyclopedia entry.
    #[serde(rename = "_encyclopedia", default)]
    pub encyclopedia: Option<ItemId>,
    /// Preset id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Components; the first one is the root.
    #[serde(rename = "_items", default)]
    pub items: Vec<PresetPart>,
    /// Preset name.
    #[serde(rename = "_name", default)]
    pub name: String,
    /// Root instance id.
    #[serde(rename = "_parent", default)]
    pub parent: String,
}

/// One component of a descriptor preset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PresetPart {
    /// Instance id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Item template.
    #[serde(rename = "_tpl")]
    pub tpl: ItemId,
    /// Parent instance.
    #[serde(rename = "parentId", default)]
    pub parent_id: Option<String>,
    /// Slot on the parent.
    #[serde(rename = "slotId", default)]
    pub slot_id: Option<String>,
}

/// A trader stock entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct TraderStock {
    /// Whether stock is unlimited.
    #[serde(rename = "unlimitedCount", default)]
    pub unlimited_count: bool,
    /// Stack size offered.
    #[serde(rename = "stackObjectsCount", default)]
    pub stack_objects_count: u64,
}

/// One cost alternative as written in a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CostSpec {
    /// Amount required; integer or fractional.
    pub count: Number,
    /// Currency or item (id or alias).
    #[serde(rename = "_tpl")]
    pub tpl: String,
}

/// A loose-loot tag rule.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LootRule {
    /// Spawn point tag, matched as a normalized prefix.
    #[serde(rename = "LootName", default)]
    pub loot_name: String,
    /// Relative probability; the configured default when absent.
    #[serde(rename = "Probability", default)]
    pub probability: Option<f64>,
}

/// A guaranteed quest placement on one or more maps.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QuestPlacement {
    /// Map names or aliases.
    #[serde(rename = "Map", default)]
    pub map: Vec<String>,
    /// World position.
    #[serde(rename = "Position", default)]
    pub position: Xyz,
    /// World rotation.
    #[serde(rename = "Rotation", default)]
    pub rotation: Xyz,
    /// Spawn probability; the configured default when absent.
    #[serde(rename = "Probability", default)]
    pub probability: Option<f64>,
}

/// Targeted slot patch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SlotPatch {
    /// Parent templates to patch.
    #[serde(rename = "parentTpl", default, deserialize_with = "one_or_many")]
    pub parent_tpl: Vec<PatchTarget>,
    /// Slot to patch (case-insensitive); also the name of a created slot.
    #[serde(rename = "slotName", default)]
    pub slot_name: Option<String>,
    /// Create the slot when the parent lacks it.
    #[serde(rename = "createIfMissing", default = "default_true")]
    pub create_if_missing: bool,
}

impl Default for SlotPatch {
    fn default() -> Self {
        Self {
            parent_tpl: Vec::new(),
            slot_name: None,
            create_if_missing: default_true(),
        }
    }
}

/// A slot patch target: a bare template or one with slot creation details.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PatchTarget {
    /// Template id or alias.
    Tpl(String),
    /// Template with creation details.
    Detailed {
        /// Template id or alias.
        tpl: String,
        /// Prototype of a created slot.
        #[serde(default)]
        proto: Option<String>,
        /// Id of a created slot; also used to find an existing one.
        #[serde(rename = "newSlotId", default)]
        new_slot_id: Option<String>,
        /// Name of a created slot.
        #[serde(default)]
        name: Option<String>,
    },
}

impl PatchTarget {
    /// The targeted template (id or alias).
    pub fn tpl(&self) -> &str {
        match self {
            Self::Tpl(tpl) | Self::Detailed { tpl, .. } => tpl,
        }
    }

    /// Prototype for a created slot, if supplied.
    pub fn proto(&self) -> Option<&str> {
        match self {
            Self::Tpl(_) => None,
            Self::Detailed { proto, .. } => proto.as_deref(),
        }
    }

    /// Slot id to look up or create, if supplied.
    pub fn new_slot_id(&self) -> Option<&str> {
        match self {
            Self::Tpl(_) => None,
            Self::Detailed { new_slot_id, .. } => new_slot_id.as_deref(),
        }
    }

    /// Name for a created slot, if supplied.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Tpl(_) => None,
            Self::Detailed { name, .. } => name.as_deref(),
        }
    }
}

const fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// Accept either a single value or a list, and `null` as empty.
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
    })
}
