//! Shared record types for the Graft content-merge engine.
//!
//! This crate is the single source of truth for the shapes the engine reads
//! and writes: content-graph records (items, maps, traders, bots, globals)
//! and the custom item descriptors that drive a merge. Field names follow
//! the host's JSON schema so records round-trip without loss.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe string wrappers for record identifiers
//! - [`item`] -- Item templates, slots, filters and item instances
//! - [`location`] -- Maps, loose-loot spawn points and static containers
//! - [`trader`] -- Trader assortments and barter schemes
//! - [`bot`] -- Bot archetypes and weighted loadout tables
//! - [`globals`] -- Masteries, presets, handbook and hideout records
//! - [`descriptor`] -- Custom item descriptors
//! - [`number`] -- Host-compatible float serialization

pub mod bot;
pub mod descriptor;
pub mod globals;
pub mod ids;
pub mod item;
pub mod location;
pub mod number;
pub mod trader;

// Re-export all public types at crate root for convenience.
pub use bot::{BotInventory, BotType, ModTable, Weight, WeightTable};
pub use descriptor::{
    ContainerRef, CostSpec, DescriptorSet, Feature, ItemDescriptor, LocaleStrings, LootRule,
    PatchTarget, PresetPart, PresetSpec, QuestPlacement, SlotPatch, StaticContainers, TraderStock,
};
pub use globals::{
    AreaStage, Globals, GlobalsConfig, Handbook, HandbookEntry, Hideout, HideoutArea, Mastering,
    Preset, Production, StageBonus,
};
pub use ids::{BotTypeId, ItemId, MapId, TraderId};
pub use item::{ItemInstance, ItemProps, ItemTemplate, ItemUpd, Prefab, Slot, SlotFilter, SlotProps};
pub use location::{
    ComposedKey, GroupPosition, ItemDistribution, Location, LocationBase, LooseLoot, SpawnTemplate,
    Spawnpoint, StaticDistribution, StaticLootContainer, Xyz,
};
pub use trader::{BarterCost, Trader, TraderAssort};
