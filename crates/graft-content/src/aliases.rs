//! Identifier alias tables.
//!
//! Descriptors may refer to records by human-friendly names (`M4A1`,
//! `prapor`, `RUB`, `customs`) instead of 24-character ids. [`AliasTables`]
//! holds one lookup table per [`AliasKind`] and resolves a name to its id.
//! Resolution never fails: a name that is not in the table is passed through
//! unchanged, since it may already be an id. Map names are the exception and
//! resolve strictly through [`AliasTables::resolve_map`].

use std::collections::BTreeMap;

use graft_types::MapId;
use serde::Deserialize;

/// The kinds of alias table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasKind {
    /// Item templates.
    Item,
    /// Item base classes (`_parent` ids).
    BaseClass,
    /// Handbook categories.
    HandbookCategory,
    /// Traders.
    Trader,
    /// Currencies used in barter schemes.
    Currency,
    /// Maps, keyed by normalized name.
    Map,
    /// Player inventory slot names.
    InventorySlot,
}

const CURRENCIES: &[(&str, &str)] = &[
    ("RUB", "5449016a4bdc2d6f028b456f"),
    ("USD", "5696686a4bdc2da3298b456a"),
    ("EUR", "569668774bdc2da2298b4568"),
    ("GP", "5d235b4d86f7742e017bc88a"),
];

const TRADERS: &[(&str, &str)] = &[
    ("prapor", "54cb50c76803fa8b248b4571"),
    ("therapist", "54cb57776803fa99248b456e"),
    ("fence", "579dc571d53a0658a154fbec"),
    ("skier", "58330581ace78e27b8b10cee"),
    ("peacekeeper", "5935c25fb3acc3127c3d8cd9"),
    ("mechanic", "5a7c2eca46aec4001a1c8e21"),
    ("ragman", "5ac3b934156ae10c4430e83c"),
    ("jaeger", "5c0647fdd443bc2504c2d371"),
    ("ref", "6617beeaa9cfa777ca915b7c"),
];

const BASE_CLASSES: &[(&str, &str)] = &[
    ("WEAPON", "5422acb9af1c889c16000029"),
    ("ASSAULT_RIFLE", "5447b5f14bdc2d61278b4567"),
    ("PISTOL", "5447b5cf4bdc2d65278b4567"),
    ("AMMO", "5485a8684bdc2da71d8b4567"),
    ("MOD", "5448fe124bdc2da5018b4567"),
    ("SILENCER", "550aa4cd4bdc2dd8348b456c"),
    ("MAGAZINE", "5448bc234bdc2d3c308b4569"),
    ("BARTER_ITEM", "5448eb774bdc2d0a728b4567"),
    ("FOOD", "5448e8d04bdc2ddf718b4569"),
    ("DRINK", "5448e8d64bdc2dce718b4568"),
    ("MEDS", "543be5664bdc2dd4348b4569"),
    ("KEY", "543be5e94bdc2df1348b4568"),
    ("INFO", "5448ecbe4bdc2d60728b4568"),
    ("FUEL", "5d650c3e815116009f6201d2"),
];

const ITEMS: &[(&str, &str)] = &[
    ("M4A1", "5447a9cd4bdc2dbd208b4567"),
    ("AKM", "59d6088586f774275f37482f"),
    ("AK74", "5bf3e03b0db834001d2c4a9c"),
    ("SALEWA", "544fb45d4bdc2dee738b4568"),
    ("BOLTS", "57347c5b245977448d35f6e1"),
];

const MAPS: &[(&str, &str)] = &[
    ("bigmap", "bigmap"),
    ("customs", "bigmap"),
    ("factory4_day", "factory4_day"),
    ("factoryday", "factory4_day"),
    ("factory4_night", "factory4_night"),
    ("factorynight", "factory4_night"),
    ("interchange", "interchange"),
    ("laboratory", "laboratory"),
    ("lab", "laboratory"),
    ("lighthouse", "lighthouse"),
    ("rezervbase", "rezervbase"),
    ("reserve", "rezervbase"),
    ("sandbox", "sandbox"),
    ("groundzerolow", "sandbox"),
    ("sandbox_high", "sandbox_high"),
    ("groundzerohigh", "sandbox_high"),
    ("tarkovstreets", "tarkovstreets"),
    ("streets", "tarkovstreets"),
    ("woods", "woods"),
];

const INVENTORY_SLOTS: &[(&str, &str)] = &[
    ("primary", "FirstPrimaryWeapon"),
    ("secondary", "SecondPrimaryWeapon"),
    ("holster", "Holster"),
    ("pistol", "Holster"),
    ("melee", "Scabbard"),
    ("helmet", "Headwear"),
    ("headwear", "Headwear"),
    ("earpiece", "Earpiece"),
    ("facecover", "FaceCover"),
    ("eyewear", "Eyewear"),
    ("armband", "ArmBand"),
    ("armor", "ArmorVest"),
    ("rig", "TacticalVest"),
    ("vest", "TacticalVest"),
    ("backpack", "Backpack"),
    ("pockets", "Pockets"),
    ("secure", "SecuredContainer"),
];

/// Per-kind name -> id lookup tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTables {
    tables: BTreeMap<AliasKind, BTreeMap<String, String>>,
}

impl Default for AliasTables {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AliasTables {
    /// Empty tables: every name passes through unchanged, no map resolves.
    pub const fn empty() -> Self {
        Self {
            tables: BTreeMap::new(),
        }
    }

    /// Tables pre-populated with well-known ids.
    pub fn builtin() -> Self {
        let mut tables = Self::empty();
        for (kind, entries) in [
            (AliasKind::Currency, CURRENCIES),
            (AliasKind::Trader, TRADERS),
            (AliasKind::BaseClass, BASE_CLASSES),
            (AliasKind::Item, ITEMS),
            (AliasKind::Map, MAPS),
            (AliasKind::InventorySlot, INVENTORY_SLOTS),
        ] {
            tables.extend(
                kind,
                entries.iter().map(|(name, id)| ((*name).to_owned(), (*id).to_owned())),
            );
        }
        tables.tables.entry(AliasKind::HandbookCategory).or_default();
        tables
    }

    /// Add or override a single entry.
    pub fn insert(&mut self, kind: AliasKind, name: &str, id: impl Into<String>) {
        let key = if kind == AliasKind::Map {
            normalize_map_name(name)
        } else {
            name.to_owned()
        };
        self.tables.entry(kind).or_default().insert(key, id.into());
    }

    /// Add or override many entries of one kind.
    pub fn extend(&mut self, kind: AliasKind, entries: impl IntoIterator<Item = (String, String)>) {
        for (name, id) in entries {
            self.insert(kind, &name, id);
        }
    }

    /// Resolve `name` to an id, passing unknown names through unchanged.
    pub fn resolve<'a>(&'a self, kind: AliasKind, name: &'a str) -> &'a str {
        self.lookup(kind, name).unwrap_or(name)
    }

    /// Resolve `name` only if the table has an entry for it.
    pub fn lookup(&self, kind: AliasKind, name: &str) -> Option<&str> {
        let table = self.tables.get(&kind)?;
        if kind == AliasKind::Map {
            return table.get(&normalize_map_name(name)).map(String::as_str);
        }
        table.get(name).map(String::as_str)
    }

    /// Names in the table of `kind` that map to `id`.
    pub fn names_for<'a>(&'a self, kind: AliasKind, id: &'a str) -> impl Iterator<Item = &'a str> {
        self.tables
            .get(&kind)
            .into_iter()
            .flat_map(|table| table.iter())
            .filter(move |(_, value)| value.as_str() == id)
            .map(|(name, _)| name.as_str())
    }

    /// Strictly resolve a map name (case, whitespace, `_` and `-` ignored).
    pub fn resolve_map(&self, name: &str) -> Option<MapId> {
        self.lookup(AliasKind::Map, name).map(MapId::from)
    }

    /// Whether an inventory slot named `slot` is selected by `wanted`,
    /// directly or through the inventory-slot table in either direction.
    pub fn inventory_slot_selected(&self, slot: &str, wanted: &[String]) -> bool {
        let listed = |name: &str| wanted.iter().any(|w| w == name);
        if listed(slot) {
            return true;
        }
        if self
            .lookup(AliasKind::InventorySlot, slot)
            .is_some_and(listed)
        {
            return true;
        }
        self.names_for(AliasKind::InventorySlot, slot).any(listed)
    }
}

/// Normalize a map name: lower-case, with whitespace, `_` and `-` removed.
pub fn normalize_map_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}
