//! The in-memory content graph.
//!
//! [`ContentGraph`] holds every record collection the merge engine touches.
//! Collections are keyed by id in sorted maps so iteration order (and thus
//! merge output) is deterministic. The engine mutates entries in place and
//! never replaces a whole collection.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use graft_types::{
    BotType, BotTypeId, Globals, Handbook, HandbookEntry, Hideout, ItemId, ItemTemplate, Location,
    MapId, Trader, TraderId,
};
use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// Language -> locale key -> string.
pub type Locales = BTreeMap<String, BTreeMap<String, String>>;

/// Every record collection the merge engine reads or writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentGraph {
    /// Item templates keyed by id.
    #[serde(default)]
    pub items: BTreeMap<ItemId, ItemTemplate>,
    /// Handbook categories and price entries.
    #[serde(default)]
    pub handbook: Handbook,
    /// Flea market prices keyed by item id.
    #[serde(default, serialize_with = "graft_types::number::serialize_map")]
    pub prices: BTreeMap<ItemId, f64>,
    /// Global locale strings per language.
    #[serde(default)]
    pub locales: Locales,
    /// Map records keyed by map id.
    #[serde(default)]
    pub locations: BTreeMap<MapId, Location>,
    /// Trader records keyed by trader id.
    #[serde(default)]
    pub traders: BTreeMap<TraderId, Trader>,
    /// Bot archetypes keyed by archetype name.
    #[serde(rename = "botTypes", default)]
    pub bot_types: BTreeMap<BotTypeId, BotType>,
    /// Masteries and weapon presets.
    #[serde(default)]
    pub globals: Globals,
    /// Hideout areas and production recipes.
    #[serde(default)]
    pub hideout: Hideout,
}

impl ContentGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a graph from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, ContentError> {
        let file = File::open(path).map_err(|e| ContentError::io(path, e))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Read a graph from any JSON reader.
    pub fn from_reader(reader: impl Read) -> Result<Self, ContentError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write the graph as pretty-printed JSON.
    pub fn to_writer(&self, writer: impl Write) -> Result<(), ContentError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Write the graph to a JSON file, replacing it.
    pub fn to_path(&self, path: &Path) -> Result<(), ContentError> {
        let file = File::create(path).map_err(|e| ContentError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush().map_err(|e| ContentError::io(path, e))
    }

    /// Whether an item template with this id exists.
    pub fn has_item(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Look up an item template.
    pub fn item(&self, id: &str) -> Option<&ItemTemplate> {
        self.items.get(id)
    }

    /// Look up an item template mutably.
    pub fn item_mut(&mut self, id: &str) -> Option<&mut ItemTemplate> {
        self.items.get_mut(id)
    }

    /// Insert or update the handbook entry of `id`.
    pub fn upsert_handbook(&mut self, id: &ItemId, parent_id: &str, price: f64) {
        if let Some(entry) = self.handbook.items.iter_mut().find(|e| e.id == *id) {
            parent_id.clone_into(&mut entry.parent_id);
            entry.price = price;
            return;
        }
        self.handbook.items.push(HandbookEntry {
            id: id.clone(),
            parent_id: parent_id.to_owned(),
            price,
        });
    }

    /// Set a locale string for one language.
    pub fn set_locale(&mut self, lang: &str, key: String, value: String) {
        self.locales.entry(lang.to_owned()).or_default().insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> serde_json::Value {
        serde_json::json!({
            "items": {
                "tpl": { "_id": "tpl", "_name": "rifle", "_parent": "base", "_type": "Item", "_props": {} }
            },
            "handbook": { "Items": [{ "Id": "tpl", "ParentId": "cat", "Price": 100 }], "Categories": [] },
            "prices": { "tpl": 1500 },
            "locales": { "en": { "tpl Name": "Rifle" } },
            "locations": { "bigmap": { "base": { "Name": "Customs" } } },
            "traders": {},
            "botTypes": {},
            "globals": { "config": { "Mastering": [] }, "ItemPresets": {} },
            "hideout": { "areas": [], "production": { "recipes": [] } }
        })
    }

    /// Host records carrying empty lists, zero values, whole-number floats
    /// and fields the engine does not model.
    fn host_fixture() -> serde_json::Value {
        let template = |id: &str, always: bool| {
            serde_json::json!({
                "Id": id,
                "IsContainer": false,
                "useGravity": true,
                "randomRotation": false,
                "Position": { "x": 12, "y": 0, "z": -3.25 },
                "Rotation": { "x": 0, "y": 90, "z": 0 },
                "IsGroupPosition": false,
                "GroupPositions": [],
                "IsAlwaysSpawn": always,
                "Root": "root1",
                "Items": [{ "_id": "root1", "_tpl": "ammo", "upd": { "StackObjectsCount": 30 } }]
            })
        };
        serde_json::json!({
            "items": {
                "ammo": {
                    "_id": "ammo", "_name": "patron", "_parent": "ammo_base", "_type": "Item",
                    "_props": { "Slots": [], "Chambers": [], "StackMaxSize": 60 }
                },
                "ammo_base": { "_id": "ammo_base", "_name": "Ammo", "_parent": "root", "_type": "Node", "_props": {} },
                "rifle": {
                    "_id": "rifle", "_name": "rifle", "_parent": "base", "_type": "Item",
                    "_props": {
                        "Slots": [{
                            "_id": "s1", "_name": "mod_muzzle", "_parent": "rifle",
                            "_props": { "filters": [{ "Filter": ["muzzle"], "Shift": 0 }] },
                            "_required": false, "_mergeSlotWithChildren": false, "_proto": "p1"
                        }],
                        "Chambers": [],
                        "ammoCaliber": "Caliber556x45NATO"
                    },
                    "_proto": "5447a9cd4bdc2dbd208b4567"
                }
            },
            "handbook": { "Items": [{ "Id": "rifle", "ParentId": "cat", "Price": 43000 }], "Categories": [] },
            "prices": { "ammo": 120, "rifle": 42999.5 },
            "locales": { "en": { "rifle Name": "Rifle" } },
            "locations": {
                "bigmap": {
                    "base": { "Name": "Customs", "Id": "bigmap" },
                    "looseLoot": {
                        "spawnpoints": [{
                            "locationId": "(12, 0, -3.25)",
                            "probability": 0.35,
                            "template": template("lootpoint (3) [a1]", false),
                            "itemDistribution": [{ "composedKey": { "key": "root1" }, "relativeProbability": 12 }]
                        }],
                        "spawnpointsForced": [{
                            "locationId": "(12, 0, -3.25)",
                            "probability": 1,
                            "template": template("quest_item", true),
                            "itemDistribution": []
                        }],
                        "spawnpointCount": { "mean": 200, "std": 10 }
                    },
                    "staticLoot": {
                        "drawer": { "itemDistribution": [{ "tpl": "ammo", "relativeProbability": 5 }], "itemcountDistribution": [] }
                    }
                }
            },
            "traders": {
                "prapor": {
                    "assort": {
                        "items": [{
                            "_id": "i1", "_tpl": "rifle", "parentId": "hideout", "slotId": "hideout",
                            "upd": { "UnlimitedCount": true, "StackObjectsCount": 999999 }
                        }],
                        "barter_scheme": {
                            "i1": [
                                [{ "count": 1, "_tpl": "dogtag", "level": 10, "side": "Bear", "onlyFunctional": true }],
                                [{ "count": 12.5, "_tpl": "RUB" }]
                            ]
                        },
                        "loyal_level_items": { "i1": 2 },
                        "nextResupply": 0
                    },
                    "base": { "nickname": "Prapor" }
                }
            },
            "botTypes": {
                "assault": {
                    "inventory": {
                        "items": { "Pockets": { "ammo": 3 }, "Backpack": {} },
                        "equipment": { "FirstPrimaryWeapon": { "rifle": 10 } },
                        "mods": { "rifle": { "mod_muzzle": ["muzzle"] } },
                        "Ammo": { "Caliber556x45NATO": { "ammo": 0.5 } }
                    },
                    "chances": {}
                }
            },
            "globals": {
                "config": { "Mastering": [{ "Name": "M4", "Templates": ["rifle"], "Level2": 500 }], "exp": {} },
                "ItemPresets": {
                    "preset1": {
                        "_changeWeaponName": false, "_id": "preset1",
                        "_items": [{ "_id": "root", "_tpl": "rifle" }],
                        "_name": "default", "_parent": "root", "_type": "Preset"
                    }
                }
            },
            "hideout": {
                "areas": [{
                    "_id": "a1", "type": 17,
                    "stages": { "1": { "bonuses": [{ "type": "AdditionalSlots", "filter": [], "value": 0 }] } }
                }],
                "production": { "recipes": [{ "_id": "r1", "productionTime": 3600 }] }
            }
        })
    }

    #[test]
    fn host_records_roundtrip_unchanged() {
        let raw = host_fixture();
        let graph: Result<ContentGraph, _> = serde_json::from_value(raw.clone());
        assert!(graph.is_ok(), "fixture should parse: {graph:?}");
        let back = serde_json::to_value(graph.unwrap_or_default()).ok();
        assert_eq!(back, Some(raw));
    }

    #[test]
    fn parses_host_collections() {
        let graph: Result<ContentGraph, _> = serde_json::from_value(sample());
        assert!(graph.is_ok());
        let graph = graph.unwrap_or_default();
        assert!(graph.has_item("tpl"));
        assert_eq!(graph.locations.get("bigmap").map(|l| l.display_name("bigmap")), Some("Customs"));
        assert!(graph.handbook.extra.contains_key("Categories"));
    }

    #[test]
    fn handbook_upsert_replaces_existing_entry() {
        let mut graph = ContentGraph::new();
        let id = ItemId::from("new");
        graph.upsert_handbook(&id, "cat", 10.0);
        graph.upsert_handbook(&id, "cat2", 20.0);
        assert_eq!(graph.handbook.items.len(), 1);
        assert_eq!(graph.handbook.items.first().map(|e| e.parent_id.as_str()), Some("cat2"));
    }

    #[test]
    fn writer_output_reads_back() {
        let graph: ContentGraph = serde_json::from_value(sample()).unwrap_or_default();
        let mut buf = Vec::new();
        assert!(graph.to_writer(&mut buf).is_ok());
        let back = ContentGraph::from_reader(buf.as_slice());
        assert_eq!(back.ok(), Some(graph));
    }
}
