//! Synthetic content-graph fragments shared by the unit tests.

#![allow(clippy::indexing_slicing)]

use graft_content::{AliasTables, ContentGraph};
use graft_types::ItemDescriptor;
use serde_json::{Value, json};

use crate::config::MergeConfig;
use crate::context::MergeContext;
use crate::keys::SequentialKeys;
use crate::report::MergeReport;

/// Owns everything a [`MergeContext`] borrows.
pub struct Harness {
    pub config: MergeConfig,
    pub aliases: AliasTables,
    pub keys: SequentialKeys,
    pub report: MergeReport,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            config: MergeConfig::default(),
            aliases: AliasTables::builtin(),
            keys: SequentialKeys::new(),
            report: MergeReport::default(),
        }
    }

    pub fn ctx(&mut self) -> MergeContext<'_> {
        MergeContext {
            config: &self.config,
            aliases: &self.aliases,
            keys: &mut self.keys,
            report: &mut self.report,
        }
    }
}

pub fn descriptor(raw: Value) -> ItemDescriptor {
    let parsed = serde_json::from_value(raw);
    assert!(parsed.is_ok(), "fixture descriptor should parse: {parsed:?}");
    parsed.unwrap_or_default()
}

pub fn slot(name: &str, filter: &[&str]) -> Value {
    json!({
        "_id": format!("{name}_id"),
        "_name": name,
        "_parent": "",
        "_props": { "filters": [{ "Shift": 0, "Filter": filter }] },
        "_required": false,
        "_mergeSlotWithChildren": false,
        "_proto": "55d30c4c4bdc2db4468b457e"
    })
}

fn item(id: &str, slots: &[Value]) -> Value {
    json!({
        "_id": id,
        "_name": id,
        "_parent": "base",
        "_type": "Item",
        "_props": { "Slots": slots }
    })
}

fn spawnpoint(template_id: &str, items: &[&str]) -> Value {
    let instances: Vec<Value> = items
        .iter()
        .map(|tpl| json!({ "_id": format!("{tpl}_key"), "_tpl": tpl }))
        .collect();
    let distribution: Vec<Value> = items
        .iter()
        .map(|tpl| json!({ "composedKey": { "key": format!("{tpl}_key") }, "relativeProbability": 1 }))
        .collect();
    json!({
        "locationId": format!("({template_id})"),
        "probability": 0.3,
        "template": {
            "Id": template_id,
            "IsContainer": false,
            "useGravity": true,
            "randomRotation": false,
            "Position": { "x": 0, "y": 0, "z": 0 },
            "Rotation": { "x": 0, "y": 0, "z": 0 },
            "IsGroupPosition": false,
            "GroupPositions": [],
            "IsAlwaysSpawn": false,
            "Root": "",
            "Items": instances
        },
        "itemDistribution": distribution
    })
}

pub fn graph_value() -> Value {
    let mut rifle = item(
        "rifle",
        &[slot("mod_muzzle", &["muzzle_a"]), slot("mod_magazine", &["mag_a"])],
    );
    rifle["_props"]["ammoCaliber"] = json!("Caliber556x45NATO");
    rifle["_props"]["Chambers"] = json!([slot("patron_in_weapon", &["ammo_a", "ammo_b"])]);

    let mut dogtag_slot = slot("dogtag_0", &[]);
    dogtag_slot["_props"]["filters"] = json!([{ "Filter": [] }, { "Filter": ["old_tag"] }]);

    let mut statuette = slot("Statuette_Gym_1", &[]);
    statuette["_props"]["filters"] = json!([]);

    json!({
        "items": {
            "rifle": rifle,
            "muzzle_a": item("muzzle_a", &[slot("mod_muzzle", &["suppressor_a"])]),
            "suppressor_a": item("suppressor_a", &[]),
            "mag_a": item("mag_a", &[]),
            "ammo_a": item("ammo_a", &[]),
            "ammo_b": item("ammo_b", &[]),
            "bolts": item("bolts", &[]),
            "other_rifle": item("other_rifle", &[slot("mod_muzzle", &["muzzle_a"])]),
            "pistol": item("pistol", &[slot("mod_muzzle", &["pistol_muzzle"])]),
            "pockets": item("pockets", &[slot("SpecialSlot1", &[]), slot("SpecialSlot2", &["bolts"])]),
            "55d7217a4bdc2d86028b456d": item("55d7217a4bdc2d86028b456d", &[
                slot("FirstPrimaryWeapon", &["rifle"]),
                slot("Holster", &["pistol"]),
                slot("Backpack", &[]),
            ]),
            "63dbd45917fff4dee40fe16e": item("63dbd45917fff4dee40fe16e", &[
                slot("smallTrophies_0", &[]),
                slot("bigTrophies_0", &[]),
                dogtag_slot,
            ]),
            "65424185a57eea37ed6562e9": item("65424185a57eea37ed6562e9", &[slot("smallTrophies_1", &[])]),
            "6542435ea57eea37ed6562f0": item("6542435ea57eea37ed6562f0", &[slot("bigTrophies_1", &[])]),
            "673c7b00cbf4b984b5099181": item("673c7b00cbf4b984b5099181", &[
                slot("Poster_Security_1", &[]),
                statuette,
                slot("Other_Slot", &[]),
            ])
        },
        "handbook": { "Items": [], "Categories": [] },
        "prices": {},
        "locales": { "en": {}, "ru": {} },
        "locations": {
            "bigmap": {
                "base": { "Name": "Customs" },
                "looseLoot": {
                    "spawnpoints": [
                        spawnpoint("lootpoint (3) [a1]", &["bolts"]),
                        spawnpoint("loot_food (1)", &[]),
                        spawnpoint("Flyer_poster (2)", &[]),
                        spawnpoint("info_item [x]", &[])
                    ],
                    "spawnpointsForced": []
                },
                "staticLoot": {
                    "container_drawer": { "itemDistribution": [{ "tpl": "bolts", "relativeProbability": 5 }] }
                }
            },
            "woods": {
                "base": { "Name": "Woods" },
                "looseLoot": { "spawnpoints": [spawnpoint("flyer (1)", &[])] },
                "staticLoot": {}
            },
            "laboratory": { "base": { "Name": "Lab" } }
        },
        "traders": {
            "54cb50c76803fa8b248b4571": {
                "base": { "nickname": "Prapor" },
                "assort": { "items": [], "barter_scheme": {}, "loyal_level_items": {} }
            }
        },
        "botTypes": {
            "assault": {
                "inventory": {
                    "items": { "Pockets": { "bolts": 3, "muzzle_a": 2 }, "Backpack": {} },
                    "equipment": { "FirstPrimaryWeapon": { "rifle": 10 }, "Headwear": {} },
                    "mods": { "rifle": { "mod_muzzle": ["muzzle_a"] } }
                }
            },
            "pmc": {
                "inventory": {
                    "items": { "Pockets": { "muzzle_a": 5 } },
                    "equipment": {},
                    "mods": {},
                    "Ammo": {}
                }
            }
        },
        "globals": {
            "config": { "Mastering": [{ "Name": "M4", "Templates": ["rifle"], "Level2": 500 }] },
            "ItemPresets": {}
        },
        "hideout": {
            "areas": [{
                "_id": "5d3b396e33c48f02b81cd9f3",
                "stages": {
                    "1": { "bonuses": [
                        { "id": "b1", "type": "AdditionalSlots", "filter": ["fuel_a"] },
                        { "id": "b2", "type": "EnergyRegeneration" }
                    ] },
                    "2": { "bonuses": [{ "id": "b3", "type": "AdditionalSlots", "filter": [] }] }
                }
            }],
            "production": { "recipes": [{ "_id": "existing" }] }
        }
    })
}

pub fn graph() -> ContentGraph {
    let parsed = serde_json::from_value(graph_value());
    assert!(parsed.is_ok(), "fixture graph should parse: {parsed:?}");
    parsed.unwrap_or_default()
}
