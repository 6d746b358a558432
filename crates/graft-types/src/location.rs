//! Map records: loose-loot spawn points, forced spawns and static containers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::ItemId;
use crate::item::ItemInstance;

/// A 3-D vector used for world positions and rotations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Xyz {
    /// X component.
    #[serde(default, serialize_with = "crate::number::serialize")]
    pub x: f64,
    /// Y component.
    #[serde(default, serialize_with = "crate::number::serialize")]
    pub y: f64,
    /// Z component.
    #[serde(default, serialize_with = "crate::number::serialize")]
    pub z: f64,
}

impl Xyz {
    /// Textual coordinate key used as a forced spawn `locationId`,
    /// e.g. `(12.5, 0, -3)`.
    ///
    /// Components use the host's number formatting so keys written by either
    /// side compare equal.
    pub fn location_key(&self) -> String {
        format!(
            "({}, {}, {})",
            host_number(self.x),
            host_number(self.y),
            host_number(self.z)
        )
    }
}

/// Format `value` the way the host runtime stringifies numbers.
///
/// Negative zero prints as `0`. Magnitudes outside `[1e-6, 1e21)` use
/// exponent form with an explicit `+` on positive exponents.
fn host_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        let sign = if value.is_sign_negative() { "-" } else { "" };
        return format!("{sign}Infinity");
    }
    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }
    let formatted = format!("{value:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{mantissa}e+{exponent}"),
        _ => formatted,
    }
}

/// A map record in the `locations` collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Map metadata.
    #[serde(default)]
    pub base: LocationBase,
    /// Loose (floor) loot definitions.
    #[serde(rename = "looseLoot", default, skip_serializing_if = "Option::is_none")]
    pub loose_loot: Option<LooseLoot>,
    /// Static container distributions keyed by container template id.
    #[serde(rename = "staticLoot", default, skip_serializing_if = "Option::is_none")]
    pub static_loot: Option<BTreeMap<String, StaticLootContainer>>,
    /// Fields the engine does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Location {
    /// Display name of the map, falling back to `fallback`.
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.base.name.is_empty() {
            fallback
        } else {
            &self.base.name
        }
    }
}

/// The `base` block of a map record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationBase {
    /// Human-readable map name.
    #[serde(rename = "Name", default)]
    pub name: String,
    /// Fields the engine does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Loose-loot table of a map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LooseLoot {
    /// Probabilistic spawn points.
    #[serde(default)]
    pub spawnpoints: Vec<Spawnpoint>,
    /// Guaranteed spawn points keyed by world coordinates.
    #[serde(rename = "spawnpointsForced", default)]
    pub spawnpoints_forced: Vec<Spawnpoint>,
    /// Fields the engine does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A loose-loot spawn point (probabilistic or forced).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Spawnpoint {
    /// Location key; forced spawns use the textual coordinate.
    #[serde(rename = "locationId", default)]
    pub location_id: String,
    /// Spawn probability of the point itself.
    #[serde(default, serialize_with = "crate::number::serialize")]
    pub probability: f64,
    /// The item template placed at the point.
    #[serde(default)]
    pub template: SpawnTemplate,
    /// Weighted pool over `template.items` keys.
    #[serde(rename = "itemDistribution", default)]
    pub item_distribution: Vec<ItemDistribution>,
    /// Fields the engine does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Spawnpoint {
    /// Whether `item` is already among the point's template items.
    pub fn offers(&self, item: &str) -> bool {
        self.template.items.iter().any(|i| i.tpl.as_str() == item)
    }
}

/// Placement template of a spawn point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SpawnTemplate {
    /// Template name; used for tag matching.
    #[serde(default)]
    pub id: String,
    /// Whether the placement is a container.
    #[serde(default)]
    pub is_container: bool,
    /// Whether physics applies on spawn.
    #[serde(rename = "useGravity", default)]
    pub use_gravity: bool,
    /// Whether the rotation is randomized.
    #[serde(rename = "randomRotation", default)]
    pub random_rotation: bool,
    /// World position.
    #[serde(default)]
    pub position: Xyz,
    /// World rotation.
    #[serde(default)]
    pub rotation: Xyz,
    /// Whether the spawn picks one of several group positions.
    #[serde(default)]
    pub is_group_position: bool,
    /// Alternative positions of a grouped spawn.
    #[serde(default)]
    pub group_positions: Vec<GroupPosition>,
    /// Whether the spawn ignores probability.
    #[serde(default)]
    pub is_always_spawn: bool,
    /// Root item instance id.
    #[serde(default)]
    pub root: String,
    /// Item instances the point can produce.
    #[serde(default)]
    pub items: Vec<ItemInstance>,
    /// Fields the engine does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One candidate position of a grouped spawn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroupPosition {
    /// Position name.
    pub name: String,
    /// Relative selection weight.
    #[serde(serialize_with = "crate::number::serialize")]
    pub weight: f64,
    /// World position.
    pub position: Xyz,
    /// World rotation.
    pub rotation: Xyz,
}

/// A weighted reference to one of a spawn point's template items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemDistribution {
    /// Key of the referenced template item.
    #[serde(rename = "composedKey")]
    pub composed_key: ComposedKey,
    /// Relative selection weight.
    #[serde(rename = "relativeProbability", serialize_with = "crate::number::serialize")]
    pub relative_probability: f64,
}

/// Wrapper for a distribution key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedKey {
    /// The template item `_id`.
    pub key: String,
}

/// A static container's loot distribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticLootContainer {
    /// Weighted item pool.
    #[serde(rename = "itemDistribution", default)]
    pub item_distribution: Vec<StaticDistribution>,
    /// Fields the engine does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One weighted entry of a static container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticDistribution {
    /// Item template.
    pub tpl: ItemId,
    /// Relative selection weight.
    #[serde(rename = "relativeProbability", serialize_with = "crate::number::serialize")]
    pub relative_probability: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_key_formats_like_host() {
        let pos = Xyz { x: 12.5, y: 0.0, z: -3.0 };
        assert_eq!(pos.location_key(), "(12.5, 0, -3)");
    }

    #[test]
    fn location_key_normalizes_zero_and_extremes() {
        let pos = Xyz { x: -0.0, y: 1e21, z: -2.5e-7 };
        assert_eq!(pos.location_key(), "(0, 1e+21, -2.5e-7)");
        let near = Xyz { x: 0.000_001, y: 123_456.789, z: -1e20 };
        assert_eq!(near.location_key(), "(0.000001, 123456.789, -100000000000000000000)");
    }

    #[test]
    fn spawnpoint_roundtrip_keeps_empty_distribution() {
        let raw = serde_json::json!({
            "locationId": "(0, 1, 2)",
            "probability": 1,
            "template": {
                "Id": "quest_item",
                "IsContainer": false,
                "useGravity": false,
                "randomRotation": false,
                "Position": { "x": 0, "y": 1, "z": 2 },
                "Rotation": { "x": 0, "y": 0, "z": 0 },
                "IsGroupPosition": false,
                "GroupPositions": [],
                "IsAlwaysSpawn": true,
                "Root": "root1",
                "Items": [{ "_id": "root1", "_tpl": "bolts" }]
            },
            "itemDistribution": []
        });
        let point: Spawnpoint = serde_json::from_value(raw.clone()).unwrap_or_default();
        assert!(point.item_distribution.is_empty());
        let back = serde_json::to_value(&point).ok();
        assert_eq!(back.as_ref().and_then(|v| v.get("itemDistribution")), Some(&serde_json::json!([])));
    }

    #[test]
    fn spawnpoint_parses_host_shape() {
        let raw = serde_json::json!({
            "locationId": "(1, 2, 3)",
            "probability": 0.2,
            "template": {
                "Id": "lootpoint (3) [a1b2]",
                "IsContainer": false,
                "useGravity": true,
                "randomRotation": false,
                "Position": { "x": 1, "y": 2, "z": 3 },
                "Rotation": { "x": 0, "y": 0, "z": 0 },
                "IsGroupPosition": false,
                "GroupPositions": [],
                "IsAlwaysSpawn": false,
                "Root": "root1",
                "Items": [{ "_id": "root1", "_tpl": "bolts" }]
            },
            "itemDistribution": [
                { "composedKey": { "key": "root1" }, "relativeProbability": 12 }
            ]
        });
        let point: Result<Spawnpoint, _> = serde_json::from_value(raw);
        assert!(point.is_ok());
        let point = point.unwrap_or_default();
        assert_eq!(point.template.id, "lootpoint (3) [a1b2]");
        assert!(point.template.use_gravity);
        assert!(point.offers("bolts"));
        assert!(!point.offers("nuts"));
        assert_eq!(point.item_distribution.len(), 1);
    }
}
