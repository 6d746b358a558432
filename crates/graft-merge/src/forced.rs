//! Forced (guaranteed) quest spawns.
//!
//! Quest placements are grouped by resolved map. Each map gets one forced
//! spawn point whose template holds a single root item; with more than one
//! placement on a map the spawn becomes a group whose positions are the
//! placements in descriptor order. A map that already has a forced spawn at
//! the first placement's coordinates offering the item is left alone.

use std::collections::BTreeMap;

use graft_content::ContentGraph;
use graft_types::{
    GroupPosition, ItemId, ItemInstance, MapId, QuestPlacement, SpawnTemplate, Spawnpoint,
};
use tracing::{debug, info};

use crate::context::MergeContext;
use crate::report::WarningKind;

/// Add forced spawns for `item`. Returns the number of spawn points created.
pub fn add_forced_spawns(
    ctx: &mut MergeContext<'_>,
    graph: &mut ContentGraph,
    item: &ItemId,
    placements: &[QuestPlacement],
    template_prefix: Option<&str>,
) -> usize {
    let by_map = group_by_map(ctx, item, placements);
    let config = ctx.config;
    let prefix = template_prefix.unwrap_or(config.loot.forced_template_prefix.as_str());

    let mut created = 0_usize;
    for (map, points) in by_map {
        let Some(location) = graph.locations.get_mut(&map) else {
            ctx.warn(item, WarningKind::MapNotLoaded { map });
            continue;
        };
        let map_name = location.display_name(map.as_str()).to_owned();
        let Some(loose) = location.loose_loot.as_mut() else {
            ctx.warn(item, WarningKind::MapWithoutLooseLoot { map });
            continue;
        };
        let Some(first) = points.first() else {
            continue;
        };

        let location_id = first.position.location_key();
        let exists = loose
            .spawnpoints_forced
            .iter()
            .any(|sp| sp.location_id == location_id && sp.offers(item.as_str()));
        if exists {
            debug!(item = %item, map = %map, location = %location_id, "Forced spawn already present");
            continue;
        }

        let root = ctx.keys.key();
        let template_id = format!("{prefix} ({}) [{}]", points.len(), ctx.keys.key());
        let grouped = points.len() > 1;
        let group_positions = if grouped {
            points
                .iter()
                .enumerate()
                .map(|(index, point)| GroupPosition {
                    name: format!("groupPoint[{index}]"),
                    weight: 1.0,
                    position: point.position,
                    rotation: point.rotation,
                })
                .collect()
        } else {
            Vec::new()
        };

        loose.spawnpoints_forced.push(Spawnpoint {
            location_id: location_id.clone(),
            probability: first.probability.unwrap_or(config.loot.forced_probability),
            template: SpawnTemplate {
                id: template_id.clone(),
                position: first.position,
                rotation: first.rotation,
                is_group_position: grouped,
                group_positions,
                root: root.clone(),
                items: vec![ItemInstance::single(root, item.clone())],
                ..SpawnTemplate::default()
            },
            ..Spawnpoint::default()
        });
        created = created.saturating_add(1);
        info!(
            item = %item,
            map = %map,
            map_name = %map_name,
            location = %location_id,
            template = %template_id,
            points = points.len(),
            "Added forced spawn"
        );
    }
    created
}

/// Resolve every placement's maps, dropping unknown names with a warning.
fn group_by_map<'p>(
    ctx: &mut MergeContext<'_>,
    item: &ItemId,
    placements: &'p [QuestPlacement],
) -> BTreeMap<MapId, Vec<&'p QuestPlacement>> {
    let mut by_map: BTreeMap<MapId, Vec<&QuestPlacement>> = BTreeMap::new();
    for placement in placements {
        for name in &placement.map {
            match ctx.aliases.resolve_map(name) {
                Some(map) => by_map.entry(map).or_default().push(placement),
                None => ctx.warn(item, WarningKind::UnknownMapAlias { alias: name.clone() }),
            }
        }
    }
    by_map
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::fixtures::{self, Harness};

    fn placements(raw: serde_json::Value) -> Vec<QuestPlacement> {
        fixtures::descriptor(json!({ "itemTplToClone": "x", "QuestLocation": raw })).quest_location
    }

    fn forced(graph: &ContentGraph, map: &str) -> Vec<Spawnpoint> {
        graph
            .locations
            .get(map)
            .and_then(|l| l.loose_loot.as_ref())
            .map(|l| l.spawnpoints_forced.clone())
            .unwrap_or_default()
    }

    #[test]
    fn single_placement_is_not_grouped() {
        let mut harness = Harness::new();
        let mut graph = fixtures::graph();
        let item = ItemId::from("quest_note");
        let quest = placements(json!([{
            "Map": ["Customs"],
            "Position": { "x": 12.5, "y": 1, "z": -3 },
            "Rotation": { "x": 0, "y": 90, "z": 0 }
        }]));
        assert_eq!(add_forced_spawns(&mut harness.ctx(), &mut graph, &item, &quest, None), 1);

        let spawns = forced(&graph, "bigmap");
        assert_eq!(spawns.len(), 1);
        let spawn = spawns.first().cloned().unwrap_or_default();
        assert_eq!(spawn.location_id, "(12.5, 1, -3)");
        assert!((spawn.probability - 1.0).abs() < f64::EPSILON);
        assert_eq!(spawn.template.id, "QuestItem (1) [KEY000002]");
        assert_eq!(spawn.template.root, "KEY000001");
        assert!(!spawn.template.is_group_position);
        assert!(spawn.template.group_positions.is_empty());
        assert!(spawn.item_distribution.is_empty());
        assert!(spawn.offers("quest_note"));
    }

    #[test]
    fn two_placements_on_one_map_form_a_group() {
        let mut harness = Harness::new();
        let mut graph = fixtures::graph();
        let item = ItemId::from("quest_note");
        let quest = placements(json!([
            { "Map": ["woods"], "Position": { "x": 1, "y": 2, "z": 3 }, "Probability": 0.4 },
            { "Map": ["Woods"], "Position": { "x": 4, "y": 5, "z": 6 } }
        ]));
        let created = add_forced_spawns(&mut harness.ctx(), &mut graph, &item, &quest, Some("Note"));
        assert_eq!(created, 1);

        let spawn = forced(&graph, "woods").first().cloned().unwrap_or_default();
        assert!(spawn.template.id.starts_with("Note (2) ["));
        assert!(spawn.template.is_group_position);
        assert_eq!(spawn.template.group_positions.len(), 2);
        let names: Vec<&str> = spawn.template.group_positions.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["groupPoint[0]", "groupPoint[1]"]);
        assert_eq!(spawn.location_id, "(1, 2, 3)");
        assert!((spawn.probability - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn rerun_does_not_duplicate() {
        let mut harness = Harness::new();
        let mut graph = fixtures::graph();
        let item = ItemId::from("quest_note");
        let quest = placements(json!([{ "Map": ["bigmap"], "Position": { "x": 1, "y": 1, "z": 1 } }]));
        assert_eq!(add_forced_spawns(&mut harness.ctx(), &mut graph, &item, &quest, None), 1);
        assert_eq!(add_forced_spawns(&mut harness.ctx(), &mut graph, &item, &quest, None), 0);
        assert_eq!(forced(&graph, "bigmap").len(), 1);
    }

    #[test]
    fn unknown_missing_and_lootless_maps_are_reported() {
        let mut harness = Harness::new();
        let mut graph = fixtures::graph();
        graph.locations.remove("interchange");
        let item = ItemId::from("quest_note");
        let quest = placements(json!([{
            "Map": ["Atlantis", "interchange", "lab"],
            "Position": { "x": 0, "y": 0, "z": 0 }
        }]));
        assert_eq!(add_forced_spawns(&mut harness.ctx(), &mut graph, &item, &quest, None), 0);

        let kinds: Vec<&WarningKind> = harness.report.warnings.iter().map(|w| &w.kind).collect();
        assert_eq!(kinds.len(), 3);
        assert!(matches!(kinds.first(), Some(WarningKind::UnknownMapAlias { alias }) if alias == "Atlantis"));
        assert!(kinds.iter().any(|k| matches!(k, WarningKind::MapNotLoaded { map } if map == "interchange")));
        assert!(kinds.iter().any(|k| matches!(k, WarningKind::MapWithoutLooseLoot { map } if map == "laboratory")));
    }
}
