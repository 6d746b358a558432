//! Loose-loot and static-loot placement.
//!
//! Loose-loot placement adds the item to existing spawn points: either the
//! points whose identifier starts with a configured tag ([`place_by_tags`])
//! or the poster points ([`place_posters`]). Each placement is a fresh loot
//! key, an item instance under that key and a distribution entry pointing
//! at it. Points already offering the item are left alone.
//!
//! Static-loot placement appends the item to container distributions that
//! are shared across maps.

use graft_content::ContentGraph;
use graft_types::{
    ComposedKey, ItemDescriptor, ItemDistribution, ItemId, ItemInstance, LootRule, Spawnpoint,
    StaticContainers, StaticDistribution,
};
use tracing::debug;

use crate::context::MergeContext;
use crate::report::WarningKind;

/// Normalize a spawn tag: lower-case, trimmed, without whitespace or `_`.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// The part of a spawn identifier before its first `[`, trimmed.
pub fn left_of_bracket(id: &str) -> &str {
    id.split_once('[').map_or(id, |(left, _)| left).trim()
}

/// Normalized loot tags with their relative probabilities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagRules {
    tags: Vec<(String, f64)>,
}

impl TagRules {
    /// Build rules from descriptor entries.
    ///
    /// A repeated tag keeps its first position and takes the last
    /// probability. Tags that normalize to nothing are dropped.
    pub fn new(rules: &[LootRule], default_probability: f64) -> Self {
        let mut tags: Vec<(String, f64)> = Vec::with_capacity(rules.len());
        for rule in rules {
            let tag = normalize_tag(&rule.loot_name);
            if tag.is_empty() {
                continue;
            }
            let probability = rule.probability.unwrap_or(default_probability);
            match tags.iter_mut().find(|(existing, _)| *existing == tag) {
                Some(entry) => entry.1 = probability,
                None => tags.push((tag, probability)),
            }
        }
        Self { tags }
    }

    /// Whether there are no usable tags.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// The probability of the best tag matching a spawn identifier.
    ///
    /// The identifier is cut at its first `[` and normalized; tags match as
    /// prefixes. The highest probability wins; on a tie the earlier tag is
    /// kept.
    pub fn best_match(&self, spawn_id: &str) -> Option<f64> {
        let key = normalize_tag(left_of_bracket(spawn_id));
        let mut best: Option<f64> = None;
        for (tag, probability) in &self.tags {
            if key.starts_with(tag.as_str()) && best.is_none_or(|b| *probability > b) {
                best = Some(*probability);
            }
        }
        best
    }
}

/// Add `item` to every loose-loot point matching one of `rules`.
///
/// Returns the number of points the item was added to.
pub fn place_by_tags(
    ctx: &mut MergeContext<'_>,
    graph: &mut ContentGraph,
    item: &ItemId,
    rules: &[LootRule],
) -> usize {
    let default_probability = ctx.config.loot.default_probability;
    let tags = TagRules::new(rules, default_probability);
    if tags.is_empty() {
        return 0;
    }
    place(ctx, graph, item, |id| {
        tags.best_match(id)
            .map(|p| if p > 0.0 { p } else { default_probability })
    })
}

/// Add `item` to every poster point on every map.
pub fn place_posters(ctx: &mut MergeContext<'_>, graph: &mut ContentGraph, item: &ItemId) -> usize {
    let prefix = ctx.config.loot.poster_prefix.to_lowercase();
    let probability = ctx.config.loot.poster_probability;
    place(ctx, graph, item, |id| {
        id.to_lowercase().starts_with(&prefix).then_some(probability)
    })
}

fn place(
    ctx: &mut MergeContext<'_>,
    graph: &mut ContentGraph,
    item: &ItemId,
    probability_for: impl Fn(&str) -> Option<f64>,
) -> usize {
    let mut placed = 0_usize;
    for (map, location) in &mut graph.locations {
        let Some(loose) = location.loose_loot.as_mut() else {
            continue;
        };
        for point in &mut loose.spawnpoints {
            let Some(probability) = probability_for(&point.template.id) else {
                continue;
            };
            if point.offers(item.as_str()) {
                continue;
            }
            add_loot(point, ctx.keys.key(), item, probability);
            placed = placed.saturating_add(1);
            debug!(item = %item, map = %map, point = %point.template.id, probability, "Placed loose loot");
        }
    }
    placed
}

fn add_loot(point: &mut Spawnpoint, key: String, item: &ItemId, probability: f64) {
    point.item_distribution.push(ItemDistribution {
        composed_key: ComposedKey { key: key.clone() },
        relative_probability: probability,
    });
    point.template.items.push(ItemInstance::single(key, item.clone()));
}

/// Append `item` to the static containers named by the descriptor on every
/// map that has them.
pub fn add_to_static_loot(
    ctx: &mut MergeContext<'_>,
    graph: &mut ContentGraph,
    item: &ItemId,
    descriptor: &ItemDescriptor,
) -> usize {
    let default_probability = ctx.config.loot.default_probability;
    let targets: Vec<(ItemId, f64)> = match &descriptor.static_loot_containers {
        None => Vec::new(),
        Some(StaticContainers::One(name)) => vec![(
            ctx.item_ref(name),
            descriptor.probability.unwrap_or(default_probability),
        )],
        Some(StaticContainers::Many(containers)) => containers
            .iter()
            .map(|c| {
                (
                    ctx.item_ref(&c.container_name),
                    c.probability.unwrap_or(default_probability),
                )
            })
            .collect(),
    };

    let mut added = 0_usize;
    for (container, probability) in targets {
        let mut found = false;
        for (map, location) in &mut graph.locations {
            let Some(distribution) = location
                .static_loot
                .as_mut()
                .and_then(|containers| containers.get_mut(container.as_str()))
                .map(|c| &mut c.item_distribution)
            else {
                continue;
            };
            found = true;
            if distribution.iter().any(|d| d.tpl == item.as_str()) {
                continue;
            }
            distribution.push(StaticDistribution {
                tpl: item.clone(),
                relative_probability: probability,
            });
            added = added.saturating_add(1);
            debug!(item = %item, map = %map, container = %container, probability, "Added to static loot");
        }
        if !found {
            ctx.warn(
                item,
                WarningKind::MissingStaticContainer {
                    container: container.into_inner(),
                },
            );
        }
    }
    added
}
