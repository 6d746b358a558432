//! Slots on well-known records: hall of fame, hideout customization and the
//! generator.
//!
//! The target records are configured in [`RecordsConfig`]. A target that is
//! missing from the graph is reported once per descriptor and skipped.
//!
//! [`RecordsConfig`]: crate::config::RecordsConfig

use graft_content::ContentGraph;
use graft_types::{ItemDescriptor, ItemId};
use tracing::debug;

use super::{FilterScope, SlotMatch, SlotPatcher};
use crate::context::MergeContext;
use crate::report::WarningKind;

/// Bonus type of generator stage bonuses that carry a fuel filter.
pub const ADDITIONAL_SLOTS: &str = "AdditionalSlots";

/// Permit `item` on the hall-of-fame slots enabled by the descriptor.
pub fn add_to_hall_of_fame(
    ctx: &mut MergeContext<'_>,
    graph: &mut ContentGraph,
    item: &ItemId,
    descriptor: &ItemDescriptor,
) -> usize {
    let config = ctx.config;
    let slots = &config.slots;
    let prefixes: Vec<&str> = [
        (descriptor.add_to_hall_of_fame_small, slots.hall_of_fame_small.as_str()),
        (descriptor.add_to_hall_of_fame_big, slots.hall_of_fame_big.as_str()),
        (descriptor.add_to_hall_of_fame_dogtag, slots.hall_of_fame_dogtag.as_str()),
    ]
    .into_iter()
    .filter_map(|(on, prefix)| on.then_some(prefix))
    .collect();
    if prefixes.is_empty() {
        return 0;
    }

    let mut added = 0_usize;
    let mut missing = Vec::new();
    for record_id in &config.records.hall_of_fame {
        let Some(record) = graph.items.get_mut(record_id) else {
            missing.push(record_id.to_string());
            continue;
        };
        for &prefix in &prefixes {
            let patcher = SlotPatcher::new(SlotMatch::Prefix(prefix), FilterScope::Every);
            added = added.saturating_add(patcher.patch_record(record, item));
        }
    }
    for record in missing {
        ctx.warn(
            item,
            WarningKind::MissingRecord {
                role: "hall of fame",
                record,
            },
        );
    }
    debug!(item = %item, filters = added, "Added to hall of fame");
    added
}

/// Permit `item` on the hideout poster slots.
pub fn add_to_poster_slots(ctx: &mut MergeContext<'_>, graph: &mut ContentGraph, item: &ItemId) -> usize {
    let config = ctx.config;
    patch_customization(ctx, graph, item, &config.slots.posters, "poster")
}

/// Permit `item` on the hideout statuette slots.
pub fn add_to_statuette_slots(ctx: &mut MergeContext<'_>, graph: &mut ContentGraph, item: &ItemId) -> usize {
    let config = ctx.config;
    patch_customization(ctx, graph, item, &config.slots.statuettes, "statuette")
}

fn patch_customization(
    ctx: &mut MergeContext<'_>,
    graph: &mut ContentGraph,
    item: &ItemId,
    names: &[String],
    kind: &'static str,
) -> usize {
    let config = ctx.config;
    let record_id = &config.records.hideout_customization;
    let Some(record) = graph.items.get_mut(record_id) else {
        let record = record_id.to_string();
        ctx.warn(
            item,
            WarningKind::MissingRecord {
                role: "hideout customization",
                record,
            },
        );
        return 0;
    };
    let added = SlotPatcher::new(SlotMatch::Named(names), FilterScope::Every).patch_record(record, item);
    debug!(item = %item, kind, filters = added, "Added to hideout customization slots");
    added
}

/// Accept `item` as fuel in every generator stage bonus that filters fuel.
pub fn add_to_generator(ctx: &mut MergeContext<'_>, graph: &mut ContentGraph, item: &ItemId) -> usize {
    let config = ctx.config;
    let area_id = &config.records.generator_area;
    let Some(area) = graph.hideout.areas.iter_mut().find(|a| a.id == *area_id) else {
        let record = area_id.clone();
        ctx.warn(
            item,
            WarningKind::MissingRecord {
                role: "generator area",
                record,
            },
        );
        return 0;
    };

    let mut added = 0_usize;
    let filters = area
        .stages
        .values_mut()
        .flat_map(|stage| stage.bonuses.iter_mut())
        .filter(|bonus| bonus.kind == ADDITIONAL_SLOTS)
        .filter_map(|bonus| bonus.filter.as_mut());
    for filter in filters {
        if !filter.contains(item) {
            filter.push(item.clone());
            added = added.saturating_add(1);
        }
    }
    debug!(item = %item, bonuses = added, "Added to generator fuel filter");
    added
}
