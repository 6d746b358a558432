//! Trader assortment writer.

use graft_content::{AliasKind, AliasTables, ContentGraph};
use graft_types::{BarterCost, CostSpec, ItemDescriptor, ItemId, ItemInstance, ItemUpd};
use tracing::debug;

use crate::context::MergeContext;
use crate::error::MergeError;
use crate::report::WarningKind;

/// Parent and slot of items a trader sells directly.
pub const STOCK_PARENT: &str = "hideout";

/// Stock `item` at the descriptor's trader, rebuild its barter scheme and
/// set its loyalty tier.
///
/// Cost references are resolved before the trader is touched, so an
/// unresolvable reference leaves the assortment unchanged. A trader that is
/// not in the graph is reported and skipped. Returns the number of stock
/// entries appended.
pub fn add_to_trader(
    ctx: &mut MergeContext<'_>,
    graph: &mut ContentGraph,
    item: &ItemId,
    descriptor: &ItemDescriptor,
) -> Result<usize, MergeError> {
    let trader_id = ctx
        .aliases
        .resolve(AliasKind::Trader, &descriptor.trader_id)
        .to_owned();
    if !graph.traders.contains_key(trader_id.as_str()) {
        ctx.warn(item, WarningKind::MissingTrader { trader: trader_id });
        return Ok(0);
    }

    let scheme = descriptor
        .barter_scheme
        .iter()
        .map(|cost| resolve_cost(ctx.aliases, graph, item, cost).map(|c| vec![c]))
        .collect::<Result<Vec<_>, _>>()?;

    let Some(trader) = graph.traders.get_mut(trader_id.as_str()) else {
        return Ok(0);
    };
    let assort = &mut trader.assort;
    let mut stocked = 0_usize;
    if assort.stocks(item.as_str()) {
        debug!(item = %item, trader = %trader_id, "Trader already stocks item");
    } else {
        for (index, stock) in descriptor.trader_items.iter().enumerate() {
            let id = if index == 0 {
                item.to_string()
            } else {
                ctx.keys.key()
            };
            assort.items.push(ItemInstance {
                id,
                tpl: item.clone(),
                parent_id: Some(STOCK_PARENT.to_owned()),
                slot_id: Some(STOCK_PARENT.to_owned()),
                upd: Some(ItemUpd {
                    unlimited_count: Some(stock.unlimited_count),
                    stack_objects_count: Some(stock.stack_objects_count),
                    ..ItemUpd::default()
                }),
                ..ItemInstance::default()
            });
            stocked = stocked.saturating_add(1);
        }
    }

    let alternatives = scheme.len();
    assort.barter_scheme.insert(item.to_string(), scheme);
    assort
        .loyal_level_items
        .insert(item.to_string(), descriptor.loyal_level_items);
    debug!(
        item = %item,
        trader = %trader_id,
        stocked,
        alternatives,
        loyalty = descriptor.loyal_level_items,
        "Updated trader assortment"
    );
    Ok(stocked)
}

/// Resolve a cost reference: currency alias, then item alias, then a known
/// item id.
fn resolve_cost(
    aliases: &AliasTables,
    graph: &ContentGraph,
    item: &ItemId,
    cost: &CostSpec,
) -> Result<BarterCost, MergeError> {
    let tpl = aliases
        .lookup(AliasKind::Currency, &cost.tpl)
        .or_else(|| aliases.lookup(AliasKind::Item, &cost.tpl))
        .or_else(|| graph.has_item(&cost.tpl).then_some(cost.tpl.as_str()))
        .ok_or_else(|| MergeError::UnresolvedBarterReference {
            item: item.clone(),
            reference: cost.tpl.clone(),
        })?;
    Ok(BarterCost::new(cost.count.clone(), ItemId::from(tpl)))
}
