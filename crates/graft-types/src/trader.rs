//! Trader records and their assortments.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::ids::ItemId;
use crate::item::ItemInstance;

/// A trader record in the `traders` collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trader {
    /// Stock offered by the trader.
    #[serde(default)]
    pub assort: TraderAssort,
    /// Fields the engine does not interpret (`base`, `questassort`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A trader's stock, prices and loyalty gates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraderAssort {
    /// Flat list of stocked item instances.
    #[serde(default)]
    pub items: Vec<ItemInstance>,
    /// Item id -> cost alternatives; each alternative is a list of costs.
    #[serde(default)]
    pub barter_scheme: BTreeMap<String, Vec<Vec<BarterCost>>>,
    /// Item id -> required loyalty tier.
    #[serde(default)]
    pub loyal_level_items: BTreeMap<String, u32>,
    /// Fields the engine does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TraderAssort {
    /// Whether the assortment already stocks `item` at the top level.
    pub fn stocks(&self, item: &str) -> bool {
        self.items
            .iter()
            .any(|i| i.tpl.as_str() == item && i.parent_id.as_deref() == Some("hideout"))
    }
}

/// A single `(currency or item, count)` cost.
///
/// The count is kept as the host wrote it, integer or fractional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarterCost {
    /// Amount required.
    pub count: Number,
    /// Currency or item template.
    #[serde(rename = "_tpl")]
    pub tpl: ItemId,
    /// Fields the engine does not interpret (`level`, `side`,
    /// `onlyFunctional`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BarterCost {
    /// A cost of `count` units of `tpl`.
    pub fn new(count: Number, tpl: ItemId) -> Self {
        Self {
            count,
            tpl,
            extra: Map::new(),
        }
    }
}
