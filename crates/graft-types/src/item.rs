//! Item templates, slots, filters and item instances.
//!
//! Field names follow the host's JSON schema (`_id`, `_props`, `Slots`, ...).
//! Every struct keeps fields the engine does not interpret in a flattened
//! `extra` map so that records survive a merge round trip untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::ids::ItemId;

/// An item template in the content graph's `items` collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemTemplate {
    /// Template identifier.
    #[serde(rename = "_id")]
    pub id: ItemId,
    /// Internal name.
    #[serde(rename = "_name", default)]
    pub name: String,
    /// Parent (base-class) identifier.
    #[serde(rename = "_parent", default)]
    pub parent: ItemId,
    /// Record type, `Item` or `Node`.
    #[serde(rename = "_type", default)]
    pub kind: String,
    /// Item properties.
    #[serde(rename = "_props", default)]
    pub props: ItemProps,
    /// Fields the engine does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItemTemplate {
    /// Whether this template exposes any attachment slots.
    pub fn has_slots(&self) -> bool {
        !self.props.slots().is_empty()
    }

    /// Find a slot by exact name.
    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.props.slots().iter().find(|s| s.name == name)
    }
}

/// The `_props` bundle of an item template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemProps {
    /// Attachment slots. `None` when the record has no `Slots` key, which
    /// is kept apart from an empty list so writes reproduce the host shape.
    #[serde(rename = "Slots", default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<Vec<Slot>>,
    /// Weapon chambers (slot-shaped, filters list accepted ammo).
    #[serde(rename = "Chambers", default, skip_serializing_if = "Option::is_none")]
    pub chambers: Option<Vec<Slot>>,
    /// Ammunition caliber for weapons.
    #[serde(rename = "ammoCaliber", default, skip_serializing_if = "Option::is_none")]
    pub ammo_caliber: Option<String>,
    /// Asset bundle reference.
    #[serde(rename = "Prefab", default, skip_serializing_if = "Option::is_none")]
    pub prefab: Option<Prefab>,
    /// Fields the engine does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItemProps {
    /// Attachment slots, empty when the key is absent.
    pub fn slots(&self) -> &[Slot] {
        self.slots.as_deref().unwrap_or_default()
    }

    /// Mutable attachment slots, creating the list when absent.
    pub fn slots_mut(&mut self) -> &mut Vec<Slot> {
        self.slots.get_or_insert_with(Vec::new)
    }

    /// Weapon chambers, empty when the key is absent.
    pub fn chambers(&self) -> &[Slot] {
        self.chambers.as_deref().unwrap_or_default()
    }
}

/// Asset bundle reference of an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefab {
    /// Bundle path.
    #[serde(default)]
    pub path: String,
    /// Resource id inside the bundle.
    #[serde(default)]
    pub rcid: String,
}

/// A named attachment point on an item template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Slot identifier.
    #[serde(rename = "_id", default)]
    pub id: String,
    /// Slot name, e.g. `mod_muzzle`.
    #[serde(rename = "_name")]
    pub name: String,
    /// Owning template.
    #[serde(rename = "_parent", default)]
    pub parent: ItemId,
    /// Slot properties holding the filters.
    #[serde(rename = "_props", default)]
    pub props: SlotProps,
    /// Whether the slot must be filled.
    #[serde(rename = "_required", default)]
    pub required: bool,
    /// Whether the slot merges with child slots.
    #[serde(rename = "_mergeSlotWithChildren", default)]
    pub merge_slot_with_children: bool,
    /// Prototype (behavior) reference.
    #[serde(rename = "_proto", default)]
    pub proto: String,
}

impl Slot {
    /// Create an empty slot with a single empty filter.
    pub fn new(id: impl Into<String>, name: impl Into<String>, parent: ItemId, proto: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent,
            props: SlotProps {
                filters: vec![SlotFilter::default()],
                extra: Map::new(),
            },
            required: false,
            merge_slot_with_children: false,
            proto: proto.into(),
        }
    }

    /// Ensure the slot carries at least one filter.
    pub fn ensure_filter(&mut self) {
        if self.props.filters.is_empty() {
            self.props.filters.push(SlotFilter::default());
        }
    }

    /// Permit `item` in the first filter, creating it if absent.
    ///
    /// Returns `true` when the id was inserted, `false` when it was already
    /// permitted.
    pub fn permit(&mut self, item: &ItemId) -> bool {
        if let Some(first) = self.props.filters.first_mut() {
            return first.insert(item);
        }
        let mut filter = SlotFilter::default();
        filter.filter.push(item.clone());
        self.props.filters.push(filter);
        true
    }

    /// Permit `item` in every filter, creating one if the slot has none.
    ///
    /// Returns the number of filters the id was inserted into.
    pub fn permit_everywhere(&mut self, item: &ItemId) -> usize {
        self.ensure_filter();
        self.props
            .filters
            .iter_mut()
            .map(|f| f.insert(item))
            .filter(|added| *added)
            .count()
    }

    /// Whether the first filter already accepts `item`.
    pub fn first_filter_accepts(&self, item: &str) -> bool {
        self.props.filters.first().is_some_and(|f| f.contains(item))
    }

    /// Iterate over every id permitted by any filter, in filter order.
    pub fn permitted(&self) -> impl Iterator<Item = &ItemId> {
        self.props.filters.iter().flat_map(|f| f.filter.iter())
    }
}

/// The `_props` bundle of a slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotProps {
    /// Filters gating which items the slot accepts.
    #[serde(default)]
    pub filters: Vec<SlotFilter>,
    /// Fields the engine does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An ordered set of permitted item ids plus optional animation metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotFilter {
    /// Permitted item ids. Never contains duplicates after engine writes.
    #[serde(rename = "Filter", default)]
    pub filter: Vec<ItemId>,
    /// Positional shift applied when attached.
    #[serde(rename = "Shift", default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<Number>,
    /// Animation index used when attached.
    #[serde(rename = "AnimationIndex", default, skip_serializing_if = "Option::is_none")]
    pub animation_index: Option<i64>,
    /// Fields the engine does not interpret (`locked`, `ExcludedFilter`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SlotFilter {
    /// Whether the filter permits `item`.
    pub fn contains(&self, item: &str) -> bool {
        self.filter.iter().any(|id| id.as_str() == item)
    }

    /// Append `item` unless already present. Returns whether it was added.
    pub fn insert(&mut self, item: &ItemId) -> bool {
        if self.contains(item.as_str()) {
            return false;
        }
        self.filter.push(item.clone());
        true
    }
}

/// A concrete item instance (trader stock, loot entry, preset component).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemInstance {
    /// Instance identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Template of the instance.
    #[serde(rename = "_tpl")]
    pub tpl: ItemId,
    /// Parent instance, when attached.
    #[serde(rename = "parentId", default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Slot on the parent, when attached.
    #[serde(rename = "slotId", default, skip_serializing_if = "Option::is_none")]
    pub slot_id: Option<String>,
    /// Stack / stock metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upd: Option<ItemUpd>,
    /// Fields the engine does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItemInstance {
    /// A single loose item with a stack count of one.
    pub fn single(id: impl Into<String>, tpl: ItemId) -> Self {
        Self {
            id: id.into(),
            tpl,
            upd: Some(ItemUpd {
                stack_objects_count: Some(1),
                ..ItemUpd::default()
            }),
            ..Self::default()
        }
    }
}

/// The `upd` block of an item instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemUpd {
    /// Stack size.
    #[serde(rename = "StackObjectsCount", default, skip_serializing_if = "Option::is_none")]
    pub stack_objects_count: Option<u64>,
    /// Whether a trader stocks the item without limit.
    #[serde(rename = "UnlimitedCount", default, skip_serializing_if = "Option::is_none")]
    pub unlimited_count: Option<bool>,
    /// Fields the engine does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
