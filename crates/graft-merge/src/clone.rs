//! Item clone synthesis and instantiation.
//!
//! [`synthesize`] turns a descriptor into a [`CloneSpec`]: alias-resolved
//! base template, base class and handbook category, plus the property
//! overrides with the asset reference always filled in. An [`ItemCloner`]
//! then instantiates the spec in the graph. [`TemplateCloner`] is the stock
//! implementation: it deep-copies the base template and registers handbook,
//! price and locale entries for the new id.

use std::collections::BTreeMap;

use graft_content::{AliasKind, AliasTables, ContentGraph};
use graft_types::{ItemDescriptor, ItemId, ItemProps, LocaleStrings};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::config::LootConfig;
use crate::error::MergeError;

/// Everything needed to instantiate a new item from a base template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CloneSpec {
    /// The new item id.
    pub new_id: ItemId,
    /// Resolved base template.
    pub clone_from: ItemId,
    /// Resolved base class.
    pub parent_id: ItemId,
    /// Resolved handbook category.
    pub handbook_parent_id: String,
    /// Property overrides, `Prefab` always present.
    pub overrides: Map<String, Value>,
    /// Flea market price.
    pub flea_price: Option<f64>,
    /// Handbook price.
    pub handbook_price: Option<f64>,
    /// Display strings per language.
    pub locales: BTreeMap<String, LocaleStrings>,
}

/// Build the clone spec for `new_id`.
pub fn synthesize(
    descriptor: &ItemDescriptor,
    new_id: &ItemId,
    aliases: &AliasTables,
    loot: &LootConfig,
) -> CloneSpec {
    let mut overrides = descriptor.override_properties.clone().unwrap_or_default();
    let path = overrides
        .get("Prefab")
        .and_then(|prefab| prefab.get("path"))
        .and_then(Value::as_str)
        .filter(|path| !path.is_empty())
        .map_or_else(|| loot.asset_path(new_id.as_str()), str::to_owned);
    overrides.insert("Prefab".to_owned(), json!({ "path": path, "rcid": "" }));

    CloneSpec {
        new_id: new_id.clone(),
        clone_from: ItemId::from(aliases.resolve(AliasKind::Item, &descriptor.item_tpl_to_clone)),
        parent_id: ItemId::from(aliases.resolve(AliasKind::BaseClass, &descriptor.parent_id)),
        handbook_parent_id: aliases
            .resolve(AliasKind::HandbookCategory, &descriptor.handbook_parent_id)
            .to_owned(),
        overrides,
        flea_price: descriptor.flea_price_roubles,
        handbook_price: descriptor.handbook_price_roubles,
        locales: descriptor.locales.clone(),
    }
}

/// Whether instantiation created the item or found it already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneOutcome {
    /// A new template was inserted.
    Created,
    /// The id already existed; the record was kept as is.
    AlreadyPresent,
}

/// Instantiates a [`CloneSpec`] in the content graph.
pub trait ItemCloner {
    /// Create the item described by `spec`.
    fn instantiate(
        &self,
        spec: &CloneSpec,
        graph: &mut ContentGraph,
    ) -> Result<CloneOutcome, MergeError>;
}

/// Deep-copies the base template and registers handbook, price and locales.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateCloner;

impl ItemCloner for TemplateCloner {
    fn instantiate(
        &self,
        spec: &CloneSpec,
        graph: &mut ContentGraph,
    ) -> Result<CloneOutcome, MergeError> {
        let outcome = if graph.has_item(spec.new_id.as_str()) {
            debug!(item = %spec.new_id, "Item already present, keeping record");
            CloneOutcome::AlreadyPresent
        } else {
            let mut template = graph
                .item(spec.clone_from.as_str())
                .cloned()
                .ok_or_else(|| MergeError::MissingTemplate {
                    item: spec.new_id.clone(),
                    template: spec.clone_from.to_string(),
                })?;
            template.id = spec.new_id.clone();
            if !spec.parent_id.is_empty() {
                template.parent = spec.parent_id.clone();
            }
            template.props = merge_props(&template.props, &spec.overrides)
                .map_err(|source| MergeError::InvalidOverrides {
                    item: spec.new_id.clone(),
                    source,
                })?;
            graph.items.insert(spec.new_id.clone(), template);
            debug!(item = %spec.new_id, from = %spec.clone_from, "Cloned item template");
            CloneOutcome::Created
        };

        graph.upsert_handbook(
            &spec.new_id,
            &spec.handbook_parent_id,
            spec.handbook_price.unwrap_or_default(),
        );
        if let Some(price) = spec.flea_price {
            graph.prices.insert(spec.new_id.clone(), price);
        }
        write_locales(spec, graph);
        Ok(outcome)
    }
}

/// Shallow-merge `overrides` into a copy of `props`.
fn merge_props(props: &ItemProps, overrides: &Map<String, Value>) -> Result<ItemProps, serde_json::Error> {
    let mut merged = match serde_json::to_value(props)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    serde_json::from_value(Value::Object(merged))
}

/// Write `{id} Name`, `{id} ShortName` and `{id} Description` for every
/// language the graph carries, falling back to `en` and then to the first
/// supplied language.
fn write_locales(spec: &CloneSpec, graph: &mut ContentGraph) {
    let fallback = spec
        .locales
        .get("en")
        .or_else(|| spec.locales.values().next());
    let Some(fallback) = fallback else {
        return;
    };
    let languages: Vec<String> = if graph.locales.is_empty() {
        spec.locales.keys().cloned().collect()
    } else {
        graph.locales.keys().cloned().collect()
    };
    let id = spec.new_id.as_str();
    for lang in languages {
        let strings = spec.locales.get(&lang).unwrap_or(fallback);
        graph.set_locale(&lang, format!("{id} Name"), strings.name.clone());
        graph.set_locale(&lang, format!("{id} ShortName"), strings.short_name.clone());
        graph.set_locale(&lang, format!("{id} Description"), strings.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn spec_for(raw: Value) -> CloneSpec {
        let descriptor = fixtures::descriptor(raw);
        synthesize(
            &descriptor,
            &ItemId::from("new_item"),
            &AliasTables::builtin(),
            &LootConfig::default(),
        )
    }

    #[test]
    fn synthesize_resolves_aliases_and_fills_prefab() {
        let spec = spec_for(json!({
            "itemTplToClone": "M4A1",
            "parentId": "ASSAULT_RIFLE",
            "handbookParentId": "custom-category",
            "overrideProperties": { "Weight": 2.5 }
        }));
        assert_eq!(spec.clone_from, "5447a9cd4bdc2dbd208b4567");
        assert_eq!(spec.parent_id, "5447b5f14bdc2d61278b4567");
        assert_eq!(spec.handbook_parent_id, "custom-category");
        assert_eq!(
            spec.overrides.get("Prefab"),
            Some(&json!({ "path": "customItems/new_item.bundle", "rcid": "" }))
        );
        assert!(spec.overrides.contains_key("Weight"));
    }

    #[test]
    fn synthesize_keeps_supplied_prefab_path_without_overrides_block() {
        let spec = spec_for(json!({
            "itemTplToClone": "x",
            "overrideProperties": { "Prefab": { "path": "assets/custom.bundle", "rcid": "abc" } }
        }));
        assert_eq!(
            spec.overrides.get("Prefab"),
            Some(&json!({ "path": "assets/custom.bundle", "rcid": "" }))
        );

        let bare = spec_for(json!({ "itemTplToClone": "x" }));
        assert_eq!(bare.overrides.len(), 1);
    }

    #[test]
    fn template_cloner_copies_and_registers() {
        let mut graph = fixtures::graph();
        let spec = spec_for(json!({
            "itemTplToClone": "rifle",
            "parentId": "newparent",
            "handbookParentId": "cat",
            "handbookPriceRoubles": 25000,
            "fleaPriceRoubles": 30000,
            "overrideProperties": { "ammoCaliber": "Caliber9x19PARA" },
            "locales": { "en": { "name": "New", "shortName": "N", "description": "A new item" } }
        }));
        let outcome = TemplateCloner.instantiate(&spec, &mut graph);
        assert!(matches!(outcome, Ok(CloneOutcome::Created)));

        let created = graph.item("new_item").cloned().unwrap_or_default();
        assert_eq!(created.parent, "newparent");
        assert_eq!(created.props.ammo_caliber.as_deref(), Some("Caliber9x19PARA"));
        assert!(created.slot("mod_muzzle").is_some());
        assert_eq!(
            created.props.prefab.map(|p| p.path),
            Some("customItems/new_item.bundle".to_owned())
        );
        assert!(graph.handbook.items.iter().any(|e| e.id == "new_item" && e.parent_id == "cat"));
        assert!(graph.prices.contains_key("new_item"));
        for lang in ["en", "ru"] {
            let name = graph.locales.get(lang).and_then(|l| l.get("new_item Name"));
            assert_eq!(name.map(String::as_str), Some("New"));
        }
    }

    #[test]
    fn missing_base_template_is_an_error() {
        let mut graph = fixtures::graph();
        let spec = spec_for(json!({ "itemTplToClone": "nope" }));
        let outcome = TemplateCloner.instantiate(&spec, &mut graph);
        assert!(matches!(outcome, Err(MergeError::MissingTemplate { .. })));
        assert!(!graph.has_item("new_item"));
    }

    #[test]
    fn ill_typed_overrides_are_an_error() {
        let mut graph = fixtures::graph();
        let spec = spec_for(json!({
            "itemTplToClone": "rifle",
            "overrideProperties": { "Slots": "not a list" }
        }));
        let outcome = TemplateCloner.instantiate(&spec, &mut graph);
        assert!(matches!(outcome, Err(MergeError::InvalidOverrides { .. })));
    }

    #[test]
    fn existing_item_is_kept() {
        let mut graph = fixtures::graph();
        let spec = spec_for(json!({ "itemTplToClone": "rifle" }));
        assert!(TemplateCloner.instantiate(&spec, &mut graph).is_ok());
        if let Some(item) = graph.item_mut("new_item") {
            item.name = "edited".to_owned();
        }
        let outcome = TemplateCloner.instantiate(&spec, &mut graph);
        assert!(matches!(outcome, Ok(CloneOutcome::AlreadyPresent)));
        assert_eq!(graph.item("new_item").map(|i| i.name.as_str()), Some("edited"));
        assert_eq!(graph.handbook.items.iter().filter(|e| e.id == "new_item").count(), 1);
    }
}
