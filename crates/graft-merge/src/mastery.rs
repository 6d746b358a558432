//! Weapon mastery sections and weapon presets.

use graft_content::ContentGraph;
use graft_types::{ItemId, ItemInstance, Mastering, Preset, PresetSpec};
use tracing::debug;

/// Record type of weapon presets.
pub const PRESET_TYPE: &str = "Preset";

/// Add or extend mastery sections.
///
/// A section whose name already exists has its templates extended with the
/// ids it lacks; any other section is appended. Returns the number of
/// template ids added.
pub fn add_masteries(graph: &mut ContentGraph, item: &ItemId, sections: &[Mastering]) -> usize {
    let mastering = &mut graph.globals.config.mastering;
    let mut added = 0_usize;
    for section in sections {
        let existing = mastering.iter_mut().find(|m| m.name == section.name);
        if let Some(existing) = existing {
            for template in &section.templates {
                if !existing.templates.contains(template) {
                    existing.templates.push(template.clone());
                    added = added.saturating_add(1);
                }
            }
            debug!(item = %item, section = %section.name, "Extended mastery section");
        } else {
            let mut fresh = section.clone();
            fresh.templates.clear();
            for template in &section.templates {
                if !fresh.templates.contains(template) {
                    fresh.templates.push(template.clone());
                }
            }
            added = added.saturating_add(fresh.templates.len());
            mastering.push(fresh);
            debug!(item = %item, section = %section.name, "Added mastery section");
        }
    }
    added
}

/// Build a preset record from its descriptor form.
///
/// Components keep `parentId` and `slotId` only when supplied.
pub fn build_preset(spec: &PresetSpec) -> Preset {
    let supplied = |value: Option<&str>| value.filter(|v| !v.is_empty()).map(str::to_owned);
    Preset {
        change_weapon_name: spec.change_weapon_name,
        encyclopedia: spec.encyclopedia.clone().filter(|e| !e.is_empty()),
        id: spec.id.clone(),
        items: spec
            .items
            .iter()
            .map(|part| ItemInstance {
                id: part.id.clone(),
                tpl: part.tpl.clone(),
                parent_id: supplied(part.parent_id.as_deref()),
                slot_id: supplied(part.slot_id.as_deref()),
                ..ItemInstance::default()
            })
            .collect(),
        name: spec.name.clone(),
        parent: spec.parent.clone(),
        kind: PRESET_TYPE.to_owned(),
    }
}

/// Store presets under their ids, replacing earlier definitions.
pub fn add_presets(graph: &mut ContentGraph, item: &ItemId, presets: &[PresetSpec]) -> usize {
    for spec in presets {
        let preset = build_preset(spec);
        debug!(item = %item, preset = %preset.id, parts = preset.items.len(), "Stored weapon preset");
        graph.globals.item_presets.insert(preset.id.clone(), preset);
    }
    presets.len()
}
