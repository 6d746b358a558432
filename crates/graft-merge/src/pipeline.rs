//! The two-phase merge run.
//!
//! 1. **Structure** -- for every descriptor in id order: synthesize and
//!    instantiate the clone, then run each enabled patcher in a fixed order
//!    (static loot, mod slots, inventory slots, masteries, presets, trader,
//!    special slots, hall of fame, poster slots, statuette slots, poster
//!    placement, tag placement, generator, forced spawns, slot patch).
//!
//! 2. **Bots** -- for every descriptor with `addtoBots` that did not fail,
//!    derive bot loadouts. This runs only after every item is in the graph so
//!    mod propagation sees all new slot filters.
//!
//! A descriptor whose structural phase fails is recorded in the report and
//! the run moves on, unless `merge.fail_fast` is set.

use graft_content::{AliasTables, ContentGraph};
use graft_types::{DescriptorSet, Feature, ItemDescriptor, ItemId};
use tracing::{debug, error, info};

use crate::bots;
use crate::clone::{self, CloneOutcome, ItemCloner, TemplateCloner};
use crate::config::MergeConfig;
use crate::context::MergeContext;
use crate::error::MergeError;
use crate::forced;
use crate::keys::{KeyGenerator, TimeOrderedKeys};
use crate::loot;
use crate::mastery;
use crate::report::{MergeReport, WarningKind};
use crate::slots::{fixed, mods, patch};
use crate::trader;

/// A configured merge engine.
pub struct Merger {
    config: MergeConfig,
    aliases: AliasTables,
    keys: Box<dyn KeyGenerator>,
    cloner: Box<dyn ItemCloner>,
}

impl Merger {
    /// An engine using `config`, its alias tables, time-ordered keys and the
    /// template cloner.
    pub fn new(config: MergeConfig) -> Self {
        let aliases = config.alias_tables();
        Self {
            config,
            aliases,
            keys: Box::new(TimeOrderedKeys),
            cloner: Box::new(TemplateCloner),
        }
    }

    /// Replace the key generator.
    #[must_use]
    pub fn with_keys(mut self, keys: impl KeyGenerator + 'static) -> Self {
        self.keys = Box::new(keys);
        self
    }

    /// Replace the item cloner.
    #[must_use]
    pub fn with_cloner(mut self, cloner: impl ItemCloner + 'static) -> Self {
        self.cloner = Box::new(cloner);
        self
    }

    /// Replace the alias tables.
    #[must_use]
    pub fn with_aliases(mut self, aliases: AliasTables) -> Self {
        self.aliases = aliases;
        self
    }

    /// The engine's configuration.
    pub const fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Merge every descriptor into `graph`.
    ///
    /// # Errors
    ///
    /// With `merge.fail_fast` set, returns the first descriptor failure.
    /// Otherwise failures are collected in the report.
    pub fn merge(
        &mut self,
        descriptors: &DescriptorSet,
        graph: &mut ContentGraph,
    ) -> Result<MergeReport, MergeError> {
        let mut report = MergeReport::default();
        let mut ctx = MergeContext {
            config: &self.config,
            aliases: &self.aliases,
            keys: self.keys.as_mut(),
            report: &mut report,
        };
        info!(descriptors = descriptors.len(), "Merge starting");

        // --- Phase 1: Structure ---
        for (item, descriptor) in descriptors {
            match merge_structure(&mut ctx, self.cloner.as_ref(), graph, item, descriptor) {
                Ok(()) => ctx.report.items_merged = ctx.report.items_merged.saturating_add(1),
                Err(e) => {
                    error!(item = %item, error = %e, "Descriptor failed");
                    if ctx.config.merge.fail_fast {
                        return Err(e);
                    }
                    ctx.report.failures.push(e);
                }
            }
        }

        // --- Phase 2: Bots ---
        for (item, descriptor) in descriptors {
            if !descriptor.add_to_bots || ctx.report.failed(item.as_str()) {
                continue;
            }
            let derived = bots::derive_bot_loadouts(&mut ctx, graph, item, descriptor);
            debug!(
                item = %item,
                archetypes = derived.archetypes,
                weights = derived.weights,
                mods = derived.mods,
                ammo = derived.ammo,
                "Bot derivation finished"
            );
        }

        info!(
            merged = report.items_merged,
            warnings = report.warnings.len(),
            failures = report.failures.len(),
            "Merge complete"
        );
        Ok(report)
    }
}

impl Default for Merger {
    fn default() -> Self {
        Self::new(MergeConfig::default())
    }
}

/// Merge `descriptors` into `graph` with the default configuration.
///
/// # Errors
///
/// Never fails with the default configuration; see [`Merger::merge`].
pub fn merge(descriptors: &DescriptorSet, graph: &mut ContentGraph) -> Result<MergeReport, MergeError> {
    Merger::default().merge(descriptors, graph)
}

/// Clone the item and run every enabled structural patcher.
fn merge_structure(
    ctx: &mut MergeContext<'_>,
    cloner: &dyn ItemCloner,
    graph: &mut ContentGraph,
    item: &ItemId,
    descriptor: &ItemDescriptor,
) -> Result<(), MergeError> {
    for key in descriptor.unrecognized.keys() {
        ctx.warn(item, WarningKind::UnrecognizedKey { key: key.clone() });
    }

    let spec = clone::synthesize(descriptor, item, ctx.aliases, &ctx.config.loot);
    let outcome = cloner.instantiate(&spec, graph)?;
    if outcome == CloneOutcome::Created {
        info!(item = %item, from = %spec.clone_from, "Created item");
    }

    for feature in descriptor.enabled_features() {
        let touched = match feature {
            Feature::StaticLoot => loot::add_to_static_loot(ctx, graph, item, descriptor),
            Feature::ModSlots => mods::add_to_mod_slots(ctx, graph, item, descriptor),
            Feature::InventorySlots => mods::add_to_inventory_slots(ctx, graph, item, descriptor),
            Feature::Masteries => mastery::add_masteries(graph, item, &descriptor.mastery_sections),
            Feature::Presets => mastery::add_presets(graph, item, &descriptor.weapon_presets),
            Feature::Trader => trader::add_to_trader(ctx, graph, item, descriptor)?,
            Feature::SpecialSlots => mods::add_to_special_slots(ctx, graph, item),
            Feature::HallOfFame => fixed::add_to_hall_of_fame(ctx, graph, item, descriptor),
            Feature::PosterSlots => fixed::add_to_poster_slots(ctx, graph, item),
            Feature::StatuetteSlots => fixed::add_to_statuette_slots(ctx, graph, item),
            Feature::PosterPlacement => loot::place_posters(ctx, graph, item),
            Feature::LootLocations => loot::place_by_tags(ctx, graph, item, &descriptor.loot_location),
            Feature::Generator => fixed::add_to_generator(ctx, graph, item),
            Feature::ForcedSpawns => forced::add_forced_spawns(
                ctx,
                graph,
                item,
                &descriptor.quest_location,
                descriptor.quest_template_prefix.as_deref(),
            ),
            Feature::SlotPatch => descriptor
                .slot_patch
                .as_ref()
                .map_or(0, |p| patch::apply_slot_patch(ctx, graph, item, p)),
            Feature::Bots => continue,
        };
        debug!(item = %item, feature = ?feature, touched, "Applied feature");
    }
    Ok(())
}
