//! Merge configuration loaded from `graft.yaml`.
//!
//! Every field has a default matching the stock content ids and slot names,
//! so an empty file (or no file) yields a working configuration. The
//! `aliases` section extends or overrides the built-in alias tables.

use std::collections::BTreeMap;
use std::path::Path;

use graft_content::{AliasKind, AliasTables};
use graft_types::ItemId;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level merge configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MergeConfig {
    /// Run-level behaviour.
    #[serde(default)]
    pub merge: RunConfig,

    /// Well-known record ids the patchers target.
    #[serde(default)]
    pub records: RecordsConfig,

    /// Slot names the fixed patchers match.
    #[serde(default)]
    pub slots: SlotsConfig,

    /// Loot placement parameters.
    #[serde(default)]
    pub loot: LootConfig,

    /// Alias table additions per kind.
    #[serde(default)]
    pub aliases: BTreeMap<AliasKind, BTreeMap<String, String>>,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MergeConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Built-in alias tables extended with the `aliases` section.
    pub fn alias_tables(&self) -> AliasTables {
        let mut tables = AliasTables::builtin();
        for (kind, entries) in &self.aliases {
            tables.extend(*kind, entries.clone());
        }
        tables
    }
}

/// Run-level behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Abort the whole run on the first descriptor failure.
    #[serde(default)]
    pub fail_fast: bool,
}

/// Well-known record ids.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecordsConfig {
    /// The default player inventory template.
    #[serde(default = "default_inventory")]
    pub default_inventory: ItemId,

    /// Hall-of-fame templates.
    #[serde(default = "default_hall_of_fame")]
    pub hall_of_fame: Vec<ItemId>,

    /// Hideout customization template holding poster and statuette slots.
    #[serde(default = "default_hideout_customization")]
    pub hideout_customization: ItemId,

    /// Hideout area id of the generator.
    #[serde(default = "default_generator_area")]
    pub generator_area: String,

    /// Prototype of slots created by a slot patch.
    #[serde(default = "default_slot_proto")]
    pub default_slot_proto: String,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            default_inventory: default_inventory(),
            hall_of_fame: default_hall_of_fame(),
            hideout_customization: default_hideout_customization(),
            generator_area: default_generator_area(),
            default_slot_proto: default_slot_proto(),
        }
    }
}

/// Slot names used by the fixed slot patchers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SlotsConfig {
    /// Special slot names.
    #[serde(default = "default_special_slots")]
    pub special: Vec<String>,

    /// Hideout poster slot names.
    #[serde(default = "default_poster_slots")]
    pub posters: Vec<String>,

    /// Hideout statuette slot names.
    #[serde(default = "default_statuette_slots")]
    pub statuettes: Vec<String>,

    /// Prefix of small hall-of-fame trophy slots.
    #[serde(default = "default_small_trophies")]
    pub hall_of_fame_small: String,

    /// Prefix of big hall-of-fame trophy slots.
    #[serde(default = "default_big_trophies")]
    pub hall_of_fame_big: String,

    /// Prefix of hall-of-fame dogtag slots.
    #[serde(default = "default_dogtag")]
    pub hall_of_fame_dogtag: String,

    /// Bot equipment slots holding weapons.
    #[serde(default = "default_weapon_equipment")]
    pub weapon_equipment: Vec<String>,
}

impl Default for SlotsConfig {
    fn default() -> Self {
        Self {
            special: default_special_slots(),
            posters: default_poster_slots(),
            statuettes: default_statuette_slots(),
            hall_of_fame_small: default_small_trophies(),
            hall_of_fame_big: default_big_trophies(),
            hall_of_fame_dogtag: default_dogtag(),
            weapon_equipment: default_weapon_equipment(),
        }
    }
}

/// Loot placement parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LootConfig {
    /// Probability of a tag rule or static container without one.
    #[serde(default = "default_probability")]
    pub default_probability: f64,

    /// Spawn template prefix of poster points.
    #[serde(default = "default_poster_prefix")]
    pub poster_prefix: String,

    /// Relative probability of injected posters.
    #[serde(default = "default_poster_probability")]
    pub poster_probability: f64,

    /// Prefix of generated forced-spawn template names.
    #[serde(default = "default_forced_prefix")]
    pub forced_template_prefix: String,

    /// Probability of a forced spawn without one.
    #[serde(default = "default_forced_probability")]
    pub forced_probability: f64,

    /// Asset bundle path of new items; `{id}` is replaced by the item id.
    #[serde(default = "default_asset_path")]
    pub asset_path_template: String,
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            default_probability: default_probability(),
            poster_prefix: default_poster_prefix(),
            poster_probability: default_poster_probability(),
            forced_template_prefix: default_forced_prefix(),
            forced_probability: default_forced_probability(),
            asset_path_template: default_asset_path(),
        }
    }
}

impl LootConfig {
    /// Default asset path of `item`.
    pub fn asset_path(&self, item: &str) -> String {
        self.asset_path_template.replace("{id}", item)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_inventory() -> ItemId {
    ItemId::from("55d7217a4bdc2d86028b456d")
}

fn default_hall_of_fame() -> Vec<ItemId> {
    vec![
        ItemId::from("63dbd45917fff4dee40fe16e"),
        ItemId::from("65424185a57eea37ed6562e9"),
        ItemId::from("6542435ea57eea37ed6562f0"),
    ]
}

fn default_hideout_customization() -> ItemId {
    ItemId::from("673c7b00cbf4b984b5099181")
}

fn default_generator_area() -> String {
    "5d3b396e33c48f02b81cd9f3".to_owned()
}

fn default_slot_proto() -> String {
    "55d30c4c4bdc2db4468b457e".to_owned()
}

fn default_special_slots() -> Vec<String> {
    to_strings(&["SpecialSlot1", "SpecialSlot2", "SpecialSlot3"])
}

fn default_poster_slots() -> Vec<String> {
    to_strings(&[
        "Poster_Security_1",
        "Poster_Security_2",
        "Poster_Generator_1",
        "Poster_Generator_2",
        "Poster_ScavCase_1",
        "Poster_ScavCase_2",
        "Poster_Stash_1",
        "Poster_WaterCloset_1",
        "Poster_ShootingRange_1",
        "Poster_Workbench_1",
        "Poster_IntelligenceCenter_1",
        "Poster_Kitchen_1",
        "Poster_MedStation_1",
        "Poster_AirFilteringUnit_1",
        "Poster_RestSpace_1",
        "Poster_RestSpace_2",
        "Poster_RestSpace_3",
        "Poster_RestSpace_4",
        "Poster_Heating_1",
        "Poster_Heating_2",
        "Poster_Heating_3",
        "Poster_Gym_1",
        "Poster_Gym_2",
        "Poster_Gym_3",
        "Poster_Gym_4",
        "Poster_Gym_5",
        "Poster_Gym_6",
        "Poster_Security_3",
        "Poster_ShootingRange_2",
    ])
}

fn default_statuette_slots() -> Vec<String> {
    to_strings(&[
        "Statuette_Gym_1",
        "Statuette_PlaceOfFame_1",
        "Statuette_PlaceOfFame_2",
        "Statuette_PlaceOfFame_3",
        "Statuette_Heating_1",
        "Statuette_Heating_2",
        "Statuette_Library_1",
        "Statuette_Library_2",
        "Statuette_RestSpace_1",
        "Statuette_RestSpace_2",
        "Statuette_MedStation_1",
        "Statuette_MedStation_2",
        "Statuette_Kitchen_1",
        "Statuette_Kitchen_2",
        "Statuette_BoozeGenerator_1",
        "Statuette_Workbench_1",
        "Statuette_IntelligenceCenter_1",
        "Statuette_ShootingRange_1",
    ])
}

fn default_small_trophies() -> String {
    "smallTrophies".to_owned()
}

fn default_big_trophies() -> String {
    "bigTrophies".to_owned()
}

fn default_dogtag() -> String {
    "dogtag".to_owned()
}

fn default_weapon_equipment() -> Vec<String> {
    to_strings(&["FirstPrimaryWeapon", "SecondPrimaryWeapon", "Holster"])
}

const fn default_probability() -> f64 {
    10.0
}

fn default_poster_prefix() -> String {
    "flyer".to_owned()
}

const fn default_poster_probability() -> f64 {
    50.0
}

fn default_forced_prefix() -> String {
    "QuestItem".to_owned()
}

const fn default_forced_probability() -> f64 {
    1.0
}

fn default_asset_path() -> String {
    "customItems/{id}.bundle".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn to_strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| (*n).to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_stock_content() {
        let config = MergeConfig::default();
        assert!(!config.merge.fail_fast);
        assert_eq!(config.records.hall_of_fame.len(), 3);
        assert_eq!(config.slots.posters.len(), 29);
        assert_eq!(config.slots.statuettes.len(), 18);
        assert_eq!(config.loot.poster_prefix, "flyer");
        assert_eq!(config.loot.asset_path("abc"), "customItems/abc.bundle");
    }

    #[test]
    fn parse_empty_yaml() {
        let config = MergeConfig::parse("");
        assert!(config.is_ok());
        assert_eq!(config.ok(), Some(MergeConfig::default()));
    }

    #[test]
    fn parse_partial_yaml() {
        let yaml = r"
merge:
  fail_fast: true
loot:
  poster_probability: 25
aliases:
  trader:
    euphoria: 68dc881f8b8d06213dd8a700
  map:
    Terminal: terminal
logging:
  level: debug
";
        let config = MergeConfig::parse(yaml);
        assert!(config.is_ok(), "config should parse: {config:?}");
        let config = config.unwrap_or_default();
        assert!(config.merge.fail_fast);
        assert!((config.loot.poster_probability - 25.0).abs() < f64::EPSILON);
        assert_eq!(config.loot.forced_template_prefix, "QuestItem");
        assert_eq!(config.logging.level, "debug");

        let tables = config.alias_tables();
        assert_eq!(tables.resolve(AliasKind::Trader, "euphoria"), "68dc881f8b8d06213dd8a700");
        assert_eq!(tables.resolve(AliasKind::Trader, "prapor"), "54cb50c76803fa8b248b4571");
        assert!(tables.resolve_map("terminal").is_some());
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let config = MergeConfig::parse("merge: [unclosed");
        assert!(matches!(config, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn from_file_reads_yaml() {
        let dir = tempfile::TempDir::new();
        assert!(dir.is_ok());
        let Ok(dir) = dir else { return };
        let path = dir.path().join("graft.yaml");
        assert!(std::fs::write(&path, "merge:\n  fail_fast: true\n").is_ok());
        let config = MergeConfig::from_file(&path);
        assert!(config.is_ok_and(|c| c.merge.fail_fast));
    }
}
