//! Descriptor and craft document loading.
//!
//! Descriptor documents are JSON objects mapping new item ids to
//! descriptors. Documents are combined in order; a later document's entry
//! replaces an earlier entry with the same id. A document that is not an
//! object, or a descriptor that does not fit the descriptor shape, is skipped
//! with a [`LoadWarning`] while the rest of the batch loads.
//!
//! Craft documents hold hideout production recipes as a list, a
//! `{"recipes": [...]}` wrapper, or a single recipe object.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use graft_types::{DescriptorSet, ItemDescriptor, ItemId};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::ContentError;

/// File-name marker of descriptor files that are never loaded.
pub const EXCLUDED_MARKER: &str = "BaseItemReplacement";

/// A recoverable problem found while loading documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// A whole document was unreadable or had the wrong shape.
    MalformedDocument {
        /// Where the document came from.
        source: String,
        /// Why it was rejected.
        reason: String,
    },
    /// One descriptor inside a document did not parse.
    MalformedDescriptor {
        /// Where the document came from.
        source: String,
        /// The descriptor's item id.
        item: ItemId,
        /// Why it was rejected.
        reason: String,
    },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedDocument { source, reason } => {
                write!(f, "skipped document {source}: {reason}")
            }
            Self::MalformedDescriptor {
                source,
                item,
                reason,
            } => write!(f, "skipped descriptor {item} in {source}: {reason}"),
        }
    }
}

/// Descriptors loaded from a batch of documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorLoad {
    /// Combined descriptors keyed by item id.
    pub descriptors: DescriptorSet,
    /// Documents or descriptors that were skipped.
    pub warnings: Vec<LoadWarning>,
}

/// Recipes loaded from a batch of craft documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CraftLoad {
    /// Recipes in document order.
    pub recipes: Vec<Value>,
    /// Documents that were skipped.
    pub warnings: Vec<LoadWarning>,
}

/// Combine descriptor documents given as `(source, json text)` pairs.
pub fn combine<'a>(docs: impl IntoIterator<Item = (&'a str, &'a str)>) -> DescriptorLoad {
    let mut load = DescriptorLoad::default();
    for (source, text) in docs {
        let entries: BTreeMap<String, Value> = match serde_json::from_str(text) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(source, error = %e, "Skipping malformed descriptor document");
                load.warnings.push(LoadWarning::MalformedDocument {
                    source: source.to_owned(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        for (id, raw) in entries {
            let item = ItemId::from(id);
            match serde_json::from_value::<ItemDescriptor>(raw) {
                Ok(descriptor) => {
                    if load.descriptors.insert(item.clone(), descriptor).is_some() {
                        debug!(source, item = %item, "Descriptor replaces an earlier definition");
                    }
                }
                Err(e) => {
                    warn!(source, item = %item, error = %e, "Skipping malformed descriptor");
                    load.warnings.push(LoadWarning::MalformedDescriptor {
                        source: source.to_owned(),
                        item,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }
    load
}

/// Load every descriptor file (`*.json`) in `dir`, in file-name order.
///
/// Files whose name contains [`EXCLUDED_MARKER`] are ignored.
pub fn load_dir(dir: &Path) -> Result<DescriptorLoad, ContentError> {
    let files = json_files(dir)?;
    let mut warnings = Vec::new();
    let mut docs = Vec::with_capacity(files.len());
    for path in files {
        let name = file_name(&path);
        if name.contains(EXCLUDED_MARKER) {
            debug!(file = %name, "Skipping excluded descriptor file");
            continue;
        }
        match fs::read_to_string(&path) {
            Ok(text) => docs.push((name, text)),
            Err(e) => warnings.push(unreadable(&name, &e)),
        }
    }

    let mut load = combine(docs.iter().map(|(name, text)| (name.as_str(), text.as_str())));
    warnings.append(&mut load.warnings);
    load.warnings = warnings;
    info!(
        dir = %dir.display(),
        files = docs.len(),
        descriptors = load.descriptors.len(),
        skipped = load.warnings.len(),
        "Loaded item descriptors"
    );
    Ok(load)
}

/// Extract recipes from one craft document.
pub fn craft_recipes(doc: Value) -> Vec<Value> {
    match doc {
        Value::Array(recipes) => recipes,
        Value::Object(mut map) => match map.remove("recipes") {
            Some(Value::Array(recipes)) => recipes,
            Some(other) => {
                map.insert("recipes".to_owned(), other);
                vec![Value::Object(map)]
            }
            None => vec![Value::Object(map)],
        },
        _ => Vec::new(),
    }
}

/// Load every craft file (`*.json`) in `dir`, in file-name order.
pub fn load_crafts_dir(dir: &Path) -> Result<CraftLoad, ContentError> {
    let mut load = CraftLoad::default();
    for path in json_files(dir)? {
        let name = file_name(&path);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                load.warnings.push(unreadable(&name, &e));
                continue;
            }
        };
        match serde_json::from_str::<Value>(&text) {
            Ok(doc) => load.recipes.extend(craft_recipes(doc)),
            Err(e) => {
                warn!(file = %name, error = %e, "Skipping malformed craft document");
                load.warnings.push(LoadWarning::MalformedDocument {
                    source: name,
                    reason: e.to_string(),
                });
            }
        }
    }
    info!(dir = %dir.display(), recipes = load.recipes.len(), "Loaded hideout crafts");
    Ok(load)
}

fn json_files(dir: &Path) -> Result<Vec<PathBuf>, ContentError> {
    if !dir.is_dir() {
        return Err(ContentError::NotADirectory(dir.to_path_buf()));
    }
    let entries = fs::read_dir(dir).map_err(|e| ContentError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ContentError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

fn unreadable(name: &str, error: &std::io::Error) -> LoadWarning {
    warn!(file = %name, error = %error, "Skipping unreadable document");
    LoadWarning::MalformedDocument {
        source: name.to_owned(),
        reason: error.to_string(),
    }
}
