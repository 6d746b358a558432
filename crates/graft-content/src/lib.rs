//! Content graph and input handling for the Graft merge engine.
//!
//! This crate owns everything the engine needs before a merge can run: the
//! in-memory [`ContentGraph`], the identifier [`AliasTables`] descriptors
//! are resolved through, and loading of descriptor and craft documents.
//!
//! # Modules
//!
//! - [`graph`] -- The content graph and its JSON (de)serialization
//! - [`aliases`] -- Name -> id alias tables with pass-through resolution
//! - [`loader`] -- Descriptor and craft document loading
//! - [`error`] -- Error types for content I/O

pub mod aliases;
pub mod error;
pub mod graph;
pub mod loader;

pub use aliases::{AliasKind, AliasTables, normalize_map_name};
pub use error::ContentError;
pub use graph::{ContentGraph, Locales};
pub use loader::{
    CraftLoad, DescriptorLoad, LoadWarning, combine, craft_recipes, load_crafts_dir, load_dir,
};
