//! Hideout craft writer.

use graft_content::ContentGraph;
use serde_json::Value;
use tracing::debug;

/// Append `recipes` to the production table, skipping ids already present.
///
/// A recipe without an `_id` is skipped when an identical recipe is already
/// in the table. Returns the number of recipes added.
pub fn add_recipes(graph: &mut ContentGraph, recipes: &[Value]) -> usize {
    let table = &mut graph.hideout.production.recipes;
    let mut added = 0_usize;
    for recipe in recipes {
        let present = match recipe_id(recipe) {
            Some(id) => table.iter().any(|r| recipe_id(r) == Some(id)),
            None => table.contains(recipe),
        };
        if present {
            debug!(recipe = recipe_id(recipe).unwrap_or("<no id>"), "Recipe already present");
            continue;
        }
        table.push(recipe.clone());
        added = added.saturating_add(1);
    }
    debug!(added, total = table.len(), "Added hideout recipes");
    added
}

fn recipe_id(recipe: &Value) -> Option<&str> {
    recipe.get("_id").and_then(Value::as_str)
}
