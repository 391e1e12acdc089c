//! Set and theme resolution
//!
//! Computes the deterministic node pool a mapping rule applies to: either
//! the layered union of a theme's selected sets, or the union of an
//! explicit set list. Later layers overwrite earlier nodes with the same
//! path+name key; a replaced node keeps its first-insertion position so
//! output order is stable across runs.

use std::collections::HashMap;

use tokens_parser::{DocumentTheme, ParsedDocument, ParsedNode, SetPriority, TokenSet};

use crate::config::TokenMapping;
use crate::error::{Error, Result};

/// Resolve the node pool for one mapping rule.
///
/// Fails with a `Compute` error naming the missing set or theme if a
/// referenced id cannot be resolved.
pub fn resolve_mapping_nodes(
    mapping: &TokenMapping,
    document: &ParsedDocument,
) -> Result<Vec<ParsedNode>> {
    if let Some(theme_reference) = &mapping.tokens_theme {
        let theme = document
            .theme(theme_reference)
            .ok_or_else(|| Error::compute(format!("Unknown tokens theme '{}'", theme_reference)))?;
        resolve_theme_nodes(theme, document)
    } else if let Some(set_names) = &mapping.token_sets {
        let mut sets = Vec::with_capacity(set_names.len());
        for name in set_names {
            let set = document
                .set(name)
                .ok_or_else(|| Error::compute(format!("Unknown token set '{}'", name)))?;
            sets.push(set);
        }
        Ok(layer_sets(&sets))
    } else {
        // Unreachable after configuration validation
        Err(Error::compute(
            "Mapping rule binds neither token sets nor a theme",
        ))
    }
}

/// Resolve a theme's node pool.
///
/// Layering order: all `source` sets in document order, then all
/// `enabled` sets in document order. `disabled` sets are excluded before
/// resolution, so a disabled reference to a missing set is not an error.
pub fn resolve_theme_nodes(
    theme: &DocumentTheme,
    document: &ParsedDocument,
) -> Result<Vec<ParsedNode>> {
    let mut sets = Vec::new();
    for priority in [SetPriority::Source, SetPriority::Enabled] {
        for selection in theme.selections_with(priority) {
            let set_id = selection.set_id.as_ref().ok_or_else(|| {
                Error::compute(format!(
                    "Theme '{}' selects unknown token set '{}'",
                    theme.name, selection.set_name
                ))
            })?;
            let set = document.set(set_id).ok_or_else(|| {
                Error::compute(format!(
                    "Theme '{}' selects unknown token set '{}'",
                    theme.name, set_id
                ))
            })?;
            sets.push(set);
        }
    }
    tracing::debug!(theme = %theme.name, layers = sets.len(), "Resolved theme layering");
    Ok(layer_sets(&sets))
}

/// Layer sets in order; later sets win on key collision.
///
/// Output holds at most one node per key. A winning node takes the slot
/// of the node it replaces, keeping pool order deterministic.
fn layer_sets(sets: &[&TokenSet]) -> Vec<ParsedNode> {
    let mut pool: Vec<ParsedNode> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for set in sets {
        for node in &set.contains {
            let key = node.pool_key();
            match index.get(&key) {
                Some(&slot) => pool[slot] = node.clone(),
                None => {
                    index.insert(key, pool.len());
                    pool.push(node.clone());
                }
            }
        }
    }
    pool
}
