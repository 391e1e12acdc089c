//! Token document traversal
//!
//! Walks a nested interchange document into flat [`ParsedNode`]s grouped
//! into [`TokenSet`]s, plus the theme definitions under `$themes`.

use serde_json::Value;
use tokens_model::TokenType;

use crate::error::{Error, Result};
use crate::node::{ParsedNode, node_key};
use crate::theme::{DocumentTheme, parse_theme};

/// Keys starting with this character are document metadata, not sets.
const RESERVED_PREFIX: char = '$';
/// Top-level key listing theme definitions.
const THEMES_KEY: &str = "$themes";
/// Top-level key carrying document metadata (`tokenSetOrder`).
const METADATA_KEY: &str = "$metadata";

/// A named collection of parsed nodes sharing one top-level document key.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSet {
    /// Set id — the top-level key
    pub id: String,
    /// Set name — identical to the id
    pub name: String,
    /// Nodes parsed from this set, in document order
    pub contains: Vec<ParsedNode>,
}

/// Everything extracted from one interchange document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    /// All nodes across all sets, in document order
    pub nodes: Vec<ParsedNode>,
    /// Token sets, in document order
    pub sets: Vec<TokenSet>,
    /// Theme definitions from `$themes`
    pub themes: Vec<DocumentTheme>,
    /// Informational set ordering from `$metadata.tokenSetOrder`
    pub set_order: Vec<String>,
}

impl ParsedDocument {
    /// Find a set by id or name.
    pub fn set(&self, reference: &str) -> Option<&TokenSet> {
        self.sets
            .iter()
            .find(|set| set.id == reference || set.name == reference)
    }

    /// Find a theme by id or name.
    pub fn theme(&self, reference: &str) -> Option<&DocumentTheme> {
        self.themes.iter().find(|theme| theme.matches(reference))
    }
}

/// Parse a raw interchange document.
///
/// Every top-level key not starting with `$` becomes a [`TokenSet`];
/// `$metadata` and `$themes` are handled specially and all other
/// `$`-prefixed keys are skipped, at any depth.
pub fn parse_document(document: &Value) -> Result<ParsedDocument> {
    let root = document.as_object().ok_or(Error::RootNotObject)?;

    let mut sets = Vec::new();
    for (key, subtree) in root {
        if key.starts_with(RESERVED_PREFIX) {
            continue;
        }
        let mut contains = Vec::new();
        collect_nodes(key, subtree, &mut Vec::new(), &mut contains)?;
        sets.push(TokenSet {
            id: key.clone(),
            name: key.clone(),
            contains,
        });
    }

    let set_order = root
        .get(METADATA_KEY)
        .and_then(|metadata| metadata.get("tokenSetOrder"))
        .and_then(Value::as_array)
        .map(|order| {
            order
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let mut themes = Vec::new();
    if let Some(raw_themes) = root.get(THEMES_KEY) {
        let raw_themes = raw_themes.as_array().ok_or_else(|| Error::UnsupportedNode {
            path: THEMES_KEY.to_string(),
        })?;
        for raw in raw_themes {
            themes.push(parse_theme(raw, &sets)?);
        }
    }

    let nodes: Vec<ParsedNode> = sets.iter().flat_map(|set| set.contains.clone()).collect();

    // A node's root key always names its owning set by construction;
    // kept as a parse-level guarantee for downstream consumers.
    for node in &nodes {
        if !sets.iter().any(|set| set.id == node.root_key) {
            return Err(Error::UnknownRootKey {
                path: node_key(&node.path, &node.name),
                root_key: node.root_key.clone(),
            });
        }
    }

    tracing::debug!(
        sets = sets.len(),
        nodes = nodes.len(),
        themes = themes.len(),
        "Parsed token document"
    );

    Ok(ParsedDocument {
        nodes,
        sets,
        themes,
        set_order,
    })
}

/// Recursive set walk.
///
/// A subtree is a leaf when it is an object carrying both `value` and
/// `type`; any other object is a container and recursion continues with
/// its key appended to the running path. Reserved-prefix keys are
/// skipped. Anything that is neither is an unsupported shape.
fn collect_nodes(
    set_id: &str,
    subtree: &Value,
    path: &mut Vec<String>,
    out: &mut Vec<ParsedNode>,
) -> Result<()> {
    let object = match subtree.as_object() {
        Some(object) => object,
        None => {
            let mut segments = vec![set_id.to_string()];
            segments.extend_from_slice(path);
            return Err(Error::UnsupportedNode {
                path: segments.join("/"),
            });
        }
    };

    for (key, child) in object {
        if key.starts_with(RESERVED_PREFIX) {
            continue;
        }
        match child.as_object() {
            Some(fields) if fields.contains_key("value") && fields.contains_key("type") => {
                let raw_type = fields
                    .get("type")
                    .and_then(Value::as_str)
                    .ok_or_else(|| Error::InvalidNodeType {
                        path: leaf_path(set_id, path, key),
                    })?;
                out.push(ParsedNode {
                    root_key: set_id.to_string(),
                    name: key.clone(),
                    path: path.clone(),
                    node_type: TokenType::from_raw(raw_type),
                    raw_type: raw_type.to_string(),
                    value: fields.get("value").cloned().unwrap_or(Value::Null),
                    description: fields
                        .get("description")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                });
            }
            Some(_) => {
                path.push(key.clone());
                let result = collect_nodes(set_id, child, path, out);
                path.pop();
                result?;
            }
            None => {
                return Err(Error::UnsupportedNode {
                    path: leaf_path(set_id, path, key),
                });
            }
        }
    }
    Ok(())
}

fn leaf_path(set_id: &str, path: &[String], key: &str) -> String {
    let mut segments = vec![set_id.to_string()];
    segments.extend_from_slice(path);
    segments.push(key.to_string());
    segments.join("/")
}
