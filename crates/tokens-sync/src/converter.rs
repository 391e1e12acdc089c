//! Node-to-token conversion
//!
//! Turns a resolved node pool into domain tokens, chasing reference
//! expressions until every chain bottoms out in a literal value. Identity
//! assignment is deferred to the differ.

use std::collections::HashMap;

use serde_json::Value;
use tokens_model::Token;
use tokens_parser::{ParsedNode, node_key};

use crate::error::{Error, Result};

/// A converted token together with its document path and identity key.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedTokenNode {
    /// Domain token; `id` stays empty until the differ assigns identity
    pub token: Token,
    /// Full container path from the set root (leading category included)
    pub path: Vec<String>,
    /// Identity key used for matching across sync runs
    pub key: String,
}

/// Identity key for a token at `path` named `name`.
///
/// The leading path segment denotes the implicit category root and root
/// groups never appear in a token's parent chain, so the identity drops
/// it — otherwise a key reconstructed from the remote tree could never
/// match and every run would classify everything as create+delete.
///
/// Consequence: two same-type tokens whose paths differ only in the
/// leading segment share one identity and resolve to the same remote
/// token. The differ pins this collapse in its tests.
pub fn identity_key(path: &[String], name: &str) -> String {
    let tail = if path.is_empty() { path } else { &path[1..] };
    node_key(tail, name)
}

/// Convert a resolved node pool into processed tokens.
///
/// Atomic nodes convert immediately; referenced nodes resolve in repeated
/// passes against the pool of already-resolved values. A pass that makes
/// no progress while nodes remain means the leftovers have dangling or
/// cyclic references, which is fatal.
pub fn convert_nodes(brand_id: &str, nodes: &[ParsedNode]) -> Result<Vec<ProcessedTokenNode>> {
    let mut resolved: HashMap<String, Value> = HashMap::new();
    let mut output = Vec::with_capacity(nodes.len());
    let mut pending: Vec<(&ParsedNode, String)> = Vec::new();

    for node in nodes {
        match node.reference_target() {
            Some(target) => pending.push((node, target.to_string())),
            None => {
                resolved.insert(node.pool_key(), node.value.clone());
                output.push(processed(brand_id, node, node.value.clone()));
            }
        }
    }

    while !pending.is_empty() {
        let mut unresolved = Vec::new();
        let mut progressed = false;

        for (node, target) in pending {
            match resolved.get(&reference_key(&target)) {
                Some(value) => {
                    let value = value.clone();
                    resolved.insert(node.pool_key(), value.clone());
                    output.push(processed(brand_id, node, value));
                    progressed = true;
                }
                None => unresolved.push((node, target)),
            }
        }

        if !progressed && !unresolved.is_empty() {
            let keys: Vec<String> = unresolved
                .iter()
                .map(|(node, target)| format!("{} -> {{{}}}", node.pool_key(), target))
                .collect();
            return Err(Error::compute(format!(
                "Unresolvable token references (dangling or cyclic): {}",
                keys.join(", ")
            )));
        }
        pending = unresolved;
    }

    tracing::debug!(brand = brand_id, tokens = output.len(), "Converted node pool");
    Ok(output)
}

/// Pool key a reference expression points at: `a.b.c` → `a/b/c`.
fn reference_key(target: &str) -> String {
    target.split('.').collect::<Vec<_>>().join("/")
}

fn processed(brand_id: &str, node: &ParsedNode, value: Value) -> ProcessedTokenNode {
    let mut token = Token::new(brand_id, node.name.clone(), node.node_type, value);
    token.description = node.description.clone();
    ProcessedTokenNode {
        key: identity_key(&node.path, &node.name),
        path: node.path.clone(),
        token,
    }
}
