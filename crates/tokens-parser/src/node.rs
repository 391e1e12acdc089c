//! Parsed node values and the shared path key function

use serde_json::Value;
use tokens_model::TokenType;

/// One leaf value from the interchange document.
///
/// Immutable once parsed. `path` is the chain of container names between
/// the owning set's root and the leaf's parent — the set key itself and
/// the leaf name are excluded. `root_key` records the owning set.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedNode {
    /// Id of the token set the node originates from
    pub root_key: String,
    /// Leaf name
    pub name: String,
    /// Container chain from set root to parent
    pub path: Vec<String>,
    /// Semantic token kind derived from the `type` field
    pub node_type: TokenType,
    /// Raw `type` string as written in the document
    pub raw_type: String,
    /// Literal value or a reference expression
    pub value: Value,
    pub description: Option<String>,
}

impl ParsedNode {
    /// Key identifying this node within a layered set pool.
    ///
    /// Full path plus name — two nodes layered from different sets
    /// collide (and the later one wins) exactly when this key matches.
    pub fn pool_key(&self) -> String {
        node_key(&self.path, &self.name)
    }

    /// The reference target, if the value is a reference expression.
    ///
    /// A value is a reference when, after trimming, it is longer than
    /// three characters and wrapped in braces: `{color.bg}` → `color.bg`.
    pub fn reference_target(&self) -> Option<&str> {
        let Value::String(raw) = &self.value else {
            return None;
        };
        let trimmed = raw.trim();
        if trimmed.len() > 3 && trimmed.starts_with('{') && trimmed.ends_with('}') {
            Some(&trimmed[1..trimmed.len() - 1])
        } else {
            None
        }
    }

    /// Whether the value defers to another node.
    pub fn is_reference(&self) -> bool {
        self.reference_target().is_some()
    }
}

/// Join a container path and a leaf name into a single stable key.
///
/// This is the one key function used by set layering, reference lookup
/// and diff identity throughout the SDK.
pub fn node_key(path: &[String], name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", path.join("/"), name)
    }
}
