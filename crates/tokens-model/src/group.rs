//! Token group entity

use serde::{Deserialize, Serialize};

use crate::token::TokenType;

/// A named container organizing tokens and subgroups into a hierarchy.
///
/// Within a brand and token type there is exactly one group with
/// `is_root` set, and every non-root group is reachable from it via
/// `children_ids`. Root groups are never a child of any element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenGroup {
    /// Backend-assigned identity
    pub id: String,
    /// Brand the group belongs to
    pub brand_id: String,
    /// Group name (folder name, not a path)
    pub name: String,
    /// Token kind this hierarchy holds
    pub token_type: TokenType,
    /// Whether this is the per-type root
    #[serde(default)]
    pub is_root: bool,
    /// Owning group; `None` for roots
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Ordered identities of contained tokens and subgroups
    #[serde(default)]
    pub children_ids: Vec<String>,
    /// Position among siblings; `None` sorts last
    #[serde(default)]
    pub sort_order: Option<i64>,
}

impl TokenGroup {
    /// Create an empty non-root group.
    pub fn new(
        id: impl Into<String>,
        brand_id: impl Into<String>,
        name: impl Into<String>,
        token_type: TokenType,
    ) -> Self {
        Self {
            id: id.into(),
            brand_id: brand_id.into(),
            name: name.into(),
            token_type,
            is_root: false,
            parent_id: None,
            children_ids: Vec::new(),
            sort_order: None,
        }
    }

    /// Create the root group for a brand and token type.
    pub fn new_root(id: impl Into<String>, brand_id: impl Into<String>, token_type: TokenType) -> Self {
        let mut group = Self::new(id, brand_id, token_type.display_name(), token_type);
        group.is_root = true;
        group
    }

    /// Copy of this group with a replaced children list.
    ///
    /// Groups are treated as persistent value records; tree merging never
    /// mutates remote-fetched instances in place.
    pub fn with_children(&self, children_ids: Vec<String>) -> Self {
        let mut group = self.clone();
        group.children_ids = children_ids;
        group
    }
}
