//! Brand entity

use serde::{Deserialize, Serialize};

/// A namespace partitioning tokens, components and assets within one
/// design-system version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    /// Backend-assigned identity
    pub id: String,
    /// Human-readable brand name
    pub name: String,
    /// Version the brand belongs to, when known
    #[serde(default)]
    pub design_system_version_id: Option<String>,
}

impl Brand {
    /// Create a brand with just an identity and a name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            design_system_version_id: None,
        }
    }

    /// Whether the given reference (an id or a name) selects this brand.
    pub fn matches(&self, reference: &str) -> bool {
        self.id == reference || self.name == reference
    }
}
