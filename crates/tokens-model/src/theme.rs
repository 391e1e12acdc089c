//! Token theme entity

use serde::{Deserialize, Serialize};

use crate::token::Token;

/// A named override layer on top of a brand's base token values.
///
/// Overridden tokens carry the base token's identity with the theme's
/// value; tokens the theme does not override fall through to the base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenTheme {
    /// Backend-assigned identity
    pub id: String,
    /// Brand the theme belongs to
    pub brand_id: String,
    /// Human-readable theme name
    pub name: String,
    /// Short code used in exports, when set
    #[serde(default)]
    pub code_name: Option<String>,
    /// Per-theme token values, keyed by base token identity
    #[serde(default)]
    pub overridden_tokens: Vec<Token>,
}

impl TokenTheme {
    /// Create an empty theme.
    pub fn new(id: impl Into<String>, brand_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            brand_id: brand_id.into(),
            name: name.into(),
            code_name: None,
            overridden_tokens: Vec::new(),
        }
    }

    /// Whether the given reference (an id or a name) selects this theme.
    pub fn matches(&self, reference: &str) -> bool {
        self.id == reference || self.name == reference
    }
}
