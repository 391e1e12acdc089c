//! Remote data access and write collaborators
//!
//! The engine never talks to a backend directly; it consumes these async
//! traits. Implementations map their transport failures onto
//! [`Error::Request`]/[`Error::Response`] so the taxonomy survives the
//! boundary unmodified.
//!
//! [`Error::Request`]: crate::Error::Request
//! [`Error::Response`]: crate::Error::Response

use async_trait::async_trait;
use tokens_model::{Brand, Token, TokenGroup, TokenTheme};

use crate::Result;

/// Read access to a brand's remote state.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Brands of one design system.
    async fn fetch_brands(&self, design_system_id: &str) -> Result<Vec<Brand>>;

    /// All tokens of a brand.
    async fn fetch_tokens(&self, brand_id: &str) -> Result<Vec<Token>>;

    /// All token groups of a brand, roots included.
    async fn fetch_token_groups(&self, brand_id: &str) -> Result<Vec<TokenGroup>>;

    /// All themes of a brand.
    async fn fetch_themes(&self, brand_id: &str) -> Result<Vec<TokenTheme>>;
}

/// Everything one `write_tokens` call persists for a brand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenWritePayload {
    /// Tokens to create or update, parents assigned
    pub tokens: Vec<Token>,
    /// Groups to create or update, children lists rewritten
    pub groups: Vec<TokenGroup>,
    /// Tokens whose keys disappeared from the incoming pool
    pub tokens_to_delete: Vec<Token>,
    /// Groups left empty after token deletion (see group merge policy)
    pub groups_to_delete: Vec<TokenGroup>,
}

impl TokenWritePayload {
    /// Whether the payload carries any change at all.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
            && self.groups.is_empty()
            && self.tokens_to_delete.is_empty()
            && self.groups_to_delete.is_empty()
    }
}

/// Confirmation of a persisted write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteResult {
    pub tokens_written: usize,
    pub groups_written: usize,
    pub tokens_deleted: usize,
    pub groups_deleted: usize,
}

/// Write access to a brand's remote state.
///
/// The engine does not retry; a rejected write aborts the run.
#[async_trait]
pub trait TokenWriter: Send + Sync {
    /// Persist token and group changes for one brand.
    async fn write_tokens(&self, brand_id: &str, payload: &TokenWritePayload)
    -> Result<WriteResult>;

    /// Persist a theme, including its overridden tokens.
    async fn write_theme(&self, theme: &TokenTheme) -> Result<WriteResult>;
}
