//! Domain entities for the design-token synchronization SDK.
//!
//! This crate defines the persistent objects the synchronization engine
//! reads from and writes to the design-system backend:
//!
//! - [`Brand`] — namespace partitioning tokens within a design system
//! - [`Token`] — a named design value with a stable identity
//! - [`TokenGroup`] — a named container organizing tokens into a hierarchy
//! - [`TokenTheme`] — an override layer carrying per-theme token values
//! - [`TreeElement`] — tagged union over tokens and groups for tree work
//!
//! All identities are opaque strings owned by the backend; freshly created
//! objects receive a uuid v4 via [`generate_id`]. This crate performs no I/O.

pub mod brand;
pub mod element;
pub mod group;
pub mod theme;
pub mod token;

pub use brand::Brand;
pub use element::TreeElement;
pub use group::TokenGroup;
pub use theme::TokenTheme;
pub use token::{Token, TokenType};

/// Generate a fresh identity for a newly created token or group.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
