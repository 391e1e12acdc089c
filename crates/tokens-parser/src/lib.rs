//! Interchange-format token document parser.
//!
//! Parses a nested, loosely-typed design-token document into flat,
//! path-addressed [`ParsedNode`]s, [`TokenSet`]s and [`DocumentTheme`]s.
//! Reference expressions (`{color.bg}`) are detected but not resolved
//! here — that is the converter's job in `tokens-sync`.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tokens_parser::parse_document;
//!
//! let document = json!({
//!     "colors": {
//!         "primary": { "value": "#112233", "type": "color" }
//!     },
//!     "$themes": []
//! });
//! let parsed = parse_document(&document).unwrap();
//! assert_eq!(parsed.sets.len(), 1);
//! assert_eq!(parsed.nodes[0].name, "primary");
//! ```

pub mod document;
pub mod error;
pub mod node;
pub mod theme;

pub use document::{ParsedDocument, TokenSet, parse_document};
pub use error::{Error, Result};
pub use node::{ParsedNode, node_key};
pub use theme::{DocumentTheme, SetPriority, ThemeSelection};
