//! Design-token synchronization engine.
//!
//! Takes a parsed interchange document and a mapping configuration and
//! reconciles them against a design-system backend:
//!
//! - **Resolver** — layers a theme's (or an explicit list's) token sets
//!   into a deterministic node pool
//! - **Converter** — chases reference chains into fully resolved tokens
//! - **Differ** — classifies the pool against remote state as
//!   create/update/delete by stable path+name identity
//! - **Tree merger** — folds incoming tokens into the remote group
//!   hierarchy and emits the minimal structural change
//! - **Engine** — sequences the above across mapping rules, base values
//!   first and theme overrides second, via async [`DataProvider`] and
//!   [`TokenWriter`] collaborators
//!
//! # Architecture
//!
//! ```text
//!            SyncEngine
//!                |
//!   +--------+---+----+--------+
//!   |        |        |        |
//! resolver converter differ   tree
//!   |        |
//! tokens-parser   tokens-model
//! ```

pub mod config;
pub mod converter;
pub mod differ;
pub mod engine;
pub mod error;
pub mod provider;
pub mod resolver;
pub mod tree;

pub use config::{SyncConfiguration, SyncMode, SyncSettings, TokenMapping};
pub use converter::{ProcessedTokenNode, convert_nodes, identity_key};
pub use differ::{TokenDiff, existing_token_key, make_tokens_diff};
pub use engine::{ChangeKind, EventSink, RuleOutcome, SyncEngine, SyncEvent, SyncReport};
pub use error::{Error, Result};
pub use provider::{DataProvider, TokenWritePayload, TokenWriter, WriteResult};
pub use resolver::{resolve_mapping_nodes, resolve_theme_nodes};
pub use tree::{GroupMerge, GroupTreeMerger, make_group_merge};
