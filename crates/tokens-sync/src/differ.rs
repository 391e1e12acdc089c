//! Token diffing
//!
//! Classifies an incoming processed pool against a brand's existing
//! tokens as creates, updates and deletes. Identity is the path+name key:
//! renaming a token or moving it to a different path is classified as
//! delete+create, not update. That is an intentional simplification of
//! the matching model, asserted as such in tests.

use std::collections::{HashMap, HashSet};

use tokens_model::{Token, TokenGroup, TokenType, generate_id};
use tokens_parser::node_key;

use crate::config::SyncSettings;
use crate::converter::ProcessedTokenNode;

/// Classification of one incoming pool against the existing pool.
///
/// `to_create` and `to_update` are disjoint; `to_delete` is disjoint from
/// both; `to_create_or_update` is exactly their union. Incoming tokens
/// whose matched existing content is unchanged appear nowhere — that is
/// what makes a re-run of an unchanged document a fixed point.
#[derive(Debug, Clone, Default)]
pub struct TokenDiff {
    pub to_create: Vec<ProcessedTokenNode>,
    pub to_update: Vec<ProcessedTokenNode>,
    pub to_delete: Vec<Token>,
    pub to_create_or_update: Vec<ProcessedTokenNode>,
}

impl TokenDiff {
    /// Whether nothing changed.
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }
}

/// Identity key of an existing token, reconstructed from the remote tree.
///
/// Walks the parent chain collecting non-root ancestor group names in
/// root-to-leaf order, then appends the token's own name. Root groups are
/// excluded — they stand for the implicit category, which the incoming
/// identity key also drops.
pub fn existing_token_key(token: &Token, groups_by_id: &HashMap<&str, &TokenGroup>) -> String {
    let mut ancestors = Vec::new();
    let mut parent = token.parent_id.as_deref();
    while let Some(parent_id) = parent {
        match groups_by_id.get(parent_id) {
            Some(group) if !group.is_root => {
                ancestors.push(group.name.clone());
                parent = group.parent_id.as_deref();
            }
            _ => break,
        }
    }
    ancestors.reverse();
    node_key(&ancestors, &token.name)
}

/// Diff the incoming pool against the existing one.
///
/// Matched incoming tokens inherit the existing token's identity, version
/// identity and sibling position; changed content classifies them as
/// updates. Unmatched incoming tokens receive a fresh identity and become
/// creates. Existing tokens with no incoming counterpart become deletes.
pub fn make_tokens_diff(
    existing: &[Token],
    existing_groups: &[TokenGroup],
    extracted: &[ProcessedTokenNode],
    settings: &SyncSettings,
) -> TokenDiff {
    let groups_by_id: HashMap<&str, &TokenGroup> = existing_groups
        .iter()
        .map(|group| (group.id.as_str(), group))
        .collect();

    let existing_by_key: HashMap<(TokenType, String), &Token> = existing
        .iter()
        .map(|token| {
            (
                (token.token_type, existing_token_key(token, &groups_by_id)),
                token,
            )
        })
        .collect();

    let mut diff = TokenDiff::default();
    let mut seen_keys: HashSet<(TokenType, String)> = HashSet::new();

    for node in extracted {
        let map_key = (node.token.token_type, node.key.clone());
        seen_keys.insert(map_key.clone());

        let mut node = node.clone();
        match existing_by_key.get(&map_key) {
            Some(current) => {
                node.token.id = current.id.clone();
                node.token.version_id = current.version_id.clone();
                node.token.sort_order = current.sort_order;
                if content_changed(current, &node.token, settings) {
                    diff.to_update.push(node.clone());
                    diff.to_create_or_update.push(node);
                }
            }
            None => {
                node.token.id = generate_id();
                diff.to_create.push(node.clone());
                diff.to_create_or_update.push(node);
            }
        }
    }

    for token in existing {
        let map_key = (
            token.token_type,
            existing_token_key(token, &groups_by_id),
        );
        if !seen_keys.contains(&map_key) {
            diff.to_delete.push(token.clone());
        }
    }

    tracing::debug!(
        created = diff.to_create.len(),
        updated = diff.to_update.len(),
        deleted = diff.to_delete.len(),
        "Computed token diff"
    );
    diff
}

/// Whether an incoming token's content differs from the matched existing
/// token. Descriptions only participate when `precise_copy` is set.
fn content_changed(current: &Token, incoming: &Token, settings: &SyncSettings) -> bool {
    if current.value != incoming.value || current.token_type != incoming.token_type {
        return true;
    }
    settings.precise_copy && current.description != incoming.description
}
