//! Group tree building and merging
//!
//! Rebuilds the hierarchical group structure implied by incoming token
//! paths, folds it into an id-indexed working copy of the existing remote
//! tree, and emits the minimal set of structural changes. The working
//! arena is rebuilt fresh per merge call and never aliases the
//! remote-fetched collections; originals are not mutated.

use std::collections::HashMap;

use tokens_model::{Token, TokenGroup, TokenType, TreeElement, generate_id};

use crate::converter::ProcessedTokenNode;

/// Minimal structural change to a brand's group trees.
///
/// Only groups appear in the three change lists — tokens carry no
/// children, so their membership is fully described by their parents'
/// rewritten children lists. `tokens` returns the incoming tokens with
/// parents assigned from the merged tree, in incoming order.
#[derive(Debug, Clone, Default)]
pub struct GroupMerge {
    /// Synthesized groups, deepest first
    pub to_create: Vec<TokenGroup>,
    /// Existing groups whose ordered children changed
    pub to_update: Vec<TokenGroup>,
    /// Non-root groups emptied by this run's token deletions
    pub to_delete: Vec<TokenGroup>,
    /// Incoming tokens, parents assigned
    pub tokens: Vec<Token>,
}

impl GroupMerge {
    /// Whether no structural change is needed.
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }
}

/// Working tree node: a copied element plus its ordered children.
#[derive(Debug)]
struct WorkNode {
    element: TreeElement,
    /// Ordered child identities; only groups have any
    children: Vec<String>,
    /// Synthesized during this merge rather than fetched
    created: bool,
}

/// One merge pass over a brand's group trees.
///
/// Owns its arena exclusively for its duration; discarded after diffing.
pub struct GroupTreeMerger {
    brand_id: String,
    arena: HashMap<String, WorkNode>,
    /// Root group per token type, in first-seen order
    roots: Vec<(TokenType, String)>,
    /// Original ordered children of every existing group
    baseline: HashMap<String, Vec<String>>,
}

impl GroupTreeMerger {
    /// Build the working tree from a brand's flat element pool.
    ///
    /// Children are derived from the parent-id back-references and sorted
    /// by `sort_order` ascending; elements without one sort last, keeping
    /// their pool order among themselves. Root groups are never anyone's
    /// child.
    pub fn new(brand_id: &str, existing_tokens: &[Token], existing_groups: &[TokenGroup]) -> Self {
        let mut arena: HashMap<String, WorkNode> = HashMap::new();
        let mut roots: Vec<(TokenType, String)> = Vec::new();

        for group in existing_groups {
            if group.is_root && !roots.iter().any(|(t, _)| *t == group.token_type) {
                roots.push((group.token_type, group.id.clone()));
            }
            arena.insert(
                group.id.clone(),
                WorkNode {
                    element: TreeElement::Group(group.clone()),
                    children: Vec::new(),
                    created: false,
                },
            );
        }
        for token in existing_tokens {
            arena.insert(
                token.id.clone(),
                WorkNode {
                    element: TreeElement::Token(token.clone()),
                    children: Vec::new(),
                    created: false,
                },
            );
        }

        let mut by_parent: HashMap<String, Vec<(String, Option<i64>)>> = HashMap::new();
        for group in existing_groups {
            if group.is_root {
                continue;
            }
            if let Some(parent_id) = &group.parent_id {
                by_parent
                    .entry(parent_id.clone())
                    .or_default()
                    .push((group.id.clone(), group.sort_order));
            }
        }
        for token in existing_tokens {
            if let Some(parent_id) = &token.parent_id {
                by_parent
                    .entry(parent_id.clone())
                    .or_default()
                    .push((token.id.clone(), token.sort_order));
            }
        }
        for (parent_id, mut entries) in by_parent {
            entries.sort_by_key(|(_, sort_order)| sort_order.unwrap_or(i64::MAX));
            if let Some(parent) = arena.get_mut(&parent_id) {
                parent.children = entries.into_iter().map(|(id, _)| id).collect();
            }
        }

        let baseline = existing_groups
            .iter()
            .map(|group| {
                let children = arena
                    .get(&group.id)
                    .map(|node| node.children.clone())
                    .unwrap_or_default();
                (group.id.clone(), children)
            })
            .collect();

        Self {
            brand_id: brand_id.to_string(),
            arena,
            roots,
            baseline,
        }
    }

    /// Fold one incoming token into the working tree.
    ///
    /// The leading path segment denotes the implicit category root and is
    /// not a real folder; the walk starts below the per-type root with
    /// the remaining segments. An empty path attaches the token directly
    /// to the type root.
    pub fn fold_token(&mut self, node: &ProcessedTokenNode) {
        let token_type = node.token.token_type;
        let mut current = self.ensure_root(token_type);
        let segments = if node.path.is_empty() {
            &node.path[..]
        } else {
            &node.path[1..]
        };
        for name in segments {
            current = self.ensure_group(&current, name, token_type);
        }
        self.attach_token(&current, &node.token);
    }

    /// Remove deleted tokens and cascade-delete the groups they empty.
    ///
    /// Policy: a non-root group left with zero children by this run's
    /// deletions is deleted, and the cascade continues upward through
    /// parents emptied by that deletion. Root groups and groups that
    /// were already empty before the run are untouched.
    pub fn prune_deleted(&mut self, deleted: &[Token]) -> Vec<TokenGroup> {
        let mut removed_groups = Vec::new();
        for token in deleted {
            let mut target = Some(token.id.clone());
            while let Some(id) = target.take() {
                let Some(node) = self.arena.remove(&id) else {
                    break;
                };
                let parent_id = node.element.parent_id().map(str::to_string);
                if let TreeElement::Group(group) = node.element {
                    removed_groups.push(group);
                }
                if let Some(parent_id) = parent_id
                    && let Some(parent) = self.arena.get_mut(&parent_id)
                {
                    parent.children.retain(|child| *child != id);
                    let emptied = parent.children.is_empty()
                        && !parent.created
                        && parent.element.as_group().is_some_and(|group| !group.is_root);
                    if emptied {
                        target = Some(parent_id);
                    }
                }
            }
        }
        removed_groups
    }

    /// Bottom-up structural comparison of the whole working tree.
    pub fn into_merge(self, incoming: &[ProcessedTokenNode], deleted_groups: Vec<TokenGroup>) -> GroupMerge {
        let mut merge = GroupMerge {
            to_delete: deleted_groups,
            ..GroupMerge::default()
        };
        for (_, root_id) in &self.roots {
            self.compare(root_id, &mut merge);
        }
        merge.tokens = incoming
            .iter()
            .filter_map(|node| {
                self.arena
                    .get(&node.token.id)
                    .and_then(|work| work.element.as_token().cloned())
            })
            .collect();
        merge
    }

    /// Recursive bottom-up compare: children before the node itself.
    fn compare(&self, id: &str, merge: &mut GroupMerge) {
        let Some(node) = self.arena.get(id) else {
            return;
        };
        let Some(group) = node.element.as_group() else {
            return;
        };
        for child in &node.children {
            self.compare(child, merge);
        }
        let rewritten = group.with_children(node.children.clone());
        if node.created {
            merge.to_create.push(rewritten);
        } else if self
            .baseline
            .get(id)
            .is_none_or(|original| *original != node.children)
        {
            merge.to_update.push(rewritten);
        }
    }

    /// Root group for a token type, synthesizing one when the remote pool
    /// has none.
    fn ensure_root(&mut self, token_type: TokenType) -> String {
        if let Some((_, id)) = self.roots.iter().find(|(t, _)| *t == token_type) {
            return id.clone();
        }
        let root = TokenGroup::new_root(generate_id(), &self.brand_id, token_type);
        let id = root.id.clone();
        self.arena.insert(
            id.clone(),
            WorkNode {
                element: TreeElement::Group(root),
                children: Vec::new(),
                created: true,
            },
        );
        self.roots.push((token_type, id.clone()));
        id
    }

    /// Child group of `parent_id` named `name`, matched by name and
    /// group-ness (never by identity), created when absent.
    fn ensure_group(&mut self, parent_id: &str, name: &str, token_type: TokenType) -> String {
        let children = self
            .arena
            .get(parent_id)
            .map(|parent| parent.children.clone())
            .unwrap_or_default();
        for child_id in &children {
            if let Some(child) = self.arena.get(child_id)
                && child.element.is_group()
                && child.element.name() == name
            {
                return child_id.clone();
            }
        }

        let mut group = TokenGroup::new(generate_id(), &self.brand_id, name, token_type);
        group.parent_id = Some(parent_id.to_string());
        let id = group.id.clone();
        self.arena.insert(
            id.clone(),
            WorkNode {
                element: TreeElement::Group(group),
                children: Vec::new(),
                created: true,
            },
        );
        if let Some(parent) = self.arena.get_mut(parent_id) {
            parent.children.push(id.clone());
        }
        id
    }

    /// Place an incoming token under its path group.
    ///
    /// Updates carry the existing identity and are already in the arena
    /// at their original position; only their content is replaced.
    /// Creates are appended as the parent's last child.
    fn attach_token(&mut self, parent_id: &str, token: &Token) {
        let mut working = token.clone();
        working.parent_id = Some(parent_id.to_string());

        if let Some(existing) = self.arena.get_mut(&token.id) {
            existing.element = TreeElement::Token(working);
            return;
        }
        let id = token.id.clone();
        self.arena.insert(
            id.clone(),
            WorkNode {
                element: TreeElement::Token(working),
                children: Vec::new(),
                created: true,
            },
        );
        if let Some(parent) = self.arena.get_mut(parent_id) {
            parent.children.push(id);
        }
    }
}

/// Merge one brand's incoming pool against its existing tree.
///
/// `to_create_or_update` comes from the token differ; `deleted_tokens` is
/// its `to_delete` list, consumed here to apply the empty-group deletion
/// policy.
pub fn make_group_merge(
    brand_id: &str,
    to_create_or_update: &[ProcessedTokenNode],
    deleted_tokens: &[Token],
    existing_tokens: &[Token],
    existing_groups: &[TokenGroup],
) -> GroupMerge {
    let mut merger = GroupTreeMerger::new(brand_id, existing_tokens, existing_groups);
    for node in to_create_or_update {
        merger.fold_token(node);
    }
    let deleted_groups = merger.prune_deleted(deleted_tokens);
    let merge = merger.into_merge(to_create_or_update, deleted_groups);
    tracing::debug!(
        brand = brand_id,
        created = merge.to_create.len(),
        updated = merge.to_update.len(),
        deleted = merge.to_delete.len(),
        "Merged group trees"
    );
    merge
}
