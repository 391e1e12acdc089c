//! Pipeline stage tests without the engine
//!
//! Drives parser output straight through resolution, conversion, diffing
//! and group merging to pin the stage contracts down individually.

use std::collections::HashMap;

use pretty_assertions::assert_eq;
use serde_json::json;
use tokens_model::{Token, TokenGroup, TokenType};
use tokens_parser::parse_document;
use tokens_sync::{
    Error, TokenMapping, convert_nodes, existing_token_key, make_group_merge, make_tokens_diff,
    resolve_mapping_nodes, resolve_theme_nodes,
};
use tokens_test_utils::DocumentBuilder;

const BRAND: &str = "b-1";

fn set_mapping(sets: &[&str]) -> TokenMapping {
    TokenMapping {
        token_sets: Some(sets.iter().map(|set| set.to_string()).collect()),
        tokens_theme: None,
        supernova_brand: "Default".to_string(),
        supernova_theme: None,
    }
}

#[test]
fn references_resolve_across_layered_sets() {
    let document = DocumentBuilder::new()
        .token("core", "color/base", "color", "#112233")
        .token("alt", "color/brand", "color", "{color.base}")
        .theme("doc-th", "Combined", &[("core", "source"), ("alt", "enabled")])
        .build();
    let parsed = parse_document(&document).unwrap();
    let theme = parsed.theme("Combined").unwrap();

    let nodes = resolve_theme_nodes(theme, &parsed).unwrap();
    let processed = convert_nodes(BRAND, &nodes).unwrap();

    let brand_token = processed
        .iter()
        .find(|node| node.token.name == "brand")
        .unwrap();
    assert_eq!(brand_token.token.value, json!("#112233"));
}

#[test]
fn chained_references_resolve_over_multiple_passes() {
    let document = DocumentBuilder::new()
        .token("core", "color/a", "color", "{color.b}")
        .token("core", "color/b", "color", "{color.c}")
        .token("core", "color/c", "color", "#0000ff")
        .build();
    let parsed = parse_document(&document).unwrap();
    let nodes = resolve_mapping_nodes(&set_mapping(&["core"]), &parsed).unwrap();

    let processed = convert_nodes(BRAND, &nodes).unwrap();

    for name in ["a", "b", "c"] {
        let node = processed.iter().find(|node| node.token.name == name).unwrap();
        assert_eq!(node.token.value, json!("#0000ff"), "token {}", name);
    }
}

#[test]
fn dangling_reference_is_a_fatal_compute_error() {
    let document = DocumentBuilder::new()
        .token("core", "color/broken", "color", "{color.missing}")
        .build();
    let parsed = parse_document(&document).unwrap();
    let nodes = resolve_mapping_nodes(&set_mapping(&["core"]), &parsed).unwrap();

    let err = convert_nodes(BRAND, &nodes).unwrap_err();

    assert!(matches!(err, Error::Compute { .. }));
    assert!(err.to_string().contains("color.missing"));
}

#[test]
fn cyclic_references_are_a_fatal_compute_error() {
    let document = DocumentBuilder::new()
        .token("core", "color/a", "color", "{color.b}")
        .token("core", "color/b", "color", "{color.a}")
        .build();
    let parsed = parse_document(&document).unwrap();
    let nodes = resolve_mapping_nodes(&set_mapping(&["core"]), &parsed).unwrap();

    assert!(matches!(
        convert_nodes(BRAND, &nodes),
        Err(Error::Compute { .. })
    ));
}

#[test]
fn later_layer_wins_but_keeps_the_first_slot() {
    let document = DocumentBuilder::new()
        .token("core", "color/a", "color", "#000001")
        .token("core", "color/b", "color", "#000002")
        .token("alt", "color/a", "color", "#000009")
        .build();
    let parsed = parse_document(&document).unwrap();

    let nodes = resolve_mapping_nodes(&set_mapping(&["core", "alt"]), &parsed).unwrap();

    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].name, "a");
    assert_eq!(nodes[0].value, json!("#000009"));
    assert_eq!(nodes[1].name, "b");
}

#[test]
fn disabled_sets_are_excluded_from_theme_pools() {
    let document = DocumentBuilder::new()
        .token("core", "color/a", "color", "#000001")
        .token("off", "color/b", "color", "#000002")
        .theme("doc-th", "Partial", &[("core", "source"), ("off", "disabled")])
        .build();
    let parsed = parse_document(&document).unwrap();
    let theme = parsed.theme("Partial").unwrap();

    let nodes = resolve_theme_nodes(theme, &parsed).unwrap();

    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].name, "a");
}

#[test]
fn diff_classifies_against_remote_state() {
    let root = TokenGroup::new_root("g-root", BRAND, TokenType::Color);
    let mut bg = Token::new(BRAND, "bg", TokenType::Color, json!("#ffffff"));
    bg.id = "t-bg".to_string();
    bg.parent_id = Some(root.id.clone());
    let mut stale = Token::new(BRAND, "old", TokenType::Color, json!("#333333"));
    stale.id = "t-old".to_string();
    stale.parent_id = Some(root.id.clone());

    let document = DocumentBuilder::new()
        .token("core", "color/bg", "color", "#000000")
        .token("core", "color/fresh", "color", "#00ff00")
        .build();
    let parsed = parse_document(&document).unwrap();
    let nodes = resolve_mapping_nodes(&set_mapping(&["core"]), &parsed).unwrap();
    let processed = convert_nodes(BRAND, &nodes).unwrap();

    let existing_tokens = vec![bg, stale];
    let existing_groups = vec![root];
    let diff = make_tokens_diff(
        &existing_tokens,
        &existing_groups,
        &processed,
        &Default::default(),
    );

    assert_eq!(diff.to_create.len(), 1);
    assert_eq!(diff.to_create[0].token.name, "fresh");
    assert_eq!(diff.to_update.len(), 1);
    assert_eq!(diff.to_update[0].token.id, "t-bg");
    assert_eq!(diff.to_update[0].token.value, json!("#000000"));
    assert_eq!(diff.to_delete.len(), 1);
    assert_eq!(diff.to_delete[0].id, "t-old");
    assert_eq!(diff.to_create_or_update.len(), 2);
}

#[test]
fn description_changes_only_count_with_precise_copy() {
    let root = TokenGroup::new_root("g-root", BRAND, TokenType::Color);
    let mut bg = Token::new(BRAND, "bg", TokenType::Color, json!("#ffffff"));
    bg.id = "t-bg".to_string();
    bg.parent_id = Some(root.id.clone());
    bg.description = Some("Old copy".to_string());

    let document = DocumentBuilder::new()
        .described_token("core", "color/bg", "color", "#ffffff", "New copy")
        .build();
    let parsed = parse_document(&document).unwrap();
    let nodes = resolve_mapping_nodes(&set_mapping(&["core"]), &parsed).unwrap();
    let processed = convert_nodes(BRAND, &nodes).unwrap();

    let existing_tokens = vec![bg];
    let existing_groups = vec![root];

    let loose = make_tokens_diff(
        &existing_tokens,
        &existing_groups,
        &processed,
        &Default::default(),
    );
    assert!(loose.is_empty());

    let precise = make_tokens_diff(
        &existing_tokens,
        &existing_groups,
        &processed,
        &tokens_sync::SyncSettings {
            precise_copy: true,
            ..Default::default()
        },
    );
    assert_eq!(precise.to_update.len(), 1);
}

#[test]
fn same_name_in_different_categories_does_not_collide() {
    let document = DocumentBuilder::new()
        .token("core", "color/primary", "color", "#112233")
        .token("core", "spacing/primary", "spacing", "8px")
        .build();
    let parsed = parse_document(&document).unwrap();
    let nodes = resolve_mapping_nodes(&set_mapping(&["core"]), &parsed).unwrap();
    let processed = convert_nodes(BRAND, &nodes).unwrap();

    let diff = make_tokens_diff(&[], &[], &processed, &Default::default());

    assert_eq!(diff.to_create.len(), 2);
}

#[test]
fn existing_key_walks_the_parent_chain_excluding_roots() {
    let root = TokenGroup::new_root("g-root", BRAND, TokenType::Color);
    let mut brand_group = TokenGroup::new("g-brand", BRAND, "brand", TokenType::Color);
    brand_group.parent_id = Some(root.id.clone());
    let mut token = Token::new(BRAND, "primary", TokenType::Color, json!("#112233"));
    token.parent_id = Some(brand_group.id.clone());

    let groups_by_id: HashMap<&str, &TokenGroup> =
        [("g-root", &root), ("g-brand", &brand_group)].into();

    assert_eq!(existing_token_key(&token, &groups_by_id), "brand/primary");
}

#[test]
fn group_merge_builds_nested_groups_bottom_up() {
    let document = DocumentBuilder::new()
        .token("core", "color/brand/primary", "color", "#112233")
        .token("core", "color/bg", "color", "#ffffff")
        .build();
    let parsed = parse_document(&document).unwrap();
    let nodes = resolve_mapping_nodes(&set_mapping(&["core"]), &parsed).unwrap();
    let processed = convert_nodes(BRAND, &nodes).unwrap();
    let diff = make_tokens_diff(&[], &[], &processed, &Default::default());

    let merge = make_group_merge(BRAND, &diff.to_create_or_update, &[], &[], &[]);

    assert_eq!(merge.to_create.len(), 2);
    assert!(merge.to_update.is_empty());
    assert!(merge.to_delete.is_empty());
    assert_eq!(merge.tokens.len(), 2);

    let root = merge.to_create.iter().find(|group| group.is_root).unwrap();
    let nested = merge.to_create.iter().find(|group| !group.is_root).unwrap();
    assert_eq!(nested.name, "brand");
    assert_eq!(nested.parent_id.as_deref(), Some(root.id.as_str()));
    // Root holds the nested group plus the direct token
    assert_eq!(root.children_ids.len(), 2);

    let primary = merge.tokens.iter().find(|token| token.name == "primary").unwrap();
    let bg = merge.tokens.iter().find(|token| token.name == "bg").unwrap();
    assert!(primary.has_identity());
    assert_eq!(primary.parent_id.as_deref(), Some(nested.id.as_str()));
    assert_eq!(bg.parent_id.as_deref(), Some(root.id.as_str()));
}

#[test]
fn unknown_set_reference_fails_resolution() {
    let document = DocumentBuilder::new()
        .token("core", "color/bg", "color", "#ffffff")
        .build();
    let parsed = parse_document(&document).unwrap();

    let err = resolve_mapping_nodes(&set_mapping(&["nope"]), &parsed).unwrap_err();

    assert!(matches!(err, Error::Compute { .. }));
    assert!(err.to_string().contains("nope"));
}
