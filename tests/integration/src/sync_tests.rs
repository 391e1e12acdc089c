//! End-to-end engine tests over an in-memory backend
//!
//! Each test drives [`SyncEngine::synchronize`] against a shared
//! [`MemoryStore`], so a second run observes exactly what the first one
//! persisted.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use tokens_model::{Brand, TokenTheme, TokenType};
use tokens_sync::{Error, SyncConfiguration, SyncEngine, SyncEvent};
use tokens_test_utils::{CollectingSink, DocumentBuilder, MemoryStore, init_tracing};

const DESIGN_SYSTEM: &str = "ds-1";
const BRAND: &str = "b-1";

fn store() -> Arc<MemoryStore> {
    init_tracing();
    MemoryStore::new(vec![Brand::new(BRAND, "Default")])
}

fn engine(store: &Arc<MemoryStore>) -> SyncEngine {
    SyncEngine::new(store.provider(), store.writer())
}

fn base_configuration() -> SyncConfiguration {
    SyncConfiguration::from_json(
        r#"{ "mapping": [ { "tokenSets": ["core"], "supernovaBrand": "Default" } ] }"#,
    )
    .unwrap()
}

#[tokio::test]
async fn first_run_creates_tokens_under_a_category_root() {
    let store = store();
    let document = DocumentBuilder::new()
        .token("core", "color/primary", "color", "#112233")
        .build();

    let report = engine(&store)
        .synchronize(DESIGN_SYSTEM, &document, &base_configuration())
        .await
        .unwrap();

    assert_eq!(report.rules.len(), 1);
    let outcome = &report.rules[0];
    assert_eq!(outcome.tokens_created, 1);
    assert_eq!(outcome.tokens_updated, 0);
    assert_eq!(outcome.tokens_deleted, 0);
    assert_eq!(outcome.groups_created, 1);
    assert!(outcome.written);

    let tokens = store.tokens(BRAND);
    let groups = store.groups(BRAND);
    assert_eq!(tokens.len(), 1);
    assert_eq!(groups.len(), 1);

    let token = &tokens[0];
    let root = &groups[0];
    assert!(token.has_identity());
    assert_eq!(token.name, "primary");
    assert_eq!(token.token_type, TokenType::Color);
    assert!(root.is_root);
    assert_eq!(root.token_type, TokenType::Color);
    assert_eq!(token.parent_id.as_deref(), Some(root.id.as_str()));
    assert_eq!(root.children_ids, vec![token.id.clone()]);
}

#[tokio::test]
async fn second_run_with_same_document_writes_nothing() {
    let store = store();
    let document = DocumentBuilder::new()
        .token("core", "color/primary", "color", "#112233")
        .token("core", "spacing/sm", "spacing", "4px")
        .build();
    let configuration = base_configuration();

    engine(&store)
        .synchronize(DESIGN_SYSTEM, &document, &configuration)
        .await
        .unwrap();
    let tokens_after_first = store.tokens(BRAND);

    let report = engine(&store)
        .synchronize(DESIGN_SYSTEM, &document, &configuration)
        .await
        .unwrap();

    let outcome = &report.rules[0];
    assert_eq!(outcome.tokens_created, 0);
    assert_eq!(outcome.tokens_updated, 0);
    assert_eq!(outcome.tokens_deleted, 0);
    assert!(!outcome.written);
    assert_eq!(store.write_calls(), 1);
    assert_eq!(store.tokens(BRAND), tokens_after_first);
}

#[tokio::test]
async fn changed_value_updates_in_place_keeping_identity() {
    let store = store();
    let configuration = base_configuration();
    let before = DocumentBuilder::new()
        .token("core", "color/primary", "color", "#112233")
        .build();
    let after = DocumentBuilder::new()
        .token("core", "color/primary", "color", "#445566")
        .build();

    engine(&store)
        .synchronize(DESIGN_SYSTEM, &before, &configuration)
        .await
        .unwrap();
    let original_id = store.tokens(BRAND)[0].id.clone();

    let report = engine(&store)
        .synchronize(DESIGN_SYSTEM, &after, &configuration)
        .await
        .unwrap();

    assert_eq!(report.rules[0].tokens_updated, 1);
    assert_eq!(report.rules[0].tokens_created, 0);
    let tokens = store.tokens(BRAND);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].id, original_id);
    assert_eq!(tokens[0].value, serde_json::json!("#445566"));
}

#[tokio::test]
async fn removed_tokens_are_deleted_and_emptied_groups_pruned() {
    let store = store();
    let configuration = base_configuration();
    let before = DocumentBuilder::new()
        .token("core", "color/brand/primary", "color", "#112233")
        .token("core", "color/bg", "color", "#ffffff")
        .build();
    let after = DocumentBuilder::new()
        .token("core", "color/bg", "color", "#ffffff")
        .build();

    engine(&store)
        .synchronize(DESIGN_SYSTEM, &before, &configuration)
        .await
        .unwrap();
    assert_eq!(store.tokens(BRAND).len(), 2);
    assert_eq!(store.groups(BRAND).len(), 2);

    let report = engine(&store)
        .synchronize(DESIGN_SYSTEM, &after, &configuration)
        .await
        .unwrap();

    let outcome = &report.rules[0];
    assert_eq!(outcome.tokens_deleted, 1);
    assert_eq!(outcome.groups_deleted, 1);

    let tokens = store.tokens(BRAND);
    let groups = store.groups(BRAND);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].name, "bg");
    // The category root survives even when a child group was pruned
    assert_eq!(groups.len(), 1);
    assert!(groups[0].is_root);
    assert_eq!(groups[0].children_ids, vec![tokens[0].id.clone()]);
}

#[tokio::test]
async fn theme_rule_runs_after_base_and_writes_overrides() {
    let store = store();
    store.seed_theme(TokenTheme::new("th-dark", BRAND, "Dark"));

    let document = DocumentBuilder::new()
        .token("core", "color/bg", "color", "#ffffff")
        .token("dark", "color/bg", "color", "#000000")
        .token("dark", "color/accent", "color", "#ff00ff")
        .theme("doc-dark", "Dark", &[("core", "source"), ("dark", "enabled")])
        .build();
    let configuration = SyncConfiguration::from_json(
        r#"{
            "mapping": [
                { "tokensTheme": "Dark", "supernovaBrand": "Default", "supernovaTheme": "Dark" },
                { "tokenSets": ["core"], "supernovaBrand": "Default" }
            ]
        }"#,
    )
    .unwrap();

    let report = engine(&store)
        .synchronize(DESIGN_SYSTEM, &document, &configuration)
        .await
        .unwrap();

    // Base rules run first regardless of configuration order
    assert_eq!(report.rules.len(), 2);
    assert_eq!(report.rules[0].theme_id, None);
    assert_eq!(report.rules[1].theme_id.as_deref(), Some("th-dark"));

    let tokens = store.tokens(BRAND);
    let bg = tokens.iter().find(|token| token.name == "bg").unwrap();
    let accent = tokens.iter().find(|token| token.name == "accent").unwrap();
    // Base value untouched; the dark value lives on the theme
    assert_eq!(bg.value, serde_json::json!("#ffffff"));
    assert_eq!(accent.value, serde_json::json!("#ff00ff"));

    let themes = store.themes(BRAND);
    assert_eq!(themes.len(), 1);
    let overrides = &themes[0].overridden_tokens;
    assert_eq!(overrides.len(), 1);
    assert_eq!(overrides[0].name, "bg");
    assert_eq!(overrides[0].id, bg.id);
    assert_eq!(overrides[0].value, serde_json::json!("#000000"));
    assert_eq!(overrides[0].theme_id.as_deref(), Some("th-dark"));
    assert_eq!(store.theme_write_calls(), 1);
}

#[tokio::test]
async fn theme_rerun_is_a_fixed_point_for_base_tokens() {
    let store = store();
    store.seed_theme(TokenTheme::new("th-dark", BRAND, "Dark"));

    let document = DocumentBuilder::new()
        .token("core", "color/bg", "color", "#ffffff")
        .token("dark", "color/bg", "color", "#000000")
        .theme("doc-dark", "Dark", &[("core", "source"), ("dark", "enabled")])
        .build();
    let configuration = SyncConfiguration::from_json(
        r#"{
            "mapping": [
                { "tokenSets": ["core"], "supernovaBrand": "Default" },
                { "tokensTheme": "Dark", "supernovaBrand": "Default", "supernovaTheme": "Dark" }
            ]
        }"#,
    )
    .unwrap();

    engine(&store)
        .synchronize(DESIGN_SYSTEM, &document, &configuration)
        .await
        .unwrap();
    let base_after_first = store.tokens(BRAND);

    engine(&store)
        .synchronize(DESIGN_SYSTEM, &document, &configuration)
        .await
        .unwrap();

    assert_eq!(store.tokens(BRAND), base_after_first);
    // Each run rewrites the theme, but the override set is stable
    let themes = store.themes(BRAND);
    assert_eq!(themes[0].overridden_tokens.len(), 1);
}

#[tokio::test]
async fn dry_run_computes_diffs_but_never_writes() {
    let store = store();
    let document = DocumentBuilder::new()
        .token("core", "color/primary", "color", "#112233")
        .build();
    let configuration = SyncConfiguration::from_json(
        r#"{
            "mapping": [ { "tokenSets": ["core"], "supernovaBrand": "Default" } ],
            "settings": { "dryRun": true }
        }"#,
    )
    .unwrap();

    let report = engine(&store)
        .synchronize(DESIGN_SYSTEM, &document, &configuration)
        .await
        .unwrap();

    let outcome = &report.rules[0];
    assert_eq!(outcome.tokens_created, 1);
    assert!(!outcome.written);
    assert!(report
        .events
        .iter()
        .any(|event| matches!(event, SyncEvent::WriteSkipped { .. })));
    assert_eq!(store.write_calls(), 0);
    assert!(store.tokens(BRAND).is_empty());
}

#[tokio::test]
async fn unknown_brand_aborts_before_any_write() {
    let store = store();
    let document = DocumentBuilder::new()
        .token("core", "color/primary", "color", "#112233")
        .build();
    let configuration = SyncConfiguration::from_json(
        r#"{ "mapping": [ { "tokenSets": ["core"], "supernovaBrand": "Nope" } ] }"#,
    )
    .unwrap();

    let err = engine(&store)
        .synchronize(DESIGN_SYSTEM, &document, &configuration)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Compute { .. }));
    assert!(err.to_string().contains("Nope"));
    assert_eq!(store.write_calls(), 0);
}

#[tokio::test]
async fn unknown_remote_theme_aborts_before_any_write() {
    let store = store();
    let document = DocumentBuilder::new()
        .token("core", "color/primary", "color", "#112233")
        .theme("doc-dark", "Dark", &[("core", "source")])
        .build();
    let configuration = SyncConfiguration::from_json(
        r#"{
            "mapping": [
                { "tokenSets": ["core"], "supernovaBrand": "Default" },
                { "tokensTheme": "Dark", "supernovaBrand": "Default", "supernovaTheme": "Missing" }
            ]
        }"#,
    )
    .unwrap();

    let err = engine(&store)
        .synchronize(DESIGN_SYSTEM, &document, &configuration)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Compute { .. }));
    // Valid base rule never ran: references are checked up front
    assert_eq!(store.write_calls(), 0);
}

#[tokio::test]
async fn backend_failures_surface_as_response_errors() {
    let store = store();
    store.fail_fetches_with("gateway timeout");
    let document = DocumentBuilder::new()
        .token("core", "color/primary", "color", "#112233")
        .build();

    let err = engine(&store)
        .synchronize(DESIGN_SYSTEM, &document, &base_configuration())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Response { .. }));
}

#[tokio::test]
async fn verbose_runs_forward_events_to_the_sink() {
    let store = store();
    let sink = CollectingSink::new();
    let document = DocumentBuilder::new()
        .token("core", "color/primary", "color", "#112233")
        .build();
    let configuration = SyncConfiguration::from_json(
        r#"{
            "mapping": [ { "tokenSets": ["core"], "supernovaBrand": "Default" } ],
            "settings": { "verbose": true }
        }"#,
    )
    .unwrap();

    let report = SyncEngine::new(store.provider(), store.writer())
        .with_event_sink(sink.clone())
        .synchronize(DESIGN_SYSTEM, &document, &configuration)
        .await
        .unwrap();

    let events = sink.events();
    assert_eq!(events, report.events);
    assert!(matches!(events[0], SyncEvent::DocumentParsed { sets: 1, .. }));
    assert!(events
        .iter()
        .any(|event| matches!(event, SyncEvent::TokenClassified { .. })));
    assert!(events
        .iter()
        .any(|event| matches!(event, SyncEvent::TokensWritten { .. })));
}
