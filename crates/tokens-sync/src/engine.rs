//! Synchronization orchestrator
//!
//! Sequences parsing, resolution, conversion, diffing and group merging
//! across the configured mapping rules and invokes the write collaborator.
//!
//! Rules run in two ordered phases: base-value rules first, theme-bound
//! rules second. Theme overrides diff against a token's base-layer
//! identity, which only exists once phase 1 has assigned identities for
//! new tokens — processing themes first would leave override diffing
//! unable to match freshly created base tokens.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokens_model::{Brand, TokenTheme};
use tokens_parser::{ParsedDocument, ParsedNode, parse_document};

use crate::config::{SyncConfiguration, SyncSettings, TokenMapping};
use crate::converter::{ProcessedTokenNode, convert_nodes};
use crate::differ::{TokenDiff, make_tokens_diff};
use crate::error::{Error, Result};
use crate::provider::{DataProvider, TokenWritePayload, TokenWriter, WriteResult};
use crate::resolver::resolve_mapping_nodes;
use crate::tree::make_group_merge;

/// How one token was classified, for verbose progress events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// Structured progress events emitted during a run.
///
/// Collected into the [`SyncReport`] and forwarded to the optional
/// injected [`EventSink`]; progress reporting is decoupled from control
/// flow.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    DocumentParsed {
        sets: usize,
        themes: usize,
        nodes: usize,
    },
    RuleResolved {
        rule_index: usize,
        brand_id: String,
        node_count: usize,
    },
    DiffComputed {
        brand_id: String,
        created: usize,
        updated: usize,
        deleted: usize,
    },
    GroupsMerged {
        brand_id: String,
        created: usize,
        updated: usize,
        deleted: usize,
    },
    TokenClassified {
        brand_id: String,
        key: String,
        kind: ChangeKind,
    },
    TokensWritten {
        brand_id: String,
        result: WriteResult,
    },
    ThemeWritten {
        brand_id: String,
        theme_id: String,
        overrides: usize,
    },
    WriteSkipped {
        brand_id: String,
    },
}

/// Observer for progress events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &SyncEvent);
}

/// Outcome of one mapping rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleOutcome {
    pub brand_id: String,
    pub theme_id: Option<String>,
    pub tokens_created: usize,
    pub tokens_updated: usize,
    pub tokens_deleted: usize,
    pub groups_created: usize,
    pub groups_updated: usize,
    pub groups_deleted: usize,
    /// False when `dry_run` skipped the write or nothing changed
    pub written: bool,
}

/// Report from a full synchronization run.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Per-rule outcomes, in execution order (phase 1 then phase 2)
    pub rules: Vec<RuleOutcome>,
    /// Progress events, in emission order
    pub events: Vec<SyncEvent>,
}

/// One mapping rule moving through the pipeline.
///
/// Progresses through resolution, conversion and merging; each stage
/// populates previously-empty fields and never regresses.
struct RuleExecution {
    index: usize,
    mapping: TokenMapping,
    brand: Brand,
    remote_theme: Option<TokenTheme>,
    nodes: Vec<ParsedNode>,
    processed: Vec<ProcessedTokenNode>,
}

/// Engine synchronizing an interchange document into a design system.
pub struct SyncEngine {
    provider: Arc<dyn DataProvider>,
    writer: Arc<dyn TokenWriter>,
    sink: Option<Arc<dyn EventSink>>,
}

impl SyncEngine {
    /// Create an engine over the given collaborators.
    pub fn new(provider: Arc<dyn DataProvider>, writer: Arc<dyn TokenWriter>) -> Self {
        Self {
            provider,
            writer,
            sink: None,
        }
    }

    /// Attach an observer for progress events.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Run the full synchronization pipeline.
    ///
    /// Every rule's brand and theme references are validated before any
    /// write; an unknown reference aborts the whole run and partial
    /// application across rules is never attempted. Any later failure
    /// aborts the remaining rules.
    pub async fn synchronize(
        &self,
        design_system_id: &str,
        document: &Value,
        configuration: &SyncConfiguration,
    ) -> Result<SyncReport> {
        configuration.validate()?;
        let settings = configuration.settings;

        let parsed = parse_document(document)?;
        let mut report = SyncReport::default();
        self.emit(
            &mut report,
            SyncEvent::DocumentParsed {
                sets: parsed.sets.len(),
                themes: parsed.themes.len(),
                nodes: parsed.nodes.len(),
            },
        );

        let brands = self.provider.fetch_brands(design_system_id).await?;
        let executions = self
            .prepare_rules(&brands, &parsed, configuration, &mut report)
            .await?;

        let (base_rules, theme_rules): (Vec<_>, Vec<_>) = executions
            .into_iter()
            .partition(|execution| !execution.mapping.is_theme_bound());

        for execution in &base_rules {
            let outcome = self.sync_base_rule(execution, &settings, &mut report).await?;
            report.rules.push(outcome);
        }
        for execution in &theme_rules {
            let outcome = self
                .sync_theme_rule(execution, &settings, &mut report)
                .await?;
            report.rules.push(outcome);
        }

        tracing::info!(
            rules = report.rules.len(),
            "Synchronization run complete"
        );
        Ok(report)
    }

    /// Resolve and convert every rule before any write happens.
    ///
    /// This is where unknown brand, theme and set references fail fast.
    async fn prepare_rules(
        &self,
        brands: &[Brand],
        parsed: &ParsedDocument,
        configuration: &SyncConfiguration,
        report: &mut SyncReport,
    ) -> Result<Vec<RuleExecution>> {
        let mut themes_by_brand: HashMap<String, Vec<TokenTheme>> = HashMap::new();
        let mut executions = Vec::with_capacity(configuration.mapping.len());

        for (index, mapping) in configuration.mapping.iter().enumerate() {
            let brand = brands
                .iter()
                .find(|brand| brand.matches(&mapping.supernova_brand))
                .cloned()
                .ok_or_else(|| {
                    Error::compute(format!(
                        "Mapping rule {}: unknown brand '{}'",
                        index, mapping.supernova_brand
                    ))
                })?;

            let remote_theme = match &mapping.supernova_theme {
                None => None,
                Some(reference) => {
                    if !themes_by_brand.contains_key(&brand.id) {
                        let themes = self.provider.fetch_themes(&brand.id).await?;
                        themes_by_brand.insert(brand.id.clone(), themes);
                    }
                    let theme = themes_by_brand[&brand.id]
                        .iter()
                        .find(|theme| theme.matches(reference))
                        .cloned()
                        .ok_or_else(|| {
                            Error::compute(format!(
                                "Mapping rule {}: unknown theme '{}' in brand '{}'",
                                index, reference, brand.name
                            ))
                        })?;
                    Some(theme)
                }
            };

            let nodes = resolve_mapping_nodes(mapping, parsed)?;
            let processed = convert_nodes(&brand.id, &nodes)?;
            self.emit(
                report,
                SyncEvent::RuleResolved {
                    rule_index: index,
                    brand_id: brand.id.clone(),
                    node_count: nodes.len(),
                },
            );

            executions.push(RuleExecution {
                index,
                mapping: mapping.clone(),
                brand,
                remote_theme,
                nodes,
                processed,
            });
        }
        Ok(executions)
    }

    /// Phase 1: merge base token values into a brand.
    async fn sync_base_rule(
        &self,
        execution: &RuleExecution,
        settings: &SyncSettings,
        report: &mut SyncReport,
    ) -> Result<RuleOutcome> {
        let brand_id = execution.brand.id.clone();
        tracing::debug!(
            rule = execution.index,
            brand = %brand_id,
            nodes = execution.nodes.len(),
            "Syncing base rule"
        );

        let existing_tokens = self.provider.fetch_tokens(&brand_id).await?;
        let existing_groups = self.provider.fetch_token_groups(&brand_id).await?;

        let diff = make_tokens_diff(&existing_tokens, &existing_groups, &execution.processed, settings);
        self.emit_diff(report, &brand_id, &diff, settings);

        let merge = make_group_merge(
            &brand_id,
            &diff.to_create_or_update,
            &diff.to_delete,
            &existing_tokens,
            &existing_groups,
        );
        self.emit(
            report,
            SyncEvent::GroupsMerged {
                brand_id: brand_id.clone(),
                created: merge.to_create.len(),
                updated: merge.to_update.len(),
                deleted: merge.to_delete.len(),
            },
        );

        let mut outcome = RuleOutcome {
            brand_id: brand_id.clone(),
            theme_id: None,
            tokens_created: diff.to_create.len(),
            tokens_updated: diff.to_update.len(),
            tokens_deleted: diff.to_delete.len(),
            groups_created: merge.to_create.len(),
            groups_updated: merge.to_update.len(),
            groups_deleted: merge.to_delete.len(),
            written: false,
        };

        let payload = TokenWritePayload {
            tokens: merge.tokens,
            groups: [merge.to_create, merge.to_update].concat(),
            tokens_to_delete: diff.to_delete,
            groups_to_delete: merge.to_delete,
        };

        if settings.dry_run {
            self.emit(report, SyncEvent::WriteSkipped { brand_id });
        } else if !payload.is_empty() {
            let result = self.writer.write_tokens(&brand_id, &payload).await?;
            outcome.written = true;
            self.emit(report, SyncEvent::TokensWritten { brand_id, result });
        }
        Ok(outcome)
    }

    /// Phase 2: merge theme overrides against the already-updated base.
    async fn sync_theme_rule(
        &self,
        execution: &RuleExecution,
        settings: &SyncSettings,
        report: &mut SyncReport,
    ) -> Result<RuleOutcome> {
        let brand_id = execution.brand.id.clone();
        let mut theme = execution
            .remote_theme
            .clone()
            .ok_or_else(|| Error::compute("Theme rule lost its resolved theme"))?;
        tracing::debug!(rule = execution.index, brand = %brand_id, theme = %theme.name, "Syncing theme rule");

        // Base state now includes identities assigned by phase 1
        let base_tokens = self.provider.fetch_tokens(&brand_id).await?;
        let base_groups = self.provider.fetch_token_groups(&brand_id).await?;

        let diff = make_tokens_diff(&base_tokens, &base_groups, &execution.processed, settings);
        self.emit_diff(report, &brand_id, &diff, settings);

        // Tokens absent from an override pool fall through to the base
        // layer; a theme diff never deletes base tokens.
        let merge = make_group_merge(&brand_id, &diff.to_create, &[], &base_tokens, &base_groups);

        theme.overridden_tokens = diff
            .to_update
            .iter()
            .map(|node| {
                let mut token = node.token.clone();
                token.theme_id = Some(theme.id.clone());
                token
            })
            .collect();

        let mut outcome = RuleOutcome {
            brand_id: brand_id.clone(),
            theme_id: Some(theme.id.clone()),
            tokens_created: diff.to_create.len(),
            tokens_updated: diff.to_update.len(),
            tokens_deleted: 0,
            groups_created: merge.to_create.len(),
            groups_updated: merge.to_update.len(),
            groups_deleted: 0,
            written: false,
        };

        if settings.dry_run {
            self.emit(report, SyncEvent::WriteSkipped { brand_id });
            return Ok(outcome);
        }

        if !diff.to_create.is_empty() {
            let payload = TokenWritePayload {
                tokens: merge.tokens,
                groups: [merge.to_create, merge.to_update].concat(),
                tokens_to_delete: Vec::new(),
                groups_to_delete: Vec::new(),
            };
            let result = self.writer.write_tokens(&brand_id, &payload).await?;
            self.emit(
                report,
                SyncEvent::TokensWritten {
                    brand_id: brand_id.clone(),
                    result,
                },
            );
        }

        let overrides = theme.overridden_tokens.len();
        self.writer.write_theme(&theme).await?;
        outcome.written = true;
        self.emit(
            report,
            SyncEvent::ThemeWritten {
                brand_id,
                theme_id: theme.id.clone(),
                overrides,
            },
        );
        Ok(outcome)
    }

    fn emit_diff(
        &self,
        report: &mut SyncReport,
        brand_id: &str,
        diff: &TokenDiff,
        settings: &SyncSettings,
    ) {
        self.emit(
            report,
            SyncEvent::DiffComputed {
                brand_id: brand_id.to_string(),
                created: diff.to_create.len(),
                updated: diff.to_update.len(),
                deleted: diff.to_delete.len(),
            },
        );
        if settings.verbose {
            let classified = diff
                .to_create
                .iter()
                .map(|node| (node.key.clone(), ChangeKind::Created))
                .chain(
                    diff.to_update
                        .iter()
                        .map(|node| (node.key.clone(), ChangeKind::Updated)),
                )
                .chain(
                    diff.to_delete
                        .iter()
                        .map(|token| (token.name.clone(), ChangeKind::Deleted)),
                )
                .collect::<Vec<_>>();
            for (key, kind) in classified {
                self.emit(
                    report,
                    SyncEvent::TokenClassified {
                        brand_id: brand_id.to_string(),
                        key,
                        kind,
                    },
                );
            }
        }
    }

    fn emit(&self, report: &mut SyncReport, event: SyncEvent) {
        if let Some(sink) = &self.sink {
            sink.emit(&event);
        }
        report.events.push(event);
    }
}
