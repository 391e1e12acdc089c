//! Mapping configuration
//!
//! The JSON configuration binding token sets or themes to destination
//! brands. Validation happens before any network call; a malformed
//! configuration is a `Processing` error naming the offending rule and
//! field.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How the interchange document is laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncMode {
    /// One document holding all sets and themes
    #[default]
    SingleFile,
    /// One file per set, plus metadata files
    MultiFile,
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncMode::SingleFile => write!(f, "single-file"),
            SyncMode::MultiFile => write!(f, "multi-file"),
        }
    }
}

/// Optional run settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSettings {
    /// Emit per-token detail events
    #[serde(default)]
    pub verbose: bool,
    /// Compute diffs but skip all writes
    #[serde(default)]
    pub dry_run: bool,
    /// Treat description changes as updates
    #[serde(default)]
    pub precise_copy: bool,
}

/// One mapping rule: a source (explicit sets or a document theme) bound
/// to a destination brand, optionally targeting a remote theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMapping {
    /// Explicit set names, mutually exclusive with `tokens_theme`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_sets: Option<Vec<String>>,
    /// Document theme name or id, mutually exclusive with `token_sets`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_theme: Option<String>,
    /// Destination brand name or id
    pub supernova_brand: String,
    /// Destination theme name or id; absent for base-value rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supernova_theme: Option<String>,
}

impl TokenMapping {
    /// Whether this rule writes theme overrides rather than base values.
    pub fn is_theme_bound(&self) -> bool {
        self.supernova_theme.is_some()
    }
}

/// The full mapping configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfiguration {
    #[serde(default)]
    pub mode: SyncMode,
    pub mapping: Vec<TokenMapping>,
    #[serde(default)]
    pub settings: SyncSettings,
}

impl SyncConfiguration {
    /// Parse and validate a configuration from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self> {
        let configuration: SyncConfiguration = serde_json::from_str(raw)
            .map_err(|e| Error::processing(format!("Malformed mapping configuration: {}", e)))?;
        configuration.validate()?;
        Ok(configuration)
    }

    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Validate every rule.
    ///
    /// Exactly one of `tokenSets`/`tokensTheme` must be present and
    /// non-empty, and `supernovaBrand` must be a non-empty string.
    pub fn validate(&self) -> Result<()> {
        for (index, rule) in self.mapping.iter().enumerate() {
            let sets_given = rule
                .token_sets
                .as_ref()
                .is_some_and(|sets| !sets.is_empty());
            let theme_given = rule
                .tokens_theme
                .as_ref()
                .is_some_and(|theme| !theme.is_empty());

            if rule.token_sets.is_some() && rule.tokens_theme.is_some() {
                return Err(Error::processing(format!(
                    "Mapping rule {}: 'tokenSets' and 'tokensTheme' are mutually exclusive",
                    index
                )));
            }
            if !sets_given && !theme_given {
                return Err(Error::processing(format!(
                    "Mapping rule {}: one of 'tokenSets' or 'tokensTheme' must be present and non-empty",
                    index
                )));
            }
            if rule
                .token_sets
                .as_ref()
                .is_some_and(|sets| sets.iter().any(String::is_empty))
            {
                return Err(Error::processing(format!(
                    "Mapping rule {}: 'tokenSets' contains an empty set name",
                    index
                )));
            }
            if rule.supernova_brand.is_empty() {
                return Err(Error::processing(format!(
                    "Mapping rule {}: 'supernovaBrand' must be a non-empty string",
                    index
                )));
            }
        }
        Ok(())
    }
}
