//! Document theme definitions

use std::str::FromStr;

use serde_json::Value;

use crate::document::TokenSet;
use crate::error::{Error, Result};

/// Layering priority of a set within a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetPriority {
    /// Base layer; applied first in document order
    Source,
    /// Override layer; applied after all source sets, in document order
    Enabled,
    /// Excluded from the theme entirely
    Disabled,
}

impl FromStr for SetPriority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "source" => Ok(SetPriority::Source),
            "enabled" => Ok(SetPriority::Enabled),
            "disabled" => Ok(SetPriority::Disabled),
            other => Err(other.to_string()),
        }
    }
}

/// One entry of a theme's `selectedTokenSets` mapping.
///
/// `set_id` is `None` when the named set does not exist in the document;
/// the parser records the gap and leaves validation to the resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeSelection {
    pub set_name: String,
    pub set_id: Option<String>,
    pub priority: SetPriority,
}

/// A theme definition from the document's `$themes` list.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTheme {
    pub id: String,
    pub name: String,
    pub selected_sets: Vec<ThemeSelection>,
}

impl DocumentTheme {
    /// Whether the given reference (an id or a name) selects this theme.
    pub fn matches(&self, reference: &str) -> bool {
        self.id == reference || self.name == reference
    }

    /// Selections with the given priority, in document order.
    pub fn selections_with(&self, priority: SetPriority) -> impl Iterator<Item = &ThemeSelection> {
        self.selected_sets
            .iter()
            .filter(move |selection| selection.priority == priority)
    }
}

/// Parse one entry of the `$themes` array.
///
/// `name`, `id` and `selectedTokenSets` are required; a missing field is
/// an error naming the field. Set references that cannot be resolved are
/// recorded with `set_id: None`.
pub(crate) fn parse_theme(raw: &Value, sets: &[TokenSet]) -> Result<DocumentTheme> {
    let id = require_string(raw, "id")?;
    let name = require_string(raw, "name")?;
    let selected = raw
        .get("selectedTokenSets")
        .and_then(Value::as_object)
        .ok_or(Error::ThemeMissingField {
            field: "selectedTokenSets".to_string(),
        })?;

    let mut selected_sets = Vec::with_capacity(selected.len());
    for (set_name, priority_value) in selected {
        let priority_raw = priority_value.as_str().unwrap_or_default();
        let priority = priority_raw
            .parse::<SetPriority>()
            .map_err(|priority| Error::InvalidSetPriority {
                theme: name.clone(),
                priority,
            })?;
        let set_id = sets
            .iter()
            .find(|set| set.name == *set_name)
            .map(|set| set.id.clone());
        selected_sets.push(ThemeSelection {
            set_name: set_name.clone(),
            set_id,
            priority,
        });
    }

    Ok(DocumentTheme {
        id,
        name,
        selected_sets,
    })
}

fn require_string(raw: &Value, field: &str) -> Result<String> {
    raw.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(Error::ThemeMissingField {
            field: field.to_string(),
        })
}
