//! Interchange document builder
//!
//! Assembles the nested JSON shape the parser consumes without spelling
//! out the whole tree in every test.

use serde_json::{Map, Value, json};

/// Builder for interchange documents.
///
/// ```
/// use tokens_test_utils::DocumentBuilder;
///
/// let document = DocumentBuilder::new()
///     .token("core", "color/bg", "color", "#ffffff")
///     .theme("th-1", "Light", &[("core", "source")])
///     .build();
/// assert!(document.get("core").is_some());
/// ```
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    sets: Map<String, Value>,
    themes: Vec<Value>,
    set_order: Vec<String>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a token leaf. `path` is slash-separated with the token name
    /// as the final segment; intermediate containers are created on
    /// demand.
    pub fn token(self, set: &str, path: &str, raw_type: &str, value: impl Into<Value>) -> Self {
        self.leaf(set, path, raw_type, value, None)
    }

    /// Add a token leaf carrying a description.
    pub fn described_token(
        self,
        set: &str,
        path: &str,
        raw_type: &str,
        value: impl Into<Value>,
        description: &str,
    ) -> Self {
        self.leaf(set, path, raw_type, value, Some(description))
    }

    /// Add a `$themes` entry. `selections` maps set names to priorities
    /// (`source`, `enabled` or `disabled`).
    pub fn theme(mut self, id: &str, name: &str, selections: &[(&str, &str)]) -> Self {
        let mut selected = Map::new();
        for (set, priority) in selections {
            selected.insert(set.to_string(), json!(priority));
        }
        self.themes.push(json!({
            "id": id,
            "name": name,
            "selectedTokenSets": Value::Object(selected),
        }));
        self
    }

    /// Record a `$metadata.tokenSetOrder` list.
    pub fn set_order(mut self, order: &[&str]) -> Self {
        self.set_order = order.iter().map(|set| set.to_string()).collect();
        self
    }

    /// Assemble the final document.
    pub fn build(self) -> Value {
        let mut root = self.sets;
        if !self.set_order.is_empty() {
            root.insert(
                "$metadata".to_string(),
                json!({ "tokenSetOrder": self.set_order }),
            );
        }
        if !self.themes.is_empty() {
            root.insert("$themes".to_string(), Value::Array(self.themes));
        }
        Value::Object(root)
    }

    fn leaf(
        mut self,
        set: &str,
        path: &str,
        raw_type: &str,
        value: impl Into<Value>,
        description: Option<&str>,
    ) -> Self {
        let mut segments: Vec<&str> = path.split('/').collect();
        let name = segments.pop().unwrap_or(path);

        let mut cursor = self
            .sets
            .entry(set.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        for segment in segments {
            cursor = cursor
                .as_object_mut()
                .unwrap()
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }

        let mut leaf = Map::new();
        leaf.insert("value".to_string(), value.into());
        leaf.insert("type".to_string(), json!(raw_type));
        if let Some(description) = description {
            leaf.insert("description".to_string(), json!(description));
        }
        cursor
            .as_object_mut()
            .unwrap()
            .insert(name.to_string(), Value::Object(leaf));
        self
    }
}
