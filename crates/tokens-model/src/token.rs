//! Token entity and semantic token kinds

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Semantic kind of a design token.
///
/// Mirrors the `type` strings of the interchange format. Unrecognized
/// strings map to [`TokenType::Generic`] so vendor extensions pass through
/// with their raw value instead of failing the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenType {
    Color,
    Dimension,
    Spacing,
    Sizing,
    Opacity,
    BorderRadius,
    BorderWidth,
    FontFamily,
    FontWeight,
    FontSize,
    LineHeight,
    LetterSpacing,
    ParagraphSpacing,
    Shadow,
    Typography,
    Generic,
}

impl TokenType {
    /// Map an interchange-format `type` string to a token kind.
    ///
    /// Accepts both the plural spellings used by set documents
    /// (`fontFamilies`) and the singular forms.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "color" => TokenType::Color,
            "dimension" => TokenType::Dimension,
            "spacing" => TokenType::Spacing,
            "sizing" => TokenType::Sizing,
            "opacity" => TokenType::Opacity,
            "borderRadius" => TokenType::BorderRadius,
            "borderWidth" => TokenType::BorderWidth,
            "fontFamilies" | "fontFamily" => TokenType::FontFamily,
            "fontWeights" | "fontWeight" => TokenType::FontWeight,
            "fontSizes" | "fontSize" => TokenType::FontSize,
            "lineHeights" | "lineHeight" => TokenType::LineHeight,
            "letterSpacing" => TokenType::LetterSpacing,
            "paragraphSpacing" => TokenType::ParagraphSpacing,
            "boxShadow" | "shadow" => TokenType::Shadow,
            "typography" => TokenType::Typography,
            _ => TokenType::Generic,
        }
    }

    /// Display name used for synthesized root groups (one per brand per type).
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenType::Color => "Color",
            TokenType::Dimension => "Dimension",
            TokenType::Spacing => "Spacing",
            TokenType::Sizing => "Sizing",
            TokenType::Opacity => "Opacity",
            TokenType::BorderRadius => "Border Radius",
            TokenType::BorderWidth => "Border Width",
            TokenType::FontFamily => "Font Family",
            TokenType::FontWeight => "Font Weight",
            TokenType::FontSize => "Font Size",
            TokenType::LineHeight => "Line Height",
            TokenType::LetterSpacing => "Letter Spacing",
            TokenType::ParagraphSpacing => "Paragraph Spacing",
            TokenType::Shadow => "Shadow",
            TokenType::Typography => "Typography",
            TokenType::Generic => "Generic",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A named design value with a stable identity across synchronization runs.
///
/// `parent_id` is a weak back-reference to the owning [`TokenGroup`], used
/// only for path reconstruction; ownership lives in the group's
/// `children_ids`.
///
/// [`TokenGroup`]: crate::TokenGroup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Backend-assigned identity; empty until the differ assigns one
    pub id: String,
    /// Brand the token belongs to
    pub brand_id: String,
    /// Token name (leaf name, not a path)
    pub name: String,
    /// Semantic kind
    pub token_type: TokenType,
    /// Resolved value (literal, references already chased)
    pub value: Value,
    #[serde(default)]
    pub description: Option<String>,
    /// Owning group, when placed in a tree
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Position among siblings; `None` sorts last
    #[serde(default)]
    pub sort_order: Option<i64>,
    /// Backend version identity, carried through updates
    #[serde(default)]
    pub version_id: Option<String>,
    /// Theme the value belongs to, for override tokens
    #[serde(default)]
    pub theme_id: Option<String>,
}

impl Token {
    /// Create a token with no identity and no tree placement.
    pub fn new(
        brand_id: impl Into<String>,
        name: impl Into<String>,
        token_type: TokenType,
        value: Value,
    ) -> Self {
        Self {
            id: String::new(),
            brand_id: brand_id.into(),
            name: name.into(),
            token_type,
            value,
            description: None,
            parent_id: None,
            sort_order: None,
            version_id: None,
            theme_id: None,
        }
    }

    /// Whether the differ has assigned an identity yet.
    pub fn has_identity(&self) -> bool {
        !self.id.is_empty()
    }
}
