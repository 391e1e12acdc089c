//! Error types for tokens-parser

/// Result type for tokens-parser operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing an interchange document
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document root is not a JSON object
    #[error("Token document root must be an object")]
    RootNotObject,

    /// A subtree is neither a leaf value nor a container
    #[error("Unsupported node shape at '{path}'")]
    UnsupportedNode { path: String },

    /// A leaf's `type` field is not a string
    #[error("Token at '{path}' has a non-string type")]
    InvalidNodeType { path: String },

    /// A parsed leaf claims a root key with no corresponding set
    #[error("Node '{path}' references unknown token set '{root_key}'")]
    UnknownRootKey { path: String, root_key: String },

    /// A theme definition is missing a required field
    #[error("Theme definition is missing required field '{field}'")]
    ThemeMissingField { field: String },

    /// A theme selects a set with an unrecognized priority string
    #[error("Theme '{theme}' uses invalid set priority '{priority}'")]
    InvalidSetPriority { theme: String, priority: String },

    /// JSON deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
