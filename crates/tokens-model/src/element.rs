//! Tagged union over tokens and groups
//!
//! Tree building works over a mixed pool of tokens and groups. Rather
//! than inspecting runtime types, the pool is expressed as a closed
//! tagged union with the accessors the tree code needs.

use crate::group::TokenGroup;
use crate::token::{Token, TokenType};

/// A token or a group, as found in a brand's flat element pool.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeElement {
    Token(Token),
    Group(TokenGroup),
}

impl TreeElement {
    /// Identity of the wrapped element.
    pub fn id(&self) -> &str {
        match self {
            TreeElement::Token(token) => &token.id,
            TreeElement::Group(group) => &group.id,
        }
    }

    /// Name of the wrapped element.
    pub fn name(&self) -> &str {
        match self {
            TreeElement::Token(token) => &token.name,
            TreeElement::Group(group) => &group.name,
        }
    }

    /// Whether this element can hold children.
    pub fn is_group(&self) -> bool {
        matches!(self, TreeElement::Group(_))
    }

    /// Token kind of the wrapped element.
    pub fn token_type(&self) -> TokenType {
        match self {
            TreeElement::Token(token) => token.token_type,
            TreeElement::Group(group) => group.token_type,
        }
    }

    /// Parent reference, if the element is placed in a tree.
    pub fn parent_id(&self) -> Option<&str> {
        match self {
            TreeElement::Token(token) => token.parent_id.as_deref(),
            TreeElement::Group(group) => group.parent_id.as_deref(),
        }
    }

    /// Sibling position; `None` sorts last.
    pub fn sort_order(&self) -> Option<i64> {
        match self {
            TreeElement::Token(token) => token.sort_order,
            TreeElement::Group(group) => group.sort_order,
        }
    }

    /// The wrapped group, if any.
    pub fn as_group(&self) -> Option<&TokenGroup> {
        match self {
            TreeElement::Group(group) => Some(group),
            TreeElement::Token(_) => None,
        }
    }

    /// The wrapped token, if any.
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            TreeElement::Token(token) => Some(token),
            TreeElement::Group(_) => None,
        }
    }
}

impl From<Token> for TreeElement {
    fn from(token: Token) -> Self {
        TreeElement::Token(token)
    }
}

impl From<TokenGroup> for TreeElement {
    fn from(group: TokenGroup) -> Self {
        TreeElement::Group(group)
    }
}
