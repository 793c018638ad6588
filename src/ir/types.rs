//! Value types inferred for expressions, variables, arguments and returns.

use std::fmt::Display;

use crate::lexer::tokens::TokenKind;

/// The inferred type of an expression.
///
/// `Unresolved` means nothing has been inferred yet (an empty expression, an
/// argument without a default). `Auto` is the placeholder return type of a
/// function that has been called before any of its `return`s pinned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Unresolved,
    Auto,
    Int,
    Float,
    String,
}

impl ValueType {
    /// The type a literal token carries, if the token is a literal.
    pub fn of_literal(kind: TokenKind) -> Option<ValueType> {
        match kind {
            TokenKind::Int => Some(ValueType::Int),
            TokenKind::Float => Some(ValueType::Float),
            TokenKind::String => Some(ValueType::String),
            _ => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ValueType::Unresolved | ValueType::Auto)
    }

    /// Running expression type after a literal operand.
    ///
    /// Once `String` is seen the type is pinned; otherwise `Float` dominates `Int`.
    pub fn absorb_literal(self, literal: ValueType) -> ValueType {
        match (self, literal) {
            (ValueType::String, _) | (_, ValueType::String) => ValueType::String,
            (_, ValueType::Float) => ValueType::Float,
            (ValueType::Float, ValueType::Int) => ValueType::Float,
            (_, ValueType::Int) => ValueType::Int,
            (current, _) => current,
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueType::Unresolved => "unresolved",
            ValueType::Auto => "auto",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::String => "string",
        };
        write!(f, "{}", name)
    }
}
