use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("if", TokenKind::If);
        map.insert("while", TokenKind::While);
        map.insert("forall", TokenKind::ForAll);
        map.insert("return", TokenKind::Return);
        map.insert("and", TokenKind::And);
        map.insert("or", TokenKind::Or);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Name,
    Int,
    Float,
    String,

    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,

    Comma,
    Colon,
    Dot,
    Implies, // =>

    Assignment,  // =
    PlusEquals,  // +=
    MinusEquals, // -=
    StarEquals,  // *=
    SlashEquals, // /=

    Plus,
    Minus,
    Star,
    Slash,

    Greater,
    Less,
    GreaterEquals,
    LessEquals,

    And,
    Or,

    // Inline code marker, doubles as the call marker in postfix output
    At,
    // Synthetic, wraps string arguments of a call
    Quote,
    // Punctuation with no meaning outside inline code
    Symbol,

    // Reserved
    If,
    ElseIf,
    While,
    ForAll,
    Return,
}

impl TokenKind {
    pub fn is_assignment(&self) -> bool {
        matches!(
            self,
            TokenKind::Assignment
                | TokenKind::PlusEquals
                | TokenKind::MinusEquals
                | TokenKind::StarEquals
                | TokenKind::SlashEquals
        )
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            TokenKind::Plus | TokenKind::Minus | TokenKind::Star | TokenKind::Slash
        )
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            TokenKind::Greater | TokenKind::Less | TokenKind::GreaterEquals | TokenKind::LessEquals
        )
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, TokenKind::Int | TokenKind::Float | TokenKind::String)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: i32,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl Token {
    /// Builds a token the tokenizer never produces itself (call markers, quotes,
    /// argument separators spliced into postfix output).
    pub fn synthetic(kind: TokenKind, text: &str, line: i32) -> Self {
        Token {
            kind,
            text: String::from(text),
            line,
        }
    }

    /// Kind and, for tokens whose text matters, the text, e.g. `Int (42)`.
    pub fn debug(&self) -> String {
        if self.kind.is_literal() || self.kind == TokenKind::Name {
            format!("{} ({})", self.kind, self.text)
        } else {
            format!("{} ()", self.kind)
        }
    }
}

/// Joins token texts with single spaces, e.g. `1 2 3 * +`.
pub fn render_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|token| token.text.as_str())
        .collect::<Vec<&str>>()
        .join(" ")
}
