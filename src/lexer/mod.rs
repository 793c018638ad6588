//! Lexical analysis module.
//!
//! This module contains the tokenizer that turns a source buffer into
//! tokens for the parser. It handles:
//!
//! - Tokenization using an ordered table of anchored regex patterns
//! - Recognition of keywords, names, literals and operators
//! - Line tracking (with an optional starting bias) for diagnostics
//! - Comments and whitespace handling

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
