use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{errors::errors::Error, ir::program::ScopeId, lexer::tokens::{Token, TokenKind}};

use super::{parser::Parser, stmt::*};

/// Operator precedence for the shunting-yard sub-parsers.
///
/// Each table only uses the levels it needs; `Sentinel` is the open
/// parenthesis, which no operator can pop.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Sentinel,
    Logical,
    Additive,
    Multiplicative,
    Relational,
}

lazy_static! {
    pub static ref ARITHMETIC_LOOKUP: BPLookup = {
        let mut map = HashMap::new();
        map.insert(TokenKind::Star, BindingPower::Multiplicative);
        map.insert(TokenKind::Slash, BindingPower::Multiplicative);
        map.insert(TokenKind::Plus, BindingPower::Additive);
        map.insert(TokenKind::Minus, BindingPower::Additive);
        map.insert(TokenKind::OpenParen, BindingPower::Sentinel);
        map
    };

    pub static ref LOGICAL_LOOKUP: BPLookup = {
        let mut map = HashMap::new();
        map.insert(TokenKind::Greater, BindingPower::Relational);
        map.insert(TokenKind::Less, BindingPower::Relational);
        map.insert(TokenKind::GreaterEquals, BindingPower::Relational);
        map.insert(TokenKind::LessEquals, BindingPower::Relational);
        map.insert(TokenKind::And, BindingPower::Logical);
        map.insert(TokenKind::Or, BindingPower::Logical);
        map.insert(TokenKind::OpenParen, BindingPower::Sentinel);
        map
    };
}

/// Handles one statement whose leading token has already been consumed.
pub type StmtHandler = fn(&mut Parser, ScopeId, Token) -> Result<(), Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    parser.stmt(TokenKind::Name, parse_name_stmt);
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
    parser.stmt(TokenKind::At, parse_inline_code_stmt);

    // Recognised, but not lowered to any instruction
    parser.stmt(TokenKind::ElseIf, parse_unlowered_stmt);
    parser.stmt(TokenKind::While, parse_unlowered_stmt);
    parser.stmt(TokenKind::ForAll, parse_unlowered_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;
