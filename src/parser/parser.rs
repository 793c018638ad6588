//! Parser state and the parse entry point.
//!
//! The parser pulls tokens from the [`Lexer`] one at a time and builds the
//! [`GlobalProgram`] directly; there is no intermediate syntax tree. The
//! active scope is passed explicitly to every statement and expression
//! routine, so nested blocks never need to save and restore parser state.
//!
//! It maintains:
//! - The statement lookup table, keyed by statement-leading token
//! - The function currently being defined, whose arguments are visible
//!   inside its body and whose return type its `return`s pin

use std::collections::HashMap;

use tracing::debug;

use crate::{
    errors::errors::{Error, ErrorImpl},
    ir::{
        program::{Function, GlobalProgram, ScopeId, GLOBAL_SCOPE},
        types::ValueType,
    },
    lexer::{
        lexer::Lexer,
        tokens::{Token, TokenKind},
    },
};

use super::{
    lookups::{create_token_lookups, StmtHandler, StmtLookup},
    stmt::parse_block,
};

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// The token source
    lexer: Lexer,
    /// The program under construction
    program: GlobalProgram,
    /// The function whose body is being parsed, not yet in the function table
    defining: Option<Function>,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Self {
        Parser {
            lexer,
            program: GlobalProgram::new(),
            defining: None,
            stmt_lookup: HashMap::new(),
        }
    }

    /// Reads the next token from the lexer.
    pub fn advance(&mut self) -> Result<Token, Error> {
        self.lexer.next_token()
    }

    /// The most recently read token.
    pub fn last_token(&self) -> &Token {
        self.lexer.last_token()
    }

    pub fn last_token_kind(&self) -> TokenKind {
        self.lexer.last_token().kind
    }

    /// Reads the next token and requires it to be of `expected_kind`.
    ///
    /// Returns `error` on mismatch, or a generic unexpected-token error when
    /// none is given.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        let token = self.advance()?;
        if token.kind == expected_kind {
            return Ok(token);
        }

        match error {
            Some(error) => Err(error),
            None if token.kind == TokenKind::EOF => {
                Err(Error::new(ErrorImpl::UnexpectedEndOfInput, token.line))
            }
            None => Err(Error::new(
                ErrorImpl::UnexpectedToken { token: token.text },
                token.line,
            )),
        }
    }

    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// The current source line.
    pub fn get_line(&self) -> i32 {
        self.lexer.line()
    }

    pub fn program(&self) -> &GlobalProgram {
        &self.program
    }

    pub fn program_mut(&mut self) -> &mut GlobalProgram {
        &mut self.program
    }

    pub fn defining_mut(&mut self) -> Option<&mut Function> {
        self.defining.as_mut()
    }

    pub fn begin_definition(&mut self, function: Function) {
        self.defining = Some(function);
    }

    pub fn finish_definition(&mut self) -> Option<Function> {
        self.defining.take()
    }

    /// Resolves a name used as an operand to its type.
    ///
    /// Looks in `scope` itself, then in the arguments of the function being
    /// defined when `scope` is that function's body, then in the global scope.
    pub fn resolve_variable(&self, scope: ScopeId, name: &str) -> Option<ValueType> {
        if let Some(variable) = self.program.scope(scope).get_local_variable(name) {
            return Some(variable.ty);
        }

        if let Some(function) = &self.defining {
            if function.body == scope {
                if let Some(argument) = function.get_argument(name) {
                    return Some(argument.ty);
                }
            }
        }

        self.program.get_variable(scope, name).map(|variable| variable.ty)
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }
}

/// Parses a whole token stream into a [`GlobalProgram`].
///
/// This is the main entry point for parsing. It stops at the first error.
pub fn parse(lexer: Lexer) -> Result<GlobalProgram, Error> {
    let mut parser = Parser::new(lexer);
    create_token_lookups(&mut parser);

    let terminator = parse_block(&mut parser, GLOBAL_SCOPE)?;

    // A `}` closing nothing ends the global block early
    if terminator == TokenKind::CloseCurly {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: String::from("}"),
            },
            parser.last_token().line,
        ));
    }

    debug!(
        scopes = parser.program.scope_count(),
        functions = parser.program.functions().count(),
        "parsed program"
    );

    Ok(parser.program)
}
