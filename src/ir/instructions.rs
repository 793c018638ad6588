//! Instruction IR appended to each scope and consumed by the translator.

use crate::lexer::tokens::{Token, TokenKind};

use super::{
    program::{ScopeId, Variable},
    types::ValueType,
};

/// A postfix (reverse-Polish) token sequence, or a raw token run for inline code.
pub type Postfix = Vec<Token>;

#[derive(Debug, Clone)]
pub enum Instruction {
    Assignment(Assignment),
    FunctionCall(FunctionCall),
    IfStatement(IfStatement),
    ReturnOperation(ReturnOperation),
    InlineInjection(InlineInjection),
}

impl Instruction {
    pub fn name(&self) -> &'static str {
        match self {
            Instruction::Assignment(_) => "Assignment",
            Instruction::FunctionCall(_) => "FunctionCall",
            Instruction::IfStatement(_) => "IfStatement",
            Instruction::ReturnOperation(_) => "ReturnOperation",
            Instruction::InlineInjection(_) => "InlineInjection",
        }
    }
}

/// `name = expr.` and the compound forms `+= -= *= /=`.
#[derive(Debug, Clone)]
pub struct Assignment {
    pub variable: Variable,
    pub operator: TokenKind,
}

/// A call statement bound to a function from the global table.
#[derive(Debug, Clone)]
pub struct FunctionCall {
    pub function: String,
    pub arguments: Vec<BoundArgument>,
}

impl FunctionCall {
    pub fn new(function: &str) -> Self {
        FunctionCall {
            function: String::from(function),
            arguments: vec![],
        }
    }

    pub fn push_argument(&mut self, argument: BoundArgument) {
        self.arguments.push(argument);
    }
}

/// The value bound to one declared argument at a call site.
///
/// String-typed values are wrapped in `Quote` tokens at both ends.
#[derive(Debug, Clone)]
pub struct BoundArgument {
    pub name: String,
    pub value: Postfix,
    pub ty: ValueType,
}

#[derive(Debug, Clone)]
pub struct IfStatement {
    pub condition: Postfix,
    pub body: ScopeId,
}

#[derive(Debug, Clone)]
pub struct ReturnOperation {
    pub value: Postfix,
    pub ty: ValueType,
}

/// Raw tokens between `@{` and the matching `}`, emitted without reinterpretation.
#[derive(Debug, Clone)]
pub struct InlineInjection {
    pub code: Vec<Token>,
}
