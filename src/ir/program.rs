//! Scope and symbol model.
//!
//! Every lexical block (the file itself, a function body, an if-body) is a
//! [`Program`] stored in the arena owned by [`GlobalProgram`]. Scopes refer to
//! their parent by [`ScopeId`], never by reference, so the tree has a single owner.

use std::{
    collections::{btree_map, BTreeMap, HashMap, VecDeque},
    fmt::Display,
};

use crate::lexer::tokens::{render_tokens, TokenKind};

use super::{
    instructions::{Instruction, Postfix},
    types::ValueType,
};

pub type ScopeId = usize;

/// The file-level scope is always the first scope in the arena.
pub const GLOBAL_SCOPE: ScopeId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramKind {
    Global,
    Function,
    Block,
}

#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub expression: Postfix,
    pub ty: ValueType,
}

#[derive(Debug, Clone)]
pub struct Argument {
    pub name: String,
    /// A single literal token, when the definition supplied `= literal`.
    pub default: Option<Postfix>,
    pub ty: ValueType,
}

/// One lexical block: its variables and its FIFO instruction queue.
#[derive(Debug, Clone)]
pub struct Program {
    pub parent: Option<ScopeId>,
    pub kind: ProgramKind,
    variables: HashMap<String, Variable>,
    instructions: VecDeque<Instruction>,
}

impl Program {
    pub fn new(parent: Option<ScopeId>, kind: ProgramKind) -> Self {
        Program {
            parent,
            kind,
            variables: HashMap::new(),
            instructions: VecDeque::new(),
        }
    }

    pub fn get_local_variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    /// Declares `variable`, replacing any earlier variable of the same name.
    pub fn push_variable(&mut self, variable: Variable) {
        self.variables.insert(variable.name.clone(), variable);
    }

    pub fn push_instruction(&mut self, instruction: Instruction) {
        self.instructions.push_back(instruction);
    }

    /// Pops the oldest instruction; the translator drains each queue once.
    pub fn next_instruction(&mut self) -> Option<Instruction> {
        self.instructions.pop_front()
    }

    pub fn instructions(&self) -> std::collections::vec_deque::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }
}

#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub arguments: Vec<Argument>,
    pub return_type: ValueType,
    /// The function body scope.
    pub body: ScopeId,
}

impl Function {
    pub fn new(name: &str, body: ScopeId) -> Self {
        Function {
            name: String::from(name),
            arguments: vec![],
            return_type: ValueType::Unresolved,
            body,
        }
    }

    pub fn push_argument(&mut self, argument: Argument) {
        self.arguments.push(argument);
    }

    pub fn get_argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|argument| argument.name == name)
    }

    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    pub fn check_return_type(&self, ty: ValueType) -> bool {
        self.return_type == ty
    }
}

/// The root of the IR handed to the translator.
#[derive(Debug, Clone)]
pub struct GlobalProgram {
    scopes: Vec<Program>,
    functions: BTreeMap<String, Function>,
}

impl Default for GlobalProgram {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobalProgram {
    pub fn new() -> Self {
        GlobalProgram {
            scopes: vec![Program::new(None, ProgramKind::Global)],
            functions: BTreeMap::new(),
        }
    }

    pub fn push_scope(&mut self, parent: ScopeId, kind: ProgramKind) -> ScopeId {
        self.scopes.push(Program::new(Some(parent), kind));
        self.scopes.len() - 1
    }

    pub fn scope(&self, id: ScopeId) -> &Program {
        &self.scopes[id]
    }

    pub fn scope_mut(&mut self, id: ScopeId) -> &mut Program {
        &mut self.scopes[id]
    }

    pub fn global(&self) -> &Program {
        &self.scopes[GLOBAL_SCOPE]
    }

    pub fn global_mut(&mut self) -> &mut Program {
        &mut self.scopes[GLOBAL_SCOPE]
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Looks `name` up in `scope`, then directly in the global scope.
    ///
    /// Intermediate scopes between the two are not searched.
    pub fn get_variable(&self, scope: ScopeId, name: &str) -> Option<&Variable> {
        if let Some(variable) = self.scopes[scope].get_local_variable(name) {
            return Some(variable);
        }

        let mut current = scope;
        while self.scopes[current].kind != ProgramKind::Global {
            current = self.scopes[current].parent?;
        }

        self.scopes[current].get_local_variable(name)
    }

    /// The nearest function scope at or above `scope`.
    pub fn enclosing_function(&self, scope: ScopeId) -> Option<ScopeId> {
        let mut current = scope;
        loop {
            if self.scopes[current].kind == ProgramKind::Function {
                return Some(current);
            }
            current = self.scopes[current].parent?;
        }
    }

    pub fn get_function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn get_function_mut(&mut self, name: &str) -> Option<&mut Function> {
        self.functions.get_mut(name)
    }

    pub fn push_function(&mut self, function: Function) {
        self.functions.insert(function.name.clone(), function);
    }

    pub fn functions(&self) -> btree_map::Values<'_, String, Function> {
        self.functions.values()
    }

    fn fmt_scope(
        &self,
        f: &mut std::fmt::Formatter<'_>,
        scope: ScopeId,
        depth: usize,
    ) -> std::fmt::Result {
        let indent = "  ".repeat(depth);

        for instruction in self.scopes[scope].instructions() {
            match instruction {
                Instruction::Assignment(assignment) => writeln!(
                    f,
                    "{}{} {} {} : {}",
                    indent,
                    assignment.variable.name,
                    assignment_symbol(assignment.operator),
                    render_tokens(&assignment.variable.expression),
                    assignment.variable.ty
                )?,
                Instruction::FunctionCall(call) => writeln!(
                    f,
                    "{}call {}({})",
                    indent,
                    call.function,
                    call.arguments
                        .iter()
                        .map(|argument| format!("{} = {}", argument.name, render_tokens(&argument.value)))
                        .collect::<Vec<String>>()
                        .join(", ")
                )?,
                Instruction::IfStatement(statement) => {
                    writeln!(f, "{}if {}", indent, render_tokens(&statement.condition))?;
                    self.fmt_scope(f, statement.body, depth + 1)?;
                }
                Instruction::ReturnOperation(operation) => writeln!(
                    f,
                    "{}return {} : {}",
                    indent,
                    render_tokens(&operation.value),
                    operation.ty
                )?,
                Instruction::InlineInjection(injection) => {
                    writeln!(f, "{}inline {{ {} }}", indent, render_tokens(&injection.code))?
                }
            }
        }

        Ok(())
    }
}

fn assignment_symbol(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::PlusEquals => "+=",
        TokenKind::MinusEquals => "-=",
        TokenKind::StarEquals => "*=",
        TokenKind::SlashEquals => "/=",
        _ => "=",
    }
}

impl Display for GlobalProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for function in self.functions() {
            let arguments = function
                .arguments
                .iter()
                .map(|argument| match &argument.default {
                    Some(default) => format!("{} = {}", argument.name, render_tokens(default)),
                    None => argument.name.clone(),
                })
                .collect::<Vec<String>>()
                .join(", ");

            writeln!(
                f,
                "function {}({}) -> {}",
                function.name, arguments, function.return_type
            )?;
            self.fmt_scope(f, function.body, 1)?;
        }

        writeln!(f, "global")?;
        self.fmt_scope(f, GLOBAL_SCOPE, 1)
    }
}
