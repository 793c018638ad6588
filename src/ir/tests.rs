use crate::lexer::tokens::{Token, TokenKind};

use super::{
    instructions::{InlineInjection, Instruction},
    program::{Function, GlobalProgram, ProgramKind, Variable, GLOBAL_SCOPE},
    types::ValueType,
};

fn variable(name: &str, ty: ValueType) -> Variable {
    Variable {
        name: String::from(name),
        expression: vec![Token::synthetic(TokenKind::Int, "1", 1)],
        ty,
    }
}

fn inline(text: &str) -> Instruction {
    Instruction::InlineInjection(InlineInjection {
        code: vec![Token::synthetic(TokenKind::Name, text, 1)],
    })
}

#[test]
fn test_instructions_are_fifo() {
    let mut program = GlobalProgram::new();
    let global = program.global_mut();

    global.push_instruction(inline("first"));
    global.push_instruction(inline("second"));
    assert_eq!(global.instruction_count(), 2);

    let Some(Instruction::InlineInjection(first)) = global.next_instruction() else {
        panic!("expected inline code");
    };
    assert_eq!(first.code[0].text, "first");

    let Some(Instruction::InlineInjection(second)) = global.next_instruction() else {
        panic!("expected inline code");
    };
    assert_eq!(second.code[0].text, "second");

    assert!(global.next_instruction().is_none());
}

#[test]
fn test_lookup_is_local_then_global() {
    let mut program = GlobalProgram::new();
    program.global_mut().push_variable(variable("g", ValueType::Int));

    let function = program.push_scope(GLOBAL_SCOPE, ProgramKind::Function);
    program
        .scope_mut(function)
        .push_variable(variable("local", ValueType::Float));

    let block = program.push_scope(function, ProgramKind::Block);
    program
        .scope_mut(block)
        .push_variable(variable("inner", ValueType::String));

    assert_eq!(program.get_variable(block, "inner").unwrap().ty, ValueType::String);
    assert_eq!(program.get_variable(block, "g").unwrap().ty, ValueType::Int);
    assert_eq!(program.get_variable(function, "local").unwrap().ty, ValueType::Float);
    // The function scope sits between the block and the global scope
    assert!(program.get_variable(block, "local").is_none());
    assert!(program.get_variable(GLOBAL_SCOPE, "local").is_none());
}

#[test]
fn test_local_shadows_global() {
    let mut program = GlobalProgram::new();
    program.global_mut().push_variable(variable("x", ValueType::Int));

    let function = program.push_scope(GLOBAL_SCOPE, ProgramKind::Function);
    program
        .scope_mut(function)
        .push_variable(variable("x", ValueType::String));

    assert_eq!(program.get_variable(function, "x").unwrap().ty, ValueType::String);
    assert_eq!(program.get_variable(GLOBAL_SCOPE, "x").unwrap().ty, ValueType::Int);
}

#[test]
fn test_enclosing_function() {
    let mut program = GlobalProgram::new();
    let function = program.push_scope(GLOBAL_SCOPE, ProgramKind::Function);
    let block = program.push_scope(function, ProgramKind::Block);
    let global_block = program.push_scope(GLOBAL_SCOPE, ProgramKind::Block);

    assert_eq!(program.enclosing_function(function), Some(function));
    assert_eq!(program.enclosing_function(block), Some(function));
    assert_eq!(program.enclosing_function(global_block), None);
    assert_eq!(program.enclosing_function(GLOBAL_SCOPE), None);
}

#[test]
fn test_function_table() {
    let mut program = GlobalProgram::new();
    let body = program.push_scope(GLOBAL_SCOPE, ProgramKind::Function);

    program.push_function(Function::new("b", body));
    program.push_function(Function::new("a", body));

    let names: Vec<&str> = program.functions().map(|function| function.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert!(program.get_function("c").is_none());

    program.get_function_mut("a").unwrap().return_type = ValueType::Float;
    assert!(program.get_function("a").unwrap().check_return_type(ValueType::Float));
}

#[test]
fn test_absorb_literal() {
    use ValueType::*;

    assert_eq!(Unresolved.absorb_literal(Int), Int);
    assert_eq!(Int.absorb_literal(Float), Float);
    assert_eq!(Float.absorb_literal(Int), Float);
    assert_eq!(Int.absorb_literal(String), String);
    assert_eq!(String.absorb_literal(Float), String);
    assert_eq!(Auto.absorb_literal(Int), Int);
}

#[test]
fn test_placeholder_types() {
    assert!(ValueType::Unresolved.is_placeholder());
    assert!(ValueType::Auto.is_placeholder());
    assert!(!ValueType::Int.is_placeholder());
    assert_eq!(ValueType::of_literal(TokenKind::Float), Some(ValueType::Float));
    assert_eq!(ValueType::of_literal(TokenKind::Name), None);
}

#[test]
fn test_display_dump() {
    let mut program = GlobalProgram::new();
    program.global_mut().push_instruction(inline("code"));

    assert_eq!(program.to_string(), "global\n  inline { code }\n");
}
