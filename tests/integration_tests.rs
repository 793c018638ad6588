//! Integration tests for end-to-end lowering.
//!
//! These tests verify that the complete pipeline works correctly from source
//! text through tokenization and parsing to the scoped instruction IR.

use dotscript::{
    compile_source,
    config::CompileOptions,
    errors::errors::ErrorKind,
    ir::{instructions::Instruction, types::ValueType},
    lexer::tokens::render_tokens,
};

const PROGRAM: &str = r#"// Area helpers
scale = 2.

show: (v) => {
    @{ print(v); }
}

area: (w, h = 1) => {
    a = w * h.
    return a * scale.
}

name = "box".
size = area(3, 4) + 1.

if size > 10 => {
    show(size).
}
"#;

fn options() -> CompileOptions {
    CompileOptions::new("test.ds")
}

#[test]
fn test_compile_program() {
    let program = compile_source(PROGRAM, &options()).unwrap();

    assert_eq!(
        program.to_string(),
        "function area(w, h = 1) -> int\n\
         \x20 a = w h * : int\n\
         \x20 return a scale * : int\n\
         function show(v) -> auto\n\
         \x20 inline { print ( v ) ; }\n\
         global\n\
         \x20 scale = 2 : int\n\
         \x20 name = box : string\n\
         \x20 call area(w = 3, h = 4)\n\
         \x20 size = @ area ( 3 , 4 ) 1 + : int\n\
         \x20 if size 10 >\n\
         \x20   call show(v = size)\n"
    );
}

#[test]
fn test_call_bindings_update_signatures() {
    let program = compile_source(PROGRAM, &options()).unwrap();

    let area = program.get_function("area").unwrap();
    assert_eq!(area.arguments[0].ty, ValueType::Int);
    assert_eq!(area.arguments[1].ty, ValueType::Int);
    assert_eq!(area.return_type, ValueType::Int);

    let show = program.get_function("show").unwrap();
    assert_eq!(show.arguments[0].ty, ValueType::Int);
    assert_eq!(show.return_type, ValueType::Auto);
}

#[test]
fn test_translator_drains_in_order() {
    let mut program = compile_source(PROGRAM, &options()).unwrap();
    let global = program.global_mut();

    let mut names = vec![];
    while let Some(instruction) = global.next_instruction() {
        names.push(instruction.name());
    }

    assert_eq!(
        names,
        vec![
            "Assignment",
            "Assignment",
            "FunctionCall",
            "Assignment",
            "IfStatement"
        ]
    );
    assert_eq!(global.instruction_count(), 0);
}

#[test]
fn test_if_body_is_its_own_scope() {
    let program = compile_source(PROGRAM, &options()).unwrap();

    let Some(Instruction::IfStatement(statement)) = program.global().instructions().last() else {
        panic!("expected the if statement last");
    };

    let body = program.scope(statement.body);
    assert_eq!(body.instruction_count(), 1);

    let Some(Instruction::FunctionCall(call)) = body.instructions().next() else {
        panic!("expected a call in the if body");
    };
    assert_eq!(call.function, "show");
    assert_eq!(render_tokens(&call.arguments[0].value), "size");
}

#[test]
fn test_arity_error_is_reported() {
    let source = "f: (a, b = 2) => { return a + b. }\nf(3).";
    let error = compile_source(source, &options()).unwrap_err();

    assert_eq!(error.kind(), ErrorKind::ArityMismatch);
    assert_eq!(
        error.to_string(),
        "Error: invalid number of arguments in call to function \"f\": expected 2, received 1 on line 2."
    );
}

#[test]
fn test_undeclared_condition_variable() {
    let error = compile_source("if x > 1 => { y = 2. }", &options()).unwrap_err();

    assert_eq!(error.kind(), ErrorKind::UndefinedReference);
    assert_eq!(error.get_line(), 1);
}

#[test]
fn test_first_error_stops_compilation() {
    let source = "x = 1.\ny = z.\nw = q.";
    let error = compile_source(source, &options()).unwrap_err();

    assert_eq!(error.get_line(), 2);
    assert!(error.is_critical());
}

#[test]
fn test_line_start_biases_error_lines() {
    let source = "// prelude line one\n// prelude line two\nx = y.";
    let options = options().with_line_start(2);
    let error = compile_source(source, &options).unwrap_err();

    assert_eq!(error.get_line(), 1);
}

#[test]
fn test_lexical_error() {
    let error = compile_source("x = 1 $ 2.", &options()).unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Lexical);
}
