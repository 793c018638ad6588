use std::mem;

use tracing::{debug, trace};

use crate::{
    errors::errors::{Error, ErrorImpl},
    ir::{
        instructions::{
            Assignment, BoundArgument, FunctionCall, IfStatement, InlineInjection, Instruction,
            ReturnOperation,
        },
        program::{Argument, Function, ProgramKind, ScopeId, Variable, GLOBAL_SCOPE},
        types::ValueType,
    },
    lexer::tokens::{render_tokens, Token, TokenKind},
};

use super::{
    expr::{parse_expression, parse_logical_expression},
    parser::Parser,
};

/// Parses statements into `scope` until a `}` or the end of input.
///
/// Returns the kind of the token that stopped the loop so the caller can
/// decide whether the block was properly closed. Tokens that start no
/// statement (such as the `.` after a call) are skipped.
pub fn parse_block(parser: &mut Parser, scope: ScopeId) -> Result<TokenKind, Error> {
    let mut token = parser.advance()?;

    while token.kind != TokenKind::EOF && token.kind != TokenKind::CloseCurly {
        let handler = parser.get_stmt_lookup().get(&token.kind).copied();
        match handler {
            Some(handler) => handler(parser, scope, token)?,
            None => trace!(token = %token.debug(), line = token.line, "skipping token"),
        }

        token = parser.advance()?;
    }

    Ok(token.kind)
}

/// A statement starting with a name: call, function definition or assignment.
pub fn parse_name_stmt(parser: &mut Parser, scope: ScopeId, name: Token) -> Result<(), Error> {
    let next = parser.advance()?;

    match next.kind {
        TokenKind::OpenParen => {
            let (call, _) = parse_function_call(parser, scope, &name)?;
            parser
                .program_mut()
                .scope_mut(scope)
                .push_instruction(Instruction::FunctionCall(call));
            Ok(())
        }
        TokenKind::Colon => {
            if scope != GLOBAL_SCOPE {
                return Err(Error::new(
                    ErrorImpl::MisplacedStatement {
                        message: String::from(
                            "function definitions may only occur in the global scope",
                        ),
                    },
                    name.line,
                ));
            }

            parse_function_definition(parser, &name)
        }
        kind if kind.is_assignment() => parse_assignment(parser, scope, &name, kind),
        _ => Err(Error::new(
            ErrorImpl::UnknownStatement { token: name.text },
            name.line,
        )),
    }
}

fn parse_assignment(
    parser: &mut Parser,
    scope: ScopeId,
    name: &Token,
    operator: TokenKind,
) -> Result<(), Error> {
    let (expression, ty) = parse_expression(parser, scope, TokenKind::Dot)?;

    if ty == ValueType::Unresolved {
        return Err(Error::new(ErrorImpl::EmptyExpression, name.line));
    }

    debug!(
        variable = %name.text,
        postfix = %render_tokens(&expression),
        %ty,
        "parsed assignment"
    );

    let variable = Variable {
        name: name.text.clone(),
        expression,
        ty,
    };

    let program = parser.program_mut().scope_mut(scope);
    program.push_variable(variable.clone());
    program.push_instruction(Instruction::Assignment(Assignment { variable, operator }));

    Ok(())
}

/// Binds the arguments of a call whose `(` has just been read.
///
/// Leaves the closing `)` as the last token. Returns the call together with
/// the callee's return type, which is pinned to `auto` if still unresolved.
/// The caller decides where, if anywhere, the call instruction goes.
pub fn parse_function_call(
    parser: &mut Parser,
    scope: ScopeId,
    name: &Token,
) -> Result<(FunctionCall, ValueType), Error> {
    let function = match parser.program().get_function(&name.text) {
        Some(function) => function.clone(),
        None => {
            return Err(Error::new(
                ErrorImpl::UndefinedFunction {
                    function: name.text.clone(),
                },
                name.line,
            ))
        }
    };

    let mut call = FunctionCall::new(&function.name);
    let mut received = 0;

    if function.arity() > 0 {
        while !matches!(
            parser.last_token_kind(),
            TokenKind::CloseParen | TokenKind::EOF
        ) {
            let (mut value, ty) = parse_expression(parser, scope, TokenKind::Comma)?;

            // `f()` binds nothing; the count check below reports it
            if received == 0
                && value.is_empty()
                && parser.last_token_kind() == TokenKind::CloseParen
            {
                break;
            }

            if ty == ValueType::Unresolved {
                return Err(Error::new(ErrorImpl::EmptyExpression, parser.get_line()));
            }

            if ty == ValueType::String {
                value.insert(0, Token::synthetic(TokenKind::Quote, "\"", name.line));
                value.push(Token::synthetic(TokenKind::Quote, "\"", name.line));
            }

            if let Some(slot) = function.arguments.get(received) {
                call.push_argument(BoundArgument {
                    name: slot.name.clone(),
                    value,
                    ty,
                });

                if slot.ty == ValueType::Unresolved {
                    if let Some(callee) = parser.program_mut().get_function_mut(&function.name) {
                        callee.arguments[received].ty = ty;
                    }
                }
            }

            received += 1;
        }
    } else {
        parser.advance()?;
    }

    if parser.last_token_kind() != TokenKind::CloseParen {
        return Err(Error::new(
            ErrorImpl::MissingDelimiter {
                expected: String::from(")"),
                context: format!("to end the call to function `{}`", function.name),
            },
            parser.get_line(),
        ));
    }

    if received != function.arity() {
        return Err(Error::new(
            ErrorImpl::ArityMismatch {
                function: function.name.clone(),
                expected: function.arity(),
                received,
            },
            name.line,
        ));
    }

    let mut return_type = function.return_type;
    if return_type == ValueType::Unresolved {
        return_type = ValueType::Auto;
        if let Some(callee) = parser.program_mut().get_function_mut(&function.name) {
            callee.return_type = return_type;
        }
    }

    Ok((call, return_type))
}

/// `name: (arguments) => { body }`, where the name and `:` are already read.
fn parse_function_definition(parser: &mut Parser, name: &Token) -> Result<(), Error> {
    if parser.program().get_function(&name.text).is_some() {
        return Err(Error::new(
            ErrorImpl::FunctionRedefinition {
                function: name.text.clone(),
            },
            name.line,
        ));
    }

    let body = parser
        .program_mut()
        .push_scope(GLOBAL_SCOPE, ProgramKind::Function);
    let mut function = Function::new(&name.text, body);

    parser.expect(TokenKind::OpenParen)?;

    let mut argument_name: Option<String> = None;
    let mut default: Option<Vec<Token>> = None;
    let mut default_type = ValueType::Unresolved;

    let mut token = parser.advance()?;
    while !matches!(token.kind, TokenKind::CloseParen | TokenKind::EOF) {
        match token.kind {
            TokenKind::Comma => {
                let Some(argument) = argument_name.take() else {
                    return Err(Error::new(
                        ErrorImpl::UnexpectedToken { token: token.text },
                        token.line,
                    ));
                };

                function.push_argument(Argument {
                    name: argument,
                    default: default.take(),
                    ty: mem::replace(&mut default_type, ValueType::Unresolved),
                });
            }
            TokenKind::Assignment if argument_name.is_some() && default.is_none() => {
                // Only a single literal is accepted as a default value
                let value = parser.advance()?;
                let Some(ty) = ValueType::of_literal(value.kind) else {
                    return Err(Error::new(
                        ErrorImpl::UnexpectedToken { token: value.text },
                        value.line,
                    ));
                };

                default_type = ty;
                default = Some(vec![value]);
            }
            TokenKind::Name if argument_name.is_none() => argument_name = Some(token.text),
            _ => {
                return Err(Error::new(
                    ErrorImpl::UnexpectedToken { token: token.text },
                    token.line,
                ))
            }
        }

        token = parser.advance()?;
    }

    if token.kind == TokenKind::EOF {
        return Err(Error::new(
            ErrorImpl::MissingDelimiter {
                expected: String::from(")"),
                context: format!("to end the argument list of function `{}`", name.text),
            },
            token.line,
        ));
    }

    if let Some(argument) = argument_name {
        function.push_argument(Argument {
            name: argument,
            default,
            ty: default_type,
        });
    }

    parser.expect(TokenKind::Implies)?;

    let line = parser.get_line();
    parser.expect_error(
        TokenKind::OpenCurly,
        Some(Error::new(
            ErrorImpl::MissingDelimiter {
                expected: String::from("{"),
                context: format!("to open the body of function `{}`", name.text),
            },
            line,
        )),
    )?;

    parser.begin_definition(function);
    let terminator = parse_block(parser, body)?;
    let function = parser.finish_definition();

    if terminator != TokenKind::CloseCurly {
        return Err(Error::new(
            ErrorImpl::MissingDelimiter {
                expected: String::from("}"),
                context: format!("to end function `{}`", name.text),
            },
            parser.get_line(),
        ));
    }

    if let Some(function) = function {
        debug!(
            function = %function.name,
            arguments = function.arity(),
            return_type = %function.return_type,
            "registered function"
        );
        parser.program_mut().push_function(function);
    }

    Ok(())
}

pub fn parse_if_stmt(parser: &mut Parser, scope: ScopeId, token: Token) -> Result<(), Error> {
    let (condition, _) = parse_logical_expression(parser, scope, TokenKind::Implies)?;

    if condition.is_empty() {
        return Err(Error::new(ErrorImpl::EmptyExpression, token.line));
    }

    let line = parser.get_line();
    parser.expect_error(
        TokenKind::OpenCurly,
        Some(Error::new(
            ErrorImpl::MissingDelimiter {
                expected: String::from("{"),
                context: String::from("to open the if block"),
            },
            line,
        )),
    )?;

    let body = parser.program_mut().push_scope(scope, ProgramKind::Block);
    trace!(scope = body, parent = scope, "entered if block");

    let terminator = parse_block(parser, body)?;

    if terminator != TokenKind::CloseCurly {
        return Err(Error::new(
            ErrorImpl::MissingDelimiter {
                expected: String::from("}"),
                context: String::from("to end the if block"),
            },
            parser.get_line(),
        ));
    }

    debug!(condition = %render_tokens(&condition), "parsed if statement");

    parser
        .program_mut()
        .scope_mut(scope)
        .push_instruction(Instruction::IfStatement(IfStatement { condition, body }));

    Ok(())
}

/// `return expr.`, inside a function body or one block below it.
///
/// The value is parsed against the function scope and the instruction goes
/// to the function, not to the block the statement appears in.
pub fn parse_return_stmt(parser: &mut Parser, scope: ScopeId, token: Token) -> Result<(), Error> {
    let misplaced = || {
        Error::new(
            ErrorImpl::MisplacedStatement {
                message: String::from("return statements may only be used inside functions"),
            },
            token.line,
        )
    };

    let program = parser.program();
    let current = program.scope(scope);
    let legal = current.kind == ProgramKind::Function
        || current
            .parent
            .is_some_and(|parent| program.scope(parent).kind == ProgramKind::Function);

    if !legal {
        return Err(misplaced());
    }

    let function_scope = program.enclosing_function(scope).ok_or_else(misplaced)?;

    let (value, ty) = parse_expression(parser, function_scope, TokenKind::Dot)?;

    if ty == ValueType::Unresolved {
        return Err(Error::new(ErrorImpl::EmptyExpression, token.line));
    }

    let function = match parser.defining_mut() {
        Some(function) if function.body == function_scope => function,
        _ => return Err(misplaced()),
    };

    if function.return_type.is_placeholder() {
        function.return_type = ty;
    } else if !ty.is_placeholder() && !function.check_return_type(ty) {
        return Err(Error::new(
            ErrorImpl::ReturnTypeMismatch {
                function: function.name.clone(),
                expected: function.return_type.to_string(),
                received: ty.to_string(),
            },
            token.line,
        ));
    }

    debug!(
        function = %function.name,
        postfix = %render_tokens(&value),
        %ty,
        "parsed return"
    );

    parser
        .program_mut()
        .scope_mut(function_scope)
        .push_instruction(Instruction::ReturnOperation(ReturnOperation { value, ty }));

    Ok(())
}

/// `@{ ... }`: raw tokens up to the matching `}`, nested braces included.
pub fn parse_inline_code_stmt(
    parser: &mut Parser,
    scope: ScopeId,
    _token: Token,
) -> Result<(), Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut depth = 0;
    let mut code = vec![];

    let mut token = parser.advance()?;
    while token.kind != TokenKind::EOF {
        if token.kind == TokenKind::CloseCurly {
            if depth == 0 {
                break;
            }
            depth -= 1;
        } else if token.kind == TokenKind::OpenCurly {
            depth += 1;
        }

        code.push(token);
        token = parser.advance()?;
    }

    if token.kind == TokenKind::EOF {
        return Err(Error::new(ErrorImpl::UnexpectedEndOfInput, token.line));
    }

    trace!(tokens = code.len(), "captured inline code");

    parser
        .program_mut()
        .scope_mut(scope)
        .push_instruction(Instruction::InlineInjection(InlineInjection { code }));

    Ok(())
}

/// `else if`, `while` and `forall` are reserved but produce no instruction.
pub fn parse_unlowered_stmt(
    _parser: &mut Parser,
    _scope: ScopeId,
    token: Token,
) -> Result<(), Error> {
    debug!(keyword = %token.text, line = token.line, "keyword is not lowered");
    Ok(())
}
