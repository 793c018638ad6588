//! Shunting-yard expression parsing.
//!
//! Both sub-parsers read infix tokens up to a delimiter and return the
//! expression in postfix order together with its inferred type. The
//! arithmetic form checks every operand against the running type; the
//! logical form only checks the two sides of each comparison.

use tracing::trace;

use crate::{
    errors::errors::{Error, ErrorImpl},
    ir::{
        instructions::{FunctionCall, Instruction, Postfix},
        program::ScopeId,
        types::ValueType,
    },
    lexer::tokens::{render_tokens, Token, TokenKind},
};

use super::{
    lookups::{BPLookup, BindingPower, ARITHMETIC_LOOKUP, LOGICAL_LOOKUP},
    parser::Parser,
    stmt::parse_function_call,
};

/// Parses an arithmetic expression up to `delimiter`.
///
/// With `,` as the delimiter (call arguments) a `)` closing nothing also ends it.
///
/// Literals, variables and nested calls all feed the running type: `string`
/// pins it, `float` dominates `int`, and a variable or callee whose type
/// differs from a non-string running type is an error. An expression with no
/// operands comes back `unresolved`.
pub fn parse_expression(
    parser: &mut Parser,
    scope: ScopeId,
    delimiter: TokenKind,
) -> Result<(Postfix, ValueType), Error> {
    let mut output: Postfix = vec![];
    let mut operators: Vec<Token> = vec![];
    let mut open_parens = 0;
    let mut ty = ValueType::Unresolved;
    // Set when an operand is an argument that has no type yet
    let mut deferred = false;
    let mut expecting_operand = true;

    let mut token = parser.advance()?;

    while token.kind != TokenKind::EOF && token.kind != delimiter {
        // Call arguments end at the `)` that closes the call
        if token.kind == TokenKind::CloseParen
            && open_parens == 0
            && delimiter == TokenKind::Comma
        {
            break;
        }

        match token.kind {
            TokenKind::Int | TokenKind::Float | TokenKind::String => {
                if let Some(literal) = ValueType::of_literal(token.kind) {
                    ty = ty.absorb_literal(literal);
                }
                output.push(token);
                expecting_operand = false;
            }
            TokenKind::Name => {
                let name = token;
                let next = parser.advance()?;
                expecting_operand = false;

                if next.kind == TokenKind::OpenParen {
                    let (call, return_type) = parse_function_call(parser, scope, &name)?;

                    ty = unify(ty, return_type, || {
                        Error::new(
                            ErrorImpl::ReturnTypeMismatch {
                                function: name.text.clone(),
                                expected: ty.to_string(),
                                received: return_type.to_string(),
                            },
                            name.line,
                        )
                    })?;

                    splice_call(&mut output, name, &call);
                    push_nested_call(parser, scope, call);
                    token = parser.advance()?;
                } else {
                    let Some(variable_type) = parser.resolve_variable(scope, &name.text) else {
                        return Err(Error::new(
                            ErrorImpl::UndefinedVariable {
                                variable: name.text,
                            },
                            name.line,
                        ));
                    };

                    if variable_type == ValueType::Unresolved {
                        deferred = true;
                    } else {
                        ty = unify(ty, variable_type, || {
                            Error::new(
                                ErrorImpl::VariableTypeMismatch {
                                    variable: name.text.clone(),
                                    expected: ty.to_string(),
                                    received: variable_type.to_string(),
                                },
                                name.line,
                            )
                        })?;
                    }

                    output.push(name);
                    token = next;
                }

                continue;
            }
            TokenKind::OpenParen => {
                open_parens += 1;
                operators.push(token);
            }
            TokenKind::CloseParen => {
                if expecting_operand && dangling(&operators) {
                    return Err(Error::new(ErrorImpl::FaultyExpression, token.line));
                }
                close_group(&mut output, &mut operators, token.line)?;
                open_parens -= 1;
                expecting_operand = false;
            }
            kind if kind.is_arithmetic() => {
                if expecting_operand {
                    return Err(Error::new(ErrorImpl::FaultyExpression, token.line));
                }
                push_operator(&mut output, &mut operators, token, &ARITHMETIC_LOOKUP);
                expecting_operand = true;
            }
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
        return Err(Error::new(ErrorImpl::UnexpectedEndOfInput, token.line));
    }

    // An operator with nothing after it, e.g. `1 + .`
    if expecting_operand && !output.is_empty() {
        return Err(Error::new(ErrorImpl::FaultyExpression, token.line));
    }

    drain_operators(&mut output, operators, token.line)?;

    if ty == ValueType::Unresolved && deferred {
        ty = ValueType::Auto;
    }

    trace!(postfix = %render_tokens(&output), %ty, "parsed expression");

    Ok((output, ty))
}

/// Parses a comparison/logical expression up to `delimiter`.
///
/// Calls contribute their return type but appear in the output only as a
/// call marker followed by the function name. The returned type is that of
/// the last operand.
pub fn parse_logical_expression(
    parser: &mut Parser,
    scope: ScopeId,
    delimiter: TokenKind,
) -> Result<(Postfix, ValueType), Error> {
    let mut output: Postfix = vec![];
    let mut operators: Vec<Token> = vec![];
    let mut last_type = ValueType::Unresolved;
    // Set after a comparison operator until its right operand is seen
    let mut comparison = false;
    let mut expecting_operand = true;

    let mut token = parser.advance()?;

    while token.kind != TokenKind::EOF && token.kind != delimiter {
        if comparison {
            if let Some(literal) = ValueType::of_literal(token.kind) {
                if last_type != ValueType::Unresolved && literal != last_type {
                    return Err(Error::new(ErrorImpl::ComparisonTypeMismatch, token.line));
                }
                comparison = false;
            }
        }

        match token.kind {
            TokenKind::Int | TokenKind::Float | TokenKind::String => {
                if let Some(literal) = ValueType::of_literal(token.kind) {
                    last_type = literal;
                }
                output.push(token);
                expecting_operand = false;
            }
            TokenKind::Name => {
                let name = token;
                let previous_type = last_type;
                let next = parser.advance()?;
                expecting_operand = false;

                let operand_type = if next.kind == TokenKind::OpenParen {
                    let (call, return_type) = parse_function_call(parser, scope, &name)?;
                    push_nested_call(parser, scope, call);
                    output.push(Token::synthetic(TokenKind::At, "@", name.line));
                    token = parser.advance()?;
                    return_type
                } else {
                    let Some(variable_type) = parser.resolve_variable(scope, &name.text) else {
                        return Err(Error::new(
                            ErrorImpl::UndefinedVariable {
                                variable: name.text,
                            },
                            name.line,
                        ));
                    };
                    token = next;
                    variable_type
                };

                // Arguments without a type yet constrain nothing
                if operand_type != ValueType::Unresolved {
                    last_type = operand_type;

                    if comparison
                        && previous_type != ValueType::Unresolved
                        && last_type != previous_type
                    {
                        return Err(Error::new(ErrorImpl::ComparisonTypeMismatch, name.line));
                    }
                }
                comparison = false;

                output.push(name);
                continue;
            }
            TokenKind::OpenParen => operators.push(token),
            TokenKind::CloseParen => {
                if expecting_operand && dangling(&operators) {
                    return Err(Error::new(ErrorImpl::FaultyExpression, token.line));
                }
                close_group(&mut output, &mut operators, token.line)?;
                expecting_operand = false;
            }
            kind if kind.is_comparison() || kind == TokenKind::And || kind == TokenKind::Or => {
                if expecting_operand {
                    return Err(Error::new(ErrorImpl::FaultyExpression, token.line));
                }
                comparison = kind.is_comparison();
                push_operator(&mut output, &mut operators, token, &LOGICAL_LOOKUP);
                expecting_operand = true;
            }
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
        return Err(Error::new(ErrorImpl::UnexpectedEndOfInput, token.line));
    }

    if expecting_operand && !output.is_empty() {
        return Err(Error::new(ErrorImpl::FaultyExpression, token.line));
    }

    drain_operators(&mut output, operators, token.line)?;

    trace!(postfix = %render_tokens(&output), "parsed logical expression");

    Ok((output, last_type))
}

/// Checks an operand type against the running type of an expression.
///
/// A `string` running type accepts anything.
fn unify(
    running: ValueType,
    operand: ValueType,
    mismatch: impl FnOnce() -> Error,
) -> Result<ValueType, Error> {
    if running == ValueType::Unresolved {
        return Ok(operand);
    }

    if running == operand || running == ValueType::String {
        return Ok(running);
    }

    Err(mismatch())
}

/// A call used as an operand is still queued in the scope it is made from,
/// ahead of the statement that uses its result.
fn push_nested_call(parser: &mut Parser, scope: ScopeId, call: FunctionCall) {
    parser
        .program_mut()
        .scope_mut(scope)
        .push_instruction(Instruction::FunctionCall(call));
}

/// Emits `@ name ( arg , arg )` for a call used as an operand.
fn splice_call(output: &mut Postfix, name: Token, call: &FunctionCall) {
    let line = name.line;

    output.push(Token::synthetic(TokenKind::At, "@", line));
    output.push(name);
    output.push(Token::synthetic(TokenKind::OpenParen, "(", line));

    for (index, argument) in call.arguments.iter().enumerate() {
        if index > 0 {
            output.push(Token::synthetic(TokenKind::Comma, ",", line));
        }
        output.extend(argument.value.iter().cloned());
    }

    output.push(Token::synthetic(TokenKind::CloseParen, ")", line));
}

fn binding_power(lookup: &BPLookup, kind: TokenKind) -> BindingPower {
    *lookup.get(&kind).unwrap_or(&BindingPower::Sentinel)
}

/// Pops every stacked operator that binds at least as tightly, then pushes `token`.
fn push_operator(output: &mut Postfix, operators: &mut Vec<Token>, token: Token, lookup: &BPLookup) {
    let bp = binding_power(lookup, token.kind);

    while operators
        .last()
        .is_some_and(|top| bp <= binding_power(lookup, top.kind))
    {
        if let Some(operator) = operators.pop() {
            output.push(operator);
        }
    }

    operators.push(token);
}

/// True when the newest stacked token is an operator still missing its right operand.
fn dangling(operators: &[Token]) -> bool {
    operators
        .last()
        .is_some_and(|top| top.kind != TokenKind::OpenParen)
}

/// Pops operators up to and including the matching `(`.
fn close_group(output: &mut Postfix, operators: &mut Vec<Token>, line: i32) -> Result<(), Error> {
    while let Some(operator) = operators.pop() {
        if operator.kind == TokenKind::OpenParen {
            return Ok(());
        }
        output.push(operator);
    }

    Err(Error::new(ErrorImpl::FaultyExpression, line))
}

fn drain_operators(output: &mut Postfix, mut operators: Vec<Token>, line: i32) -> Result<(), Error> {
    while let Some(operator) = operators.pop() {
        if operator.kind == TokenKind::OpenParen {
            return Err(Error::new(ErrorImpl::FaultyExpression, line));
        }
        output.push(operator);
    }

    Ok(())
}
