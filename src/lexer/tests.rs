//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and names
//! - Numeric literals (integers and floats)
//! - String literals with escape sequences
//! - Operators and punctuation
//! - Line counting and the line bias
//! - Error cases

use super::{
    lexer::{tokenize, Lexer},
    tokens::{render_tokens, TokenKind},
};

#[test]
fn test_tokenize_keywords() {
    let source = "if else if while forall return and or".to_string();
    let tokens = tokenize(source, 0).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::If);
    assert_eq!(tokens[1].kind, TokenKind::ElseIf);
    assert_eq!(tokens[2].kind, TokenKind::While);
    assert_eq!(tokens[3].kind, TokenKind::ForAll);
    assert_eq!(tokens[4].kind, TokenKind::Return);
    assert_eq!(tokens[5].kind, TokenKind::And);
    assert_eq!(tokens[6].kind, TokenKind::Or);
    assert_eq!(tokens[7].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_names() {
    let source = "foo bar_1 _under iffy elsewhere".to_string();
    let tokens = tokenize(source, 0).unwrap();

    for token in &tokens[..5] {
        assert_eq!(token.kind, TokenKind::Name);
    }
    assert_eq!(tokens[0].text, "foo");
    assert_eq!(tokens[3].text, "iffy");
    assert_eq!(tokens[4].text, "elsewhere");
    assert_eq!(tokens[5].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let source = "42 3.14 0".to_string();
    let tokens = tokenize(source, 0).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Int);
    assert_eq!(tokens[0].text, "42");
    assert_eq!(tokens[1].kind, TokenKind::Float);
    assert_eq!(tokens[1].text, "3.14");
    assert_eq!(tokens[2].kind, TokenKind::Int);
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_integer_before_statement_dot() {
    let source = "x = 3.".to_string();
    let tokens = tokenize(source, 0).unwrap();

    assert_eq!(tokens[2].kind, TokenKind::Int);
    assert_eq!(tokens[2].text, "3");
    assert_eq!(tokens[3].kind, TokenKind::Dot);
}

#[test]
fn test_tokenize_strings() {
    let source = r#""hello" "two words" "tab\there" "quote\"d""#.to_string();
    let tokens = tokenize(source, 0).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].text, "hello");
    assert_eq!(tokens[1].text, "two words");
    assert_eq!(tokens[2].text, "tab\there");
    assert_eq!(tokens[3].text, "quote\"d");
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_operators() {
    let source = "+ - * / > < >= <= && || = += -= *= /= =>".to_string();
    let kinds: Vec<TokenKind> = tokenize(source, 0)
        .unwrap()
        .iter()
        .map(|token| token.kind)
        .collect();

    assert_eq!(
        kinds,
        vec![
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Greater,
            TokenKind::Less,
            TokenKind::GreaterEquals,
            TokenKind::LessEquals,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Assignment,
            TokenKind::PlusEquals,
            TokenKind::MinusEquals,
            TokenKind::StarEquals,
            TokenKind::SlashEquals,
            TokenKind::Implies,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    let source = "( ) { } , : . @".to_string();
    let tokens = tokenize(source, 0).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::OpenParen);
    assert_eq!(tokens[1].kind, TokenKind::CloseParen);
    assert_eq!(tokens[2].kind, TokenKind::OpenCurly);
    assert_eq!(tokens[3].kind, TokenKind::CloseCurly);
    assert_eq!(tokens[4].kind, TokenKind::Comma);
    assert_eq!(tokens[5].kind, TokenKind::Colon);
    assert_eq!(tokens[6].kind, TokenKind::Dot);
    assert_eq!(tokens[7].kind, TokenKind::At);
    assert_eq!(tokens[8].kind, TokenKind::EOF);
}

#[test]
fn test_comments_are_skipped() {
    let source = "x = 1. // trailing comment\ny = 2.".to_string();
    let tokens = tokenize(source, 0).unwrap();

    assert_eq!(render_tokens(&tokens), "x = 1 . y = 2 . EOF");
}

#[test]
fn test_line_numbers() {
    let source = "a\nb\n\n\"multi\nline\" c".to_string();
    let tokens = tokenize(source, 0).unwrap();

    assert_eq!(tokens[0].line, 1);
    assert_eq!(tokens[1].line, 2);
    assert_eq!(tokens[2].line, 4);
    assert_eq!(tokens[3].line, 5);
}

#[test]
fn test_line_bias() {
    let source = "a\nb\nc".to_string();
    let tokens = tokenize(source, 2).unwrap();

    assert_eq!(tokens[0].line, -1);
    assert_eq!(tokens[2].line, 1);
}

#[test]
fn test_eof_is_sticky() {
    let mut lexer = Lexer::new("x".to_string(), 0);

    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Name);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::EOF);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::EOF);
    assert_eq!(lexer.last_token().kind, TokenKind::EOF);
}

#[test]
fn test_unrecognised_character() {
    let result = tokenize("x = 1 $ 2.".to_string(), 0);

    let error = result.unwrap_err();
    assert_eq!(error.get_error_name(), "UnrecognisedToken");
}

#[test]
fn test_empty_source() {
    let tokens = tokenize(String::new(), 0).unwrap();

    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::EOF);
}

#[test]
fn test_stray_punctuation() {
    let source = "printf(\"%d\", x); a[0] = !b;".to_string();
    let tokens = tokenize(source, 0).unwrap();

    assert_eq!(tokens[6].kind, TokenKind::Symbol);
    assert_eq!(tokens[6].text, ";");
    assert_eq!(tokens[8].kind, TokenKind::Symbol);
    assert_eq!(tokens[8].text, "[");
    assert_eq!(tokens[12].text, "!");
    assert_eq!(tokens[14].text, ";");
}

#[test]
fn test_token_debug() {
    let tokens = tokenize("x 42 (".to_string(), 0).unwrap();

    assert_eq!(tokens[0].debug(), "Name (x)");
    assert_eq!(tokens[1].debug(), "Int (42)");
    assert_eq!(tokens[2].debug(), "OpenParen ()");
}
