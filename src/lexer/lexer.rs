use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &str) -> Option<Token>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

fn pattern(regex: &str, handler: RegexHandler) -> RegexPattern {
    RegexPattern {
        // Patterns are anchored so a match is always at the current position
        regex: Regex::new(&format!("^(?:{})", regex)).unwrap(),
        handler,
    }
}

lazy_static! {
    // Order matters: longer operators before their prefixes, floats before ints
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern("\\s+", skip_handler),
        pattern("//[^\\n]*", skip_handler),
        pattern("else\\s+if\\b", else_if_handler),
        pattern("[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        pattern("[0-9]+\\.[0-9]+", float_handler),
        pattern("[0-9]+", int_handler),
        pattern("\"(?:[^\"\\\\]|\\\\.)*\"", string_handler),
        pattern("\\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        pattern("\\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
        pattern("\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        pattern("\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        pattern("=>", MK_DEFAULT_HANDLER!(TokenKind::Implies, "=>")),
        pattern(">=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        pattern("<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        pattern(">", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        pattern("<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        pattern("&&", MK_DEFAULT_HANDLER!(TokenKind::And, "&&")),
        pattern("\\|\\|", MK_DEFAULT_HANDLER!(TokenKind::Or, "||")),
        pattern("\\+=", MK_DEFAULT_HANDLER!(TokenKind::PlusEquals, "+=")),
        pattern("-=", MK_DEFAULT_HANDLER!(TokenKind::MinusEquals, "-=")),
        pattern("\\*=", MK_DEFAULT_HANDLER!(TokenKind::StarEquals, "*=")),
        pattern("/=", MK_DEFAULT_HANDLER!(TokenKind::SlashEquals, "/=")),
        pattern("=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        pattern("\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        pattern("-", MK_DEFAULT_HANDLER!(TokenKind::Minus, "-")),
        pattern("\\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        pattern("/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        pattern("\\.", MK_DEFAULT_HANDLER!(TokenKind::Dot, ".")),
        pattern(",", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        pattern(":", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
        pattern("@", MK_DEFAULT_HANDLER!(TokenKind::At, "@")),
        pattern("[;%!?\\[\\]#~^&|']", stray_symbol_handler),
    ];
}

/// Streaming tokenizer over an in-memory source buffer.
///
/// Tokens are produced one at a time through [`Lexer::next_token`]; once the
/// buffer is exhausted every further call yields an `EOF` token.
pub struct Lexer {
    source: String,
    pos: usize,
    line: i32,
    last_token: Token,
}

impl Lexer {
    /// `line_start` discounts that many leading lines from reported line numbers.
    pub fn new(source: String, line_start: i32) -> Lexer {
        let line = 1 - line_start;

        Lexer {
            source,
            pos: 0,
            line,
            last_token: MK_TOKEN!(TokenKind::EOF, String::from("EOF"), line),
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn line(&self) -> i32 {
        self.line
    }

    /// The token most recently returned by [`Lexer::next_token`].
    pub fn last_token(&self) -> &Token {
        &self.last_token
    }

    pub fn at(&self) -> char {
        self.remainder().chars().next().unwrap_or('\0')
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn count_lines(&mut self, text: &str) {
        self.line += text.matches('\n').count() as i32;
    }

    pub fn next_token(&mut self) -> Result<Token, Error> {
        loop {
            if self.at_eof() {
                let token = MK_TOKEN!(TokenKind::EOF, String::from("EOF"), self.line);
                self.last_token = token.clone();
                return Ok(token);
            }

            let mut matched = false;

            for pattern in PATTERNS.iter() {
                let text = match pattern.regex.find(self.remainder()) {
                    Some(found) => found.as_str().to_string(),
                    None => continue,
                };

                matched = true;
                if let Some(token) = (pattern.handler)(self, &text) {
                    self.last_token = token.clone();
                    return Ok(token);
                }
                break;
            }

            if !matched {
                return Err(Error::new(
                    ErrorImpl::UnrecognisedToken {
                        token: self.at().to_string(),
                    },
                    self.line,
                ));
            }
        }
    }
}

fn skip_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    lexer.count_lines(matched);
    lexer.advance_n(matched.len());
    None
}

fn int_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    let token = MK_TOKEN!(TokenKind::Int, matched.to_string(), lexer.line);
    lexer.advance_n(matched.len());
    Some(token)
}

fn float_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    let token = MK_TOKEN!(TokenKind::Float, matched.to_string(), lexer.line);
    lexer.advance_n(matched.len());
    Some(token)
}

fn else_if_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    let token = MK_TOKEN!(TokenKind::ElseIf, String::from("else if"), lexer.line);
    lexer.count_lines(matched);
    lexer.advance_n(matched.len());
    Some(token)
}

fn string_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    let line = lexer.line;
    let string_literal = &matched[1..matched.len() - 1];

    let mut result = String::new();
    let mut chars = string_literal.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some(other) => {
                // Unknown escape, keep it verbatim
                result.push(ch);
                result.push(*other);
            }
            None => {
                result.push(ch);
                continue;
            }
        }
        chars.next();
    }

    lexer.count_lines(matched);
    lexer.advance_n(matched.len());

    Some(MK_TOKEN!(TokenKind::String, result, line))
}

fn stray_symbol_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    let token = MK_TOKEN!(TokenKind::Symbol, matched.to_string(), lexer.line);
    lexer.advance_n(matched.len());
    Some(token)
}

fn symbol_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    let kind = RESERVED_LOOKUP
        .get(matched)
        .copied()
        .unwrap_or(TokenKind::Name);

    let token = MK_TOKEN!(kind, matched.to_string(), lexer.line);
    lexer.advance_n(matched.len());
    Some(token)
}

/// Tokenizes a whole buffer up to and including the final `EOF` token.
pub fn tokenize(source: String, line_start: i32) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, line_start);
    let mut tokens = vec![];

    loop {
        let token = lex.next_token()?;
        let done = token.kind == TokenKind::EOF;
        tokens.push(token);

        if done {
            return Ok(tokens);
        }
    }
}
