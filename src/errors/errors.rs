use std::fmt::Display;

use thiserror::Error;

/// A diagnostic raised while tokenizing or parsing.
///
/// Every error carries the source line it was detected on and a severity.
/// The parser only ever produces critical errors and stops at the first one.
#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    line: i32,
    severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Critical,
    Warning,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "Error"),
            Severity::Warning => write!(f, "Warning"),
        }
    }
}

/// Coarse classification of errors, stable enough to match on in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    UndefinedReference,
    Redefinition,
    ArityMismatch,
    TypeMismatch,
    Structural,
    UnexpectedEndOfInput,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, line: i32) -> Self {
        Error {
            internal_error: error_impl,
            line,
            severity: Severity::Critical,
        }
    }

    pub fn warning(error_impl: ErrorImpl, line: i32) -> Self {
        Error {
            internal_error: error_impl,
            line,
            severity: Severity::Warning,
        }
    }

    pub fn get_line(&self) -> i32 {
        self.line
    }

    pub fn get_severity(&self) -> Severity {
        self.severity
    }

    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn kind(&self) -> ErrorKind {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnknownStatement { .. } => ErrorKind::Lexical,
            ErrorImpl::UndefinedVariable { .. } | ErrorImpl::UndefinedFunction { .. } => {
                ErrorKind::UndefinedReference
            }
            ErrorImpl::FunctionRedefinition { .. } => ErrorKind::Redefinition,
            ErrorImpl::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            ErrorImpl::VariableTypeMismatch { .. }
            | ErrorImpl::ReturnTypeMismatch { .. }
            | ErrorImpl::ComparisonTypeMismatch => ErrorKind::TypeMismatch,
            ErrorImpl::MissingDelimiter { .. }
            | ErrorImpl::MisplacedStatement { .. }
            | ErrorImpl::FaultyExpression
            | ErrorImpl::EmptyExpression => ErrorKind::Structural,
            ErrorImpl::UnexpectedEndOfInput => ErrorKind::UnexpectedEndOfInput,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnknownStatement { .. } => "UnknownStatement",
            ErrorImpl::UndefinedVariable { .. } => "UndefinedVariable",
            ErrorImpl::UndefinedFunction { .. } => "UndefinedFunction",
            ErrorImpl::FunctionRedefinition { .. } => "FunctionRedefinition",
            ErrorImpl::ArityMismatch { .. } => "ArityMismatch",
            ErrorImpl::VariableTypeMismatch { .. } => "VariableTypeMismatch",
            ErrorImpl::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
            ErrorImpl::ComparisonTypeMismatch => "ComparisonTypeMismatch",
            ErrorImpl::MissingDelimiter { .. } => "MissingDelimiter",
            ErrorImpl::MisplacedStatement { .. } => "MisplacedStatement",
            ErrorImpl::FaultyExpression => "FaultyExpression",
            ErrorImpl::EmptyExpression => "EmptyExpression",
            ErrorImpl::UnexpectedEndOfInput => "UnexpectedEndOfInput",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a `.`?",
                token
            )),
            ErrorImpl::UnknownStatement { token } => ErrorTip::Suggestion(format!(
                "`{}` must be followed by `(`, `:` or an assignment operator",
                token
            )),
            ErrorImpl::UndefinedVariable { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` is not declared", variable))
            }
            ErrorImpl::UndefinedFunction { function } => {
                ErrorTip::Suggestion(format!("Function `{}` is not defined", function))
            }
            ErrorImpl::FunctionRedefinition { function } => {
                ErrorTip::Suggestion(format!("Function `{}` is already defined", function))
            }
            ErrorImpl::ArityMismatch {
                function,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "Function `{}` expects {} arguments, received {}",
                function, expected, received
            )),
            ErrorImpl::VariableTypeMismatch {
                variable,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "Variable `{}` has type `{}`, expected `{}`",
                variable, received, expected
            )),
            ErrorImpl::ReturnTypeMismatch {
                function,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "Function `{}` returns `{}`, expected `{}`",
                function, received, expected
            )),
            ErrorImpl::ComparisonTypeMismatch => {
                ErrorTip::Suggestion(String::from("Both sides of a comparison must share a type"))
            }
            ErrorImpl::MissingDelimiter { expected, context } => {
                ErrorTip::Suggestion(format!("Expected `{}` {}", expected, context))
            }
            ErrorImpl::MisplacedStatement { message } => ErrorTip::Suggestion(message.clone()),
            ErrorImpl::FaultyExpression => {
                ErrorTip::Suggestion(String::from("Parentheses in the expression are unbalanced"))
            }
            ErrorImpl::EmptyExpression => {
                ErrorTip::Suggestion(String::from("Expected a value before the delimiter"))
            }
            ErrorImpl::UnexpectedEndOfInput => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} on line {}.",
            self.severity, self.internal_error, self.line
        )
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised character {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected {token:?}")]
    UnexpectedToken { token: String },
    #[error("unknown token {token:?}")]
    UnknownStatement { token: String },
    #[error("undefined variable {variable:?}")]
    UndefinedVariable { variable: String },
    #[error("unknown call to function {function:?}")]
    UndefinedFunction { function: String },
    #[error("redefinition of function {function:?}")]
    FunctionRedefinition { function: String },
    #[error("invalid number of arguments in call to function {function:?}: expected {expected}, received {received}")]
    ArityMismatch {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("invalid type of variable {variable:?}: expected {expected}, received {received}")]
    VariableTypeMismatch {
        variable: String,
        expected: String,
        received: String,
    },
    #[error("invalid return value of function {function:?}: expected {expected}, received {received}")]
    ReturnTypeMismatch {
        function: String,
        expected: String,
        received: String,
    },
    #[error("comparison of different types")]
    ComparisonTypeMismatch,
    #[error("missing {expected:?} {context}")]
    MissingDelimiter { expected: String, context: String },
    #[error("{message}")]
    MisplacedStatement { message: String },
    #[error("faulty expression")]
    FaultyExpression,
    #[error("empty expression")]
    EmptyExpression,
    #[error("unexpected end of file")]
    UnexpectedEndOfInput,
}
