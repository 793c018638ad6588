#![allow(clippy::module_inception)]

use tracing::{debug, info_span};

use crate::{
    config::CompileOptions,
    errors::errors::{Error, ErrorTip},
    ir::program::GlobalProgram,
    lexer::lexer::Lexer,
    parser::parser::parse,
};

pub mod config;
pub mod errors;
pub mod ir;
pub mod lexer;
pub mod macros;
pub mod parser;

extern crate regex;

/// Lowers a whole source buffer to its IR, stopping at the first error.
pub fn compile_source(source: &str, options: &CompileOptions) -> Result<GlobalProgram, Error> {
    let _span = info_span!("compile", file = %options.file_name).entered();

    let lexer = Lexer::new(source.to_string(), options.line_start);
    let program = parse(lexer)?;

    debug!(
        functions = program.functions().count(),
        global_instructions = program.global().instruction_count(),
        "compiled"
    );

    Ok(program)
}

/// The text of a 1-based source line, if the source has that many lines.
pub fn get_source_line(source: &str, line: i32) -> Option<&str> {
    if line < 1 {
        return None;
    }

    source.lines().nth((line - 1) as usize)
}

/// Renders an error report.
///
/// ```text
/// Error: UndefinedVariable (Variable `y` is not declared)
/// -> main.ds
///   |
/// 3 | x = y + 1.
///   |
/// ```
pub fn format_error(error: &Error, source: &str, options: &CompileOptions) -> String {
    let mut report = String::new();

    match error.get_tip() {
        ErrorTip::None => report.push_str(&format!(
            "{}: {}\n",
            error.get_severity(),
            error.get_error_name()
        )),
        tip => report.push_str(&format!(
            "{}: {} ({})\n",
            error.get_severity(),
            error.get_error_name(),
            tip
        )),
    }
    report.push_str(&format!("-> {}\n", options.file_name));

    let line = error.get_line();
    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    // Reported lines are biased by `line_start`
    match get_source_line(source, line + options.line_start) {
        Some(text) => {
            report.push_str(&format!("{:>padding$}\n", "|"));
            report.push_str(&format!("{} | {}\n", line_string, text.trim()));
            report.push_str(&format!("{:>padding$}\n", "|"));
        }
        None => report.push_str(&format!("{}\n", error)),
    }

    report
}

pub fn display_error(error: &Error, source: &str, options: &CompileOptions) {
    eprint!("{}", format_error(error, source, options));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_source_line() {
        let source = "first\nsecond\nthird";

        assert_eq!(get_source_line(source, 1), Some("first"));
        assert_eq!(get_source_line(source, 3), Some("third"));
        assert_eq!(get_source_line(source, 4), None);
        assert_eq!(get_source_line(source, 0), None);
    }

    #[test]
    fn test_format_error() {
        let source = "x = 1.\n  y = z + 1.";
        let options = CompileOptions::new("main.ds");
        let error = compile_source(source, &options).unwrap_err();

        assert_eq!(
            format_error(&error, source, &options),
            "Error: UndefinedVariable (Variable `z` is not declared)\n\
             -> main.ds\n  |\n2 | y = z + 1.\n  |\n"
        );
    }

    #[test]
    fn test_format_error_with_line_start() {
        let source = "// generated\nx = 1 +";
        let options = CompileOptions::new("main.ds").with_line_start(1);
        let error = compile_source(source, &options).unwrap_err();

        assert_eq!(error.get_line(), 1);
        assert!(format_error(&error, source, &options).contains("1 | x = 1 +"));
    }

    #[test]
    fn test_format_error_without_source_line() {
        let options = CompileOptions::new("main.ds");
        let error = Error::new(errors::errors::ErrorImpl::FaultyExpression, 9);

        let report = format_error(&error, "x = 1.", &options);
        assert!(report.ends_with("Error: faulty expression on line 9.\n"));
    }
}
