//! Command-line and library configuration.

use std::path::PathBuf;

use clap::Parser;

/// Lowers a script to its scoped, typed instruction IR and prints it.
#[derive(Parser, Debug)]
#[command(name = "dotscript", version, about)]
pub struct Config {
    /// Source file to compile
    pub file: PathBuf,

    /// Number of leading lines not counted in reported line numbers
    #[arg(long, default_value_t = 0)]
    pub line_start: i32,

    /// Log each parsed statement
    #[arg(short, long)]
    pub verbose: bool,

    /// Only report errors, do not print the IR
    #[arg(short, long)]
    pub quiet: bool,
}

impl Config {
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            file_name: self.file.to_string_lossy().into_owned(),
            line_start: self.line_start,
        }
    }
}

/// Options for [`crate::compile_source`].
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Shown in logs and error reports
    pub file_name: String,
    /// Number of leading lines discounted from reported line numbers
    pub line_start: i32,
}

impl CompileOptions {
    pub fn new(file_name: &str) -> Self {
        CompileOptions {
            file_name: String::from(file_name),
            line_start: 0,
        }
    }

    pub fn with_line_start(mut self, line_start: i32) -> Self {
        self.line_start = line_start;
        self
    }
}
