use std::{fs::read_to_string, process::exit, time::Instant};

use clap::Parser;
use dotscript::{compile_source, config::Config, display_error};
use tracing::{debug, error, Level};

fn main() {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_max_level(if config.verbose {
            Level::DEBUG
        } else {
            Level::WARN
        })
        .init();

    let source = match read_to_string(&config.file) {
        Ok(source) => source,
        Err(err) => {
            error!(file = %config.file.display(), %err, "failed to read source file");
            exit(1);
        }
    };

    let options = config.compile_options();
    let start = Instant::now();

    let program = match compile_source(&source, &options) {
        Ok(program) => program,
        Err(err) => {
            display_error(&err, &source, &options);
            exit(1);
        }
    };

    debug!(elapsed = ?start.elapsed(), "lowered to IR");

    if !config.quiet {
        print!("{}", program);
    }
}
