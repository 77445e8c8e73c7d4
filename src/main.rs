//! Command-line driver (spec.md §6).
//!
//! Thin by design: the interesting pipeline lives in the library. This
//! binary only resolves zero vs. one vs. too-many arguments into REPL mode,
//! file mode, or a usage error, and maps the `Diagnostics` flags produced by
//! a run into the process exit code spec.md pins down (0/64/65/70).

use std::env;
use std::io::{self, Write};
use std::process;

use lox::diagnostics::Diagnostics;
use lox::interpreter::Interpreter;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let exit_code = match args.as_slice() {
        [] => run_prompt(),
        [path] => run_file(path),
        _ => {
            println!("Usage: lox [script]");
            64
        }
    };

    process::exit(exit_code);
}

/// Reads `path` as UTF-8 and runs it as one complete program.
///
/// Returns 65 if the file cannot be read at all (spec.md §6 groups this
/// with compile-time errors), 65 if scanning or parsing reported an error,
/// 70 if a runtime error occurred, 0 otherwise.
fn run_file(path: &str) -> i32 {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Could not read file '{}': {}", path, err);
            return 65;
        }
    };

    let mut diagnostics = Diagnostics::new();
    let mut interpreter = Interpreter::new();
    lox::run(&source, &mut interpreter, &mut diagnostics);

    if diagnostics.had_error() {
        65
    } else if diagnostics.had_runtime_error() {
        70
    } else {
        0
    }
}

/// Interactive REPL: `> ` prompt, one line per pipeline run, sharing a
/// single `Interpreter` across lines so variables persist between them.
/// `had_error` is cleared after every line so a bad line doesn't poison the
/// rest of the session; `had_runtime_error` is deliberately left alone
/// (spec.md §5).
fn run_prompt() -> i32 {
    let mut interpreter = Interpreter::new();
    let mut diagnostics = Diagnostics::new();
    let stdin = io::stdin();

    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            return 0;
        }

        let mut line = String::new();
        match stdin.read_line(&mut line) {
            Ok(0) => return 0, // EOF
            Ok(_) => {
                lox::run(&line, &mut interpreter, &mut diagnostics);
                diagnostics.reset_error();
            }
            Err(_) => return 0,
        }
    }
}
