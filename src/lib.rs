//! Core pipeline for a tree-walking interpreter of a small dynamically-typed
//! scripting language: scan → parse → evaluate.
//!
//! The CLI driver (`src/main.rs`) is the only consumer outside this crate's
//! own tests; it owns argument parsing, file/REPL dispatch, and process exit
//! codes, none of which belong in the library (spec.md §1 treats the
//! command-line entry point as an external collaborator of this pipeline).

pub mod ast;
pub mod diagnostics;
pub mod environment;
pub mod interpreter;
pub mod parser;
pub mod scanner;
pub mod token;
pub mod value;

use diagnostics::Diagnostics;
use interpreter::Interpreter;
use parser::Parser;
use scanner::Scanner;

/// Runs one chunk of source (a whole file, or a single REPL line) through
/// the complete pipeline. Parsing and evaluation are skipped once a
/// preceding phase has set `had_error`, per spec.md §7.
pub fn run(source: &str, interpreter: &mut Interpreter, diagnostics: &mut Diagnostics) {
    let tokens = Scanner::new(source).scan_tokens(diagnostics);
    if diagnostics.had_error() {
        return;
    }

    let statements = Parser::new(tokens).parse(diagnostics);
    if diagnostics.had_error() {
        return;
    }

    interpreter.interpret(&statements, diagnostics);
}
