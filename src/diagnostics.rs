//! Error types and the diagnostics reporter (spec.md §7).
//!
//! Three disjoint error kinds flow through the pipeline: lexical (scanner),
//! syntactic (parser), and runtime (interpreter). Rather than the process-wide
//! static flags the jlox reference uses, this crate threads an explicit
//! `Diagnostics` collector through each phase. spec.md §9 calls this an
//! acceptable alternative, as long as phases are skipped after a failed
//! predecessor and multiple errors can accumulate per phase.

use std::error::Error;
use std::fmt;

use crate::token::{Token, TokenKind};

/// A syntactic or runtime error, carrying the offending token for line and
/// lexeme context.
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl RuntimeError {
    pub fn new(token: Token, message: impl Into<String>) -> Self {
        Self {
            token,
            message: message.into(),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n[line {}]", self.message, self.token.line)
    }
}

impl Error for RuntimeError {}

/// Collects `hadError`/`hadRuntimeError` state and formats diagnostics to
/// stderr exactly per spec.md §6. Owned by the driver and passed by mutable
/// reference into the scanner, parser, and interpreter so each phase can
/// report without aborting the others (panic-mode recovery and
/// multi-error scanning both depend on this).
#[derive(Debug, Default)]
pub struct Diagnostics {
    had_error: bool,
    had_runtime_error: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Clears `hadError` only. Used between REPL lines so one bad line does
    /// not poison the rest of the session; `hadRuntimeError` is deliberately
    /// left untouched (spec.md §5).
    pub fn reset_error(&mut self) {
        self.had_error = false;
    }

    /// Reports a lexical error at `line` with no `where` clause.
    pub fn error(&mut self, line: usize, message: &str) {
        self.report(line, "", message);
    }

    /// Reports a parse error located at `token`: `at end` for EOF, `at
    /// 'LEXEME'` otherwise.
    pub fn error_at(&mut self, token: &Token, message: &str) {
        let location = if token.kind == TokenKind::Eof {
            "at end".to_string()
        } else {
            format!("at '{}'", token.lexeme)
        };
        self.report(token.line, &location, message);
    }

    fn report(&mut self, line: usize, location: &str, message: &str) {
        if location.is_empty() {
            eprintln!("[line {}] Error: {}", line, message);
        } else {
            eprintln!("[line {}] Error {}: {}", line, location, message);
        }
        self.had_error = true;
    }

    /// Reports a runtime error and sets `hadRuntimeError`. A single run
    /// reports at most one: the first aborts the top-level `interpret` call.
    pub fn runtime_error(&mut self, err: &RuntimeError) {
        eprintln!("{}", err);
        self.had_runtime_error = true;
    }
}
