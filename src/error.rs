//! Centralised error hierarchy for the **Lox front end**.
//!
//! All subsystems (scanner, parser, resolver, environment, CLI) convert their
//! internal failure modes into one of the variants defined here.  This enables a
//! uniform `Result<T>` alias throughout the crate and ergonomic inter‑operation
//! with `anyhow`, while still preserving rich diagnostic detail.
//!
//! Every variant renders as a single line, `[line N] Error <where>: <message>`.
//! The module **does not** print diagnostics itself; [`Diagnostics`] only
//! collects them so the host can decide on an exit status once a phase is done.

use std::io;
use thiserror::Error;

use log::{debug, info};

use crate::token::Token;

/// Exit status for malformed input (lexing or parsing).
pub const EXIT_DATA_ERR: i32 = 65;

/// Exit status for runtime and semantic failures.
pub const EXIT_SOFTWARE: i32 = 70;

/// Exit status for I/O failures.
pub const EXIT_IO_ERR: i32 = 74;

/// Exit status for invalid invocation.
pub const EXIT_USAGE: i32 = 64;

/// Canonical error type used throughout the front end.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoxError {
    /// Lexical (scanner) error with source line information.
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Syntactic (parser) error.  `location` is `" at 'x'"` or `" at end"`.
    #[error("[line {line}] Error{location}: {message}")]
    Parse {
        message: String,
        line: usize,
        location: String,
    },

    /// Static‑analysis or resolution failure (e.g. early‑binding errors).
    #[error("[line {line}] Error{location}: {message}")]
    Resolve {
        message: String,
        line: usize,
        location: String,
    },

    /// Runtime environment error (undefined or uninitialized variable).
    #[error("[line {line}] Error: {message}")]
    Runtime { message: String, line: usize },

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF‑8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// `" at end"` for EOF, `" at 'lexeme'"` otherwise.
fn location_of(token: &Token<'_>) -> String {
    if token.is_eof() {
        " at end".to_string()
    } else {
        format!(" at '{}'", token.lexeme)
    }
}

impl LoxError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        LoxError::Lex { message, line }
    }

    /// Helper constructor for the **parser**; the offending token supplies
    /// both the line and the location.
    pub fn parse<S: Into<String>>(token: &Token<'_>, msg: S) -> Self {
        let message: String = msg.into();

        info!(
            "Creating Parse error: line={}, lexeme={}, msg={}",
            token.line, token.lexeme, message
        );

        LoxError::Parse {
            message,
            line: token.line,
            location: location_of(token),
        }
    }

    /// Helper constructor for the **resolver**.
    pub fn resolve<S: Into<String>>(token: &Token<'_>, msg: S) -> Self {
        let message: String = msg.into();

        info!(
            "Creating Resolve error: line={}, lexeme={}, msg={}",
            token.line, token.lexeme, message
        );

        LoxError::Resolve {
            message,
            line: token.line,
            location: location_of(token),
        }
    }

    /// Helper constructor for the **environment**.
    pub fn runtime<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Runtime error: line={}, msg={}", line, message);

        LoxError::Runtime { message, line }
    }

    /// Source line, when the error is tied to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            LoxError::Lex { line, .. }
            | LoxError::Parse { line, .. }
            | LoxError::Resolve { line, .. }
            | LoxError::Runtime { line, .. } => Some(*line),
            LoxError::Io(_) | LoxError::Utf8(_) => None,
        }
    }

    /// Process exit status a host should use for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoxError::Lex { .. } | LoxError::Parse { .. } => EXIT_DATA_ERR,
            LoxError::Resolve { .. } | LoxError::Runtime { .. } => EXIT_SOFTWARE,
            LoxError::Io(_) | LoxError::Utf8(_) => EXIT_IO_ERR,
        }
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, LoxError>;

/// Error sink shared by the phases of one run.
///
/// Replaces a process‑wide "had error" flag: each phase reports into it and
/// the host consults [`Diagnostics::exit_code`] once everything has run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<LoxError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, error: LoxError) {
        debug!("Reporting diagnostic: {}", error);

        self.errors.push(error);
    }

    pub fn extend<I: IntoIterator<Item = LoxError>>(&mut self, errors: I) {
        for error in errors {
            self.report(error);
        }
    }

    /// Any lexing or parsing error so far?
    pub fn had_error(&self) -> bool {
        self.errors
            .iter()
            .any(|e| matches!(e, LoxError::Lex { .. } | LoxError::Parse { .. }))
    }

    /// Any runtime or semantic error so far?
    pub fn had_runtime_error(&self) -> bool {
        self.errors
            .iter()
            .any(|e| matches!(e, LoxError::Resolve { .. } | LoxError::Runtime { .. }))
    }

    pub fn errors(&self) -> &[LoxError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// 65 wins over 70, which wins over anything else; 0 when clean.
    pub fn exit_code(&self) -> i32 {
        if self.had_error() {
            EXIT_DATA_ERR
        } else if self.had_runtime_error() {
            EXIT_SOFTWARE
        } else {
            self.errors.first().map_or(0, LoxError::exit_code)
        }
    }
}
