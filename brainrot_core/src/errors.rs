//! Diagnostic sinks for the interpreter.
//!
//! `LexError` and `ParseError` are fatal: the front end stops and the CLI
//! exits non-zero. `SemanticError` is the `yyerror`-equivalent soft-error
//! channel used by the evaluator and executor; it is always reported and
//! then swallowed, never propagated, matching the source interpreter's
//! recovery-by-default posture.

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LexError {
    #[error("[line {1}] invalid token: '{0}'")]
    InvalidToken(String, i32),

    #[error("[line {0}] unterminated string literal")]
    UnterminatedString(i32),

    #[error("[line {0}] unterminated character literal")]
    UnterminatedChar(i32),

    #[error("failed to read source")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unexpected end of input while parsing program")]
    UnexpectedEof,

    #[error("[line {line}] unexpected token: expected {expected}, found '{found}'")]
    UnexpectedToken {
        line: i32,
        expected: String,
        found: String,
    },

    #[error("[line {0}] sizeof only accepts a variable name")]
    SizeofNeedsIdentifier(i32),

    #[error("[line {0}] the first argument to {1} must be a string literal")]
    FormatArgMustBeStringLiteral(i32, String),

    #[error("{0}")]
    Context(String),
}

impl From<anyhow::Error> for ParseError {
    fn from(err: anyhow::Error) -> Self {
        ParseError::Context(format!("{err:?}"))
    }
}

/// Semantic soft errors: reported once, never fatal. Mirrors the source's
/// `yyerror(msg)` diagnostic sink.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SemanticError {
    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),

    #[error("Cannot use float variable '{0}' in integer context")]
    FloatInIntContext(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Unknown operator in {0} context")]
    UnknownOperator(String),

    #[error("Operator '{0}' is not supported in a float context")]
    UnsupportedFloatOperator(String),

    #[error("Unknown function call: {0}")]
    UnknownCallee(String),

    #[error("First argument to {0} must be a string literal")]
    FormatArgNotStringLiteral(String),

    #[error("Symbol table is full, cannot bind '{0}'")]
    SymbolTableFull(String),

    #[error("Cannot evaluate a string literal as a value")]
    StringLiteralAsValue,
}

/// Renders a semantic soft error to stderr and returns control to the
/// caller. The caller is responsible for substituting the neutral value
/// (0 / 0.0) that keeps evaluation total.
pub fn report(err: &SemanticError) {
    eprintln!("brainrot: {err}");
}
