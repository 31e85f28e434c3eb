//! Error types for the grammar parser-generator toolkit.
//!
//! Per the error-handling design: only user-input errors (malformed
//! grammar text, an out-of-vocabulary token) and structural build failures
//! (an automaton with no reachable start state, an empty grammar) are
//! represented here. Build-time conflicts (LL(1), SLR/CLR/LALR) are *not*
//! errors — they are [`crate::tables::Conflict`] records returned alongside
//! a still-usable table.

use thiserror::Error;

/// Errors that can occur while parsing, augmenting, or building a grammar.
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("Invalid grammar format: {0}")]
    InvalidFormat(String),

    #[error("Invalid production format: {0}")]
    InvalidProduction(String),

    #[error("Empty grammar input")]
    EmptyInput,

    #[error("Unreachable start state: the automaton's initial state was never constructed")]
    UnreachableStart,

    #[error("Structural build failure: {0}")]
    StructurallyInvalid(String),

    #[error("Token not in the grammar's terminal vocabulary: {0}")]
    UnknownTerminal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Type alias for `Result`s in this crate.
pub type Result<T> = std::result::Result<T, GrammarError>;
