//! Symbol types and utilities for context-free grammars.
//!
//! This module defines the core `Symbol` type and utility functions for working
//! with grammar symbols (terminals, nonterminals, epsilon, and end marker).
//! Unlike a single-character grammar, symbols here are arbitrary whitespace-free
//! names (`id`, `then`, `E'`, ...), so a `Symbol` holds an interned name rather
//! than a `char`.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// The conventional end-of-input marker name.
pub const END_MARKER_NAME: &str = "$";

/// Names that denote an epsilon production when they appear alone on a RHS.
const EPSILON_NAMES: &[&str] = &["ε", "eps", "epsilon", "EPSILON"];

/// Represents a symbol in a context-free grammar.
///
/// # Grammar conventions
/// - Terminals and nonterminals are distinguished by where the name is first
///   seen: any name that appears as some production's LHS is a nonterminal,
///   everything else is a terminal (the classical demotion convention).
/// - `Epsilon` is a pseudo-terminal that never appears literally on a RHS;
///   an epsilon production is represented as the empty RHS sequence.
/// - `EndMarker` (`$`) is the implicit end-of-input terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// A terminal symbol.
    Terminal(Rc<str>),
    /// A nonterminal symbol.
    Nonterminal(Rc<str>),
    /// The empty string (ε).
    Epsilon,
    /// The end-of-input marker (`$`).
    EndMarker,
}

impl Symbol {
    /// Builds a terminal symbol from a name.
    pub fn terminal(name: impl Into<Rc<str>>) -> Self {
        Symbol::Terminal(name.into())
    }

    /// Builds a nonterminal symbol from a name.
    pub fn nonterminal(name: impl Into<Rc<str>>) -> Self {
        Symbol::Nonterminal(name.into())
    }

    /// Returns true if `name` is one of the conventional epsilon spellings.
    pub fn is_epsilon_name(name: &str) -> bool {
        EPSILON_NAMES.contains(&name)
    }

    /// Checks if this symbol is a terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    /// Checks if this symbol is a nonterminal.
    pub fn is_nonterminal(&self) -> bool {
        matches!(self, Symbol::Nonterminal(_))
    }

    /// Checks if this symbol is epsilon (ε).
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Symbol::Epsilon)
    }

    /// Checks if this symbol is the end marker (`$`).
    pub fn is_end_marker(&self) -> bool {
        matches!(self, Symbol::EndMarker)
    }

    /// Returns the name of this symbol, if it has one (terminals/nonterminals).
    pub fn name(&self) -> Option<&str> {
        match self {
            Symbol::Terminal(n) | Symbol::Nonterminal(n) => Some(n),
            Symbol::Epsilon | Symbol::EndMarker => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Terminal(n) | Symbol::Nonterminal(n) => write!(f, "{}", n),
            Symbol::Epsilon => write!(f, "ε"),
            Symbol::EndMarker => write!(f, "$"),
        }
    }
}

/// Custom ordering for symbols to ensure consistent, deterministic presentation.
///
/// Order: Epsilon < Terminals < Nonterminals < EndMarker.
impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Symbol::Epsilon, Symbol::Epsilon) => Ordering::Equal,
            (Symbol::Epsilon, _) => Ordering::Less,
            (_, Symbol::Epsilon) => Ordering::Greater,

            (Symbol::EndMarker, Symbol::EndMarker) => Ordering::Equal,
            (Symbol::EndMarker, _) => Ordering::Greater,
            (_, Symbol::EndMarker) => Ordering::Less,

            (Symbol::Terminal(a), Symbol::Terminal(b)) => a.cmp(b),
            (Symbol::Terminal(_), Symbol::Nonterminal(_)) => Ordering::Less,
            (Symbol::Nonterminal(_), Symbol::Terminal(_)) => Ordering::Greater,
            (Symbol::Nonterminal(a), Symbol::Nonterminal(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Converts a whitespace-separated string into a vector of terminal symbols.
///
/// Used by the drivers to turn a raw token line into a symbol sequence; every
/// token fed to a driver is a terminal name.
pub fn string_to_terminals(s: &str) -> Vec<Symbol> {
    s.split_whitespace().map(Symbol::terminal).collect()
}

/// Renders a sequence of symbols back into a space-separated string.
pub fn symbols_to_string(symbols: &[Symbol]) -> String {
    symbols
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
