//! Context-Free Grammar Parser-Generator Toolkit
//!
//! A Rust implementation of LL(1), SLR(1), CLR(1), and LALR(1) parser
//! construction for context-free grammars.
//!
//! This implementation provides:
//! - Algorithms to compute FIRST and FOLLOW sets
//! - Grammar transformation for LL(1) suitability (left-recursion
//!   elimination, left factoring)
//! - LL(1) predictive parser construction (top-down)
//! - SLR(1)/CLR(1)/LALR(1) parser construction (bottom-up, LR automaton)
//! - Conflict detection and a cross-flavor comparator
//! - Shift-reduce and predictive drivers producing a step trace and
//!   derivation tree
//! - CLI for grammar analysis and string parsing
//!
//! # Author
//! Juan Manuel Young Hoyos
//!
//! # References
//! Aho, Alfred V. et al. "Compilers: Principles, Techniques, and Tools" (2nd Edition).
//! Addison-Wesley, 2006.

pub mod automaton;
pub mod cli;
pub mod comparator;
pub mod driver;
pub mod error;
pub mod first_follow;
pub mod grammar;
pub mod items;
pub mod ll1;
pub mod symbol;
pub mod tables;
pub mod transform;

// Re-export commonly used types
pub use comparator::{compare, ComparisonReport, Flavor};
pub use driver::{run_lr, run_ll1, ParseOutcome, ParseTree, StackEntry, Trace};
pub use error::{GrammarError, Result};
pub use grammar::{Grammar, Production};
pub use ll1::Ll1Table;
pub use symbol::Symbol;
pub use tables::ParseTables;
pub use transform::{transform_for_ll1, TransformResult};
