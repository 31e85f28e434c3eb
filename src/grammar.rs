//! Grammar module for context-free grammars.
//!
//! This module provides data structures and parsing logic for working with
//! context-free grammars: productions, augmentation, and symbol
//! classification.

use crate::error::{GrammarError, Result};
use crate::symbol::Symbol;
use log::warn;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Arrow tokens accepted between a production's LHS and RHS, tried
/// left-to-right so the earliest match in a line wins.
const ARROWS: &[&str] = &["->", "→", "::="];

/// A production rule in a context-free grammar.
///
/// Represents a rule of the form: LHS → RHS, where LHS is a single
/// nonterminal and RHS is a sequence of symbols (empty for an
/// epsilon-production). Ids are dense and stable within one `Grammar`
/// instance; production 0 is always the augmented start `S' → S`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production {
    /// Stable numeric id, assigned at grammar construction time.
    pub id: usize,
    /// Left-hand side (always a nonterminal).
    pub lhs: Symbol,
    /// Right-hand side (empty sequence denotes ε).
    pub rhs: Vec<Symbol>,
}

impl Production {
    /// Creates a new production with the given id.
    pub fn new(id: usize, lhs: Symbol, rhs: Vec<Symbol>) -> Self {
        Self { id, lhs, rhs }
    }

    /// True if this production's RHS is the empty sequence (an ε-production).
    pub fn is_epsilon(&self) -> bool {
        self.rhs.is_empty()
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rhs_str = if self.rhs.is_empty() {
            "ε".to_string()
        } else {
            crate::symbol::symbols_to_string(&self.rhs)
        };
        write!(f, "{} → {}", self.lhs, rhs_str)
    }
}

/// A context-free grammar: productions plus derived terminal/nonterminal
/// sets and the designated (always-augmented) start symbol.
#[derive(Debug, Clone)]
pub struct Grammar {
    productions: Vec<Production>,
    nonterminals: HashSet<Symbol>,
    terminals: HashSet<Symbol>,
    start_symbol: Symbol,
    /// Nonterminals in first-appearance order; used by the transformer's
    /// indirect left-recursion elimination, which is order-sensitive.
    nonterminal_order: Vec<Symbol>,
    production_map: HashMap<Symbol, Vec<Production>>,
}

/// A parsed-but-not-yet-classified production, prior to knowing the full
/// nonterminal set (a name's terminal/nonterminal status depends on
/// whether it ever appears as some LHS across the whole grammar).
struct RawProduction {
    lhs: String,
    /// Empty means an ε-production.
    rhs: Vec<String>,
}

impl Grammar {
    /// Parses a grammar from its textual form.
    ///
    /// One rule per line: `LHS -> a1 a2 | b1 | ...`, whitespace-separated
    /// symbols, `|` separating alternatives, `->`/`→`/`::=` accepted as the
    /// arrow. Blank lines and lines starting with `#` are ignored. The
    /// first LHS encountered in source order becomes the start symbol, and
    /// a fresh augmented start `S'` (primed until unique) is added with
    /// production id 0.
    pub fn parse(text: &str) -> Result<Self> {
        let mut raw = Vec::new();
        let mut start_name: Option<String> = None;

        for (lineno, source_line) in text.lines().enumerate() {
            let line = source_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (lhs_part, rhs_part) = Self::split_arrow(line).ok_or_else(|| {
                GrammarError::InvalidProduction(format!(
                    "line {}: missing arrow (->, →, or ::=): {}",
                    lineno + 1,
                    source_line
                ))
            })?;

            let lhs_name = lhs_part.trim();
            if lhs_name.is_empty() || lhs_name.split_whitespace().count() != 1 {
                return Err(GrammarError::InvalidProduction(format!(
                    "line {}: left-hand side must be a single symbol: {}",
                    lineno + 1,
                    source_line
                )));
            }

            if start_name.is_none() {
                start_name = Some(lhs_name.to_string());
            }

            for alt in rhs_part.split('|') {
                let tokens: Vec<&str> = alt.split_whitespace().collect();
                let rhs = if tokens.is_empty()
                    || (tokens.len() == 1 && Symbol::is_epsilon_name(tokens[0]))
                {
                    Vec::new()
                } else {
                    tokens.into_iter().map(str::to_string).collect()
                };
                raw.push(RawProduction {
                    lhs: lhs_name.to_string(),
                    rhs,
                });
            }
        }

        if raw.is_empty() {
            return Err(GrammarError::EmptyInput);
        }

        Self::from_raw(raw, start_name.expect("non-empty raw implies a start name"))
    }

    /// Locates the earliest-starting arrow token in `line`, if any.
    fn split_arrow(line: &str) -> Option<(&str, &str)> {
        let mut best: Option<(usize, &str)> = None;
        for arrow in ARROWS {
            if let Some(idx) = line.find(arrow)
                && best.is_none_or(|(best_idx, _)| idx < best_idx)
            {
                best = Some((idx, arrow));
            }
        }
        best.map(|(idx, arrow)| (&line[..idx], &line[idx + arrow.len()..]))
    }

    fn from_raw(raw: Vec<RawProduction>, start_name: String) -> Result<Self> {
        let mut nonterminal_names: HashSet<String> = HashSet::new();
        let mut nonterminal_order_names: Vec<String> = Vec::new();
        for rp in &raw {
            if nonterminal_names.insert(rp.lhs.clone()) {
                nonterminal_order_names.push(rp.lhs.clone());
            }
        }

        let mut all_names: HashSet<&str> = HashSet::new();
        let mut rhs_names: HashSet<&str> = HashSet::new();
        for rp in &raw {
            all_names.insert(rp.lhs.as_str());
            for tok in &rp.rhs {
                all_names.insert(tok.as_str());
                rhs_names.insert(tok.as_str());
            }
        }
        let fresh_start_name = Self::fresh_name(&start_name, &all_names);

        // Classical demotion convention (spec.md §4.1, §8 S6): a name is a
        // nonterminal iff it appears as some LHS; anything else seen on a
        // RHS is silently classified as a terminal. Warn once per such name
        // so a caller can tell a typo'd nonterminal from an intended
        // terminal.
        for name in &rhs_names {
            if !nonterminal_names.contains(*name) {
                warn!("'{name}' never appears as a left-hand side; demoted to a terminal");
            }
        }

        let to_symbol = |name: &str| -> Symbol {
            if nonterminal_names.contains(name) {
                Symbol::nonterminal(name)
            } else {
                Symbol::terminal(name)
            }
        };

        let start_symbol = Symbol::nonterminal(fresh_start_name.as_str());
        let mut productions = Vec::with_capacity(raw.len() + 1);
        productions.push(Production::new(
            0,
            start_symbol.clone(),
            vec![Symbol::nonterminal(start_name.as_str())],
        ));
        for (i, rp) in raw.into_iter().enumerate() {
            let lhs = Symbol::nonterminal(rp.lhs.as_str());
            let rhs = rp.rhs.iter().map(|t| to_symbol(t)).collect();
            productions.push(Production::new(i + 1, lhs, rhs));
        }

        let nonterminal_order: Vec<Symbol> = std::iter::once(start_symbol.clone())
            .chain(nonterminal_order_names.iter().map(|n| Symbol::nonterminal(n.as_str())))
            .collect();

        Self::assemble(productions, start_symbol, nonterminal_order)
    }

    /// Generates a name not present in `taken` by priming `base` (`S`, `S'`,
    /// `S''`, ...), starting the counter one past the grammar's existing
    /// priming depth so re-running on the same input is deterministic.
    fn fresh_name(base: &str, taken: &HashSet<&str>) -> String {
        let mut existing_primes = 0usize;
        for name in taken {
            if let Some(stripped) = name.strip_prefix(base)
                && !stripped.is_empty()
                && stripped.chars().all(|c| c == '\'')
            {
                existing_primes = existing_primes.max(stripped.len());
            }
        }
        let mut candidate = format!("{}{}", base, "'".repeat(existing_primes + 1));
        let mut bump = existing_primes + 1;
        while taken.contains(candidate.as_str()) {
            bump += 1;
            candidate = format!("{}{}", base, "'".repeat(bump));
        }
        candidate
    }

    /// Builds a grammar directly from an ordered production list plus the
    /// symbol that should be treated as the start symbol (production 0
    /// must have this as its LHS). Used by the transformer to construct a
    /// fresh, independently-id'd grammar, leaving the original untouched.
    pub fn from_production_list(
        productions: Vec<(Symbol, Vec<Symbol>)>,
        start_symbol: Symbol,
    ) -> Result<Self> {
        if productions.is_empty() {
            return Err(GrammarError::EmptyInput);
        }
        if productions[0].0 != start_symbol {
            return Err(GrammarError::StructurallyInvalid(
                "production 0 must have the start symbol as its LHS".to_string(),
            ));
        }

        let mut nonterminal_order = Vec::new();
        let mut seen = HashSet::new();
        for (lhs, _) in &productions {
            if seen.insert(lhs.clone()) {
                nonterminal_order.push(lhs.clone());
            }
        }

        let numbered = productions
            .into_iter()
            .enumerate()
            .map(|(id, (lhs, rhs))| Production::new(id, lhs, rhs))
            .collect();

        Self::assemble(numbered, start_symbol, nonterminal_order)
    }

    fn assemble(
        productions: Vec<Production>,
        start_symbol: Symbol,
        nonterminal_order: Vec<Symbol>,
    ) -> Result<Self> {
        let nonterminals: HashSet<Symbol> = productions.iter().map(|p| p.lhs.clone()).collect();

        let mut terminals: HashSet<Symbol> = HashSet::new();
        for prod in &productions {
            for sym in &prod.rhs {
                if !nonterminals.contains(sym) && sym.is_terminal() {
                    terminals.insert(sym.clone());
                }
            }
        }

        let mut production_map: HashMap<Symbol, Vec<Production>> = HashMap::new();
        for prod in &productions {
            production_map
                .entry(prod.lhs.clone())
                .or_default()
                .push(prod.clone());
        }

        Ok(Self {
            productions,
            nonterminals,
            terminals,
            start_symbol,
            nonterminal_order,
            production_map,
        })
    }

    /// Returns all productions for a given nonterminal (empty slice if it
    /// has none, which should not happen for a well-formed grammar).
    pub fn get_productions(&self, nt: &Symbol) -> &[Production] {
        self.production_map
            .get(nt)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Returns all productions in id order.
    pub fn all_productions(&self) -> &[Production] {
        &self.productions
    }

    /// Returns the production with the given id, if any.
    pub fn production(&self, id: usize) -> Option<&Production> {
        self.productions.get(id)
    }

    /// Returns all nonterminals in the grammar (including the augmented
    /// start symbol).
    pub fn nonterminals(&self) -> &HashSet<Symbol> {
        &self.nonterminals
    }

    /// Returns all terminals in the grammar.
    pub fn terminals(&self) -> &HashSet<Symbol> {
        &self.terminals
    }

    /// Returns nonterminals in first-appearance order (augmented start
    /// first), used by left-recursion elimination's ordered substitution.
    pub fn nonterminal_order(&self) -> &[Symbol] {
        &self.nonterminal_order
    }

    /// Returns the start symbol (always the augmented `S'`, the LHS of
    /// production 0).
    pub fn start_symbol(&self) -> &Symbol {
        &self.start_symbol
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for prod in &self.productions {
            writeln!(f, "{}", prod)?;
        }
        Ok(())
    }
}
