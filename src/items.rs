//! LR(0) and LR(1) items: closure and goto.
//!
//! An item stores a production id rather than the production itself, so
//! `Lr0Item` stays `Copy`/cheap to hash even though `Symbol` no longer is;
//! the id pairs directly into `Grammar::all_productions`.

use crate::first_follow::{first_of_string, FirstSets};
use crate::grammar::Grammar;
use crate::symbol::Symbol;
use std::collections::{BTreeSet, HashSet};

/// An LR(0) item `[A → α•β]`, referencing a production by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lr0Item {
    pub production_id: usize,
    pub dot: usize,
}

impl Lr0Item {
    pub fn new(production_id: usize, dot: usize) -> Self {
        Self { production_id, dot }
    }

    /// The symbol immediately after the dot, if any.
    pub fn symbol_after_dot(self, grammar: &Grammar) -> Option<Symbol> {
        grammar
            .production(self.production_id)
            .and_then(|p| p.rhs.get(self.dot).cloned())
    }

    /// True if the dot is at the end of the production (a reduce item).
    pub fn is_reduce_item(self, grammar: &Grammar) -> bool {
        grammar
            .production(self.production_id)
            .is_none_or(|p| self.dot >= p.rhs.len())
    }

    fn advanced(self) -> Self {
        Self::new(self.production_id, self.dot + 1)
    }
}

/// An LR(1) item `[A → α•β, a]`: an LR(0) item plus a single lookahead
/// terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Lr1Item {
    pub core: Lr0Item,
    pub lookahead: Symbol,
}

impl Lr1Item {
    pub fn new(production_id: usize, dot: usize, lookahead: Symbol) -> Self {
        Self {
            core: Lr0Item::new(production_id, dot),
            lookahead,
        }
    }

    pub fn symbol_after_dot(&self, grammar: &Grammar) -> Option<Symbol> {
        self.core.symbol_after_dot(grammar)
    }

    pub fn is_reduce_item(&self, grammar: &Grammar) -> bool {
        self.core.is_reduce_item(grammar)
    }

    fn advanced(&self) -> Self {
        Self {
            core: self.core.advanced(),
            lookahead: self.lookahead.clone(),
        }
    }
}

/// A state's LR(1) core: the set of `(production_id, dot)` pairs ignoring
/// lookaheads. Two LR(1) states with the same core are merge candidates
/// under LALR(1).
pub fn lr1_core(items: &HashSet<Lr1Item>) -> BTreeSet<(usize, usize)> {
    items
        .iter()
        .map(|it| (it.core.production_id, it.core.dot))
        .collect()
}

/// Computes the closure of a set of LR(0) items: for every item with the
/// dot before a nonterminal B, add `[B → •γ]` for each of B's productions.
pub fn lr0_closure(grammar: &Grammar, items: HashSet<Lr0Item>) -> HashSet<Lr0Item> {
    let mut result = items;
    let mut changed = true;

    while changed {
        changed = false;
        let frontier: Vec<Lr0Item> = result.iter().copied().collect();

        for item in frontier {
            if let Some(symbol) = item.symbol_after_dot(grammar)
                && symbol.is_nonterminal()
            {
                for production in grammar.get_productions(&symbol) {
                    let new_item = Lr0Item::new(production.id, 0);
                    if result.insert(new_item) {
                        changed = true;
                    }
                }
            }
        }
    }

    result
}

/// Computes `goto(I, X)`: advance the dot over `X` in every item of `I`
/// that has `X` after the dot, then close the result.
pub fn lr0_goto(grammar: &Grammar, items: &HashSet<Lr0Item>, symbol: &Symbol) -> HashSet<Lr0Item> {
    let moved: HashSet<Lr0Item> = items
        .iter()
        .filter(|it| it.symbol_after_dot(grammar).as_ref() == Some(symbol))
        .map(|it| it.advanced())
        .collect();
    lr0_closure(grammar, moved)
}

/// Computes the closure of a set of LR(1) items: for `[A → α•Bβ, a]`, add
/// `[B → •γ, b]` for every production `B → γ` and every `b ∈
/// FIRST(βa)`.
pub fn lr1_closure(
    grammar: &Grammar,
    first_sets: &FirstSets,
    items: HashSet<Lr1Item>,
) -> HashSet<Lr1Item> {
    let mut result = items;
    let mut changed = true;

    while changed {
        changed = false;
        let frontier: Vec<Lr1Item> = result.iter().cloned().collect();

        for item in frontier {
            let Some(production) = grammar.production(item.core.production_id) else {
                continue;
            };
            let Some(symbol) = item.core.symbol_after_dot(grammar) else {
                continue;
            };
            if !symbol.is_nonterminal() {
                continue;
            }

            let mut beta_a = production.rhs[item.core.dot + 1..].to_vec();
            beta_a.push(item.lookahead.clone());
            let lookaheads = first_of_string(first_sets, &beta_a);

            for gprod in grammar.get_productions(&symbol) {
                for lookahead in &lookaheads {
                    let new_item = Lr1Item::new(gprod.id, 0, lookahead.clone());
                    if result.insert(new_item) {
                        changed = true;
                    }
                }
            }
        }
    }

    result
}

/// Computes `goto(I, X)` for a set of LR(1) items.
pub fn lr1_goto(
    grammar: &Grammar,
    first_sets: &FirstSets,
    items: &HashSet<Lr1Item>,
    symbol: &Symbol,
) -> HashSet<Lr1Item> {
    let moved: HashSet<Lr1Item> = items
        .iter()
        .filter(|it| it.symbol_after_dot(grammar).as_ref() == Some(symbol))
        .map(Lr1Item::advanced)
        .collect();
    lr1_closure(grammar, first_sets, moved)
}
