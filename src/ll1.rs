//! LL(1) predictive parse table construction.
//!
//! A multiply-defined cell never aborts construction: it is recorded as an
//! [`Ll1Conflict`] and resolved by favoring the longest-RHS alternative
//! (ties broken by lowest production id), the same "longer match wins"
//! principle a shift/reduce table applies by always favoring shift.

use crate::first_follow::{first_plus, FirstSets, FollowSets};
use crate::grammar::Grammar;
use crate::symbol::Symbol;
use std::collections::HashMap;
use std::fmt;

/// A multiply-defined LL(1) table cell: two or more productions both claim
/// `M[nonterminal, terminal]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ll1Conflict {
    pub nonterminal: Symbol,
    pub terminal: Symbol,
    pub productions: Vec<usize>,
    pub resolved: usize,
}

impl fmt::Display for Ll1Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LL(1) conflict in M[{}, {}]: productions {:?}, resolved to {}",
            self.nonterminal, self.terminal, self.productions, self.resolved
        )
    }
}

/// The LL(1) predictive parse table: `M[A, a] = production id`.
#[derive(Debug)]
pub struct Ll1Table {
    table: HashMap<(Symbol, Symbol), usize>,
    pub conflicts: Vec<Ll1Conflict>,
}

impl Ll1Table {
    /// Builds the predictive table: for each production `A → α`, for each
    /// `a ∈ FIRST⁺(A → α)`, set `M[A, a] = production`.
    pub fn build(grammar: &Grammar, first_sets: &FirstSets, follow_sets: &FollowSets) -> Self {
        let mut table: HashMap<(Symbol, Symbol), usize> = HashMap::new();
        let mut conflicts = Vec::new();
        let rhs_len: Vec<usize> = grammar.all_productions().iter().map(|p| p.rhs.len()).collect();

        // On a multiply-defined cell, prefer the alternative that consumes
        // more of the input (longest RHS), the LL(1) analogue of a
        // shift/reduce table always favoring the shift; ties fall back to
        // the lowest production id so the choice stays deterministic.
        let prefer = |a: usize, b: usize| -> usize {
            match rhs_len[a].cmp(&rhs_len[b]) {
                std::cmp::Ordering::Greater => a,
                std::cmp::Ordering::Less => b,
                std::cmp::Ordering::Equal => a.min(b),
            }
        };

        for production in grammar.all_productions() {
            let selectors = first_plus(first_sets, follow_sets, &production.lhs, &production.rhs);

            for terminal in selectors {
                let key = (production.lhs.clone(), terminal.clone());
                match table.get(&key) {
                    None => {
                        table.insert(key, production.id);
                    }
                    Some(&existing_id) => {
                        let winner = prefer(existing_id, production.id);
                        conflicts.push(Ll1Conflict {
                            nonterminal: production.lhs.clone(),
                            terminal,
                            productions: {
                                let mut ps = vec![existing_id, production.id];
                                ps.sort_unstable();
                                ps
                            },
                            resolved: winner,
                        });
                        table.insert(key, winner);
                    }
                }
            }
        }

        Self { table, conflicts }
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Looks up the production id predicted for `(nonterminal, terminal)`.
    pub fn get(&self, nonterminal: &Symbol, terminal: &Symbol) -> Option<usize> {
        self.table.get(&(nonterminal.clone(), terminal.clone())).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::first_follow::{compute_first_sets, compute_follow_sets};
    use crate::grammar::Grammar;

    #[test]
    fn builds_conflict_free_table_for_ll1_grammar() {
        let grammar = Grammar::parse("S -> A B\nA -> a A | ε\nB -> b").unwrap();
        let first_sets = compute_first_sets(&grammar);
        let follow_sets = compute_follow_sets(&grammar, &first_sets);
        let table = Ll1Table::build(&grammar, &first_sets, &follow_sets);
        assert!(!table.has_conflicts());
        assert!(table
            .get(&Symbol::nonterminal("A"), &Symbol::terminal("a"))
            .is_some());
    }

    #[test]
    fn left_recursive_grammar_is_not_ll1() {
        let grammar = Grammar::parse("E -> E plus T | T\nT -> id").unwrap();
        let first_sets = compute_first_sets(&grammar);
        let follow_sets = compute_follow_sets(&grammar, &first_sets);
        let table = Ll1Table::build(&grammar, &first_sets, &follow_sets);
        assert!(table.has_conflicts());
    }
}
