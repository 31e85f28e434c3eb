//! FIRST and FOLLOW set computation for context-free grammars.
//!
//! Implements the classical fixed-point algorithms (Aho et al., "Compilers:
//! Principles, Techniques, and Tools", 2nd ed., §4.4), generalized from
//! single-character symbols to named ones.

use crate::grammar::Grammar;
use crate::symbol::Symbol;
use log::trace;
use std::collections::{HashMap, HashSet};

/// Type alias for FIRST sets mapping.
pub type FirstSets = HashMap<Symbol, HashSet<Symbol>>;

/// Type alias for FOLLOW sets mapping.
pub type FollowSets = HashMap<Symbol, HashSet<Symbol>>;

/// Computes the FIRST sets for all symbols in the grammar.
///
/// # Algorithm
/// 1. For terminals: FIRST(a) = {a}.
/// 2. For nonterminal A with production A → X₁X₂...Xₙ: add FIRST(X₁) - {ε}
///    to FIRST(A); if ε ∈ FIRST(X₁), also add FIRST(X₂) - {ε}; continue
///    while every Xᵢ so far derives ε; if all Xᵢ derive ε, add ε to FIRST(A).
/// 3. Repeat until no set grows (fixed-point iteration).
pub fn compute_first_sets(grammar: &Grammar) -> FirstSets {
    let mut first_sets: FirstSets = HashMap::new();

    for terminal in grammar.terminals() {
        first_sets.insert(terminal.clone(), HashSet::from([terminal.clone()]));
    }
    first_sets.insert(Symbol::Epsilon, HashSet::from([Symbol::Epsilon]));
    first_sets.insert(Symbol::EndMarker, HashSet::from([Symbol::EndMarker]));
    for nonterminal in grammar.nonterminals() {
        first_sets.insert(nonterminal.clone(), HashSet::new());
    }

    let mut round = 0usize;
    let mut changed = true;
    while changed {
        changed = false;
        round += 1;

        for production in grammar.all_productions() {
            let lhs = production.lhs.clone();
            let current_first = first_sets.get(&lhs).unwrap().clone();

            let rhs_first = first_of_string(&first_sets, &production.rhs);
            let new_first: HashSet<Symbol> =
                current_first.union(&rhs_first).cloned().collect();

            if new_first.len() != current_first.len() {
                first_sets.insert(lhs, new_first);
                changed = true;
            }
        }

        trace!("FIRST fixed-point round {round}: changed={changed}");
    }

    first_sets
}

/// Computes FIRST(X₁...Xₖ) for a string (sequence of symbols), given the
/// already-fixed-point per-symbol FIRST sets. FIRST of the empty sequence
/// is `{ε}`.
pub fn first_of_string(first_sets: &FirstSets, symbols: &[Symbol]) -> HashSet<Symbol> {
    let mut result = HashSet::new();
    let mut has_epsilon = true;

    for symbol in symbols {
        if !has_epsilon {
            break;
        }

        let first_sym = first_sets.get(symbol).cloned().unwrap_or_default();
        for sym in &first_sym {
            if !sym.is_epsilon() {
                result.insert(sym.clone());
            }
        }
        has_epsilon = first_sym.contains(&Symbol::Epsilon);
    }

    if has_epsilon {
        result.insert(Symbol::Epsilon);
    }

    result
}

/// Computes the FOLLOW sets for all nonterminals in the grammar.
///
/// # Algorithm
/// 1. FOLLOW(S) contains `$`.
/// 2. For production A → αBβ: add FIRST(β) - {ε} to FOLLOW(B); if ε ∈
///    FIRST(β) or β is empty, add FOLLOW(A) to FOLLOW(B).
/// 3. Repeat until no set grows.
pub fn compute_follow_sets(grammar: &Grammar, first_sets: &FirstSets) -> FollowSets {
    let mut follow_sets: FollowSets = HashMap::new();
    for nonterminal in grammar.nonterminals() {
        follow_sets.insert(nonterminal.clone(), HashSet::new());
    }

    let start_symbol = grammar.start_symbol().clone();
    follow_sets
        .get_mut(&start_symbol)
        .unwrap()
        .insert(Symbol::EndMarker);

    let mut round = 0usize;
    let mut changed = true;
    while changed {
        changed = false;
        round += 1;

        for production in grammar.all_productions() {
            let lhs = production.lhs.clone();
            let rhs = &production.rhs;

            for (i, symbol) in rhs.iter().enumerate() {
                if !symbol.is_nonterminal() {
                    continue;
                }

                let current_follow = follow_sets.get(symbol).unwrap().clone();
                let mut new_follow = current_follow.clone();

                let beta = &rhs[i + 1..];
                let first_beta = first_of_string(first_sets, beta);

                for sym in &first_beta {
                    if !sym.is_epsilon() {
                        new_follow.insert(sym.clone());
                    }
                }

                if beta.is_empty() || first_beta.contains(&Symbol::Epsilon) {
                    let follow_lhs = follow_sets.get(&lhs).unwrap().clone();
                    new_follow = new_follow.union(&follow_lhs).cloned().collect();
                }

                if new_follow.len() != current_follow.len() {
                    follow_sets.insert(symbol.clone(), new_follow);
                    changed = true;
                }
            }
        }

        trace!("FOLLOW fixed-point round {round}: changed={changed}");
    }

    follow_sets
}

/// Computes FIRST⁺(A → α) = FIRST(α) - {ε} ∪ (FOLLOW(A) if ε ∈ FIRST(α)),
/// the per-production selector set used by LL(1) table construction.
pub fn first_plus(
    first_sets: &FirstSets,
    follow_sets: &FollowSets,
    lhs: &Symbol,
    rhs: &[Symbol],
) -> HashSet<Symbol> {
    let first_alpha = first_of_string(first_sets, rhs);
    let mut result: HashSet<Symbol> = first_alpha
        .iter()
        .filter(|s| !s.is_epsilon())
        .cloned()
        .collect();

    if first_alpha.contains(&Symbol::Epsilon)
        && let Some(follow_lhs) = follow_sets.get(lhs)
    {
        result.extend(follow_lhs.iter().cloned());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;

    #[test]
    fn first_sets_simple() {
        let grammar = Grammar::parse("S -> A B\nA -> a").unwrap();
        let first_sets = compute_first_sets(&grammar);
        assert!(first_sets[&Symbol::nonterminal("A")].contains(&Symbol::terminal("a")));
    }

    #[test]
    fn follow_sets_simple() {
        let grammar = Grammar::parse("S -> A B\nA -> a").unwrap();
        let first_sets = compute_first_sets(&grammar);
        let follow_sets = compute_follow_sets(&grammar, &first_sets);
        assert!(follow_sets[grammar.start_symbol()].contains(&Symbol::EndMarker));
    }

    #[test]
    fn first_with_epsilon() {
        let grammar = Grammar::parse("S -> A B\nA -> a | ε").unwrap();
        let first_sets = compute_first_sets(&grammar);
        let first_a = &first_sets[&Symbol::nonterminal("A")];
        assert!(first_a.contains(&Symbol::terminal("a")));
        assert!(first_a.contains(&Symbol::Epsilon));
    }

    #[test]
    fn follow_propagation() {
        let grammar = Grammar::parse("S -> A B\nA -> a\nB -> b").unwrap();
        let first_sets = compute_first_sets(&grammar);
        let follow_sets = compute_follow_sets(&grammar, &first_sets);
        assert!(follow_sets[&Symbol::nonterminal("A")].contains(&Symbol::terminal("b")));
    }

    #[test]
    fn first_plus_uses_follow_when_nullable() {
        let grammar = Grammar::parse("S -> A B\nA -> a | ε\nB -> b").unwrap();
        let first_sets = compute_first_sets(&grammar);
        let follow_sets = compute_follow_sets(&grammar, &first_sets);
        let plus = first_plus(&first_sets, &follow_sets, &Symbol::nonterminal("A"), &[]);
        assert!(plus.contains(&Symbol::terminal("b")));
    }
}
