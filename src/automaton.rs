//! Canonical LR(0)/LR(1) collection construction and LALR(1) core-merging.
//!
//! Both collections are built with the same worklist/BFS shape: seed a
//! start state, close it, and follow every GOTO transition until no new
//! state is discovered. LALR(1) then merges LR(1) states sharing a core.

use crate::first_follow::FirstSets;
use crate::grammar::Grammar;
use crate::items::{lr0_closure, lr0_goto, lr1_closure, lr1_core, lr1_goto, Lr0Item, Lr1Item};
use crate::symbol::Symbol;
use log::debug;
use std::collections::{HashMap, HashSet, VecDeque};

/// The canonical collection of LR(0) item sets plus their GOTO transitions.
/// State 0 is always the initial state (the closure of `[S' → •S]`).
#[derive(Debug)]
pub struct Lr0Automaton {
    pub states: Vec<HashSet<Lr0Item>>,
    pub transitions: HashMap<(usize, Symbol), usize>,
}

/// The canonical collection of LR(1) item sets plus their GOTO transitions.
/// Used directly for CLR(1); merged by core for LALR(1).
#[derive(Debug)]
pub struct Lr1Automaton {
    pub states: Vec<HashSet<Lr1Item>>,
    pub transitions: HashMap<(usize, Symbol), usize>,
}

/// Builds the canonical LR(0) collection by BFS from the initial state,
/// discovering successor states via `goto` over every symbol that appears
/// after a dot.
pub fn build_lr0(grammar: &Grammar) -> Lr0Automaton {
    let initial = lr0_closure(grammar, HashSet::from([Lr0Item::new(0, 0)]));
    let mut states = vec![initial];
    let mut transitions = HashMap::new();
    let mut worklist: VecDeque<usize> = VecDeque::from([0]);

    while let Some(state_id) = worklist.pop_front() {
        let symbols = shiftable_symbols(grammar, &states[state_id], |it, g| it.symbol_after_dot(g));

        for symbol in symbols {
            let next = lr0_goto(grammar, &states[state_id], &symbol);
            if next.is_empty() {
                continue;
            }
            let next_id = find_or_insert(&mut states, next, &mut worklist);
            transitions.insert((state_id, symbol), next_id);
        }
    }

    debug!("LR(0) automaton: {} states", states.len());
    Lr0Automaton { states, transitions }
}

/// Builds the canonical LR(1) collection, analogous to [`build_lr0`] but
/// tracking per-item lookaheads through closure and goto.
pub fn build_lr1(grammar: &Grammar, first_sets: &FirstSets) -> Lr1Automaton {
    let initial = lr1_closure(
        grammar,
        first_sets,
        HashSet::from([Lr1Item::new(0, 0, Symbol::EndMarker)]),
    );
    let mut states = vec![initial];
    let mut transitions = HashMap::new();
    let mut worklist: VecDeque<usize> = VecDeque::from([0]);

    while let Some(state_id) = worklist.pop_front() {
        let symbols =
            shiftable_symbols(grammar, &states[state_id], |it, g| it.symbol_after_dot(g));

        for symbol in symbols {
            let next = lr1_goto(grammar, first_sets, &states[state_id], &symbol);
            if next.is_empty() {
                continue;
            }
            let next_id = find_or_insert(&mut states, next, &mut worklist);
            transitions.insert((state_id, symbol), next_id);
        }
    }

    debug!("LR(1) automaton: {} states", states.len());
    Lr1Automaton { states, transitions }
}

/// Merges LR(1) states that share an identical core (the set of
/// `(production_id, dot)` pairs, ignoring lookaheads), producing the
/// LALR(1) collection. Since cores are equal within a merge
/// group, the merged state's item set is simply the union of the group's
/// items — lookaheads for the same core end up as distinct `Lr1Item`s
/// sharing that core, which is exactly a unioned lookahead set.
pub fn merge_lalr(lr1: Lr1Automaton) -> Lr1Automaton {
    let mut groups: HashMap<Vec<(usize, usize)>, Vec<usize>> = HashMap::new();
    for (idx, state) in lr1.states.iter().enumerate() {
        let core: Vec<(usize, usize)> = lr1_core(state).into_iter().collect();
        groups.entry(core).or_default().push(idx);
    }

    // Stable numbering: order merged states by the smallest original state
    // id in each group, so state 0 remains the initial state.
    let mut ordered_groups: Vec<Vec<usize>> = groups.into_values().collect();
    ordered_groups.sort_by_key(|g| *g.iter().min().unwrap());

    let mut old_to_new = HashMap::new();
    for (new_id, group) in ordered_groups.iter().enumerate() {
        for &old_id in group {
            old_to_new.insert(old_id, new_id);
        }
    }

    let merged_states: Vec<HashSet<Lr1Item>> = ordered_groups
        .iter()
        .map(|group| {
            let mut merged = HashSet::new();
            for &old_id in group {
                merged.extend(lr1.states[old_id].iter().cloned());
            }
            merged
        })
        .collect();

    let mut merged_transitions = HashMap::new();
    for ((old_src, symbol), old_dst) in lr1.transitions {
        let new_src = old_to_new[&old_src];
        let new_dst = old_to_new[&old_dst];
        merged_transitions.insert((new_src, symbol), new_dst);
    }

    debug!(
        "LALR(1) merge: {} LR(1) states -> {} LALR(1) states",
        old_to_new.len(),
        merged_states.len()
    );

    Lr1Automaton {
        states: merged_states,
        transitions: merged_transitions,
    }
}

fn shiftable_symbols<T: Clone>(
    grammar: &Grammar,
    state: &HashSet<T>,
    symbol_after_dot: impl Fn(T, &Grammar) -> Option<Symbol>,
) -> HashSet<Symbol> {
    state
        .iter()
        .filter_map(|item| symbol_after_dot(item.clone(), grammar))
        .collect()
}

fn find_or_insert<T: Eq>(
    states: &mut Vec<T>,
    candidate: T,
    worklist: &mut VecDeque<usize>,
) -> usize {
    if let Some(existing_id) = states.iter().position(|s| s == &candidate) {
        existing_id
    } else {
        let new_id = states.len();
        states.push(candidate);
        worklist.push_back(new_id);
        new_id
    }
}
