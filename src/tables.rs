//! ACTION/GOTO table construction for SLR(1), CLR(1), and LALR(1), sharing
//! the same shift/goto/accept installation logic and varying only the
//! reduce-lookahead source (FOLLOW sets for SLR, per-item lookaheads for
//! CLR/LALR).
//!
//! A conflict never aborts construction: it is a non-fatal [`Conflict`]
//! record — the table keeps building, the conflicting cell gets the
//! documented tie-break (shift wins over reduce; lowest production id wins
//! reduce/reduce), and every conflict found is returned alongside the
//! otherwise-usable table.

use crate::automaton::{Lr0Automaton, Lr1Automaton};
use crate::first_follow::FollowSets;
use crate::grammar::Grammar;
use crate::items::{Lr0Item, Lr1Item};
use crate::symbol::Symbol;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// One cell of an ACTION table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce(usize),
    Accept,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Shift(s) => write!(f, "shift {s}"),
            Action::Reduce(p) => write!(f, "reduce {p}"),
            Action::Accept => write!(f, "accept"),
        }
    }
}

/// The kind of parser-table conflict encountered at a single (state,
/// lookahead) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
}

/// A non-fatal record of two or more actions competing for the same
/// (state, lookahead) cell. The table still resolves to one action (the
/// tie-break winner) so parsing can proceed; this record exists purely for
/// reporting: conflicts are data, not exceptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub state: usize,
    pub symbol: Symbol,
    pub kind: ConflictKind,
    /// Production ids competing for this cell (the shift, if any, isn't a
    /// production and so isn't listed here).
    pub productions: Vec<usize>,
    pub resolved: Action,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ConflictKind::ShiftReduce => "shift/reduce",
            ConflictKind::ReduceReduce => "reduce/reduce",
        };
        write!(
            f,
            "{kind} conflict in state {} on {}: productions {:?}, resolved to {}",
            self.state, self.symbol, self.productions, self.resolved
        )
    }
}

/// ACTION + GOTO tables for one LR-family parser, plus any conflicts
/// encountered while building them.
#[derive(Debug)]
pub struct ParseTables {
    pub action: HashMap<(usize, Symbol), Action>,
    pub goto: HashMap<(usize, Symbol), usize>,
    pub conflicts: Vec<Conflict>,
    pub num_states: usize,
}

impl ParseTables {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// Builds SLR(1) tables: LR(0) automaton, reduce lookaheads from FOLLOW.
pub fn build_slr_tables(
    grammar: &Grammar,
    automaton: &Lr0Automaton,
    follow_sets: &FollowSets,
) -> ParseTables {
    build_tables(grammar, &automaton.states, &automaton.transitions, |item, _g| {
        follow_sets.get(&grammar.production(item.production_id).unwrap().lhs)
            .cloned()
            .unwrap_or_default()
    })
}

/// Builds CLR(1) or LALR(1) tables: an LR(1) automaton (unmerged for CLR,
/// core-merged for LALR), reduce lookaheads taken directly from each item.
pub fn build_lr1_tables(grammar: &Grammar, automaton: &Lr1Automaton) -> ParseTables {
    build_tables_lr1(grammar, &automaton.states, &automaton.transitions)
}

fn build_tables(
    grammar: &Grammar,
    states: &[HashSet<Lr0Item>],
    transitions: &HashMap<(usize, Symbol), usize>,
    reduce_lookaheads: impl Fn(Lr0Item, &Grammar) -> HashSet<Symbol>,
) -> ParseTables {
    let mut action = HashMap::new();
    let mut goto = HashMap::new();
    let mut conflicts = Vec::new();

    install_shifts_and_gotos(states.len(), transitions, &mut action, &mut goto);

    for (state_id, state) in states.iter().enumerate() {
        for &item in state {
            if item.is_reduce_item(grammar) {
                let production = grammar.production(item.production_id).unwrap();
                if production.id == 0 {
                    action.insert((state_id, Symbol::EndMarker), Action::Accept);
                    continue;
                }
                for symbol in reduce_lookaheads(item, grammar) {
                    install_reduce(state_id, symbol, production.id, &mut action, &mut conflicts);
                }
            }
        }
    }

    ParseTables {
        action,
        goto,
        conflicts,
        num_states: states.len(),
    }
}

fn build_tables_lr1(
    grammar: &Grammar,
    states: &[HashSet<Lr1Item>],
    transitions: &HashMap<(usize, Symbol), usize>,
) -> ParseTables {
    let mut action = HashMap::new();
    let mut goto = HashMap::new();
    let mut conflicts = Vec::new();

    install_shifts_and_gotos(states.len(), transitions, &mut action, &mut goto);

    for (state_id, state) in states.iter().enumerate() {
        for item in state {
            if item.is_reduce_item(grammar) {
                let production = grammar.production(item.core.production_id).unwrap();
                if production.id == 0 {
                    action.insert((state_id, Symbol::EndMarker), Action::Accept);
                    continue;
                }
                install_reduce(
                    state_id,
                    item.lookahead.clone(),
                    production.id,
                    &mut action,
                    &mut conflicts,
                );
            }
        }
    }

    ParseTables {
        action,
        goto,
        conflicts,
        num_states: states.len(),
    }
}

fn install_shifts_and_gotos(
    num_states: usize,
    transitions: &HashMap<(usize, Symbol), usize>,
    action: &mut HashMap<(usize, Symbol), Action>,
    goto: &mut HashMap<(usize, Symbol), usize>,
) {
    let _ = num_states;
    for (&(state_id, ref symbol), &next) in transitions {
        if symbol.is_nonterminal() {
            goto.insert((state_id, symbol.clone()), next);
        } else {
            action.insert((state_id, symbol.clone()), Action::Shift(next));
        }
    }
}

/// Installs a reduce action at `(state, symbol)`, applying the documented
/// tie-break and recording a [`Conflict`] if the cell was already occupied:
/// shift wins over reduce; among competing reduces, the lowest production
/// id wins.
fn install_reduce(
    state: usize,
    symbol: Symbol,
    production_id: usize,
    action: &mut HashMap<(usize, Symbol), Action>,
    conflicts: &mut Vec<Conflict>,
) {
    let key = (state, symbol.clone());
    match action.get(&key) {
        None => {
            action.insert(key, Action::Reduce(production_id));
        }
        Some(Action::Shift(_)) => {
            conflicts.push(Conflict {
                state,
                symbol,
                kind: ConflictKind::ShiftReduce,
                productions: vec![production_id],
                resolved: action[&key].clone(),
            });
        }
        Some(Action::Accept) => {
            // Augmented production has no other reduce to contend with.
        }
        Some(Action::Reduce(existing_id)) => {
            let existing_id = *existing_id;
            let winner = existing_id.min(production_id);
            conflicts.push(Conflict {
                state,
                symbol: symbol.clone(),
                kind: ConflictKind::ReduceReduce,
                productions: {
                    let mut ps = vec![existing_id, production_id];
                    ps.sort_unstable();
                    ps
                },
                resolved: Action::Reduce(winner),
            });
            action.insert(key, Action::Reduce(winner));
        }
    }
}
