//! Parse drivers: shift-reduce (SLR/CLR/LALR) and predictive (LL(1)),
//! both producing a step-by-step [`Trace`] and a [`ParseTree`] alongside
//! the plain accept/reject verdict, for the CLI's `--trace`/`--tree`
//! output.

use crate::grammar::Grammar;
use crate::ll1::Ll1Table;
use crate::symbol::Symbol;
use crate::tables::{Action, ParseTables};
use std::fmt;

/// One entry of a driver's stack snapshot: the shift-reduce driver's stack
/// alternates parser states and grammar symbols (spec.md §4.8); the
/// predictive driver's stack holds only symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackEntry {
    State(usize),
    Symbol(Symbol),
}

impl fmt::Display for StackEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackEntry::State(s) => write!(f, "{s}"),
            StackEntry::Symbol(sym) => write!(f, "{sym}"),
        }
    }
}

/// One recorded step of a parse attempt: stack and remaining-input
/// snapshots taken before the action is applied (spec.md §3, §4.8), plus a
/// human-readable description of the action for trace rendering.
#[derive(Debug, Clone)]
pub struct ParseStep {
    /// 0-based position of this step within the trace.
    pub step: usize,
    /// The stack, bottom to top, as it stood before this action ran.
    pub stack: Vec<StackEntry>,
    /// The unconsumed input, including the trailing `$`, before this action ran.
    pub remaining_input: Vec<Symbol>,
    /// Human-readable description of the action taken (shift/reduce/match/
    /// predict/accept/error).
    pub action: String,
}

/// The ordered sequence of steps taken during a parse attempt.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    pub steps: Vec<ParseStep>,
}

impl Trace {
    fn record(
        &mut self,
        stack: Vec<StackEntry>,
        remaining_input: Vec<Symbol>,
        action: impl Into<String>,
    ) {
        let step = self.steps.len();
        self.steps.push(ParseStep {
            step,
            stack,
            remaining_input,
            action: action.into(),
        });
    }
}

/// One node of a derivation tree, stored in an arena (`ParseTree::nodes`)
/// and referenced by index — avoids the ownership tangle of a
/// self-referential tree while staying cheap to build incrementally from
/// either a bottom-up or top-down driver.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub symbol: Symbol,
    pub children: Vec<usize>,
}

/// A derivation tree rooted at `nodes[root]`.
#[derive(Debug, Clone)]
pub struct ParseTree {
    pub nodes: Vec<TreeNode>,
    pub root: usize,
}

impl ParseTree {
    /// Renders the tree as indented text, one symbol per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_node(self.root, 0, &mut out);
        out
    }

    fn render_node(&self, idx: usize, depth: usize, out: &mut String) {
        let node = &self.nodes[idx];
        out.push_str(&"  ".repeat(depth));
        out.push_str(&node.symbol.to_string());
        out.push('\n');
        for &child in &node.children {
            self.render_node(child, depth + 1, out);
        }
    }
}

/// The outcome of a parse attempt: whether the input was accepted, the
/// trace leading there, and the derivation tree if one was built (built
/// even for a rejected input, up to the point of failure, so the caller can
/// inspect how far the derivation got).
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub accepted: bool,
    pub trace: Trace,
    pub tree: Option<ParseTree>,
}

/// Builds a stack snapshot alternating `State`/`Symbol` entries (spec.md
/// §4.8), bottom to top, from the parallel `state_stack`/`node_stack`.
fn lr_stack_snapshot(state_stack: &[usize], node_stack: &[usize], nodes: &[TreeNode]) -> Vec<StackEntry> {
    let mut snapshot = vec![StackEntry::State(state_stack[0])];
    for (state, &node_idx) in state_stack[1..].iter().zip(node_stack) {
        snapshot.push(StackEntry::Symbol(nodes[node_idx].symbol.clone()));
        snapshot.push(StackEntry::State(*state));
    }
    snapshot
}

/// Runs the shift-reduce driver used by SLR(1)/CLR(1)/LALR(1): a state
/// stack drives ACTION/GOTO lookups while a parallel node-index
/// stack builds the derivation tree bottom-up.
pub fn run_lr(grammar: &Grammar, tables: &ParseTables, input: &[Symbol]) -> ParseOutcome {
    let mut with_end_marker = input.to_vec();
    with_end_marker.push(Symbol::EndMarker);

    let mut trace = Trace::default();
    let mut nodes: Vec<TreeNode> = Vec::new();
    let mut state_stack: Vec<usize> = vec![0];
    let mut node_stack: Vec<usize> = Vec::new();
    let mut pos = 0usize;

    loop {
        let state = *state_stack.last().unwrap();
        let remaining = with_end_marker[pos..].to_vec();
        let Some(current) = with_end_marker.get(pos) else {
            trace.record(
                lr_stack_snapshot(&state_stack, &node_stack, &nodes),
                remaining,
                "input exhausted without reaching accept",
            );
            return ParseOutcome {
                accepted: false,
                trace,
                tree: None,
            };
        };

        match tables.action.get(&(state, current.clone())) {
            Some(Action::Shift(next)) => {
                trace.record(
                    lr_stack_snapshot(&state_stack, &node_stack, &nodes),
                    remaining,
                    format!("shift {current} -> state {next}"),
                );
                nodes.push(TreeNode {
                    symbol: current.clone(),
                    children: Vec::new(),
                });
                node_stack.push(nodes.len() - 1);
                state_stack.push(*next);
                pos += 1;
            }
            Some(Action::Reduce(production_id)) => {
                let production = grammar.production(*production_id).unwrap();
                let rhs_len = production.rhs.len();
                trace.record(
                    lr_stack_snapshot(&state_stack, &node_stack, &nodes),
                    remaining.clone(),
                    format!("reduce by {production}"),
                );

                let children: Vec<usize> = if rhs_len == 0 {
                    Vec::new()
                } else {
                    let split = node_stack.len() - rhs_len;
                    state_stack.truncate(state_stack.len() - rhs_len);
                    node_stack.split_off(split)
                };

                nodes.push(TreeNode {
                    symbol: production.lhs.clone(),
                    children,
                });
                let new_node = nodes.len() - 1;

                let goto_state = *state_stack.last().unwrap();
                match tables.goto.get(&(goto_state, production.lhs.clone())) {
                    Some(&next) => {
                        state_stack.push(next);
                        node_stack.push(new_node);
                    }
                    None => {
                        trace.record(
                            lr_stack_snapshot(&state_stack, &node_stack, &nodes),
                            remaining,
                            format!("no GOTO entry for state {goto_state} on {}", production.lhs),
                        );
                        return ParseOutcome {
                            accepted: false,
                            trace,
                            tree: None,
                        };
                    }
                }
            }
            Some(Action::Accept) => {
                trace.record(
                    lr_stack_snapshot(&state_stack, &node_stack, &nodes),
                    remaining,
                    "accept",
                );
                let root = node_stack.pop().unwrap_or(nodes.len() - 1);
                return ParseOutcome {
                    accepted: true,
                    trace,
                    tree: Some(ParseTree { nodes, root }),
                };
            }
            None => {
                trace.record(
                    lr_stack_snapshot(&state_stack, &node_stack, &nodes),
                    remaining,
                    format!("no ACTION entry for state {state} on {current}"),
                );
                return ParseOutcome {
                    accepted: false,
                    trace,
                    tree: None,
                };
            }
        }
    }
}

/// Runs the predictive LL(1) driver: a symbol stack paired with
/// the derivation tree arena, wiring each nonterminal's children in as soon
/// as it is expanded rather than only once its subtree is complete.
pub fn run_ll1(grammar: &Grammar, table: &Ll1Table, input: &[Symbol]) -> ParseOutcome {
    let mut with_end_marker = input.to_vec();
    with_end_marker.push(Symbol::EndMarker);

    let mut trace = Trace::default();
    let mut nodes: Vec<TreeNode> = vec![TreeNode {
        symbol: grammar.start_symbol().clone(),
        children: Vec::new(),
    }];
    let mut stack: Vec<(Symbol, usize)> = vec![
        (Symbol::EndMarker, usize::MAX),
        (grammar.start_symbol().clone(), 0),
    ];
    let mut pos = 0usize;

    while let Some((top, node_idx)) = stack.last().cloned() {
        let current = with_end_marker.get(pos).cloned().unwrap_or(Symbol::EndMarker);
        let stack_snapshot: Vec<StackEntry> =
            stack.iter().map(|(s, _)| StackEntry::Symbol(s.clone())).collect();
        let remaining = with_end_marker[pos..].to_vec();

        if top == current {
            trace.record(stack_snapshot, remaining, format!("match {top}"));
            stack.pop();
            if top != Symbol::EndMarker {
                pos += 1;
            } else {
                break;
            }
            continue;
        }

        if !top.is_nonterminal() {
            trace.record(stack_snapshot, remaining, format!("expected {top}, found {current}"));
            return ParseOutcome {
                accepted: false,
                trace,
                tree: None,
            };
        }

        let Some(production_id) = table.get(&top, &current) else {
            trace.record(stack_snapshot, remaining, format!("no table entry for M[{top}, {current}]"));
            return ParseOutcome {
                accepted: false,
                trace,
                tree: None,
            };
        };
        let production = grammar.production(production_id).unwrap();
        trace.record(stack_snapshot, remaining, format!("predict {production}"));
        stack.pop();

        if production.rhs.is_empty() {
            let epsilon_idx = nodes.len();
            nodes.push(TreeNode {
                symbol: Symbol::Epsilon,
                children: Vec::new(),
            });
            nodes[node_idx].children.push(epsilon_idx);
            continue;
        }

        let mut children = Vec::with_capacity(production.rhs.len());
        for symbol in &production.rhs {
            let idx = nodes.len();
            nodes.push(TreeNode {
                symbol: symbol.clone(),
                children: Vec::new(),
            });
            children.push(idx);
        }
        nodes[node_idx].children = children.clone();

        for (symbol, idx) in production.rhs.iter().zip(children).rev() {
            stack.push((symbol.clone(), idx));
        }
    }

    let accepted = stack.is_empty() && pos == with_end_marker.len() - 1;
    ParseOutcome {
        accepted,
        trace,
        tree: Some(ParseTree { nodes, root: 0 }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::build_lr0;
    use crate::first_follow::{compute_first_sets, compute_follow_sets};
    use crate::grammar::Grammar;
    use crate::symbol::string_to_terminals;
    use crate::tables::build_slr_tables;

    #[test]
    fn lr_driver_accepts_valid_input() {
        let grammar = Grammar::parse("S -> a S | b").unwrap();
        let first_sets = compute_first_sets(&grammar);
        let follow_sets = compute_follow_sets(&grammar, &first_sets);
        let automaton = build_lr0(&grammar);
        let tables = build_slr_tables(&grammar, &automaton, &follow_sets);

        let input = string_to_terminals("a a b");
        let outcome = run_lr(&grammar, &tables, &input);
        assert!(outcome.accepted);
        assert!(outcome.tree.is_some());
    }

    #[test]
    fn lr_driver_rejects_invalid_input() {
        let grammar = Grammar::parse("S -> a S | b").unwrap();
        let first_sets = compute_first_sets(&grammar);
        let follow_sets = compute_follow_sets(&grammar, &first_sets);
        let automaton = build_lr0(&grammar);
        let tables = build_slr_tables(&grammar, &automaton, &follow_sets);

        let input = string_to_terminals("a a c");
        let outcome = run_lr(&grammar, &tables, &input);
        assert!(!outcome.accepted);
    }

    #[test]
    fn ll1_driver_accepts_valid_input_and_builds_tree() {
        let grammar = Grammar::parse("S -> A B\nA -> a A | ε\nB -> b").unwrap();
        let first_sets = compute_first_sets(&grammar);
        let follow_sets = compute_follow_sets(&grammar, &first_sets);
        let table = Ll1Table::build(&grammar, &first_sets, &follow_sets);

        let input = string_to_terminals("a a b");
        let outcome = run_ll1(&grammar, &table, &input);
        assert!(outcome.accepted);
        assert!(outcome.tree.unwrap().render().contains("B"));
    }

    #[test]
    fn ll1_driver_rejects_invalid_input() {
        let grammar = Grammar::parse("S -> A B\nA -> a A | ε\nB -> b").unwrap();
        let first_sets = compute_first_sets(&grammar);
        let follow_sets = compute_follow_sets(&grammar, &first_sets);
        let table = Ll1Table::build(&grammar, &first_sets, &follow_sets);

        let input = string_to_terminals("a a c");
        let outcome = run_ll1(&grammar, &table, &input);
        assert!(!outcome.accepted);
    }

    #[test]
    fn lr_trace_steps_carry_stack_and_input_snapshots() {
        let grammar = Grammar::parse("S -> a S | b").unwrap();
        let first_sets = compute_first_sets(&grammar);
        let follow_sets = compute_follow_sets(&grammar, &first_sets);
        let automaton = build_lr0(&grammar);
        let tables = build_slr_tables(&grammar, &automaton, &follow_sets);

        let input = string_to_terminals("a b");
        let outcome = run_lr(&grammar, &tables, &input);
        assert!(outcome.accepted);

        let first = &outcome.trace.steps[0];
        assert_eq!(first.step, 0);
        assert_eq!(first.stack, vec![StackEntry::State(0)]);
        let mut expected_input = input.clone();
        expected_input.push(Symbol::EndMarker);
        assert_eq!(first.remaining_input, expected_input);

        for (i, step) in outcome.trace.steps.iter().enumerate() {
            assert_eq!(step.step, i);
        }
        let last = outcome.trace.steps.last().unwrap();
        assert_eq!(last.action, "accept");
        assert!(last.remaining_input.is_empty() || last.remaining_input == vec![Symbol::EndMarker]);
    }

    #[test]
    fn ll1_trace_steps_carry_stack_and_input_snapshots() {
        let grammar = Grammar::parse("S -> A B\nA -> a A | ε\nB -> b").unwrap();
        let first_sets = compute_first_sets(&grammar);
        let follow_sets = compute_follow_sets(&grammar, &first_sets);
        let table = Ll1Table::build(&grammar, &first_sets, &follow_sets);

        let input = string_to_terminals("a b");
        let outcome = run_ll1(&grammar, &table, &input);
        assert!(outcome.accepted);

        let first = &outcome.trace.steps[0];
        assert_eq!(first.step, 0);
        assert_eq!(first.stack[0], StackEntry::Symbol(Symbol::EndMarker));
        assert_eq!(first.remaining_input[0], Symbol::terminal("a"));
        assert!(first.action.starts_with("predict"));
    }
}
