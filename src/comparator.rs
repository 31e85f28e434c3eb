//! Cross-flavor comparison: builds LL(1), SLR(1), CLR(1), and LALR(1) for
//! the same grammar and recommends one.
//!
//! Each flavor is built the same way: a `build` function returning an owned
//! result (tables, conflicts, automaton size), fanned out over all four and
//! summarized into a single recommendation.

use crate::automaton::{build_lr0, build_lr1, merge_lalr};
use crate::first_follow::{compute_first_sets, compute_follow_sets};
use crate::grammar::Grammar;
use crate::ll1::Ll1Table;
use crate::tables::{build_lr1_tables, build_slr_tables, ParseTables};
use crate::transform::transform_for_ll1;
use std::fmt;

/// A parser construction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavor {
    Ll1,
    Slr,
    Clr,
    Lalr,
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Flavor::Ll1 => "LL(1)",
            Flavor::Slr => "SLR(1)",
            Flavor::Clr => "CLR(1)",
            Flavor::Lalr => "LALR(1)",
        };
        write!(f, "{name}")
    }
}

/// Priority order used to pick a recommendation when more than one flavor
/// is conflict-free: LALR(1) first (fewest states among the LR family with
/// full lookahead precision), then SLR(1) (simplest, when it happens to
/// suffice), then CLR(1) (always as precise as LALR, but larger), then
/// LL(1) last (top-down, most restrictive grammar class). This is a fixed
/// priority, not a configurable one.
const RECOMMENDATION_PRIORITY: [Flavor; 4] = [Flavor::Lalr, Flavor::Slr, Flavor::Clr, Flavor::Ll1];

/// The outcome of building one flavor: how many states its automaton has
/// (0 for LL(1), which has no automaton) and how many conflicts it found.
#[derive(Debug, Clone)]
pub struct FlavorReport {
    pub flavor: Flavor,
    pub state_count: usize,
    pub conflict_count: usize,
    pub conflicts: Vec<String>,
}

impl FlavorReport {
    pub fn is_conflict_free(&self) -> bool {
        self.conflict_count == 0
    }
}

/// The full cross-flavor comparison.
#[derive(Debug, Clone)]
pub struct ComparisonReport {
    pub reports: Vec<FlavorReport>,
    pub recommended: Option<Flavor>,
}

impl ComparisonReport {
    pub fn report_for(&self, flavor: Flavor) -> &FlavorReport {
        self.reports
            .iter()
            .find(|r| r.flavor == flavor)
            .expect("every flavor is always built")
    }
}

/// Builds all four flavors for `grammar` and recommends the
/// highest-priority conflict-free one, or `None` if every flavor has at
/// least one conflict.
///
/// LL(1) is built after applying the Transformer (left-recursion
/// elimination plus left factoring), per spec.md §2's data-flow diagram
/// (`LL1Table via Transformer+FirstFollow`) and §4.9 rule #4 ("LL(1) (after
/// transformation)"); the LR family is built from the grammar as given.
pub fn compare(grammar: &Grammar) -> ComparisonReport {
    let first_sets = compute_first_sets(grammar);
    let follow_sets = compute_follow_sets(grammar, &first_sets);

    let transformed = transform_for_ll1(grammar).grammar;
    let ll1_first_sets = compute_first_sets(&transformed);
    let ll1_follow_sets = compute_follow_sets(&transformed, &ll1_first_sets);
    let ll1_table = Ll1Table::build(&transformed, &ll1_first_sets, &ll1_follow_sets);
    let ll1_report = FlavorReport {
        flavor: Flavor::Ll1,
        state_count: 0,
        conflict_count: ll1_table.conflicts.len(),
        conflicts: ll1_table.conflicts.iter().map(|c| c.to_string()).collect(),
    };

    let lr0_automaton = build_lr0(grammar);
    let slr_tables = build_slr_tables(grammar, &lr0_automaton, &follow_sets);
    let slr_report = report_for_lr("slr", Flavor::Slr, &slr_tables);

    let lr1_automaton = build_lr1(grammar, &first_sets);
    let clr_tables = build_lr1_tables(grammar, &lr1_automaton);
    let clr_report = report_for_lr("clr", Flavor::Clr, &clr_tables);

    let lalr_automaton = merge_lalr(lr1_automaton);
    let lalr_tables = build_lr1_tables(grammar, &lalr_automaton);
    let lalr_report = report_for_lr("lalr", Flavor::Lalr, &lalr_tables);

    let reports = vec![ll1_report, slr_report, clr_report, lalr_report];

    let recommended = RECOMMENDATION_PRIORITY
        .into_iter()
        .find(|flavor| reports.iter().any(|r| r.flavor == *flavor && r.is_conflict_free()));

    ComparisonReport {
        reports,
        recommended,
    }
}

fn report_for_lr(_label: &str, flavor: Flavor, tables: &ParseTables) -> FlavorReport {
    FlavorReport {
        flavor,
        state_count: tables.num_states,
        conflict_count: tables.conflicts.len(),
        conflicts: tables.conflicts.iter().map(|c| c.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;

    #[test]
    fn unambiguous_grammar_is_conflict_free_everywhere_and_recommends_lalr() {
        let grammar = Grammar::parse("S -> A B\nA -> a\nB -> b").unwrap();
        let report = compare(&grammar);
        assert!(report.reports.iter().all(|r| r.is_conflict_free()));
        assert_eq!(report.recommended, Some(Flavor::Lalr));
    }

    #[test]
    fn left_recursive_grammar_becomes_ll1_after_transformation() {
        let grammar = Grammar::parse("E -> E plus T | T\nT -> id").unwrap();
        let report = compare(&grammar);
        assert!(report.report_for(Flavor::Ll1).is_conflict_free());
        assert!(report.report_for(Flavor::Slr).is_conflict_free());
        assert_eq!(report.recommended, Some(Flavor::Lalr));
    }

    #[test]
    fn ll1_fails_but_not_the_lr_family_when_the_conflict_is_not_a_common_prefix() {
        // `S -> A a | B b` with `A -> c` and `B -> c` needs a token of right
        // context the LL(1) table can't see (FIRST+(S->Aa) and
        // FIRST+(S->Bb) both equal {c}), but it is not a shared prefix, so
        // left factoring cannot help. The LR family defers the reduce
        // decision until after shifting `c` and sees `a`/`b` next, which
        // FOLLOW(A)/FOLLOW(B) already distinguish.
        let grammar = Grammar::parse("S -> A a | B b\nA -> c\nB -> c").unwrap();
        let report = compare(&grammar);
        assert!(!report.report_for(Flavor::Ll1).is_conflict_free());
        assert!(report.report_for(Flavor::Slr).is_conflict_free());
        assert_eq!(report.recommended, Some(Flavor::Lalr));
    }

    #[test]
    fn ambiguous_grammar_recommends_none() {
        let grammar = Grammar::parse("S -> S plus S | id").unwrap();
        let report = compare(&grammar);
        assert!(report.reports.iter().all(|r| !r.is_conflict_free()));
        assert_eq!(report.recommended, None);
    }
}
