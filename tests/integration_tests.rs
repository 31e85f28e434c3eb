//! End-to-end tests exercising the full pipeline: parse a grammar, compute
//! sets, build tables for every flavor, and drive a parse.

use cfg_parser::first_follow::{compute_first_sets, compute_follow_sets};
use cfg_parser::symbol::string_to_terminals;
use cfg_parser::tables::build_slr_tables;
use cfg_parser::automaton::build_lr0;
use cfg_parser::{compare, run_ll1, run_lr, Flavor, Grammar, Ll1Table};

/// A left-recursive expression grammar: SLR(1) as written; the comparator's
/// LL(1) flavor builds from the transformed grammar, so it is conflict-free
/// too even though the original is not LL(1).
#[test]
fn example_slr_only_grammar() {
    let grammar = Grammar::parse(
        "S -> S plus T | T\nT -> T star F | F\nF -> lparen S rparen | id",
    )
    .unwrap();
    let report = compare(&grammar);

    assert!(report.report_for(Flavor::Ll1).is_conflict_free());
    assert!(report.report_for(Flavor::Slr).is_conflict_free());

    let first_sets = compute_first_sets(&grammar);
    let follow_sets = compute_follow_sets(&grammar, &first_sets);
    let automaton = build_lr0(&grammar);
    let tables = build_slr_tables(&grammar, &automaton, &follow_sets);

    assert!(run_lr(&grammar, &tables, &string_to_terminals("id plus id")).accepted);
    assert!(run_lr(&grammar, &tables, &string_to_terminals("lparen id rparen")).accepted);
    assert!(!run_lr(&grammar, &tables, &string_to_terminals("lparen id plus id rparen star id rparen")).accepted);
}

/// A grammar that is both LL(1) and every LR flavor.
#[test]
fn example_both_ll1_and_lr_family() {
    let grammar = Grammar::parse("S -> A B\nA -> a A | d\nB -> b B c | e").unwrap();
    let report = compare(&grammar);
    assert!(report.reports.iter().all(|r| r.is_conflict_free()));

    let first_sets = compute_first_sets(&grammar);
    let follow_sets = compute_follow_sets(&grammar, &first_sets);
    let ll1_table = Ll1Table::build(&grammar, &first_sets, &follow_sets);
    let automaton = build_lr0(&grammar);
    let slr_tables = build_slr_tables(&grammar, &automaton, &follow_sets);

    for valid in ["d e", "a d b e c"] {
        let input = string_to_terminals(valid);
        assert!(run_ll1(&grammar, &ll1_table, &input).accepted);
        assert!(run_lr(&grammar, &slr_tables, &input).accepted);
    }
    let invalid = string_to_terminals("a");
    assert!(!run_ll1(&grammar, &ll1_table, &invalid).accepted);
    assert!(!run_lr(&grammar, &slr_tables, &invalid).accepted);
}

/// Direct left recursion is never LL(1) as written: the recursive and base
/// alternatives collide in the same FIRST⁺ cell. The comparator's LL(1)
/// flavor runs the Transformer first, so it ends up conflict-free overall;
/// it is the untransformed grammar that fails.
#[test]
fn example_degenerate_left_recursive_grammar() {
    let grammar = Grammar::parse("S -> S a | b").unwrap();

    let first_sets = compute_first_sets(&grammar);
    let follow_sets = compute_follow_sets(&grammar, &first_sets);
    let raw_ll1 = Ll1Table::build(&grammar, &first_sets, &follow_sets);
    assert!(!raw_ll1.conflicts.is_empty());

    let report = compare(&grammar);
    assert!(report.report_for(Flavor::Ll1).is_conflict_free());
}

/// The classic ambiguous dangling-else grammar: every flavor built still
/// produces a usable table (conflicts are data, not build failures), and
/// the documented tie-break consistently favors shift.
#[test]
fn dangling_else_style_grammar_still_builds_a_usable_table() {
    let grammar =
        Grammar::parse("S -> if E then S | if E then S else S | a\nE -> b").unwrap();
    let report = compare(&grammar);
    assert!(report.reports.iter().any(|r| !r.is_conflict_free()));

    let first_sets = compute_first_sets(&grammar);
    let follow_sets = compute_follow_sets(&grammar, &first_sets);
    let automaton = build_lr0(&grammar);
    let tables = build_slr_tables(&grammar, &automaton, &follow_sets);
    let input = string_to_terminals("if b then if b then a else a");
    assert!(run_lr(&grammar, &tables, &input).accepted);
}
