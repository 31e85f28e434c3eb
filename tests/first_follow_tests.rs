//! Integration tests for FIRST and FOLLOW set computation, through the
//! crate's public API.

use cfg_parser::first_follow::{compute_first_sets, compute_follow_sets, first_of_string};
use cfg_parser::{Grammar, Symbol};

#[test]
fn first_sets_simple() {
    let grammar = Grammar::parse("S -> A B\nA -> a").unwrap();
    let first_sets = compute_first_sets(&grammar);

    let first_a = first_sets.get(&Symbol::nonterminal("A")).unwrap();
    assert!(first_a.contains(&Symbol::terminal("a")));
}

#[test]
fn follow_sets_simple() {
    let grammar = Grammar::parse("S -> A B\nA -> a").unwrap();
    let first_sets = compute_first_sets(&grammar);
    let follow_sets = compute_follow_sets(&grammar, &first_sets);

    let follow_s = follow_sets.get(grammar.start_symbol()).unwrap();
    assert!(follow_s.contains(&Symbol::EndMarker));
}

#[test]
fn first_with_epsilon() {
    let grammar = Grammar::parse("S -> A B\nA -> a | ε").unwrap();
    let first_sets = compute_first_sets(&grammar);

    let first_a = first_sets.get(&Symbol::nonterminal("A")).unwrap();
    assert!(first_a.contains(&Symbol::terminal("a")));
    assert!(first_a.contains(&Symbol::Epsilon));
}

#[test]
fn first_of_string_combines_symbols() {
    let grammar = Grammar::parse("S -> A B\nA -> a").unwrap();
    let first_sets = compute_first_sets(&grammar);

    let symbols = vec![Symbol::nonterminal("A"), Symbol::nonterminal("B")];
    let first = first_of_string(&first_sets, &symbols);

    assert!(first.contains(&Symbol::terminal("a")));
}

#[test]
fn follow_propagation() {
    let grammar = Grammar::parse("S -> A B\nA -> a\nB -> b").unwrap();
    let first_sets = compute_first_sets(&grammar);
    let follow_sets = compute_follow_sets(&grammar, &first_sets);

    let follow_a = follow_sets.get(&Symbol::nonterminal("A")).unwrap();
    assert!(follow_a.contains(&Symbol::terminal("b")));
}

#[test]
fn complex_first_follow() {
    let grammar = Grammar::parse("S -> A B\nA -> a A d | ε\nB -> b B c | e").unwrap();
    let first_sets = compute_first_sets(&grammar);
    let follow_sets = compute_follow_sets(&grammar, &first_sets);

    let first_s = first_sets.get(grammar.start_symbol()).unwrap();
    assert!(first_s.contains(&Symbol::terminal("a")));
    assert!(first_s.contains(&Symbol::terminal("b")));
    assert!(first_s.contains(&Symbol::terminal("e")));

    let follow_a = follow_sets.get(&Symbol::nonterminal("A")).unwrap();
    assert!(follow_a.contains(&Symbol::terminal("d")));
}
