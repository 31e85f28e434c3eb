//! Command-line interface for the grammar parser-generator toolkit.

use crate::automaton::{build_lr0, build_lr1, merge_lalr};
use crate::comparator::{compare, Flavor};
use crate::driver::{run_ll1, run_lr, ParseOutcome};
use crate::error::Result;
use crate::first_follow::{compute_first_sets, compute_follow_sets};
use crate::grammar::Grammar;
use crate::ll1::Ll1Table;
use crate::symbol::string_to_terminals;
use crate::tables::{build_lr1_tables, build_slr_tables, ParseTables};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

/// A context-free grammar parser-generator toolkit: FIRST/FOLLOW sets,
/// left-recursion/left-factoring transformation, LL(1)/SLR(1)/CLR(1)/
/// LALR(1) table construction, conflict reporting, and string parsing with
/// trace and derivation-tree output.
#[derive(Parser, Debug)]
#[command(name = "cfg_parser", version, about)]
pub struct Cli {
    /// Path to the grammar file (one production per line, `A -> a | b`);
    /// reads stdin if omitted.
    #[arg(short, long, global = true)]
    grammar: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print FIRST and FOLLOW sets for every nonterminal.
    Sets,
    /// Apply left-recursion elimination and left factoring, then print the
    /// transformed grammar.
    Transform,
    /// Build one parser flavor and report any conflicts found.
    Build {
        #[arg(value_enum)]
        flavor: FlavorArg,
    },
    /// Build all four flavors and recommend one.
    Compare,
    /// Parse a whitespace-separated token string with one flavor.
    Parse {
        #[arg(value_enum)]
        flavor: FlavorArg,
        /// Whitespace-separated input tokens.
        tokens: String,
        /// Print the step-by-step trace.
        #[arg(long)]
        trace: bool,
        /// Print the derivation tree.
        #[arg(long)]
        tree: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FlavorArg {
    Ll1,
    Slr,
    Clr,
    Lalr,
}

impl From<FlavorArg> for Flavor {
    fn from(value: FlavorArg) -> Self {
        match value {
            FlavorArg::Ll1 => Flavor::Ll1,
            FlavorArg::Slr => Flavor::Slr,
            FlavorArg::Clr => Flavor::Clr,
            FlavorArg::Lalr => Flavor::Lalr,
        }
    }
}

/// Entry point invoked by `main`.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let text = read_grammar_source(cli.grammar.as_deref())?;
    let grammar = Grammar::parse(&text)?;
    info!("loaded grammar with {} productions", grammar.all_productions().len());

    match cli.command {
        Command::Sets => print_sets(&grammar),
        Command::Transform => print_transform(&grammar),
        Command::Build { flavor } => print_build(&grammar, flavor.into()),
        Command::Compare => print_compare(&grammar),
        Command::Parse {
            flavor,
            tokens,
            trace,
            tree,
        } => print_parse(&grammar, flavor.into(), &tokens, trace, tree),
    }

    Ok(())
}

fn read_grammar_source(path: Option<&std::path::Path>) -> Result<String> {
    match path {
        Some(p) => Ok(fs::read_to_string(p)?),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn print_sets(grammar: &Grammar) {
    let first_sets = compute_first_sets(grammar);
    let follow_sets = compute_follow_sets(grammar, &first_sets);

    println!("FIRST sets:");
    for nt in grammar.nonterminal_order() {
        let mut names: Vec<String> = first_sets
            .get(nt)
            .into_iter()
            .flatten()
            .map(|s| s.to_string())
            .collect();
        names.sort();
        println!("  FIRST({nt}) = {{ {} }}", names.join(", "));
    }

    println!("FOLLOW sets:");
    for nt in grammar.nonterminal_order() {
        let mut names: Vec<String> = follow_sets
            .get(nt)
            .into_iter()
            .flatten()
            .map(|s| s.to_string())
            .collect();
        names.sort();
        println!("  FOLLOW({nt}) = {{ {} }}", names.join(", "));
    }
}

fn print_transform(grammar: &Grammar) {
    let result = crate::transform::transform_for_ll1(grammar);
    println!("{}", result.grammar);
    if result.descriptors.is_empty() {
        println!("(no transformation was necessary)");
    } else {
        println!("Steps:");
        for step in &result.descriptors {
            println!("  - {step}");
        }
    }
}

fn print_build(grammar: &Grammar, flavor: Flavor) {
    match flavor {
        Flavor::Ll1 => {
            let first_sets = compute_first_sets(grammar);
            let follow_sets = compute_follow_sets(grammar, &first_sets);
            let table = Ll1Table::build(grammar, &first_sets, &follow_sets);
            report_conflicts(flavor, table.conflicts.iter().map(ToString::to_string));
        }
        other => {
            let tables = build_lr_tables(grammar, other);
            println!("{other} automaton: {} states", tables.num_states);
            report_conflicts(flavor, tables.conflicts.iter().map(ToString::to_string));
        }
    }
}

fn report_conflicts(flavor: Flavor, conflicts: impl Iterator<Item = String>) {
    let conflicts: Vec<String> = conflicts.collect();
    if conflicts.is_empty() {
        println!("{flavor} is conflict-free for this grammar.");
    } else {
        println!("{flavor} has {} conflict(s):", conflicts.len());
        for c in conflicts {
            println!("  - {c}");
        }
    }
}

fn build_lr_tables(grammar: &Grammar, flavor: Flavor) -> ParseTables {
    match flavor {
        Flavor::Slr => {
            let first_sets = compute_first_sets(grammar);
            let follow_sets = compute_follow_sets(grammar, &first_sets);
            let automaton = build_lr0(grammar);
            build_slr_tables(grammar, &automaton, &follow_sets)
        }
        Flavor::Clr => {
            let first_sets = compute_first_sets(grammar);
            let automaton = build_lr1(grammar, &first_sets);
            build_lr1_tables(grammar, &automaton)
        }
        Flavor::Lalr => {
            let first_sets = compute_first_sets(grammar);
            let automaton = merge_lalr(build_lr1(grammar, &first_sets));
            build_lr1_tables(grammar, &automaton)
        }
        Flavor::Ll1 => unreachable!("LL(1) has no LR automaton"),
    }
}

fn print_compare(grammar: &Grammar) {
    let report = compare(grammar);
    for flavor_report in &report.reports {
        let status = if flavor_report.is_conflict_free() {
            "OK".to_string()
        } else {
            format!("{} conflict(s)", flavor_report.conflict_count)
        };
        println!(
            "{:<8} states={:<4} {}",
            flavor_report.flavor.to_string(),
            flavor_report.state_count,
            status
        );
        for c in &flavor_report.conflicts {
            println!("    - {c}");
        }
    }

    match report.recommended {
        Some(flavor) => println!("Recommendation: {flavor}"),
        None => println!("Recommendation: none (every flavor has conflicts)"),
    }
}

fn print_parse(grammar: &Grammar, flavor: Flavor, tokens: &str, trace: bool, tree: bool) {
    let input = string_to_terminals(tokens);

    let outcome = match flavor {
        Flavor::Ll1 => {
            let first_sets = compute_first_sets(grammar);
            let follow_sets = compute_follow_sets(grammar, &first_sets);
            let table = Ll1Table::build(grammar, &first_sets, &follow_sets);
            run_ll1(grammar, &table, &input)
        }
        other => {
            let tables = build_lr_tables(grammar, other);
            run_lr(grammar, &tables, &input)
        }
    };

    render_outcome(&outcome, trace, tree);
}

fn render_outcome(outcome: &ParseOutcome, trace: bool, tree: bool) {
    println!("{}", if outcome.accepted { "accept" } else { "reject" });

    if trace {
        println!("Trace:");
        for step in &outcome.trace.steps {
            let stack = step
                .stack
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            let remaining = step
                .remaining_input
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            println!(
                "  [{}] stack=[{stack}] input=[{remaining}] {}",
                step.step, step.action
            );
        }
    }

    if tree {
        match &outcome.tree {
            Some(t) => {
                println!("Tree:");
                print!("{}", t.render());
            }
            None => println!("(no tree available)"),
        }
    }
}
