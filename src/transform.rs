//! Grammar transformation for LL(1) suitability: left-recursion elimination
//! (direct and indirect) and left factoring.
//!
//! Rather than rejecting a left-recursive or unfactored grammar, this
//! module rewrites it into an equivalent one an LL(1) table can handle,
//! returning an owned, independently-id'd [`Grammar`] plus a log of the
//! steps applied.

use crate::grammar::Grammar;
use crate::symbol::Symbol;
use log::{info, warn};
use std::collections::{HashMap, HashSet, VecDeque};

/// The outcome of transforming a grammar for LL(1) suitability.
#[derive(Debug)]
pub struct TransformResult {
    /// The transformed grammar (a fresh `Grammar` with its own id space).
    pub grammar: Grammar,
    /// Human-readable descriptions of each transformation step applied, in
    /// application order.
    pub descriptors: Vec<String>,
    /// Whether any left recursion (direct or indirect) was found and removed.
    pub left_recursion_removed: bool,
    /// Whether any left factoring was applied.
    pub left_factored: bool,
    /// Nonterminals introduced by either transformation.
    pub new_nonterminals: HashSet<Symbol>,
}

/// Alternatives for one nonterminal, in source order.
type Alternatives = Vec<Vec<Symbol>>;

/// Deterministic fresh-nonterminal-name generator: suffix priming with a
/// counter, seeded one past whatever priming depth is already present for a
/// given base name, so re-running the transformer on the same grammar is
/// reproducible.
struct FreshNames {
    taken: HashSet<String>,
}

impl FreshNames {
    fn new(taken: HashSet<String>) -> Self {
        Self { taken }
    }

    fn fresh(&mut self, base: &Symbol) -> Symbol {
        let base_name = base.name().expect("fresh() only called on named symbols");
        let mut k = 1;
        loop {
            let candidate = format!("{}{}", base_name, "'".repeat(k));
            if !self.taken.contains(&candidate) {
                self.taken.insert(candidate.clone());
                return Symbol::nonterminal(candidate);
            }
            k += 1;
        }
    }
}

/// Transforms `grammar` into an LL(1)-suitable grammar: eliminates direct
/// and indirect left recursion (ordered substitution), then left factors
/// until no nonterminal has a shared-prefix group of size ≥2.
pub fn transform_for_ll1(grammar: &Grammar) -> TransformResult {
    let mut rules: HashMap<Symbol, Alternatives> = HashMap::new();
    let mut all_order: Vec<Symbol> = Vec::new();
    let original_order: Vec<Symbol> = grammar.nonterminal_order().to_vec();

    for nt in &original_order {
        let alts = grammar
            .get_productions(nt)
            .iter()
            .map(|p| p.rhs.clone())
            .collect();
        rules.insert(nt.clone(), alts);
        all_order.push(nt.clone());
    }

    let taken: HashSet<String> = grammar
        .nonterminals()
        .iter()
        .chain(grammar.terminals().iter())
        .filter_map(|s| s.name().map(str::to_string))
        .collect();
    let mut names = FreshNames::new(taken);

    let mut descriptors = Vec::new();
    let mut left_recursion_removed = false;
    let mut new_nonterminals = HashSet::new();

    eliminate_left_recursion(
        &original_order,
        &mut rules,
        &mut all_order,
        &mut names,
        &mut descriptors,
        &mut left_recursion_removed,
        &mut new_nonterminals,
    );

    let mut left_factored = false;
    left_factor(
        &all_order.clone(),
        &mut rules,
        &mut all_order,
        &mut names,
        &mut descriptors,
        &mut left_factored,
        &mut new_nonterminals,
    );

    let mut productions = Vec::new();
    for nt in &all_order {
        for alt in &rules[nt] {
            productions.push((nt.clone(), alt.clone()));
        }
    }

    let start_symbol = grammar.start_symbol().clone();
    let grammar = Grammar::from_production_list(productions, start_symbol)
        .expect("transformer-produced grammar is well-formed by construction");

    info!(
        "transform_for_ll1: left_recursion_removed={left_recursion_removed} left_factored={left_factored} new_nonterminals={}",
        new_nonterminals.len()
    );

    TransformResult {
        grammar,
        descriptors,
        left_recursion_removed,
        left_factored,
        new_nonterminals,
    }
}

#[allow(clippy::too_many_arguments)]
fn eliminate_left_recursion(
    order: &[Symbol],
    rules: &mut HashMap<Symbol, Alternatives>,
    all_order: &mut Vec<Symbol>,
    names: &mut FreshNames,
    descriptors: &mut Vec<String>,
    left_recursion_removed: &mut bool,
    new_nonterminals: &mut HashSet<Symbol>,
) {
    for i in 0..order.len() {
        let ai = &order[i];

        for aj in order.iter().take(i) {
            let ai_alts = rules[ai].clone();
            let aj_alts = rules[aj].clone();
            let mut substituted = false;
            let mut new_alts = Vec::with_capacity(ai_alts.len());

            for alt in ai_alts {
                if alt.first() == Some(aj) {
                    substituted = true;
                    for delta in &aj_alts {
                        let mut combined = delta.clone();
                        combined.extend(alt[1..].iter().cloned());
                        new_alts.push(combined);
                    }
                } else {
                    new_alts.push(alt);
                }
            }

            if substituted {
                descriptors.push(format!(
                    "indirect left recursion: substituted {aj} into {ai}"
                ));
                rules.insert(ai.clone(), new_alts);
            }
        }

        remove_direct_left_recursion(
            ai,
            rules,
            all_order,
            names,
            descriptors,
            left_recursion_removed,
            new_nonterminals,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn remove_direct_left_recursion(
    a: &Symbol,
    rules: &mut HashMap<Symbol, Alternatives>,
    all_order: &mut Vec<Symbol>,
    names: &mut FreshNames,
    descriptors: &mut Vec<String>,
    left_recursion_removed: &mut bool,
    new_nonterminals: &mut HashSet<Symbol>,
) {
    let alts = rules[a].clone();
    let (recursive, non_recursive): (Vec<_>, Vec<_>) =
        alts.into_iter().partition(|alt| alt.first() == Some(a));

    if recursive.is_empty() {
        return;
    }

    *left_recursion_removed = true;
    let primed = names.fresh(a);
    all_order.push(primed.clone());
    new_nonterminals.insert(primed.clone());

    if non_recursive.is_empty() {
        warn!("{a} has only left-recursive alternatives; it derives no string");
    }

    let a_alts: Vec<Vec<Symbol>> = non_recursive
        .into_iter()
        .map(|mut beta| {
            beta.push(primed.clone());
            beta
        })
        .collect();

    let mut primed_alts: Vec<Vec<Symbol>> = recursive
        .into_iter()
        .map(|alpha| {
            let mut tail = alpha[1..].to_vec();
            tail.push(primed.clone());
            tail
        })
        .collect();
    primed_alts.push(Vec::new()); // A' -> ε

    descriptors.push(format!("direct left recursion removed on {a}, introducing {primed}"));
    rules.insert(a.clone(), a_alts);
    rules.insert(primed, primed_alts);
}

#[allow(clippy::too_many_arguments)]
fn left_factor(
    initial_order: &[Symbol],
    rules: &mut HashMap<Symbol, Alternatives>,
    all_order: &mut Vec<Symbol>,
    names: &mut FreshNames,
    descriptors: &mut Vec<String>,
    left_factored: &mut bool,
    new_nonterminals: &mut HashSet<Symbol>,
) {
    let mut worklist: VecDeque<Symbol> = initial_order.iter().cloned().collect();

    while let Some(a) = worklist.pop_front() {
        loop {
            let alts = rules[&a].clone();
            let Some((prefix, group)) = find_common_prefix_group(&alts) else {
                break;
            };

            *left_factored = true;
            let new_nt = names.fresh(&a);

            let mut remaining: Vec<Vec<Symbol>> = alts
                .iter()
                .enumerate()
                .filter(|(idx, _)| !group.contains(idx))
                .map(|(_, alt)| alt.clone())
                .collect();
            let mut combined = prefix.clone();
            combined.push(new_nt.clone());
            remaining.push(combined);

            let betas: Vec<Vec<Symbol>> = group
                .iter()
                .copied()
                .map(|idx| alts[idx][prefix.len()..].to_vec())
                .collect();

            descriptors.push(format!(
                "left factored {a}: prefix {} -> {new_nt}",
                crate::symbol::symbols_to_string(&prefix)
            ));

            rules.insert(a.clone(), remaining);
            rules.insert(new_nt.clone(), betas);
            all_order.push(new_nt.clone());
            new_nonterminals.insert(new_nt.clone());
            worklist.push_back(new_nt);
        }
    }
}

/// Finds a group (size ≥2) of alternatives sharing the longest common
/// prefix, grouped first by leading symbol (alternatives with different
/// leading symbols never share a prefix). Returns the prefix and the
/// indices of the sharing alternatives, or `None` if no group qualifies.
fn find_common_prefix_group(alts: &[Vec<Symbol>]) -> Option<(Vec<Symbol>, Vec<usize>)> {
    let mut by_first: Vec<(Symbol, Vec<usize>)> = Vec::new();
    for (idx, alt) in alts.iter().enumerate() {
        let Some(first) = alt.first() else { continue };
        match by_first.iter_mut().find(|(s, _)| s == first) {
            Some((_, idxs)) => idxs.push(idx),
            None => by_first.push((first.clone(), vec![idx])),
        }
    }

    for (_, idxs) in by_first {
        if idxs.len() < 2 {
            continue;
        }

        let base = &alts[idxs[0]];
        let mut prefix_len = 1;
        while prefix_len < base.len() {
            let candidate = &base[prefix_len];
            let all_match = idxs[1..]
                .iter()
                .all(|&i| prefix_len < alts[i].len() && &alts[i][prefix_len] == candidate);
            if all_match {
                prefix_len += 1;
            } else {
                break;
            }
        }

        return Some((base[..prefix_len].to_vec(), idxs));
    }

    None
}
