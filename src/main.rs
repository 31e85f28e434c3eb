//! Context-Free Grammar Parser-Generator Toolkit
//!
//! A Rust implementation of LL(1), SLR(1), CLR(1), and LALR(1) parser
//! construction for context-free grammars.
//!
//! # Author
//! Juan Manuel Young Hoyos
//!
//! # References
//! Aho, Alfred V. et al. "Compilers: Principles, Techniques, and Tools" (2nd Edition).
//! Addison-Wesley, 2006.

mod automaton;
mod cli;
mod comparator;
mod driver;
mod error;
mod first_follow;
mod grammar;
mod items;
mod ll1;
mod symbol;
mod tables;
mod transform;

use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
