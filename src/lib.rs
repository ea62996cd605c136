//!# lexlr
//!
//! `lexlr` is a Rust library for constructing compiler front-ends: it compiles prioritized
//! regular expressions into minimized token DFAs driving a longest-match scanner, and builds
//! LALR(1) ACTION/GOTO tables from context-free grammars, driving a shift-reduce parser with
//! them. The tables are the artifact: no parser code is generated.
//!
//! ## Usage
//!
//! ```rust
//! use lexlr::grammar::Grammar;
//! use lexlr::lexer::{LexRule, Lexer};
//! use lexlr::lr::{LrAutomaton, ParseTable};
//!
//! fn main() {
//!     // Two token rules, one per terminal of the grammar below
//!     let lexer = Lexer::build(&[
//!         LexRule::new("a", "a", 1),
//!         LexRule::new("b", "b", 1),
//!     ])
//!     .unwrap();
//!
//!     // S → a S b | ε, the language aⁿbⁿ
//!     let grammar: Grammar = lexlr::parser::grammar(
//!         "
//!         Nonterminals: S
//!         Terminals: a b
//!         Start: S
//!         S -> a S b | ε
//!         ",
//!     )
//!     .unwrap()
//!     .try_into()
//!     .unwrap();
//!
//!     let lalr = LrAutomaton::construct(&grammar).merge_by_kernel();
//!     let table = ParseTable::fill(&lalr).unwrap();
//!     assert!(table.is_conflict_free());
//!
//!     assert!(table.parse_tokens(&lexer.tokens("aabb")).is_ok());
//!     assert!(table.parse_tokens(&lexer.tokens("aab")).is_err());
//! }
//! ```
//!
//! ## Pipeline
//!
//! The lexer path: a pattern string is rewritten to postfix form by
//! [Shunting-Yard](regex::Regex::new), turned into an NFA by the
//! [Thompson construction](regex::Regex::to_nfa), determinized by the
//! [subset construction](nfa::Nfa::to_dfa) (for a multi-rule lexer, over the merged automaton
//! of all rules at once, carrying `(token, priority)` labels) and finally
//! [minimized](dfa::Dfa::minimized). The [scanner](lexer::scan) walks the result applying the
//! longest-match rule.
//!
//! The parser path: a [grammar](grammar::Grammar) is analyzed with
//! [FIRST/FOLLOW](grammar::sets), expanded into the
//! [canonical LR(1) collection](lr::LrAutomaton::construct), merged into the
//! [LALR(1) automaton](lr::LrAutomaton::merge_by_kernel), and written out as an
//! [ACTION/GOTO table](lr::ParseTable) together with a log of the conflicts resolved along the
//! way. The [driver](lr::driver) runs a plain stack machine over the table and answers
//! accept/reject; rejected inputs carry the offending state and terminal, nothing more.
//!
//! All constructions are deterministic: alphabets are sorted, productions keep their declared
//! order, item sets iterate structurally, and state ids are assigned in discovery order.
//! Re-running any construction on equal inputs yields identical tables, ids included. Everything
//! is built once and immutable afterwards; sharing a table between parsers requires no
//! synchronization.
//!
//! ## Operations
//!
//! This library currently supports:
//!
//! * [Compiling regular expressions](regex::Regex::new) over the operators `| * + ?` and
//!   parentheses (any other character is a literal; there is no escape syntax)
//! * [Converting regular expressions to NFAs](regex::Regex::to_nfa) and
//!   [simulating NFAs directly](nfa::Nfa::accepts)
//! * [Determinizing NFAs](nfa::Nfa::to_dfa) over derived or
//!   [explicit](nfa::Nfa::to_dfa_over) alphabets
//! * [Minimizing DFAs](dfa::Dfa::minimized), token labels kept apart
//! * [Building lexers](lexer::Lexer::build) from prioritized rules and
//!   [scanning](lexer::Lexer::tokens) with longest match
//! * [Validating grammars](grammar::Grammar::new) and computing
//!   [FIRST/FOLLOW sets](grammar::sets)
//! * [Constructing LR(1)](lr::LrAutomaton::construct) and
//!   [LALR(1)](lr::LrAutomaton::merge_by_kernel) automata
//! * [Filling ACTION/GOTO tables](lr::ParseTable::fill) with a deterministic,
//!   fully-logged conflict policy, and [rendering them](lr::ParseTable::to_table)
//! * [Parsing token streams](lr::ParseTable::parse_tokens) with the shift-reduce driver
//! * [Loading grammars and lexer rules](parser) from text files

pub mod dfa;
pub mod grammar;
pub mod lexer;
pub mod lr;
pub mod nfa;
pub mod parser;
pub mod regex;
mod table;

#[cfg(test)]
mod tests;
