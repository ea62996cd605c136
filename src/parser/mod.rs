//! # lexlr parser
//! This module contains parsers for the two text formats of the crate: context-free grammars and
//! lexer rule sets. Parsing is done in two steps, following the rest of the crate: the functions
//! here produce borrowed `Parsed*` values which only reflect the syntax of the file, and
//! `TryInto` converts them into validated values (see [`grammar::parse`](crate::grammar::parse)
//! for the grammar side; lexer rules convert with [`LexRule::from`](crate::lexer::LexRule)
//! directly, since their only invariants live in the pattern and are checked when the lexer is
//! built).
//!
//! ## Grammar format
//! A grammar file is UTF-8 text consisting of, in order:
//! - a line `Nonterminals:` followed by the whitespace-separated non-terminal names,
//! - a line `Terminals:` followed by the whitespace-separated terminal names,
//! - a line `Start:` followed by the start symbol,
//! - one line per non-terminal with productions: the name, `->` or `→`, and one or more
//!   alternatives separated by `|`, each a whitespace-separated list of symbols.
//!
//! `ε` (or `eps`) denotes the empty string and may appear as an alternative without being
//! declared; an empty alternative means the same thing. `$` is reserved for end of input and may
//! not be declared or used. Comments start with `#` and run to the end of the line; blank lines
//! are ignored.
//!
//! ```text
//! Nonterminals: E T F
//! Terminals: + * ( ) id
//! Start: E
//!
//! E -> E + T | T
//! T -> T * F | F
//! F -> ( E ) | id   # parentheses and atoms
//! ```
//!
//! ## Lexer rule format
//! One rule per line: an optional `~` (suppress tokens of this rule from scanner output), the
//! token name, the priority as a decimal number, one single space, and the pattern running to
//! the end of the line. Everything after that single space belongs to the pattern, spaces
//! included, so whitespace rules can be written; for the same reason `#` does not start a
//! comment after the priority. Lines that are blank or start with `#` are skipped.
//!
//! ```text
//! # a keyword beats the identifier on priority
//! IF 10 if
//! IDENT 5 (a|b|c)(a|b|c|_)*
//! ~WS 0  *
//! ```

mod grammar;
mod rules;

use nom::{combinator::all_consuming, error::Error, Finish};

/// A parsed grammar file: declared symbol lists, the start symbol and the production lines.
/// Not yet validated; convert with `TryInto<Grammar>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedGrammar<'a> {
    pub nonterminals: Vec<&'a str>,
    pub terminals: Vec<&'a str>,
    pub start: &'a str,
    pub productions: Vec<ParsedProduction<'a>>,
}

/// One production line of a grammar file: the left-hand side and its alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedProduction<'a> {
    pub name: &'a str,
    pub alternatives: Vec<Vec<&'a str>>,
}

/// One parsed lexer rule line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLexRule<'a> {
    pub name: &'a str,
    pub priority: u32,
    pub pattern: &'a str,
    pub skip: bool,
}

/// Parses a grammar file according to the format above. The whole string must be parsable,
/// otherwise this function errors. Note that the result is a [`ParsedGrammar`], which is not
/// guaranteed to be a valid [`Grammar`](crate::grammar::Grammar); use [`TryInto::try_into`] for
/// the validated conversion.
pub fn grammar(input: &str) -> Result<ParsedGrammar, Error<&str>> {
    all_consuming(grammar::full_grammar)(input)
        .finish()
        .map(|(_, grammar)| grammar)
}

/// Parses a lexer rule file according to the format above. The whole string must be parsable,
/// otherwise this function errors. Pattern validity is not checked here; it surfaces when the
/// rules are compiled by [`Lexer::build`](crate::lexer::Lexer::build).
pub fn lex_rules(input: &str) -> Result<Vec<ParsedLexRule>, Error<&str>> {
    all_consuming(rules::full_rules)(input)
        .finish()
        .map(|(_, rules)| rules)
}

impl<'a> From<&ParsedLexRule<'a>> for crate::lexer::LexRule {
    fn from(parsed: &ParsedLexRule<'a>) -> Self {
        if parsed.skip {
            Self::skipped(parsed.name, parsed.pattern, parsed.priority)
        } else {
            Self::new(parsed.name, parsed.pattern, parsed.priority)
        }
    }
}
