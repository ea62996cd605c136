use crate::grammar::{Grammar, GrammarError, Production, Symbol, END_MARKER, EPSILON};
use crate::parser::ParsedGrammar;
use std::collections::HashSet;
use thiserror::Error;

/// The spelling `eps` is accepted for ε in grammar files, mirroring the regex-file convention of
/// keyboards without the character.
const EPSILON_ASCII: &str = "eps";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrammarParseError<'a> {
    #[error("'{0}' appears twice in the non-terminal symbols")]
    DuplicateNonterminal(&'a str),
    #[error("'{0}' appears twice in the terminal symbols")]
    DuplicateTerminal(&'a str),
    #[error("'{0}' is declared as both a non-terminal and a terminal symbol")]
    TerminalNonterminal(&'a str),
    #[error("'{0}' is reserved and may not be declared as a symbol")]
    ReservedSymbol(&'a str),
    #[error("The start symbol '{0}' is not a declared non-terminal")]
    StartNotNonterminal(&'a str),
    #[error("'{0}' has productions but is not a declared non-terminal")]
    ProductionLeftNotNonterminal(&'a str),
    #[error("'{0}' appears in a production but is not a declared symbol")]
    UndeclaredSymbol(&'a str),
    #[error("Invalid grammar: {0}")]
    Invalid(GrammarError),
}

fn is_epsilon_name(name: &str) -> bool {
    name == EPSILON || name == EPSILON_ASCII
}

impl<'a> TryFrom<ParsedGrammar<'a>> for Grammar {
    type Error = GrammarParseError<'a>;

    /// Checks the declarations of a parsed grammar file and converts it into a validated
    /// [`Grammar`]. Alternatives flatten into one production each, in written order; `ε`/`eps`
    /// becomes the reserved ε terminal, and an empty alternative is normalized to an
    /// ε-production.
    fn try_from(value: ParsedGrammar<'a>) -> Result<Self, Self::Error> {
        use GrammarParseError::*;
        let ParsedGrammar {
            nonterminals,
            terminals,
            start,
            productions,
        } = value;

        let mut nonterminal_set = HashSet::new();
        for name in &nonterminals {
            if is_epsilon_name(name) || *name == END_MARKER {
                return Err(ReservedSymbol(name));
            }
            if !nonterminal_set.insert(*name) {
                return Err(DuplicateNonterminal(name));
            }
        }
        let mut terminal_set = HashSet::new();
        for name in &terminals {
            if is_epsilon_name(name) || *name == END_MARKER {
                return Err(ReservedSymbol(name));
            }
            if !terminal_set.insert(*name) {
                return Err(DuplicateTerminal(name));
            }
            if nonterminal_set.contains(name) {
                return Err(TerminalNonterminal(name));
            }
        }
        if !nonterminal_set.contains(start) {
            return Err(StartNotNonterminal(start));
        }

        let symbol = |name: &'a str| -> Result<Symbol, GrammarParseError<'a>> {
            if is_epsilon_name(name) {
                Ok(Symbol::epsilon())
            } else if nonterminal_set.contains(name) {
                Ok(Symbol::nonterminal(name))
            } else if terminal_set.contains(name) {
                Ok(Symbol::terminal(name))
            } else {
                Err(UndeclaredSymbol(name))
            }
        };

        let mut flattened = Vec::new();
        for production in &productions {
            if !nonterminal_set.contains(production.name) {
                return Err(ProductionLeftNotNonterminal(production.name));
            }
            let left = Symbol::nonterminal(production.name);
            for alternative in &production.alternatives {
                let right = if alternative.is_empty() {
                    vec![Symbol::epsilon()]
                } else {
                    alternative
                        .iter()
                        .map(|name| symbol(name))
                        .collect::<Result<Vec<_>, _>>()?
                };
                flattened.push(Production::new(left.clone(), right));
            }
        }

        Grammar::new(Symbol::nonterminal(start), flattened).map_err(Invalid)
    }
}
