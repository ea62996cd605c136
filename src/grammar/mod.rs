//! # Context-free grammars
//! The grammar module includes the [`Grammar`] struct: an ordered list of [`Production`]s over
//! typed [`Symbol`]s, together with a designated start symbol and the induced partition of
//! symbols into terminals and non-terminals. A grammar is validated once at construction and
//! immutable afterwards; the LR machinery in [`lr`](crate::lr) only ever reads it.
//!
//! Two terminal names are reserved: [`EPSILON`] (`ε`), the empty string, and [`END_MARKER`]
//! (`$`), end of input. An ε-production is written with a right-hand side that is exactly the
//! single symbol `ε`; the parser driver treats its length as zero when reducing. `$` never
//! appears in productions, it is appended to token input by the driver.
//!
//! Grammars can be built programmatically or loaded from the text format implemented in
//! [`parser`](crate::parser):
//!
//! ```
//! use lexlr::grammar::{Grammar, Production, Symbol};
//!
//! let s = Symbol::nonterminal("S");
//! let a = Symbol::terminal("a");
//! let b = Symbol::terminal("b");
//!
//! // S → a S b | ε
//! let grammar = Grammar::new(
//!     s.clone(),
//!     vec![
//!         Production::new(s.clone(), vec![a.clone(), s.clone(), b.clone()]),
//!         Production::new(s.clone(), vec![Symbol::epsilon()]),
//!     ],
//! )
//! .unwrap();
//! assert_eq!(grammar.terminals().len(), 2);
//! assert_eq!(grammar.nonterminals(), [s]);
//! ```

use std::fmt;
use std::rc::Rc;
use thiserror::Error;

pub mod parse;
pub mod sets;
pub use sets::{FirstSets, FollowSets};

/// Name of the reserved terminal denoting the empty string.
pub const EPSILON: &str = "ε";

/// Name of the reserved terminal denoting end of input.
pub const END_MARKER: &str = "$";

/// Whether a symbol is a terminal or a non-terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SymbolKind {
    Terminal,
    Nonterminal,
}

/// A grammar symbol: a name paired with its kind. Equality, ordering and hashing are structural
/// on both fields.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    pub(crate) name: Rc<str>,
    pub(crate) kind: SymbolKind,
}

impl Symbol {
    pub fn terminal(name: &str) -> Self {
        Self {
            name: Rc::from(name),
            kind: SymbolKind::Terminal,
        }
    }

    pub fn nonterminal(name: &str) -> Self {
        Self {
            name: Rc::from(name),
            kind: SymbolKind::Nonterminal,
        }
    }

    /// The reserved ε terminal.
    pub fn epsilon() -> Self {
        Self::terminal(EPSILON)
    }

    /// The reserved end-of-input terminal `$`.
    pub fn end() -> Self {
        Self::terminal(END_MARKER)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    pub fn is_terminal(&self) -> bool {
        self.kind == SymbolKind::Terminal
    }

    pub fn is_nonterminal(&self) -> bool {
        self.kind == SymbolKind::Nonterminal
    }

    pub fn is_epsilon(&self) -> bool {
        self.kind == SymbolKind::Terminal && &*self.name == EPSILON
    }

    pub fn is_end(&self) -> bool {
        self.kind == SymbolKind::Terminal && &*self.name == END_MARKER
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A production: a non-terminal and the sequence of symbols it derives. Equality is structural.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Production {
    pub(crate) left: Symbol,
    pub(crate) right: Vec<Symbol>,
}

impl Production {
    pub fn new(left: Symbol, right: Vec<Symbol>) -> Self {
        Self { left, right }
    }

    pub fn left(&self) -> &Symbol {
        &self.left
    }

    pub fn right(&self) -> &[Symbol] {
        &self.right
    }

    /// True if the right-hand side is exactly the single symbol ε.
    pub fn is_epsilon(&self) -> bool {
        self.right.len() == 1 && self.right[0].is_epsilon()
    }

    /// The right-hand side with ε-productions normalized away: ε derives the empty sequence.
    /// All dot positions in LR items and all reduce pops range over this view.
    pub fn body(&self) -> &[Symbol] {
        if self.is_epsilon() {
            &[]
        } else {
            &self.right
        }
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.left)?;
        for symbol in &self.right {
            write!(f, " {symbol}")?;
        }
        Ok(())
    }
}

/// Errors surfaced while validating a grammar.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("The start symbol '{0}' is not a non-terminal")]
    StartNotNonterminal(String),
    #[error("The left-hand side '{0}' of a production is not a non-terminal")]
    LeftNotNonterminal(String),
    #[error("'{0}' is used both as a terminal and as a non-terminal")]
    InconsistentSymbol(String),
    #[error("The end marker '$' may not appear in a production")]
    EndMarkerInProduction,
    #[error("ε may only appear as the whole right-hand side of a production")]
    EpsilonNotAlone,
    #[error("A grammar needs at least one production")]
    NoProductions,
}

/// A validated context-free grammar. Productions keep their declared order, which is observable:
/// it drives the numbering of LR states and the production ids appearing in REDUCE actions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grammar {
    pub(crate) start: Symbol,
    pub(crate) productions: Vec<Production>,
    pub(crate) terminals: Vec<Symbol>,
    pub(crate) nonterminals: Vec<Symbol>,
}

impl Grammar {
    /// Validates the productions and induces the terminal and non-terminal sets (in order of
    /// first appearance). The reserved symbols ε and `$` are excluded from the induced sets.
    pub fn new(start: Symbol, productions: Vec<Production>) -> Result<Self, GrammarError> {
        if productions.is_empty() {
            return Err(GrammarError::NoProductions);
        }
        if !start.is_nonterminal() {
            return Err(GrammarError::StartNotNonterminal(start.name.to_string()));
        }

        let mut terminals: Vec<Symbol> = Vec::new();
        let mut nonterminals: Vec<Symbol> = Vec::new();
        let mut note = |symbol: &Symbol| -> Result<(), GrammarError> {
            let (own, other) = if symbol.is_nonterminal() {
                (&mut nonterminals, &mut terminals)
            } else {
                (&mut terminals, &mut nonterminals)
            };
            if other.iter().any(|s| s.name == symbol.name) {
                return Err(GrammarError::InconsistentSymbol(symbol.name.to_string()));
            }
            if !own.contains(symbol) {
                own.push(symbol.clone());
            }
            Ok(())
        };

        note(&start)?;
        for production in &productions {
            if !production.left.is_nonterminal() {
                return Err(GrammarError::LeftNotNonterminal(
                    production.left.name.to_string(),
                ));
            }
            note(&production.left)?;
            for symbol in &production.right {
                if symbol.is_end() {
                    return Err(GrammarError::EndMarkerInProduction);
                }
                if symbol.is_epsilon() {
                    if production.right.len() != 1 {
                        return Err(GrammarError::EpsilonNotAlone);
                    }
                    continue;
                }
                note(symbol)?;
            }
        }

        Ok(Grammar {
            start,
            productions,
            terminals,
            nonterminals,
        })
    }

    pub fn start(&self) -> &Symbol {
        &self.start
    }

    /// The productions in declared order.
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// The induced terminals, in order of first appearance. ε and `$` are not included.
    pub fn terminals(&self) -> &[Symbol] {
        &self.terminals
    }

    /// The induced non-terminals, in order of first appearance (the start symbol first).
    pub fn nonterminals(&self) -> &[Symbol] {
        &self.nonterminals
    }

    /// All grammar symbols in the deterministic order used when expanding LR states:
    /// non-terminals first, then terminals, each in order of first appearance.
    pub(crate) fn symbols(&self) -> Vec<Symbol> {
        self.nonterminals
            .iter()
            .chain(self.terminals.iter())
            .cloned()
            .collect()
    }
}
