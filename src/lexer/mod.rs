//! # Lexer construction
//! A [`Lexer`] compiles a prioritized list of [`LexRule`]s, each a named regular expression,
//! into a single minimized token DFA. Construction merges the Thompson automata of all rules
//! under one virtual start state (ε-edges fan out to every rule), runs the subset construction
//! over the union of their alphabets, and labels each accepting DFA state with the winning rule:
//! the one of strictly greatest priority among the rules accepting there, ties going to the rule
//! declared first. Minimization keeps states with different token labels apart, so merging never
//! changes which token a state emits.
//!
//! Scanning (see [`scan`]) applies the longest-match rule: of all prefixes the DFA accepts from
//! the current position, the longest one becomes the next token.
//!
//! ```
//! use lexlr::lexer::{LexRule, Lexer};
//!
//! let rules = [
//!     LexRule::new("ASSIGN", "=", 6),
//!     LexRule::new("EQ", "==", 6),
//! ];
//! let lexer = Lexer::build(&rules).unwrap();
//!
//! let kinds: Vec<_> = lexer
//!     .tokens("== =")
//!     .iter()
//!     .map(|t| t.kind().to_string())
//!     .collect();
//! // longest match: "==" is one EQ, not two ASSIGNs
//! assert_eq!(kinds, ["EQ", "ASSIGN", "$"]);
//! ```

use crate::dfa::{self, AcceptLabel, Dfa};
use crate::nfa::NfaState;
use crate::regex::{Regex, RegexError};
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

pub mod scan;
pub use scan::Scanner;

/// Token type of the end-of-input token appended by the scanner and consumed by the parser
/// driver.
pub const END_OF_INPUT: &str = "$";

/// Token type emitted for a character no rule matches.
pub const UNKNOWN: &str = "UNKNOWN";

/// A single lexer rule: a token name, a regular expression pattern and a priority. Higher
/// priority wins when several rules accept the same lexeme; on equal priority the rule declared
/// first wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexRule {
    pub(crate) name: Rc<str>,
    pub(crate) pattern: String,
    pub(crate) priority: u32,
    pub(crate) skip: bool,
}

impl LexRule {
    /// A rule whose tokens appear in scanner output.
    pub fn new(name: &str, pattern: &str, priority: u32) -> Self {
        Self {
            name: Rc::from(name),
            pattern: pattern.to_string(),
            priority,
            skip: false,
        }
    }

    /// A rule that participates in matching but whose tokens are suppressed from scanner output,
    /// typically whitespace.
    pub fn skipped(name: &str, pattern: &str, priority: u32) -> Self {
        Self {
            skip: true,
            ..Self::new(name, pattern, priority)
        }
    }

    /// The token name this rule emits.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The regular expression pattern of this rule.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The priority of this rule.
    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Whether tokens of this rule are suppressed from scanner output.
    pub fn is_skipped(&self) -> bool {
        self.skip
    }
}

/// A token produced by the scanner: its type name, the matched lexeme and the byte range it was
/// matched at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub(crate) kind: Rc<str>,
    pub(crate) lexeme: String,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

impl Token {
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    /// Byte offset of the first character of the lexeme.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset one past the last character of the lexeme.
    pub fn end(&self) -> usize {
        self.end
    }
}

/// A compiled lexer: a minimized DFA whose accepting states carry token labels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lexer {
    dfa: Dfa,
    rules: Vec<LexRule>,
}

impl Lexer {
    /// Compiles the given rules into a minimized token DFA. Fails if any rule's pattern is
    /// malformed.
    pub fn build(rules: &[LexRule]) -> Result<Self, RegexError> {
        // One shared arena; state 0 is the virtual start with ε-edges to every rule automaton.
        let mut states: Vec<NfaState> = vec![NfaState::default()];
        let mut rule_ends: HashMap<usize, usize> = HashMap::new();

        for (rule_idx, rule) in rules.iter().enumerate() {
            let nfa = Regex::new(&rule.pattern)?.to_nfa()?;
            let offset = states.len();
            for state in nfa.states() {
                states.push(NfaState {
                    transitions: state
                        .transitions
                        .iter()
                        .map(|&(symbol, target)| (symbol, target + offset))
                        .collect(),
                    epsilon_transitions: state
                        .epsilon_transitions
                        .iter()
                        .map(|&target| target + offset)
                        .collect(),
                    accepting: state.accepting,
                });
            }
            states[0]
                .epsilon_transitions
                .push(nfa.start_index() + offset);
            rule_ends.insert(nfa.end_index() + offset, rule_idx);
        }

        let alphabet: Vec<char> = states
            .iter()
            .flat_map(|state| &state.transitions)
            .map(|&(symbol, _)| symbol)
            .collect::<BTreeSet<char>>()
            .into_iter()
            .collect();

        let labeler = |set: &BTreeSet<usize>| -> Option<AcceptLabel> {
            let mut best: Option<usize> = None;
            for state in set {
                if let Some(&candidate) = rule_ends.get(state) {
                    best = Some(match best {
                        None => candidate,
                        Some(current) => {
                            if rules[candidate].priority > rules[current].priority {
                                candidate
                            } else if rules[candidate].priority < rules[current].priority {
                                current
                            } else {
                                // equal priority: the rule declared first is retained
                                current.min(candidate)
                            }
                        }
                    });
                }
            }
            best.map(|idx| AcceptLabel {
                token: rules[idx].name.clone(),
                priority: rules[idx].priority,
                skip: rules[idx].skip,
            })
        };

        let dfa = dfa::construct(&states, 0, &alphabet, labeler).minimized();
        Ok(Lexer {
            dfa,
            rules: rules.to_vec(),
        })
    }

    /// The minimized token DFA driving this lexer.
    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    /// The rules this lexer was built from, in declaration order.
    pub fn rules(&self) -> &[LexRule] {
        &self.rules
    }

    /// Gets a scanner over `input`, an iterator of tokens ending with a single
    /// [`END_OF_INPUT`] token.
    pub fn scanner<'a>(&'a self, input: &'a str) -> Scanner<'a> {
        Scanner::new(&self.dfa, input)
    }

    /// Scans the whole input into a token vector. The last token is always [`END_OF_INPUT`].
    pub fn tokens(&self, input: &str) -> Vec<Token> {
        self.scanner(input).collect()
    }
}
