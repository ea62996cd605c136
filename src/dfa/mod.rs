//! # Deterministic finite automata
//! The DFA module includes the [`Dfa`] struct, produced from an [`Nfa`](crate::nfa::Nfa) by the
//! subset construction and consumed by the scanner. Every DFA state is keyed by the ε-closed set
//! of NFA states it represents: two DFA states are the same iff those sets are equal, and the
//! set (kept as a sorted vector of indices) doubles as the deduplication key during
//! construction. Identity-based keys are deliberately avoided; they would make state numbering
//! depend on allocation order and break the determinism the table artifacts rely on.
//!
//! States receive dense integer ids in creation order. The construction processes pending states
//! in FIFO order and the alphabet in sorted order, so ids are reproducible across runs for equal
//! inputs.
//!
//! A DFA state may additionally carry an [`AcceptLabel`], the `(token, priority)` pair attached
//! by the multi-pattern lexer construction (see [`Lexer`](crate::lexer::Lexer)). Plain automata
//! built from a single regular expression carry no labels.
//!
//! ## Minimization
//! [`Dfa::minimized`] merges indistinguishable states using the table-filling algorithm: mark
//! every pair of states disagreeing on acceptance (or on token label), then propagate marks
//! backwards through transitions until a fixed point, and finally collapse every unmarked pair
//! into one state via union-find. Minimizing an already minimal automaton yields an isomorphic
//! automaton.
//!
//! ```
//! use lexlr::regex::Regex;
//!
//! let dfa = Regex::new("a(b|c)*").unwrap().to_nfa().unwrap().to_dfa();
//! let minimal = dfa.minimized();
//! assert!(minimal.states().len() <= dfa.states().len());
//! assert!(minimal.accepts("abcb"));
//! assert!(!minimal.accepts("b"));
//! ```

use crate::nfa::{self, NfaState};
use crate::table::Table;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::rc::Rc;

pub mod eval;
mod minimize;
pub use eval::DfaEvaluator;

/// A deterministic finite automaton over an explicit, sorted alphabet. Transitions are partial:
/// a missing entry means the automaton dies on that symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dfa {
    pub(crate) alphabet: Vec<char>,
    pub(crate) states: Vec<DfaState>,
    pub(crate) initial: usize,
}

/// A state in a DFA: its id (the index in creation order), the sorted set of NFA states it
/// represents, one optional transition per alphabet symbol, an accepting flag and an optional
/// token label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DfaState {
    pub(crate) id: usize,
    pub(crate) nfa_states: Vec<usize>,
    pub(crate) transitions: Vec<Option<usize>>,
    pub(crate) accepting: bool,
    pub(crate) label: Option<AcceptLabel>,
}

/// The token attached to an accepting state of a lexer DFA. When several lexer rules accept in
/// the same state, the rule with the strictly greatest priority wins; ties keep the rule that
/// was declared first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AcceptLabel {
    pub(crate) token: Rc<str>,
    pub(crate) priority: u32,
    pub(crate) skip: bool,
}

impl AcceptLabel {
    /// The token name emitted when this state accepts.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The priority of the winning rule.
    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Whether tokens with this label are suppressed from scanner output.
    pub fn is_skipped(&self) -> bool {
        self.skip
    }
}

impl DfaState {
    /// The id of this state, equal to its index in [`Dfa::states`].
    pub fn id(&self) -> usize {
        self.id
    }

    /// Checks if this state is accepting.
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// The token label of this state, present on accepting states of lexer automata.
    pub fn label(&self) -> Option<&AcceptLabel> {
        self.label.as_ref()
    }

    /// The sorted indices of the NFA states this state represents.
    pub fn nfa_states(&self) -> &[usize] {
        &self.nfa_states
    }

    /// The transitions of this state, aligned with the automaton's alphabet.
    pub fn transitions(&self) -> &[Option<usize>] {
        &self.transitions
    }
}

/// Subset construction over an NFA state arena. `labeler` decides the token label of each new
/// DFA state from the ε-closed NFA state set it represents; plain single-pattern conversion
/// passes a labeler that always answers `None`.
///
/// The alphabet is sorted and deduplicated up front, and pending states are expanded in FIFO
/// order, so state ids depend only on the input automaton and alphabet.
pub(crate) fn construct(
    nfa_states: &[NfaState],
    start: usize,
    alphabet: &[char],
    labeler: impl Fn(&BTreeSet<usize>) -> Option<AcceptLabel>,
) -> Dfa {
    let mut sigma = alphabet.to_vec();
    sigma.sort_unstable();
    sigma.dedup();

    let initial_set = nfa::closure(nfa_states, [start]);
    let mut states: Vec<DfaState> = Vec::new();
    let mut sets: Vec<BTreeSet<usize>> = Vec::new();
    let mut lookup: HashMap<Vec<usize>, usize> = HashMap::new();
    let mut queue: VecDeque<usize> = VecDeque::new();

    let key: Vec<usize> = initial_set.iter().copied().collect();
    states.push(DfaState {
        id: 0,
        nfa_states: key.clone(),
        transitions: vec![None; sigma.len()],
        accepting: initial_set.iter().any(|&s| nfa_states[s].accepting),
        label: labeler(&initial_set),
    });
    lookup.insert(key, 0);
    sets.push(initial_set);
    queue.push_back(0);

    while let Some(current) = queue.pop_front() {
        for symbol_idx in 0..sigma.len() {
            let moved = nfa::move_on(nfa_states, &sets[current], sigma[symbol_idx]);
            if moved.is_empty() {
                continue;
            }
            let target_set = nfa::closure(nfa_states, moved);
            let key: Vec<usize> = target_set.iter().copied().collect();
            let target = match lookup.get(&key) {
                Some(&existing) => existing,
                None => {
                    let id = states.len();
                    states.push(DfaState {
                        id,
                        nfa_states: key.clone(),
                        transitions: vec![None; sigma.len()],
                        accepting: target_set.iter().any(|&s| nfa_states[s].accepting),
                        label: labeler(&target_set),
                    });
                    lookup.insert(key, id);
                    sets.push(target_set);
                    queue.push_back(id);
                    id
                }
            };
            states[current].transitions[symbol_idx] = Some(target);
        }
    }

    Dfa {
        alphabet: sigma,
        states,
        initial: 0,
    }
}

impl Dfa {
    /// The alphabet of this automaton, sorted.
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// The states of this automaton, indexed by id.
    pub fn states(&self) -> &[DfaState] {
        &self.states
    }

    /// The id of the initial state.
    pub fn initial_state_index(&self) -> usize {
        self.initial
    }

    /// The transition from `state` on `symbol`, if any.
    pub fn transition(&self, state: usize, symbol: char) -> Option<usize> {
        let idx = self.alphabet.binary_search(&symbol).ok()?;
        self.states[state].transitions[idx]
    }

    /// Checks if this automaton accepts the given string.
    pub fn accepts(&self, input: &str) -> bool {
        let mut eval = self.evaluator();
        eval.step_all(input);
        eval.is_accepting()
    }

    /// Gets an evaluator, which tracks the current state during evaluation of a string.
    pub fn evaluator(&self) -> DfaEvaluator<'_> {
        self.into()
    }

    /// Renders this automaton as an aligned text table: one row per state, one column per
    /// alphabet symbol, `-` for missing transitions. Accepting states are starred and the
    /// initial state is marked with an arrow; labelled states show their token name last.
    pub fn to_table(&self) -> String {
        let mut table = Table::default();
        let labelled = self.states.iter().any(|s| s.label.is_some());

        let mut head = vec![String::new(), String::new(), String::new()];
        head.extend(self.alphabet.iter().map(|c| c.to_string()));
        if labelled {
            head.push("token".to_string());
        }
        table.push_row(head);

        for state in &self.states {
            let mut row = vec![
                if state.id == self.initial { "→" } else { "" }.to_string(),
                if state.accepting { "*" } else { "" }.to_string(),
                state.id.to_string(),
            ];
            row.extend(state.transitions.iter().map(|t| match t {
                Some(target) => target.to_string(),
                None => "-".to_string(),
            }));
            if labelled {
                row.push(match &state.label {
                    Some(label) => format!("{} ({})", label.token, label.priority),
                    None => String::new(),
                });
            }
            table.push_row(row);
        }
        table.render(" ")
    }
}

#[cfg(test)]
mod tests {
    use crate::regex::Regex;

    #[test]
    fn subset_construction_state_sets_are_closed_and_deduplicated() {
        let dfa = Regex::new("(a|b)*abb").unwrap().to_nfa().unwrap().to_dfa();
        // ids are dense and match positions
        for (idx, state) in dfa.states().iter().enumerate() {
            assert_eq!(state.id(), idx);
        }
        // keys are unique
        let mut keys: Vec<_> = dfa.states().iter().map(|s| s.nfa_states().to_vec()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), dfa.states().len());
    }

    #[test]
    fn recognizes_language_of_regex() {
        let dfa = Regex::new("(a|b)*abb").unwrap().to_nfa().unwrap().to_dfa();
        assert!(dfa.accepts("abb"));
        assert!(dfa.accepts("aababb"));
        assert!(!dfa.accepts("ab"));
        assert!(!dfa.accepts("abba"));
    }

    #[test]
    fn construction_is_deterministic() {
        let a = Regex::new("a(b|c)*d").unwrap().to_nfa().unwrap().to_dfa();
        let b = Regex::new("a(b|c)*d").unwrap().to_nfa().unwrap().to_dfa();
        assert_eq!(a, b);
        assert_eq!(a.to_table(), b.to_table());
    }
}
