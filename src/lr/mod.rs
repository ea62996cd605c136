//! # LR(1) and LALR(1) automata
//! This module builds the canonical LR(1) collection of a [`Grammar`] and merges it down to the
//! LALR(1) automaton that the [`ParseTable`] is filled from.
//!
//! The grammar is first augmented with a fresh start production `S' → S`. States are sets of
//! [`Item`]s, `(production, dot, lookahead)` triples with structural equality, kept in
//! `BTreeSet`s so that state identity is structural and iteration order is deterministic.
//! CLOSURE expands every item `[A → α • B β, a]` with items `[B → • γ, b]` for each production
//! of `B` and each `b ∈ FIRST(βa)`; GOTO advances the dot over one symbol and closes again. The
//! collection is explored breadth-first, expanding each state over the grammar symbols in their
//! declared order, so state numbering is reproducible for equal inputs.
//!
//! [`LrAutomaton::merge_by_kernel`] performs the LALR(1) merge: states whose items agree after
//! dropping lookaheads are unioned, and the transition graph is rewritten through the class map.
//! Merging is idempotent and never increases the state count.
//!
//! ```
//! use lexlr::grammar::{Grammar, Production, Symbol};
//! use lexlr::lr::LrAutomaton;
//!
//! let s = Symbol::nonterminal("S");
//! let grammar = Grammar::new(
//!     s.clone(),
//!     vec![Production::new(s.clone(), vec![Symbol::terminal("a")])],
//! )
//! .unwrap();
//!
//! let lr1 = LrAutomaton::construct(&grammar);
//! let lalr = lr1.merge_by_kernel();
//! assert!(lalr.states().len() <= lr1.states().len());
//! ```

use crate::grammar::{FirstSets, Grammar, Production, Symbol, END_MARKER, EPSILON};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::rc::Rc;

pub mod driver;
mod lalr;
pub mod table;
pub use driver::SyntaxError;
pub use table::{Action, ParseTable, TableError};

/// An LR(1) item: a production, the dot position within its (ε-normalized) body and one
/// lookahead terminal. Equality, ordering and hashing are structural on all three fields.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    pub(crate) production: usize,
    pub(crate) dot: usize,
    pub(crate) lookahead: Rc<str>,
}

impl Item {
    /// Index of this item's production in [`LrAutomaton::productions`].
    pub fn production(&self) -> usize {
        self.production
    }

    /// Position of the dot within the production body.
    pub fn dot(&self) -> usize {
        self.dot
    }

    /// The lookahead terminal name.
    pub fn lookahead(&self) -> &str {
        &self.lookahead
    }
}

pub(crate) type ItemSet = BTreeSet<Item>;

/// An LR(1) (or, after merging, LALR(1)) automaton: the augmented production list, the item sets
/// of the canonical collection, the GOTO graph between them and the id of the initial state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LrAutomaton {
    pub(crate) productions: Vec<Production>,
    pub(crate) states: Vec<ItemSet>,
    pub(crate) transitions: Vec<BTreeMap<Symbol, usize>>,
    pub(crate) initial: usize,
    pub(crate) augmented_start: Option<Rc<str>>,
}

/// A fresh non-terminal name for the augmented start symbol: the start name with primes appended
/// until it collides with nothing in the grammar.
fn fresh_start_name(grammar: &Grammar) -> String {
    let mut name = format!("{}'", grammar.start().name());
    while grammar
        .nonterminals()
        .iter()
        .chain(grammar.terminals())
        .any(|symbol| symbol.name() == name)
    {
        name.push('\'');
    }
    name
}

/// CLOSURE of an item set: keeps adding `[B → • γ, b]` for every item with the dot before a
/// non-terminal `B`, every production of `B` (in declared order) and every `b ∈ FIRST(βa)`,
/// until nothing new can be added.
fn closure(productions: &[Production], first: &FirstSets, mut items: ItemSet) -> ItemSet {
    let mut work: Vec<Item> = items.iter().cloned().collect();
    while let Some(item) = work.pop() {
        let body = productions[item.production].body();
        let next = match body.get(item.dot) {
            Some(symbol) if symbol.is_nonterminal() => symbol.clone(),
            _ => continue,
        };

        let mut lookaheads = first.first_of_sequence(&body[item.dot + 1..]);
        if lookaheads.remove(EPSILON) {
            // β is nullable, so the item's own lookahead can follow B
            lookaheads.insert(item.lookahead.clone());
        }

        for (idx, production) in productions.iter().enumerate() {
            if production.left().name() != next.name() {
                continue;
            }
            for lookahead in &lookaheads {
                let new_item = Item {
                    production: idx,
                    dot: 0,
                    lookahead: lookahead.clone(),
                };
                if items.insert(new_item.clone()) {
                    work.push(new_item);
                }
            }
        }
    }
    items
}

/// GOTO of an item set over one symbol: advance the dot of every item expecting that symbol,
/// then close.
fn goto(
    productions: &[Production],
    first: &FirstSets,
    items: &ItemSet,
    symbol: &Symbol,
) -> ItemSet {
    let mut kernel = ItemSet::new();
    for item in items {
        if productions[item.production].body().get(item.dot) == Some(symbol) {
            kernel.insert(Item {
                production: item.production,
                dot: item.dot + 1,
                lookahead: item.lookahead.clone(),
            });
        }
    }
    if kernel.is_empty() {
        kernel
    } else {
        closure(productions, first, kernel)
    }
}

impl LrAutomaton {
    /// Builds the canonical LR(1) collection of `grammar`. The initial state is the closure of
    /// `[S' → • S, $]`; states are discovered breadth-first and numbered in discovery order.
    pub fn construct(grammar: &Grammar) -> Self {
        let augmented_name = fresh_start_name(grammar);
        let mut productions = Vec::with_capacity(grammar.productions().len() + 1);
        productions.push(Production::new(
            Symbol::nonterminal(&augmented_name),
            vec![grammar.start().clone()],
        ));
        productions.extend(grammar.productions().iter().cloned());

        let first = FirstSets::of(grammar);
        let symbols = grammar.symbols();

        let initial_items = closure(
            &productions,
            &first,
            ItemSet::from([Item {
                production: 0,
                dot: 0,
                lookahead: Rc::from(END_MARKER),
            }]),
        );

        let mut states = vec![initial_items.clone()];
        let mut transitions: Vec<BTreeMap<Symbol, usize>> = vec![BTreeMap::new()];
        let mut lookup: HashMap<ItemSet, usize> = HashMap::from([(initial_items, 0)]);
        let mut queue: VecDeque<usize> = VecDeque::from([0]);

        while let Some(current) = queue.pop_front() {
            for symbol in &symbols {
                let target_items = goto(&productions, &first, &states[current], symbol);
                if target_items.is_empty() {
                    continue;
                }
                let target = match lookup.get(&target_items) {
                    Some(&existing) => existing,
                    None => {
                        let id = states.len();
                        states.push(target_items.clone());
                        transitions.push(BTreeMap::new());
                        lookup.insert(target_items, id);
                        queue.push_back(id);
                        id
                    }
                };
                transitions[current].insert(symbol.clone(), target);
            }
        }

        LrAutomaton {
            productions,
            states,
            transitions,
            initial: 0,
            augmented_start: Some(Rc::from(augmented_name.as_str())),
        }
    }

    /// The augmented production list; index 0 is `S' → S`, the rest keep the grammar's declared
    /// order. REDUCE actions in the parse table refer to these indices.
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// The item sets of this automaton, indexed by state id.
    pub fn states(&self) -> &[ItemSet] {
        &self.states
    }

    /// The GOTO graph: one symbol-to-state map per state.
    pub fn transitions(&self) -> &[BTreeMap<Symbol, usize>] {
        &self.transitions
    }

    /// The transition from `state` over `symbol`, if any.
    pub fn transition(&self, state: usize, symbol: &Symbol) -> Option<usize> {
        self.transitions.get(state)?.get(symbol).copied()
    }

    /// The id of the initial state.
    pub fn initial_state_index(&self) -> usize {
        self.initial
    }

    /// The name of the augmented start symbol, recorded at construction and required when
    /// filling the parse table.
    pub fn augmented_start(&self) -> Option<&str> {
        self.augmented_start.as_deref()
    }

    /// True if the item's dot is at the end of its production body.
    pub(crate) fn is_complete(&self, item: &Item) -> bool {
        item.dot >= self.productions[item.production].body().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{Grammar, Production, Symbol};

    fn expression_grammar() -> Grammar {
        let e = Symbol::nonterminal("E");
        let t = Symbol::nonterminal("T");
        let f = Symbol::nonterminal("F");
        Grammar::new(
            e.clone(),
            vec![
                Production::new(e.clone(), vec![e.clone(), Symbol::terminal("+"), t.clone()]),
                Production::new(e.clone(), vec![t.clone()]),
                Production::new(t.clone(), vec![t.clone(), Symbol::terminal("*"), f.clone()]),
                Production::new(t.clone(), vec![f.clone()]),
                Production::new(
                    f.clone(),
                    vec![Symbol::terminal("("), e.clone(), Symbol::terminal(")")],
                ),
                Production::new(f, vec![Symbol::terminal("id")]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn initial_state_holds_the_augmented_item() {
        let automaton = LrAutomaton::construct(&expression_grammar());
        let initial = &automaton.states()[automaton.initial_state_index()];
        assert!(initial
            .iter()
            .any(|item| item.production() == 0 && item.dot() == 0 && item.lookahead() == "$"));
        assert_eq!(automaton.augmented_start(), Some("E'"));
    }

    #[test]
    fn exactly_one_state_holds_the_augmented_start_item() {
        let automaton = LrAutomaton::construct(&expression_grammar());
        let holders = automaton
            .states()
            .iter()
            .filter(|items| {
                items
                    .iter()
                    .any(|item| item.production() == 0 && item.dot() == 0)
            })
            .count();
        assert_eq!(holders, 1);
    }

    #[test]
    fn augmented_name_avoids_collisions() {
        let e = Symbol::nonterminal("E");
        let e_prime = Symbol::nonterminal("E'");
        let grammar = Grammar::new(
            e.clone(),
            vec![
                Production::new(e.clone(), vec![e_prime.clone()]),
                Production::new(e_prime, vec![Symbol::terminal("a")]),
            ],
        )
        .unwrap();
        let automaton = LrAutomaton::construct(&grammar);
        assert_eq!(automaton.augmented_start(), Some("E''"));
    }

    #[test]
    fn construction_is_deterministic() {
        let grammar = expression_grammar();
        let a = LrAutomaton::construct(&grammar);
        let b = LrAutomaton::construct(&grammar);
        assert_eq!(a, b);
    }

    #[test]
    fn closure_expands_through_first_sets() {
        // In the initial state, the closure of [E' → • E, $] must pull in items for every
        // production of E, T and F, with lookaheads drawn from FIRST of what follows
        let automaton = LrAutomaton::construct(&expression_grammar());
        let initial = &automaton.states()[automaton.initial_state_index()];
        let productions_present: std::collections::BTreeSet<usize> =
            initial.iter().map(|item| item.production()).collect();
        assert_eq!(productions_present, (0..=6).collect());
        // an E item with lookahead '+' exists because E + T follows E
        assert!(initial
            .iter()
            .any(|item| item.production() == 1 && item.lookahead() == "+"));
    }
}
