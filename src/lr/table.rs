//! ACTION/GOTO table synthesis from an LALR(1) automaton.
//!
//! Every cell conflict is resolved deterministically and recorded, never silently dropped:
//! shift/reduce resolves in favour of the shift, reduce/reduce keeps the reduce written first
//! (item sets iterate in structural order, so "first" is reproducible), and anything colliding
//! with ACCEPT loses but is logged. An empty conflict list therefore certifies that the grammar
//! is LALR(1) under this construction.

use crate::grammar::{Production, Symbol, END_MARKER};
use crate::lr::LrAutomaton;
use crate::table::Table;
use std::collections::BTreeMap;
use std::rc::Rc;
use thiserror::Error;

/// One entry of the ACTION table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Push the given state and advance the input.
    Shift(usize),
    /// Reduce by the production with the given index into [`ParseTable::productions`].
    Reduce(usize),
    /// The input is a sentence of the grammar.
    Accept,
}

/// Errors surfaced while filling a parse table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("The automaton has no recorded augmented start symbol")]
    MissingAugmentedStart,
}

/// The parse table driving the shift-reduce parser: ACTION maps `(state, terminal)` to an
/// [`Action`], GOTO maps `(state, non-terminal)` to a state. The conflicts recorded during
/// filling accompany the table; an empty list means the grammar is unambiguous under this
/// construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseTable {
    pub(crate) productions: Vec<Production>,
    pub(crate) actions: Vec<BTreeMap<Rc<str>, Action>>,
    pub(crate) gotos: Vec<BTreeMap<Rc<str>, usize>>,
    pub(crate) initial: usize,
    pub(crate) conflicts: Vec<String>,
}

impl ParseTable {
    /// Fills the ACTION and GOTO tables from an automaton (usually the LALR(1) merge, though
    /// the canonical LR(1) automaton works as well). Fails only if the automaton carries no
    /// augmented start symbol; grammar conflicts are resolved and recorded instead of failing.
    pub fn fill(automaton: &LrAutomaton) -> Result<ParseTable, TableError> {
        let augmented = automaton
            .augmented_start
            .as_ref()
            .ok_or(TableError::MissingAugmentedStart)?;

        let mut table = ParseTable {
            productions: automaton.productions.clone(),
            actions: vec![BTreeMap::new(); automaton.states.len()],
            gotos: vec![BTreeMap::new(); automaton.states.len()],
            initial: automaton.initial,
            conflicts: Vec::new(),
        };

        for (state, items) in automaton.states.iter().enumerate() {
            for item in items {
                let production = &automaton.productions[item.production];
                match production.body().get(item.dot) {
                    Some(symbol) if symbol.is_terminal() => {
                        if let Some(target) = automaton.transition(state, symbol) {
                            table.set_action(state, symbol.name.clone(), Action::Shift(target));
                        }
                    }
                    Some(_) => {}
                    None => {
                        // dot at the end: accept on the augmented production, reduce otherwise
                        if production.left.name() == &**augmented
                            && &*item.lookahead == END_MARKER
                        {
                            table.set_action(state, Rc::from(END_MARKER), Action::Accept);
                        } else {
                            table.set_action(
                                state,
                                item.lookahead.clone(),
                                Action::Reduce(item.production),
                            );
                        }
                    }
                }
            }

            for (symbol, &target) in &automaton.transitions[state] {
                if symbol.is_nonterminal() {
                    table.gotos[state].insert(symbol.name.clone(), target);
                }
            }
        }

        Ok(table)
    }

    /// Writes one ACTION cell, applying the conflict policy and recording what was dropped.
    fn set_action(&mut self, state: usize, terminal: Rc<str>, action: Action) {
        let existing = match self.actions[state].get(&terminal) {
            None => {
                self.actions[state].insert(terminal, action);
                return;
            }
            Some(&existing) => existing,
        };
        if existing == action {
            return;
        }

        match (existing, action) {
            (Action::Shift(target), Action::Reduce(dropped)) => {
                self.conflicts.push(format!(
                    "shift/reduce conflict in state {state} on '{terminal}': \
                     shift to state {target} kept, reduce by '{}' dropped",
                    self.productions[dropped]
                ));
            }
            (Action::Reduce(dropped), Action::Shift(target)) => {
                self.conflicts.push(format!(
                    "shift/reduce conflict in state {state} on '{terminal}': \
                     shift to state {target} kept, reduce by '{}' dropped",
                    self.productions[dropped]
                ));
                self.actions[state].insert(terminal, action);
            }
            (Action::Reduce(kept), Action::Reduce(dropped)) => {
                self.conflicts.push(format!(
                    "reduce/reduce conflict in state {state} on '{terminal}': \
                     reduce by '{}' kept, reduce by '{}' dropped",
                    self.productions[kept], self.productions[dropped]
                ));
            }
            (Action::Accept, dropped) => {
                self.conflicts.push(format!(
                    "accept conflict in state {state} on '{terminal}': \
                     accept kept, {} dropped",
                    describe(&self.productions, dropped)
                ));
            }
            (kept, Action::Accept) => {
                self.conflicts.push(format!(
                    "accept conflict in state {state} on '{terminal}': \
                     accept kept, {} dropped",
                    describe(&self.productions, kept)
                ));
                self.actions[state].insert(terminal, Action::Accept);
            }
            (Action::Shift(_), Action::Shift(_)) => {
                // a state has at most one transition per symbol
                debug_assert!(false, "conflicting shift targets");
            }
        }
    }

    /// The ACTION entry for `(state, terminal)`, if any.
    pub fn action(&self, state: usize, terminal: &str) -> Option<Action> {
        self.actions.get(state)?.get(terminal).copied()
    }

    /// The GOTO entry for `(state, nonterminal)`, if any.
    pub fn goto(&self, state: usize, nonterminal: &str) -> Option<usize> {
        self.gotos.get(state)?.get(nonterminal).copied()
    }

    /// The id of the initial state.
    pub fn initial_state_index(&self) -> usize {
        self.initial
    }

    /// The number of states the table covers.
    pub fn state_count(&self) -> usize {
        self.actions.len()
    }

    /// The augmented production list REDUCE indices refer to.
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// The conflicts recorded while filling, in the order they were found.
    pub fn conflicts(&self) -> &[String] {
        &self.conflicts
    }

    /// True if no conflict was recorded: the grammar is LALR(1) under this construction.
    pub fn is_conflict_free(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Renders the ACTION and GOTO tables as one aligned text table: a row per state, ACTION
    /// columns first (`s4`, `r2`, `acc`), then GOTO columns. Terminal columns are sorted with
    /// `$` last; non-terminal columns are sorted.
    pub fn to_table(&self) -> String {
        let mut terminals: Vec<&str> = self
            .actions
            .iter()
            .flat_map(|row| row.keys())
            .map(|name| &**name)
            .filter(|name| *name != END_MARKER)
            .collect();
        terminals.sort_unstable();
        terminals.dedup();
        terminals.push(END_MARKER);

        let mut nonterminals: Vec<&str> = self
            .gotos
            .iter()
            .flat_map(|row| row.keys())
            .map(|name| &**name)
            .collect();
        nonterminals.sort_unstable();
        nonterminals.dedup();

        let mut table = Table::default();
        let mut head = vec![String::new()];
        head.extend(terminals.iter().map(|name| name.to_string()));
        head.extend(nonterminals.iter().map(|name| name.to_string()));
        table.push_row(head);

        for state in 0..self.actions.len() {
            let mut row = vec![state.to_string()];
            for terminal in &terminals {
                row.push(match self.actions[state].get(*terminal) {
                    Some(Action::Shift(target)) => format!("s{target}"),
                    Some(Action::Reduce(production)) => format!("r{production}"),
                    Some(Action::Accept) => "acc".to_string(),
                    None => String::new(),
                });
            }
            for nonterminal in &nonterminals {
                row.push(match self.gotos[state].get(*nonterminal) {
                    Some(target) => target.to_string(),
                    None => String::new(),
                });
            }
            table.push_row(row);
        }
        table.render(" ")
    }
}

fn describe(productions: &[Production], action: Action) -> String {
    match action {
        Action::Shift(target) => format!("shift to state {target}"),
        Action::Reduce(production) => format!("reduce by '{}'", productions[production]),
        Action::Accept => "accept".to_string(),
    }
}
