//! The shift-reduce driver: a stack machine consuming a [`ParseTable`].

use crate::grammar::END_MARKER;
use crate::lexer::Token;
use crate::lr::{Action, ParseTable};
use thiserror::Error;

/// A parse rejection: the table has no entry for the live configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("No action for '{terminal}' in state {state}")]
    NoAction { state: usize, terminal: String },
    #[error("No goto for '{nonterminal}' in state {state}")]
    NoGoto { state: usize, nonterminal: String },
}

impl ParseTable {
    /// Runs the shift-reduce parser over a sequence of terminal names. An end marker `$` is
    /// appended if the input does not already carry one. Returns `Ok(())` on ACCEPT and a
    /// [`SyntaxError`] naming the offending configuration otherwise; no tree is built.
    pub fn parse(&self, terminals: &[&str]) -> Result<(), SyntaxError> {
        let mut input: Vec<&str> = terminals.to_vec();
        if input.last() != Some(&END_MARKER) {
            input.push(END_MARKER);
        }

        let mut stack: Vec<usize> = vec![self.initial];
        let mut pos = 0;
        loop {
            let state = *stack.last().expect("parse stack holds at least the initial state");
            let terminal = input[pos];
            match self.action(state, terminal) {
                None => {
                    return Err(SyntaxError::NoAction {
                        state,
                        terminal: terminal.to_string(),
                    })
                }
                Some(Action::Shift(target)) => {
                    stack.push(target);
                    pos += 1;
                }
                Some(Action::Reduce(index)) => {
                    let production = &self.productions[index];
                    // an ε-production pops nothing
                    stack.truncate(stack.len() - production.body().len());
                    let top = *stack.last().expect("reduce keeps the initial state on the stack");
                    match self.goto(top, production.left().name()) {
                        Some(target) => stack.push(target),
                        None => {
                            return Err(SyntaxError::NoGoto {
                                state: top,
                                nonterminal: production.left().name().to_string(),
                            })
                        }
                    }
                }
                Some(Action::Accept) => return Ok(()),
            }
        }
    }

    /// Checks a sequence of terminal names for membership in the grammar's language.
    pub fn accepts(&self, terminals: &[&str]) -> bool {
        self.parse(terminals).is_ok()
    }

    /// Runs the parser over a scanner token stream, using each token's type name as the
    /// terminal. The scanner's trailing end-of-input token doubles as the driver's `$`.
    pub fn parse_tokens(&self, tokens: &[Token]) -> Result<(), SyntaxError> {
        let kinds: Vec<&str> = tokens.iter().map(|token| token.kind()).collect();
        self.parse(&kinds)
    }
}
