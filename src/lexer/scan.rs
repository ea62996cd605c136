//! Longest-match scanning over a token DFA.
//!
//! The scanner walks the DFA from the current position, remembering the last accepting state and
//! the position just past it. When the walk dies (no transition, or end of input), the
//! remembered match becomes the next token and scanning resumes right after it; a longer
//! non-accepting excursion is rolled back. A position where the DFA accepts nothing yields an
//! [`UNKNOWN`] token for the offending character, except that unmatched whitespace is consumed
//! silently. Rules built with [`LexRule::skipped`](crate::lexer::LexRule::skipped) match as
//! usual but their tokens are suppressed. The final item is always a single [`END_OF_INPUT`]
//! token at the end position.

use crate::dfa::Dfa;
use crate::lexer::{Token, END_OF_INPUT, UNKNOWN};
use std::rc::Rc;

/// An iterator of [`Token`]s over an input string, driven by a minimized token DFA.
#[derive(Clone, Debug)]
pub struct Scanner<'a> {
    dfa: &'a Dfa,
    input: &'a str,
    pos: usize,
    finished: bool,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(dfa: &'a Dfa, input: &'a str) -> Self {
        Self {
            dfa,
            input,
            pos: 0,
            finished: false,
        }
    }

    /// Walks the DFA from `self.pos` and returns the last accepting configuration as
    /// `(state id, byte position past the match)`, or `None` if no non-empty prefix is accepted.
    fn longest_match(&self) -> Option<(usize, usize)> {
        let mut state = self.dfa.initial_state_index();
        let mut last_accept = None;
        for (offset, c) in self.input[self.pos..].char_indices() {
            match self.dfa.transition(state, c) {
                Some(next) => {
                    state = next;
                    if self.dfa.states()[state].is_accepting() {
                        last_accept = Some((state, self.pos + offset + c.len_utf8()));
                    }
                }
                None => break,
            }
        }
        last_accept
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        loop {
            if self.pos >= self.input.len() {
                self.finished = true;
                return Some(Token {
                    kind: Rc::from(END_OF_INPUT),
                    lexeme: String::new(),
                    start: self.pos,
                    end: self.pos,
                });
            }

            match self.longest_match() {
                Some((state, end)) => {
                    let start = self.pos;
                    self.pos = end;
                    match self.dfa.states()[state].label() {
                        Some(label) if !label.is_skipped() => {
                            return Some(Token {
                                kind: label.token.clone(),
                                lexeme: self.input[start..end].to_string(),
                                start,
                                end,
                            });
                        }
                        // skipped rule, or an unlabelled accepting state of a plain DFA
                        _ => continue,
                    }
                }
                None => {
                    let c = self.input[self.pos..].chars().next()?;
                    let start = self.pos;
                    self.pos += c.len_utf8();
                    if c.is_whitespace() {
                        continue;
                    }
                    return Some(Token {
                        kind: Rc::from(UNKNOWN),
                        lexeme: c.to_string(),
                        start,
                        end: self.pos,
                    });
                }
            }
        }
    }
}
