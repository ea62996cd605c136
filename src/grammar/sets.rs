//! FIRST and FOLLOW analysis, computed by fixed-point iteration over the productions in their
//! declared order. Both computations loop with a changed-flag over full passes; the result is
//! the least fixed point either way, so the simple loop is used.

use crate::grammar::{Grammar, Symbol, END_MARKER, EPSILON};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

/// FIRST sets of a grammar's non-terminals: the terminals that can begin a derivation, plus ε
/// for nullable non-terminals. Terminal symbols are their own FIRST set and are not stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirstSets {
    sets: BTreeMap<Rc<str>, BTreeSet<Rc<str>>>,
}

impl FirstSets {
    /// Computes the FIRST sets of every non-terminal in `grammar`.
    pub fn of(grammar: &Grammar) -> Self {
        let mut sets: BTreeMap<Rc<str>, BTreeSet<Rc<str>>> = grammar
            .nonterminals
            .iter()
            .map(|n| (n.name.clone(), BTreeSet::new()))
            .collect();

        let mut changed = true;
        while changed {
            changed = false;
            for production in &grammar.productions {
                let mut addition: BTreeSet<Rc<str>> = BTreeSet::new();
                let mut all_nullable = true;
                for symbol in &production.right {
                    let first = Self::first_of_with(&sets, symbol);
                    let nullable = first.contains(EPSILON);
                    addition.extend(first.into_iter().filter(|name| &**name != EPSILON));
                    if !nullable {
                        all_nullable = false;
                        break;
                    }
                }
                if all_nullable {
                    addition.insert(Rc::from(EPSILON));
                }

                if let Some(set) = sets.get_mut(&production.left.name) {
                    for name in addition {
                        changed |= set.insert(name);
                    }
                }
            }
        }
        FirstSets { sets }
    }

    fn first_of_with(
        sets: &BTreeMap<Rc<str>, BTreeSet<Rc<str>>>,
        symbol: &Symbol,
    ) -> BTreeSet<Rc<str>> {
        if symbol.is_terminal() {
            // FIRST of a terminal is the terminal itself; this covers ε as well
            BTreeSet::from([symbol.name.clone()])
        } else {
            sets.get(&symbol.name).cloned().unwrap_or_default()
        }
    }

    /// FIRST of a single symbol.
    pub fn first(&self, symbol: &Symbol) -> BTreeSet<Rc<str>> {
        Self::first_of_with(&self.sets, symbol)
    }

    /// FIRST of a sequence of symbols. The empty sequence yields `{ε}`; otherwise terminals of
    /// FIRST of each prefix symbol are accumulated while the prefix stays nullable, and ε is
    /// included only if the whole sequence is nullable.
    pub fn first_of_sequence(&self, sequence: &[Symbol]) -> BTreeSet<Rc<str>> {
        let mut result = BTreeSet::new();
        for symbol in sequence {
            let first = self.first(symbol);
            let nullable = first.contains(EPSILON);
            result.extend(first.into_iter().filter(|name| &**name != EPSILON));
            if !nullable {
                return result;
            }
        }
        result.insert(Rc::from(EPSILON));
        result
    }

    /// True if ε ∈ FIRST(symbol).
    pub fn nullable(&self, symbol: &Symbol) -> bool {
        self.first(symbol).contains(EPSILON)
    }
}

/// FOLLOW sets of a grammar's non-terminals: the terminals that can appear immediately after
/// them in some sentential form, including `$` for symbols that can end the input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FollowSets {
    sets: BTreeMap<Rc<str>, BTreeSet<Rc<str>>>,
}

impl FollowSets {
    /// Computes the FOLLOW sets of every non-terminal in `grammar`, given its FIRST sets.
    pub fn of(grammar: &Grammar, first: &FirstSets) -> Self {
        let mut sets: BTreeMap<Rc<str>, BTreeSet<Rc<str>>> = grammar
            .nonterminals
            .iter()
            .map(|n| (n.name.clone(), BTreeSet::new()))
            .collect();
        if let Some(start) = sets.get_mut(&grammar.start.name) {
            start.insert(Rc::from(END_MARKER));
        }

        let mut changed = true;
        while changed {
            changed = false;
            for production in &grammar.productions {
                let body = production.body();
                for (idx, symbol) in body.iter().enumerate() {
                    if !symbol.is_nonterminal() {
                        continue;
                    }
                    let tail = first.first_of_sequence(&body[idx + 1..]);
                    let tail_nullable = tail.contains(EPSILON);

                    let mut addition: BTreeSet<Rc<str>> = tail
                        .into_iter()
                        .filter(|name| &**name != EPSILON)
                        .collect();
                    if tail_nullable {
                        if let Some(of_left) = sets.get(&production.left.name) {
                            addition.extend(of_left.iter().cloned());
                        }
                    }

                    if let Some(set) = sets.get_mut(&symbol.name) {
                        for name in addition {
                            changed |= set.insert(name);
                        }
                    }
                }
            }
        }
        FollowSets { sets }
    }

    /// FOLLOW of a non-terminal; empty for names the grammar does not know.
    pub fn follow(&self, name: &str) -> BTreeSet<Rc<str>> {
        self.sets.get(name).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{Grammar, Production, Symbol};

    /// The expression grammar: E → E + T | T; T → T * F | F; F → ( E ) | id
    fn expression_grammar() -> Grammar {
        let e = Symbol::nonterminal("E");
        let t = Symbol::nonterminal("T");
        let f = Symbol::nonterminal("F");
        let plus = Symbol::terminal("+");
        let star = Symbol::terminal("*");
        let lpar = Symbol::terminal("(");
        let rpar = Symbol::terminal(")");
        let id = Symbol::terminal("id");
        Grammar::new(
            e.clone(),
            vec![
                Production::new(e.clone(), vec![e.clone(), plus, t.clone()]),
                Production::new(e.clone(), vec![t.clone()]),
                Production::new(t.clone(), vec![t.clone(), star, f.clone()]),
                Production::new(t.clone(), vec![f.clone()]),
                Production::new(f.clone(), vec![lpar, e.clone(), rpar]),
                Production::new(f, vec![id]),
            ],
        )
        .unwrap()
    }

    fn names(set: &std::collections::BTreeSet<std::rc::Rc<str>>) -> Vec<&str> {
        set.iter().map(|name| &**name).collect()
    }

    #[test]
    fn first_sets_of_expression_grammar() {
        let grammar = expression_grammar();
        let first = FirstSets::of(&grammar);
        for nonterminal in ["E", "T", "F"] {
            let set = first.first(&Symbol::nonterminal(nonterminal));
            assert_eq!(names(&set), ["(", "id"], "FIRST({nonterminal})");
        }
    }

    #[test]
    fn follow_sets_of_expression_grammar() {
        let grammar = expression_grammar();
        let first = FirstSets::of(&grammar);
        let follow = FollowSets::of(&grammar, &first);
        assert_eq!(names(&follow.follow("E")), ["$", ")", "+"]);
        assert_eq!(names(&follow.follow("T")), ["$", ")", "*", "+"]);
        assert_eq!(names(&follow.follow("F")), ["$", ")", "*", "+"]);
    }

    #[test]
    fn nullable_nonterminal_adds_epsilon_to_first() {
        // S → A a; A → ε | b
        let s = Symbol::nonterminal("S");
        let a = Symbol::nonterminal("A");
        let grammar = Grammar::new(
            s.clone(),
            vec![
                Production::new(s.clone(), vec![a.clone(), Symbol::terminal("a")]),
                Production::new(a.clone(), vec![Symbol::epsilon()]),
                Production::new(a.clone(), vec![Symbol::terminal("b")]),
            ],
        )
        .unwrap();
        let first = FirstSets::of(&grammar);
        assert!(first.nullable(&a));
        assert_eq!(names(&first.first(&s)), ["a", "b"]);
        // FIRST over a sequence: empty sequence is {ε}
        assert_eq!(names(&first.first_of_sequence(&[])), [EPSILON]);
    }

    #[test]
    fn follow_through_nullable_tail() {
        // S → A B; B → ε | b  ⇒  FOLLOW(A) includes FOLLOW(S) = {$} and FIRST(B) \ {ε} = {b}
        let s = Symbol::nonterminal("S");
        let a = Symbol::nonterminal("A");
        let b = Symbol::nonterminal("B");
        let grammar = Grammar::new(
            s.clone(),
            vec![
                Production::new(s.clone(), vec![a.clone(), b.clone()]),
                Production::new(a.clone(), vec![Symbol::terminal("x")]),
                Production::new(b.clone(), vec![Symbol::epsilon()]),
                Production::new(b.clone(), vec![Symbol::terminal("b")]),
            ],
        )
        .unwrap();
        let first = FirstSets::of(&grammar);
        let follow = FollowSets::of(&grammar, &first);
        assert_eq!(names(&follow.follow("A")), ["$", "b"]);
    }
}
