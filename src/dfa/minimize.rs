//! DFA minimization by table filling: mark distinguishable pairs, propagate to a fixed point,
//! collapse the rest with union-find.

use crate::dfa::{Dfa, DfaState};
use std::collections::HashMap;

/// Union-find over state ids with path compression. Unions are naive (the second root is simply
/// attached under the first), which keeps the class representative equal to the smallest member
/// when pairs are united in ascending order.
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut walk = x;
        while self.parent[walk] != root {
            let next = self.parent[walk];
            self.parent[walk] = root;
            walk = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            self.parent[root_b] = root_a;
        }
    }
}

impl Dfa {
    /// Minimizes this automaton, returning an equivalent DFA in which no two states are
    /// indistinguishable. For lexer automata, states with different token labels are kept apart
    /// even when they agree on acceptance, so minimization never conflates token kinds.
    ///
    /// States of the result are numbered in the order their equivalence classes first appear in
    /// this automaton's id order, making the output deterministic.
    pub fn minimized(&self) -> Dfa {
        let n = self.states.len();
        if n <= 1 {
            return self.clone();
        }

        // Upper-triangular "distinguishable" table over unordered pairs (a < b).
        let pair = |a: usize, b: usize| a * n + b;
        let mut marked = vec![false; n * n];

        for a in 0..n {
            for b in (a + 1)..n {
                let sa = &self.states[a];
                let sb = &self.states[b];
                let token_a = sa.label.as_ref().map(|l| &l.token);
                let token_b = sb.label.as_ref().map(|l| &l.token);
                if sa.accepting != sb.accepting || token_a != token_b {
                    marked[pair(a, b)] = true;
                }
            }
        }

        let mut changed = true;
        while changed {
            changed = false;
            for a in 0..n {
                for b in (a + 1)..n {
                    if marked[pair(a, b)] {
                        continue;
                    }
                    for symbol_idx in 0..self.alphabet.len() {
                        let distinguishable = match (
                            self.states[a].transitions[symbol_idx],
                            self.states[b].transitions[symbol_idx],
                        ) {
                            (Some(_), None) | (None, Some(_)) => true,
                            (Some(ta), Some(tb)) if ta != tb => {
                                let (lo, hi) = if ta < tb { (ta, tb) } else { (tb, ta) };
                                marked[pair(lo, hi)]
                            }
                            _ => false,
                        };
                        if distinguishable {
                            marked[pair(a, b)] = true;
                            changed = true;
                            break;
                        }
                    }
                }
            }
        }

        let mut classes = UnionFind::new(n);
        for a in 0..n {
            for b in (a + 1)..n {
                if !marked[pair(a, b)] {
                    classes.union(a, b);
                }
            }
        }

        // Number the classes in order of their first member, and pick that member as the
        // representative whose transitions survive.
        let mut class_ids: HashMap<usize, usize> = HashMap::new();
        let mut representatives: Vec<usize> = Vec::new();
        for state in 0..n {
            let root = classes.find(state);
            class_ids.entry(root).or_insert_with(|| {
                representatives.push(state);
                representatives.len() - 1
            });
        }

        let mut states = Vec::with_capacity(representatives.len());
        for (new_id, &rep) in representatives.iter().enumerate() {
            let old = &self.states[rep];
            let mut transitions = Vec::with_capacity(old.transitions.len());
            for target in &old.transitions {
                transitions.push(target.map(|t| {
                    let root = classes.find(t);
                    class_ids[&root]
                }));
            }
            states.push(DfaState {
                id: new_id,
                nfa_states: old.nfa_states.clone(),
                transitions,
                accepting: old.accepting,
                label: old.label.clone(),
            });
        }

        let initial_root = classes.find(self.initial);
        Dfa {
            alphabet: self.alphabet.clone(),
            states,
            initial: class_ids[&initial_root],
        }
    }
}
