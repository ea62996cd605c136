//! LALR(1) merging: collapse LR(1) states that share a kernel.

use crate::lr::{ItemSet, LrAutomaton};
use crate::grammar::Symbol;
use std::collections::{BTreeMap, BTreeSet, HashMap};

impl LrAutomaton {
    /// Merges the states of this automaton by kernel: states whose item sets agree after
    /// dropping lookaheads become one state holding the union of their items. Transitions are
    /// rewritten through the class map; kernel-equivalent states necessarily transition to
    /// kernel-equivalent states, so the rewrite never conflicts. Classes are numbered in the
    /// order their kernel first appears among the original state ids, and the initial state maps
    /// to the class of the original initial state.
    ///
    /// Merging an already merged automaton changes nothing.
    pub fn merge_by_kernel(&self) -> LrAutomaton {
        let mut class_ids: HashMap<BTreeSet<(usize, usize)>, usize> = HashMap::new();
        let mut class_of: Vec<usize> = Vec::with_capacity(self.states.len());
        let mut merged: Vec<ItemSet> = Vec::new();

        for items in &self.states {
            let kernel: BTreeSet<(usize, usize)> = items
                .iter()
                .map(|item| (item.production, item.dot))
                .collect();
            let class = *class_ids.entry(kernel).or_insert_with(|| {
                merged.push(ItemSet::new());
                merged.len() - 1
            });
            merged[class].extend(items.iter().cloned());
            class_of.push(class);
        }

        let mut transitions: Vec<BTreeMap<Symbol, usize>> = vec![BTreeMap::new(); merged.len()];
        for (state, map) in self.transitions.iter().enumerate() {
            for (symbol, &target) in map {
                transitions[class_of[state]].insert(symbol.clone(), class_of[target]);
            }
        }

        LrAutomaton {
            productions: self.productions.clone(),
            states: merged,
            transitions,
            initial: class_of[self.initial],
            augmented_start: self.augmented_start.clone(),
        }
    }
}
