use crate::grammar::Grammar;
use crate::lexer::{LexRule, Lexer};
use crate::lr::{Action, LrAutomaton, ParseTable};
use crate::parser;
use crate::regex::Regex;
use ::regex::Regex as LibRegex;
use proptest::prelude::*;

const EXPRESSION_GRAMMAR: &str = "
    Nonterminals: E T F
    Terminals: + * ( ) id
    Start: E

    E -> E + T | T
    T -> T * F | F
    F -> ( E ) | id
";

const DANGLING_ELSE_GRAMMAR: &str = "
    Nonterminals: S E
    Terminals: if then else a
    Start: S

    S -> if E then S | if E then S else S | a
    E -> a
";

fn expression_table() -> ParseTable {
    let grammar: Grammar = parser::grammar(EXPRESSION_GRAMMAR)
        .unwrap()
        .try_into()
        .unwrap();
    ParseTable::fill(&LrAutomaton::construct(&grammar).merge_by_kernel()).unwrap()
}

#[test]
fn expression_grammar_drives_the_parser() {
    let table = &expression_table();
    assert!(table.is_conflict_free(), "{:?}", table.conflicts());
    assert!(table.accepts(&["id", "+", "id", "*", "id"]));
    assert!(table.accepts(&["(", "id", "+", "id", ")", "*", "id"]));
    assert!(table.accepts(&["id"]));
    assert!(!table.accepts(&["id", "+"]));
    assert!(!table.accepts(&["+", "id"]));
    assert!(!table.accepts(&[]));
}

#[test]
fn expression_table_matches_the_classic_construction() {
    // the LALR(1) table of the dragon-book expression grammar has the familiar 12 states
    let table = &expression_table();
    assert_eq!(table.state_count(), 12);
    // a state reducing E → E + T still shifts '*', otherwise id+id*id would parse wrongly
    for state in 0..table.state_count() {
        if matches!(table.action(state, "+"), Some(Action::Reduce(1))) {
            assert!(matches!(table.action(state, "*"), Some(Action::Shift(_))));
        }
    }
}

#[test]
fn table_construction_is_reproducible() {
    let build = || {
        let grammar: Grammar = parser::grammar(EXPRESSION_GRAMMAR)
            .unwrap()
            .try_into()
            .unwrap();
        ParseTable::fill(&LrAutomaton::construct(&grammar).merge_by_kernel()).unwrap()
    };
    let first = build();
    let second = build();
    assert_eq!(first, second);
    assert_eq!(first.to_table(), second.to_table());
}

#[test]
fn dangling_else_resolves_to_shift_and_is_reported() {
    let grammar: Grammar = parser::grammar(DANGLING_ELSE_GRAMMAR)
        .unwrap()
        .try_into()
        .unwrap();
    let table = ParseTable::fill(&LrAutomaton::construct(&grammar).merge_by_kernel()).unwrap();

    assert!(!table.is_conflict_free());
    assert!(table
        .conflicts()
        .iter()
        .any(|c| c.contains("shift/reduce") && c.contains("'else'")));

    // the conflict does not halt construction, and shift-preference binds the else inward
    assert!(table.accepts(&["a"]));
    assert!(table.accepts(&["if", "a", "then", "a"]));
    assert!(table.accepts(&["if", "a", "then", "a", "else", "a"]));
    assert!(table.accepts(&["if", "a", "then", "if", "a", "then", "a", "else", "a"]));
    assert!(!table.accepts(&["if", "a", "then"]));
    assert!(!table.accepts(&["else", "a"]));
}

#[test]
fn scanner_and_driver_compose() {
    // keywords and identifiers feed the parser by token type name
    let letters = ('a'..='z').map(|c| c.to_string()).collect::<Vec<_>>();
    let letter = format!("({})", letters.join("|"));
    let lexer = Lexer::build(&[
        LexRule::new("if", "if", 10),
        LexRule::new("then", "then", 10),
        LexRule::new("id", &format!("{letter}{letter}*"), 5),
    ])
    .unwrap();

    let grammar: Grammar = parser::grammar(
        "
        Nonterminals: S
        Terminals: if then id
        Start: S
        S -> if id then S | id
        ",
    )
    .unwrap()
    .try_into()
    .unwrap();
    let table = ParseTable::fill(&LrAutomaton::construct(&grammar).merge_by_kernel()).unwrap();
    assert!(table.is_conflict_free(), "{:?}", table.conflicts());

    assert!(table.parse_tokens(&lexer.tokens("if x then if y then z")).is_ok());
    assert!(table.parse_tokens(&lexer.tokens("zebra")).is_ok());
    assert!(table.parse_tokens(&lexer.tokens("if x then")).is_err());
    assert!(table.parse_tokens(&lexer.tokens("then x")).is_err());
}

#[test]
fn lexer_rule_file_round_trip() {
    let parsed = parser::lex_rules(
        "
        EQ 6 ==
        ASSIGN 6 =
        SEMI 4 ;
        ",
    )
    .unwrap();
    let rules: Vec<LexRule> = parsed.iter().map(LexRule::from).collect();
    let lexer = Lexer::build(&rules).unwrap();
    let kinds: Vec<String> = lexer
        .tokens("== = ;")
        .iter()
        .map(|t| t.kind().to_string())
        .collect();
    assert_eq!(kinds, ["EQ", "ASSIGN", "SEMI", "$"]);
}

fn random_pattern() -> impl Strategy<Value = String> {
    "[a-z]".prop_recursive(8, 64, 10, |inner| {
        prop_oneof![
            4 => prop::collection::vec(inner.clone(), 1..6)
                .prop_map(|vec| format!("({})", vec.join(""))),
            4 => prop::collection::vec(inner.clone(), 1..6).prop_map(|vec| vec.join("|")),
            1 => inner.clone().prop_map(|r| format!("({r})*")),
            1 => inner.clone().prop_map(|r| format!("({r})+")),
            1 => inner.clone().prop_map(|r| format!("({r})?")),
        ]
    })
}

proptest! {
    /// The NFA simulation, the subset-constructed DFA and the minimized DFA must all agree with
    /// the `regex` crate on which strings a pattern matches.
    #[test]
    fn compiled_automata_agree_with_the_regex_crate(
        pattern in random_pattern(),
        tests in prop::collection::vec("[a-z]{0,8}", 20)
    ) {
        let regex = Regex::new(&pattern).unwrap();
        let nfa = regex.to_nfa().unwrap();
        let dfa = nfa.to_dfa();
        let minimal = dfa.minimized();
        let lib = LibRegex::new(&format!("^({pattern})$")).unwrap();

        for test in &tests {
            let expected = lib.is_match(test);
            prop_assert_eq!(nfa.accepts(test), expected, "NFA on {:?} vs {:?}", test, pattern);
            prop_assert_eq!(dfa.accepts(test), expected, "DFA on {:?} vs {:?}", test, pattern);
            prop_assert_eq!(minimal.accepts(test), expected, "minimized on {:?} vs {:?}", test, pattern);
        }
    }

    /// Minimizing an already minimal automaton changes nothing.
    #[test]
    fn minimization_is_idempotent_for_random_patterns(pattern in random_pattern()) {
        let minimal = Regex::new(&pattern).unwrap().to_nfa().unwrap().to_dfa().minimized();
        prop_assert_eq!(minimal.clone(), minimal.minimized());
    }

    /// Merging by kernel never grows the automaton and is itself idempotent.
    #[test]
    fn lalr_merge_contracts(seed in 1usize..5) {
        // a small family of grammars over a shared shape: S → (a S)ⁿ b
        let s = crate::grammar::Symbol::nonterminal("S");
        let a = crate::grammar::Symbol::terminal("a");
        let b = crate::grammar::Symbol::terminal("b");
        let mut productions = vec![];
        for n in 0..seed {
            let mut right = vec![];
            for _ in 0..=n {
                right.push(a.clone());
                right.push(s.clone());
            }
            right.push(b.clone());
            productions.push(crate::grammar::Production::new(s.clone(), right));
        }
        productions.push(crate::grammar::Production::new(s.clone(), vec![b.clone()]));
        let grammar = Grammar::new(s, productions).unwrap();

        let lr1 = LrAutomaton::construct(&grammar);
        let lalr = lr1.merge_by_kernel();
        prop_assert!(lalr.states().len() <= lr1.states().len());
        prop_assert_eq!(lalr.merge_by_kernel(), lalr);
    }
}
