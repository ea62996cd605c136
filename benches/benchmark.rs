use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lazy_static::lazy_static;
use lexlr::grammar::Grammar;
use lexlr::lexer::{LexRule, Lexer};
use lexlr::lr::{LrAutomaton, ParseTable};
use lexlr::regex::Regex;
use proptest::strategy::{Strategy, ValueTree};
use proptest::test_runner::TestRunner;
use regex::Regex as LibRegex;

const PATTERN: &str = "(a|b)*(abb|ba)+(a|b)?";

const EXPRESSION_GRAMMAR: &str = "
    Nonterminals: E T F
    Terminals: + * ( ) id
    Start: E

    E -> E + T | T
    T -> T * F | F
    F -> ( E ) | id
";

lazy_static! {
    static ref LEX_RULES: Vec<LexRule> = {
        let letters: Vec<String> = ('a'..='z').map(|c| c.to_string()).collect();
        let letter = format!("({})", letters.join("|"));
        vec![
            LexRule::new("if", "if", 10),
            LexRule::new("then", "then", 10),
            LexRule::new("else", "else", 10),
            LexRule::new("id", &format!("{letter}{letter}*"), 5),
        ]
    };
}

pub fn regex_compile(c: &mut Criterion) {
    c.bench_function("lexlr regex compile", |b| {
        b.iter(|| {
            let regex = Regex::new(black_box(PATTERN)).unwrap();
            regex.to_nfa().unwrap().to_dfa().minimized()
        })
    });

    c.bench_function("library regex compile", |b| {
        b.iter(|| LibRegex::new(black_box(PATTERN)).unwrap())
    });
}

pub fn regex_check(c: &mut Criterion) {
    let mut runner = TestRunner::default();
    let string_gen = "[ab]+".new_tree(&mut runner).unwrap();
    let dfa = Regex::new(PATTERN)
        .unwrap()
        .to_nfa()
        .unwrap()
        .to_dfa()
        .minimized();

    c.bench_function("lexlr regex check", |b| {
        b.iter(|| dfa.accepts(black_box(&string_gen.current())))
    });

    let lib = LibRegex::new(&format!("^({PATTERN})$")).unwrap();
    c.bench_function("library regex check", |b| {
        b.iter(|| lib.is_match(black_box(&string_gen.current())))
    });
}

pub fn lexer_build_and_scan(c: &mut Criterion) {
    c.bench_function("lexer build", |b| b.iter(|| Lexer::build(&LEX_RULES).unwrap()));

    let lexer = Lexer::build(&LEX_RULES).unwrap();
    let input = "if foo then if bar then baz else quux".repeat(64);
    c.bench_function("lexer scan", |b| b.iter(|| lexer.tokens(black_box(&input))));
}

pub fn table_construction(c: &mut Criterion) {
    let grammar: Grammar = lexlr::parser::grammar(EXPRESSION_GRAMMAR)
        .unwrap()
        .try_into()
        .unwrap();

    c.bench_function("lr1 collection", |b| {
        b.iter(|| LrAutomaton::construct(black_box(&grammar)))
    });

    let lr1 = LrAutomaton::construct(&grammar);
    c.bench_function("lalr merge and fill", |b| {
        b.iter(|| ParseTable::fill(&lr1.merge_by_kernel()).unwrap())
    });

    let table = ParseTable::fill(&lr1.merge_by_kernel()).unwrap();
    let input: Vec<&str> = "id + id * ( id + id ) * id"
        .split_whitespace()
        .collect();
    c.bench_function("shift-reduce drive", |b| {
        b.iter(|| table.accepts(black_box(&input)))
    });
}

criterion_group!(
    benches,
    regex_compile,
    regex_check,
    lexer_build_and_scan,
    table_construction
);
criterion_main!(benches);
