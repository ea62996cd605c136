use crate::parser::{ParsedGrammar, ParsedProduction};
use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case, take_till1};
use nom::character::complete::{line_ending, not_line_ending, space0, space1};
use nom::combinator::{eof, map, opt, recognize, value, verify};
use nom::multi::{many0, many1, separated_list0, separated_list1};
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use nom::IResult;

pub(crate) fn full_grammar(input: &str) -> IResult<&str, ParsedGrammar> {
    map(
        delimited(
            many0(blank_line),
            tuple((
                terminated(header_list("Nonterminals:"), many1(blank_line)),
                terminated(header_list("Terminals:"), many1(blank_line)),
                terminated(header_name("Start:"), many1(blank_line)),
                separated_list1(many1(blank_line), production),
            )),
            many0(blank_line),
        ),
        |(nonterminals, terminals, start, productions)| ParsedGrammar {
            nonterminals,
            terminals,
            start,
            productions,
        },
    )(input)
}

fn header_list(prompt: &'static str) -> impl Fn(&str) -> IResult<&str, Vec<&str>> {
    move |input: &str| {
        preceded(
            delimited(space0, tag_no_case(prompt), space1),
            separated_list0(space1, symbol_name),
        )(input)
    }
}

fn header_name(prompt: &'static str) -> impl Fn(&str) -> IResult<&str, &str> {
    move |input: &str| {
        preceded(
            delimited(space0, tag_no_case(prompt), space1),
            symbol_name,
        )(input)
    }
}

fn production(input: &str) -> IResult<&str, ParsedProduction> {
    map(
        preceded(
            space0,
            pair(
                terminated(symbol_name, delimited(space1, arrow, space0)),
                separated_list1(
                    delimited(space0, tag("|"), space0),
                    separated_list0(space1, symbol_name),
                ),
            ),
        ),
        |(name, alternatives)| ParsedProduction { name, alternatives },
    )(input)
}

fn symbol_name(input: &str) -> IResult<&str, &str> {
    verify(
        take_till1(|c: char| c.is_whitespace() || c == '#'),
        |name| !["|", "->", "→"].contains(&name),
    )(input)
}

fn arrow(input: &str) -> IResult<&str, ()> {
    value((), alt((tag("->"), tag("→"))))(input)
}

/// A line carrying nothing but whitespace and an optional comment. Something non-empty must be
/// consumed, otherwise repetition combinators would spin at end of input.
fn blank_line(input: &str) -> IResult<&str, ()> {
    value(
        (),
        verify(
            recognize(terminated(
                pair(space0, opt(pair(tag("#"), not_line_ending))),
                alt((line_ending, eof)),
            )),
            |consumed: &str| !consumed.is_empty(),
        ),
    )(input)
}
