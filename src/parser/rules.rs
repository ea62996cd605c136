use crate::parser::ParsedLexRule;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_till1};
use nom::character::complete::{self, line_ending, not_line_ending, space0, space1};
use nom::combinator::{eof, map, opt, recognize, value, verify};
use nom::multi::{many0, many1, separated_list1};
use nom::sequence::{pair, preceded, terminated, tuple};
use nom::IResult;

pub(crate) fn full_rules(input: &str) -> IResult<&str, Vec<ParsedLexRule>> {
    map(
        tuple((
            many0(blank_line),
            separated_list1(many1(blank_line), rule),
            many0(blank_line),
        )),
        |(_, rules, _)| rules,
    )(input)
}

fn rule(input: &str) -> IResult<&str, ParsedLexRule> {
    map(
        preceded(
            space0,
            tuple((
                opt(tag("~")),
                terminated(rule_name, space1),
                complete::u32,
                // exactly one space; everything after it up to the line end is the pattern,
                // spaces included, so whitespace rules stay expressible
                preceded(tag(" "), pattern),
            )),
        ),
        |(skip, name, priority, pattern)| ParsedLexRule {
            name,
            priority,
            pattern,
            skip: skip.is_some(),
        },
    )(input)
}

fn rule_name(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

fn pattern(input: &str) -> IResult<&str, &str> {
    verify(not_line_ending, |p: &str| !p.is_empty())(input)
}

/// A line carrying nothing but whitespace or a comment introduced by `#`.
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
