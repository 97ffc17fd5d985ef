//! Compact text form of a net description.
//!
//! ```text
//! places:      P0, P1, P2
//! marking:     1, 0, 0
//! transitions: t1:P0=1;P1=2->P2=1, t2:P2=1->P0=1
//! ```
//!
//! Each transition is `name ':' inputs '->' outputs`, where both arc lists
//! are `place=weight` pairs separated by `;` and may be empty. Only syntax is
//! checked here; names and weights are validated by
//! [`NetDescription::build`](crate::net::NetDescription::build).
use nom::{
    IResult, Parser,
    bytes::complete::{tag, take_while1},
    character::complete::{char, i64 as signed, multispace0},
    combinator::{all_consuming, map},
    multi::separated_list0,
    sequence::{delimited, separated_pair},
};
use thiserror::Error;

use crate::net::description::{Arcs, NetDescription, TransitionDescription};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse {field}: unexpected input at `{rest}`")]
pub struct ParseError {
    pub field: &'static str,
    pub rest: String,
}

fn ws<'a, O, P>(inner: P) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    P: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    ws(take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '.')).parse(input)
}

fn arc(input: &str) -> IResult<&str, (String, i64)> {
    map(separated_pair(identifier, char('='), ws(signed)), |(place, weight)| {
        (place.to_string(), weight)
    })
    .parse(input)
}

fn arcs(input: &str) -> IResult<&str, Arcs> {
    separated_list0(char(';'), arc).parse(input)
}

fn transition(input: &str) -> IResult<&str, TransitionDescription> {
    map(
        separated_pair(identifier, char(':'), separated_pair(arcs, tag("->"), arcs)),
        |(name, (consumes, produces))| TransitionDescription {
            name: name.to_string(),
            consumes,
            produces,
        },
    )
    .parse(input)
}

fn complete<'a, O>(
    field: &'static str,
    input: &'a str,
    parser: impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
) -> Result<O, ParseError> {
    all_consuming(parser)
        .parse(input)
        .map(|(_, value)| value)
        .map_err(|err| ParseError {
            field,
            rest: match err {
                nom::Err::Error(e) | nom::Err::Failure(e) => e.input.to_string(),
                nom::Err::Incomplete(_) => String::new(),
            },
        })
}

pub fn parse_places(input: &str) -> Result<Vec<String>, ParseError> {
    complete(
        "places",
        input,
        map(separated_list0(char(','), identifier), |names: Vec<&str>| {
            names.into_iter().map(str::to_string).collect()
        }),
    )
}

pub fn parse_marking(input: &str) -> Result<Vec<i64>, ParseError> {
    complete("marking", input, ws(separated_list0(char(','), ws(signed))))
}

pub fn parse_transitions(input: &str) -> Result<Vec<TransitionDescription>, ParseError> {
    complete("transitions", input, ws(separated_list0(char(','), transition)))
}

/// Parses the three text fields into an unvalidated [`NetDescription`].
pub fn parse_description(
    places: &str,
    marking: &str,
    transitions: &str,
) -> Result<NetDescription, ParseError> {
    Ok(NetDescription {
        places: parse_places(places)?,
        initial_marking: parse_marking(marking)?,
        transitions: parse_transitions(transitions)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_description() {
        let description =
            parse_description("P0, P1, P2", "1, 0,0", "t1:P0=1;P1=2->P2=1, t2 : P2=1 -> P0=1")
                .unwrap();
        assert_eq!(description.places, vec!["P0", "P1", "P2"]);
        assert_eq!(description.initial_marking, vec![1, 0, 0]);
        assert_eq!(
            description.transitions,
            vec![
                TransitionDescription::new("t1")
                    .consumes("P0", 1)
                    .consumes("P1", 2)
                    .produces("P2", 1),
                TransitionDescription::new("t2").consumes("P2", 1).produces("P0", 1),
            ]
        );
    }

    #[test]
    fn arc_lists_may_be_empty() {
        let transitions = parse_transitions("source:->P0=1, sink:P0=1->").unwrap();
        assert!(transitions[0].consumes.is_empty());
        assert!(transitions[1].produces.is_empty());
    }

    #[test]
    fn negative_weights_parse_and_are_left_to_validation() {
        let transitions = parse_transitions("t:P0=-2->").unwrap();
        assert_eq!(transitions[0].consumes, vec![("P0".to_string(), -2)]);
        let description = NetDescription::new()
            .place("P0", 0)
            .transition(transitions[0].clone());
        assert!(description.build().is_err());
    }

    #[test]
    fn repeated_place_in_arc_list_fails_validation() {
        let description = parse_description("P0", "1", "t1:P0=1;P0=5->P0=1").unwrap();
        assert_eq!(
            description.transitions[0].consumes,
            vec![("P0".to_string(), 1), ("P0".to_string(), 5)]
        );
        let err = description.build().unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert!(err.to_string().contains("consumes `P0` more than once"));
    }

    #[test]
    fn malformed_input_reports_field() {
        let err = parse_marking("1, two").unwrap_err();
        assert_eq!(err.field, "marking");
        assert!(err.rest.contains("two"));
        assert!(parse_transitions("t1 P0=1->P1=1").is_err());
    }
}
