//! # Prompt Parser
//!
//! nom combinators for the prompt tag syntax:
//!
//! - segments separated by runs of `,`, `|` or newlines
//! - wildcard references such as `__style__`
//! - weight suffixes such as `tag:1.5`
//! - variation groups such as `red {cat|dog}`
//!
//! A `{...}` span is opaque to the separator scan, so the `|` inside a variation
//! group never splits a segment. A span never crosses a newline: a `{` without a
//! later `}` on the same line is plain text.

use nom::branch::alt;
use nom::bytes::complete::{is_a, is_not, tag, take_till, take_until};
use nom::character::complete::{char, digit0, digit1};
use nom::combinator::{all_consuming, map, opt, recognize};
use nom::multi::{many0, many1};
use nom::sequence::{delimited, pair, preceded};
use nom::IResult;
use nom::Parser;

const SEPARATORS: &str = ",\n|";

/// A `{...}` span inside a segment, with the text around it.
#[derive(Debug, Clone, PartialEq)]
pub struct VariationGroup<'a> {
    pub prefix: &'a str,
    pub body: &'a str,
    pub suffix: &'a str,
}

impl<'a> VariationGroup<'a> {
    /// Trimmed, non-empty alternatives of the group body.
    pub fn alternatives(&self) -> impl Iterator<Item = &'a str> {
        let body = self.body;
        body.split('|').map(str::trim).filter(|alt| !alt.is_empty())
    }

    /// Rebuilds the segment with `alternative` in place of the braces.
    pub fn substitute(&self, alternative: &str) -> String {
        format!("{}{}{}", self.prefix, alternative, self.suffix)
    }
}

/// Splits a raw prompt into untrimmed segments. Runs of separators collapse,
/// so no empty segment is produced between them.
pub fn parse_segments(input: &str) -> IResult<&str, Vec<&str>> {
    map(
        all_consuming(many0(alt((
            map(parse_segment, Some),
            map(parse_separators, |_| None),
        )))),
        |parts| parts.into_iter().flatten().collect(),
    )
    .parse(input)
}

pub fn parse_segment(input: &str) -> IResult<&str, &str> {
    recognize(many1(alt((
        parse_brace_span,
        is_not("{,\n|"),
        tag("{"),
    ))))
    .parse(input)
}

pub fn parse_separators(input: &str) -> IResult<&str, &str> {
    is_a(SEPARATORS).parse(input)
}

pub fn parse_brace_span(input: &str) -> IResult<&str, &str> {
    recognize(parse_brace_body).parse(input)
}

fn parse_brace_body(input: &str) -> IResult<&str, &str> {
    delimited(tag("{"), take_till(|c: char| c == '}' || c == '\n'), tag("}")).parse(input)
}

/// Matches a whole weight suffix such as `:0.8`, returning the number text.
pub fn parse_weight(input: &str) -> IResult<&str, &str> {
    all_consuming(preceded(
        char(':'),
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
    ))
    .parse(input)
}

/// Returns `(prefix, body)` of the first brace span; the remaining input is the suffix.
pub fn parse_variation_group(input: &str) -> IResult<&str, (&str, &str)> {
    pair(take_until("{"), parse_brace_body).parse(input)
}

/// Returns the name of a `__name__` wildcard reference when the whole segment is one.
pub fn wildcard_reference(segment: &str) -> Option<&str> {
    segment
        .strip_prefix("__")?
        .strip_suffix("__")
        .filter(|name| !name.is_empty())
}

/// Splits a trailing weight off a segment. The remaining text is trimmed.
pub fn split_weight(segment: &str) -> (&str, Option<&str>) {
    let Some(idx) = segment.rfind(':') else {
        return (segment, None);
    };

    match parse_weight(&segment[idx..]) {
        Ok((_, weight)) => (segment[..idx].trim_end(), Some(weight)),
        Err(_) => (segment, None),
    }
}

pub fn find_variation_group(segment: &str) -> Option<VariationGroup<'_>> {
    let (suffix, (prefix, body)) = parse_variation_group(segment).ok()?;
    Some(VariationGroup {
        prefix,
        body,
        suffix,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(input: &str) -> Vec<&str> {
        parse_segments(input).map(|(_, s)| s).unwrap_or_default()
    }

    #[test]
    fn test_parse_segments_empty() {
        assert!(segments("").is_empty());
        assert!(segments(",,|\n").is_empty());
    }

    #[test]
    fn test_parse_segments_collapses_separator_runs() {
        assert_eq!(segments("a,,b|\n|c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_segments_keeps_whitespace() {
        assert_eq!(segments(" a , b "), vec![" a ", " b "]);
    }

    #[test]
    fn test_parse_segments_brace_span_is_opaque() {
        assert_eq!(
            segments("red {cat|dog}, blue {a,b}"),
            vec!["red {cat|dog}", " blue {a,b}"]
        );
    }

    #[test]
    fn test_parse_segments_unclosed_brace_is_literal() {
        assert_eq!(segments("a {b|c"), vec!["a {b", "c"]);
    }

    #[test]
    fn test_parse_segments_newline_closes_brace_span() {
        assert_eq!(segments("a {b\nc}"), vec!["a {b", "c}"]);
        assert_eq!(segments("{x|y}\n{z}"), vec!["{x|y}", "{z}"]);
    }

    #[test]
    fn test_parse_brace_span() {
        let result = parse_brace_span("{cat|dog} rest");
        assert_eq!(result, Ok((" rest", "{cat|dog}")));
    }

    #[test]
    fn test_parse_brace_span_missing_close() {
        assert!(parse_brace_span("{cat").is_err());
        assert!(parse_brace_span("{cat\n}").is_err());
    }

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse_weight(":1.5"), Ok(("", "1.5")));
        assert_eq!(parse_weight(":2"), Ok(("", "2")));
        assert_eq!(parse_weight(":.5"), Ok(("", ".5")));
        assert_eq!(parse_weight(":3."), Ok(("", "3.")));
    }

    #[test]
    fn test_parse_weight_invalid() {
        assert!(parse_weight(":").is_err());
        assert!(parse_weight(":.").is_err());
        assert!(parse_weight(":1.2.3").is_err());
        assert!(parse_weight(":1a").is_err());
        assert!(parse_weight(": 1").is_err());
    }

    #[test]
    fn test_split_weight() {
        assert_eq!(split_weight("tag:1.5"), ("tag", Some("1.5")));
        assert_eq!(split_weight("tag :1.5"), ("tag", Some("1.5")));
        assert_eq!(split_weight(":1.5"), ("", Some("1.5")));
        assert_eq!(split_weight("a:b:2"), ("a:b", Some("2")));
        assert_eq!(split_weight("ratio:wide"), ("ratio:wide", None));
        assert_eq!(split_weight("plain"), ("plain", None));
    }

    #[test]
    fn test_wildcard_reference() {
        assert_eq!(wildcard_reference("__style__"), Some("style"));
        assert_eq!(wildcard_reference("_____"), Some("_"));
        assert_eq!(wildcard_reference("____"), None);
        assert_eq!(wildcard_reference("__style"), None);
        assert_eq!(wildcard_reference("a __style__"), None);
    }

    #[test]
    fn test_find_variation_group() {
        let group = find_variation_group("red {cat|dog} tail").expect("Expected a group");
        assert_eq!(group.prefix, "red ");
        assert_eq!(group.body, "cat|dog");
        assert_eq!(group.suffix, " tail");
        assert_eq!(group.alternatives().collect::<Vec<_>>(), vec!["cat", "dog"]);
        assert_eq!(group.substitute("cat"), "red cat tail");
    }

    #[test]
    fn test_find_variation_group_first_only() {
        let group = find_variation_group("{a|b} and {c|d}").expect("Expected a group");
        assert_eq!(group.body, "a|b");
        assert_eq!(group.suffix, " and {c|d}");
    }

    #[test]
    fn test_find_variation_group_none() {
        assert!(find_variation_group("no braces").is_none());
        assert!(find_variation_group("open { only").is_none());
    }

    #[test]
    fn test_variation_group_blank_alternatives() {
        let group = find_variation_group("{ | }").expect("Expected a group");
        assert_eq!(group.alternatives().count(), 0);
    }
}
