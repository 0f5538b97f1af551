//! `<urange>`, which the tokenizer splits into a mess of idents, numbers and delims

use crate::match_result::Match;
use crate::matcher::{next_index, token_at, MatchIter, MatchOptions, Matcher, MatcherKind};
use nom::bytes::complete::take_while_m_n;
use nom::character::complete::char;
use nom::combinator::{all_consuming, eof, opt};
use nom::sequence::preceded;
use nom::{IResult, Parser};
use sanecss_css3::objects::ComponentValueList;
use sanecss_css3::token::{NumberType, Token, TokenType};

/// Highest code point a range may reach
const MAX_CODE_POINT: u32 = 0x10FFFF;

impl Matcher {
    /// Matches a unicode-range like `U+0-7F` or `u+4??`. The bounds are captured as integer
    /// numbers named `start` and `end`.
    pub fn urange() -> Matcher {
        Matcher::from_kind(MatcherKind::Urange)
    }

    pub(super) fn urange_matches<'a>(
        &self,
        list: &ComponentValueList,
        start: usize,
        options: MatchOptions,
    ) -> MatchIter<'a> {
        if !token_at(list, start).is_some_and(|t| t.is_ident_named("u")) {
            return Box::new(std::iter::empty());
        }

        let id = list.id();
        let mut found = Vec::new();
        for (text, last) in candidates(list, start + 1) {
            let Ok((_, (low, high))) = urange_text(&text) else {
                continue;
            };
            if low > high || high > MAX_CODE_POINT {
                continue;
            }

            let end = next_index(list, last, options);
            log::trace!("unicode-range {text} covers {low:#x}-{high:#x}");

            let bounds = [
                Match::detached(id, start, "start", vec![integer(low).into()]),
                Match::detached(id, start, "end", vec![integer(high).into()]),
            ];
            // Serialization must not put anything between the tokens of the range
            found.push(self.make_match(id, start, end, &bounds).with_urange(start, end - start));
        }
        Box::new(found.into_iter())
    }
}

fn integer(value: u32) -> Token {
    Token::from_type(TokenType::Number {
        value: f64::from(value),
        repr: value.to_string(),
        kind: NumberType::Integer,
    })
}

/// Text of the tokens that may make up a unicode-range following the `u` at `pos - 1`, with
/// the index of their last token. Longer candidates come first.
fn candidates(list: &ComponentValueList, pos: usize) -> Vec<(String, usize)> {
    let mut found = Vec::new();
    let Some(first) = token_at(list, pos) else {
        return found;
    };

    // Number of question marks starting at `from`
    let marks = |from: usize| {
        (from..)
            .take_while(|&i| token_at(list, i).is_some_and(|t| t.is_delim('?')))
            .count()
    };

    match &first.token_type {
        TokenType::Delim('+') => match token_at(list, pos + 1).map(|t| &t.token_type) {
            Some(TokenType::Ident(ident)) => {
                with_marks(&mut found, format!("+{ident}"), pos + 1, 0, marks(pos + 2));
            }
            Some(TokenType::Delim('?')) => {
                with_marks(&mut found, "+".to_string(), pos, 1, marks(pos + 1));
            }
            _ => {}
        },
        TokenType::Dimension { repr, unit, .. } => {
            with_marks(&mut found, format!("{repr}{unit}"), pos, 0, marks(pos + 1));
        }
        TokenType::Number { repr, .. } => {
            match token_at(list, pos + 1).map(|t| &t.token_type) {
                Some(TokenType::Dimension {
                    repr: second, unit, ..
                }) => found.push((format!("{repr}{second}{unit}"), pos + 1)),
                Some(TokenType::Number { repr: second, .. }) => {
                    found.push((format!("{repr}{second}"), pos + 1));
                }
                _ => {}
            }
            with_marks(&mut found, repr.clone(), pos, 0, marks(pos + 1));
        }
        _ => {}
    }
    found
}

/// Pushes `text` ending at `last` followed by `max` down to `min` question marks
fn with_marks(
    found: &mut Vec<(String, usize)>,
    text: String,
    last: usize,
    min: usize,
    max: usize,
) {
    for count in (min..=max).rev() {
        found.push((format!("{text}{}", "?".repeat(count)), last + count));
    }
}

fn is_hex(c: char) -> bool {
    c.is_ascii_hexdigit()
}

fn hex(digits: &str) -> u32 {
    // At most six hex digits, so this never overflows
    u32::from_str_radix(digits, 16).unwrap_or_default()
}

/// Parses `+` followed by hex digits with trailing question marks, or by one or two ranges
/// of hex digits separated by `-`
fn urange_text(input: &str) -> IResult<&str, (u32, u32)> {
    let (input, _) = char('+').parse(input)?;
    let (input, digits) = take_while_m_n(0, 6, is_hex).parse(input)?;
    let (input, marks) = take_while_m_n(0, 6 - digits.len(), |c: char| c == '?').parse(input)?;

    if digits.is_empty() && marks.is_empty() {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::HexDigit,
        )));
    }

    if !marks.is_empty() {
        let (input, _) = eof.parse(input)?;
        let low = hex(&format!("{digits}{}", "0".repeat(marks.len())));
        let high = hex(&format!("{digits}{}", "f".repeat(marks.len())));
        return Ok((input, (low, high)));
    }

    let low = hex(digits);
    let (input, high) =
        all_consuming(opt(preceded(char('-'), take_while_m_n(1, 6, is_hex)))).parse(input)?;
    Ok((input, (low, high.map_or(low, hex))))
}
