//! `<declaration-value>` style matching of arbitrary component values

use crate::match_result::{Match, SIGNIFICANT_WHITESPACE};
use crate::matcher::{next_index, skip_whitespace, MatchIter, MatchOptions, Matcher, MatcherKind};
use sanecss_css3::objects::{ComponentValue, ComponentValueList};
use sanecss_css3::token::TokenType;
use sanecss_shared::errors::CssError;
use std::str::FromStr;

/// How many values an [`Matcher::anything`] matcher takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnythingQuantifier {
    /// Exactly one value
    #[default]
    One,
    /// As many values as possible, possibly none
    Star,
    /// As many values as possible, at least one
    Plus,
}

impl FromStr for AnythingQuantifier {
    type Err = CssError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(AnythingQuantifier::One),
            "*" => Ok(AnythingQuantifier::Star),
            "+" => Ok(AnythingQuantifier::Plus),
            _ => Err(CssError::invalid_argument("Invalid quantifier")),
        }
    }
}

impl Matcher {
    /// Matches any values except unbalanced closing brackets and bad strings or urls, also
    /// when nested in blocks and functions
    pub fn anything(quantifier: AnythingQuantifier) -> Matcher {
        Matcher::from_kind(MatcherKind::Anything {
            quantifier,
            toplevel: false,
        })
    }

    /// Like [`Matcher::anything`], but semicolons and `!` are refused outside of blocks and
    /// functions, as in a declaration value
    pub fn anything_toplevel(quantifier: AnythingQuantifier) -> Matcher {
        Matcher::from_kind(MatcherKind::Anything {
            quantifier,
            toplevel: true,
        })
    }

    pub(super) fn anything_matches<'a>(
        &self,
        list: &ComponentValueList,
        start: usize,
        options: MatchOptions,
        quantifier: AnythingQuantifier,
        toplevel: bool,
    ) -> MatchIter<'a> {
        let found = match quantifier {
            AnythingQuantifier::One => {
                let mut captures = Vec::new();
                take_one(list, start, options, toplevel, &mut captures)
                    .map(|end| self.make_match(list.id(), start, end, &captures))
            }
            AnythingQuantifier::Star | AnythingQuantifier::Plus => {
                let mut captures = Vec::new();
                let (end, count) = take_all(list, start, options, toplevel, &mut captures);
                (quantifier == AnythingQuantifier::Star || count > 0)
                    .then(|| self.make_match(list.id(), start, end, &captures))
            }
        };
        Box::new(found.into_iter())
    }
}

fn refused(token_type: &TokenType, toplevel: bool) -> bool {
    match token_type {
        TokenType::BadString
        | TokenType::BadUrl
        | TokenType::RParen
        | TokenType::RBracket
        | TokenType::RCurly
        | TokenType::Eof => true,
        TokenType::Semicolon | TokenType::Delim('!') => toplevel,
        _ => false,
    }
}

/// Takes the value at `pos`, returning where matching continues. Whitespace taken here is
/// added to `captures` as significant.
fn take_one(
    list: &ComponentValueList,
    pos: usize,
    options: MatchOptions,
    toplevel: bool,
    captures: &mut Vec<Match>,
) -> Option<usize> {
    match list.get(pos)? {
        ComponentValue::Token(token) if token.is_whitespace() => {
            captures.push(Match::new(list.id(), pos, 1).named(SIGNIFICANT_WHITESPACE));
        }
        ComponentValue::Token(token) => {
            if refused(&token.token_type, toplevel) {
                return None;
            }
        }
        value => {
            let inner = value.inner()?;
            let mut inner_captures = Vec::new();
            let start = skip_whitespace(inner, 0, options);
            let (end, _) = take_all(inner, start, options, false, &mut inner_captures);
            if end != inner.len() {
                return None;
            }
            captures.append(&mut inner_captures);
        }
    }
    Some(next_index(list, pos, options))
}

/// Takes values from `pos` for as long as possible. Returns the end and the number of values
/// taken.
fn take_all(
    list: &ComponentValueList,
    mut pos: usize,
    options: MatchOptions,
    toplevel: bool,
    captures: &mut Vec<Match>,
) -> (usize, usize) {
    let mut count = 0;
    while let Some(end) = take_one(list, pos, options, toplevel, captures) {
        pos = end;
        count += 1;
    }
    (pos, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::test_util::*;
    use test_case::test_case;

    fn foo() -> ComponentValue {
        ident("foo")
    }

    fn bang() -> ComponentValue {
        tok(TokenType::Delim('!'))
    }

    fn semicolon() -> ComponentValue {
        tok(TokenType::Semicolon)
    }

    fn bad_string() -> ComponentValue {
        tok(TokenType::BadString)
    }

    fn bad_url() -> ComponentValue {
        tok(TokenType::BadUrl)
    }

    fn paren_block() -> ComponentValue {
        block(TokenType::LParen, vec![foo(), bang(), semicolon()])
    }

    fn bad_bracket_block() -> ComponentValue {
        block(TokenType::LBracket, vec![bad_string()])
    }

    fn full_function() -> ComponentValue {
        function("foo", vec![foo(), bang(), semicolon()])
    }

    fn bad_function() -> ComponentValue {
        function("foo", vec![bad_url()])
    }

    #[test]
    fn quantifier_from_str() {
        assert_eq!("".parse::<AnythingQuantifier>().unwrap(), AnythingQuantifier::One);
        assert_eq!("*".parse::<AnythingQuantifier>().unwrap(), AnythingQuantifier::Star);
        assert_eq!("+".parse::<AnythingQuantifier>().unwrap(), AnythingQuantifier::Plus);
        let err = "#".parse::<AnythingQuantifier>().unwrap_err();
        assert_eq!(err.message(), "Invalid quantifier");
    }

    #[test_case(foo(), true, true ; "ident")]
    #[test_case(tok(TokenType::RParen), true, false ; "closing paren")]
    #[test_case(tok(TokenType::RCurly), true, false ; "closing brace")]
    #[test_case(tok(TokenType::RBracket), true, false ; "closing bracket")]
    #[test_case(bad_string(), true, false ; "bad string")]
    #[test_case(bad_url(), true, false ; "bad url")]
    #[test_case(bang(), true, false ; "bang at top level")]
    #[test_case(bang(), false, true ; "bang")]
    #[test_case(semicolon(), true, false ; "semicolon at top level")]
    #[test_case(semicolon(), false, true ; "semicolon")]
    #[test_case(block(TokenType::LCurly, vec![]), true, true ; "empty block")]
    #[test_case(paren_block(), true, true ; "block")]
    #[test_case(bad_bracket_block(), true, false ; "block with bad string")]
    #[test_case(block(TokenType::LBracket, vec![paren_block()]), true, true ; "nested block")]
    #[test_case(block(TokenType::LBracket, vec![bad_function()]), true, false ; "block with bad function")]
    #[test_case(function("foo", vec![]), true, true ; "empty function")]
    #[test_case(full_function(), true, true ; "function")]
    #[test_case(bad_function(), true, false ; "function with bad url")]
    #[test_case(function("foo", vec![full_function()]), true, true ; "nested function")]
    #[test_case(function("foo", vec![bad_bracket_block()]), true, false ; "function with bad block")]
    fn standard(value: ComponentValue, toplevel: bool, matched: bool) {
        let matcher = if toplevel {
            Matcher::anything_toplevel(AnythingQuantifier::One)
        } else {
            Matcher::anything(AnythingQuantifier::One)
        };
        let values = list(vec![value]);
        let found = matcher.generate_matches(&values, 0, MatchOptions::default()).count();
        assert_eq!(found > 0, matched);
    }

    #[test]
    fn whitespace() {
        let colon = || tok(TokenType::Colon);
        let values = list(vec![
            colon(),
            ws(),
            ws(),
            block(TokenType::LBracket, vec![ws(), colon(), ws(), ws(), colon(), ws()]),
        ]);
        let id = values.id();
        let bv = values.get(3).and_then(ComponentValue::inner).unwrap().id();
        let sig = |list, start| Match::new(list, start, 1).named(SIGNIFICANT_WHITESPACE);
        let matcher = Matcher::anything(AnythingQuantifier::One);
        let collect = |start, options| -> Vec<Match> {
            matcher.generate_matches(&values, start, options).collect()
        };

        let skip = MatchOptions::default();
        assert_eq!(collect(0, skip), vec![Match::new(id, 0, 3)]);
        assert_eq!(
            collect(1, skip),
            vec![Match::new(id, 1, 2).with_captures(vec![sig(id, 1)])]
        );
        assert_eq!(collect(3, skip), vec![Match::new(id, 3, 1)]);

        let no_skip = skip.skip_whitespace(false);
        assert_eq!(collect(0, no_skip), vec![Match::new(id, 0, 1)]);
        assert_eq!(
            collect(1, no_skip),
            vec![Match::new(id, 1, 1).with_captures(vec![sig(id, 1)])]
        );
        assert_eq!(
            collect(3, no_skip),
            vec![Match::new(id, 3, 1).with_captures(vec![
                sig(bv, 0),
                sig(bv, 2),
                sig(bv, 3),
                sig(bv, 5)
            ])]
        );
    }

    #[test]
    fn repeated() {
        let values = list(vec![foo(), ws(), foo(), semicolon(), foo()]);
        let options = MatchOptions::default();

        let star = Matcher::anything_toplevel(AnythingQuantifier::Star);
        let plus = Matcher::anything_toplevel(AnythingQuantifier::Plus);
        // Only the longest run is generated
        assert_eq!(spans(star.generate_matches(&values, 0, options)), vec![(0, 3)]);
        assert_eq!(spans(plus.generate_matches(&values, 0, options)), vec![(0, 3)]);
        assert_eq!(spans(star.generate_matches(&values, 3, options)), vec![(3, 3)]);
        assert!(plus.generate_matches(&values, 3, options).next().is_none());

        let anywhere = Matcher::anything(AnythingQuantifier::Star);
        assert_eq!(spans(anywhere.generate_matches(&values, 0, options)), vec![(0, 5)]);
    }

    #[test]
    fn significant_whitespace_is_captured() {
        let values = parse("a  b");
        let matcher = Matcher::anything(AnythingQuantifier::Star);
        let options = MatchOptions::default().skip_whitespace(false);
        let found = matcher.find_match(&values, Some(options)).unwrap();
        assert_eq!(
            found,
            Match::new(values.id(), 0, 3)
                .with_captures(vec![Match::new(values.id(), 1, 1).named(SIGNIFICANT_WHITESPACE)])
        );
    }
}
