//! Matchers that look inside simple blocks and functions

use crate::match_result::Match;
use crate::matcher::{
    next_index, skip_all_whitespace, skip_whitespace, MatchIter, MatchOptions, Matcher,
    MatcherKind,
};
use cow_utils::CowUtils;
use sanecss_css3::objects::{ComponentValue, ComponentValueList};
use sanecss_css3::token::{Token, TokenType};
use sanecss_shared::errors::{CssError, CssResult};
use std::rc::Rc;

/// Capture name of the url string of a [`Matcher::url`] match
pub const URL_CAPTURE: &str = "url";
/// Capture name of each modifier of a [`Matcher::url`] match
pub const MODIFIER_CAPTURE: &str = "modifier";

/// Decides whether a url is acceptable, given the url and the values of its modifiers with
/// whitespace left out
pub type UrlCheck = Rc<dyn Fn(&str, &[ComponentValue]) -> bool>;

pub(crate) enum FunctionName {
    Any,
    /// Lowercased, compared ASCII case-insensitively
    Exact(String),
    Check(Rc<dyn Fn(&str) -> bool>),
}

impl FunctionName {
    fn matches(&self, name: &str) -> bool {
        match self {
            FunctionName::Any => true,
            FunctionName::Exact(expected) => name.eq_ignore_ascii_case(expected),
            FunctionName::Check(check) => check(name),
        }
    }
}

impl Matcher {
    /// Matches a simple block opened by `delimiter`, which must be `{`, `[` or `(`. The
    /// contents of the block must match `inner` completely.
    pub fn block(delimiter: TokenType, inner: Matcher) -> CssResult<Matcher> {
        if !matches!(
            delimiter,
            TokenType::LCurly | TokenType::LBracket | TokenType::LParen
        ) {
            return Err(CssError::invalid_argument(
                "A block is delimited by either {}, [], or ().",
            ));
        }
        Ok(Matcher::from_kind(MatcherKind::Block { delimiter, inner }))
    }

    /// Matches a function called `name`, ASCII case-insensitively, whose arguments match
    /// `inner` completely
    pub fn function(name: &str, inner: Matcher) -> Matcher {
        let name = FunctionName::Exact(name.cow_to_ascii_lowercase().into_owned());
        Matcher::from_kind(MatcherKind::Function { name, inner })
    }

    /// Matches a function with any name whose arguments match `inner` completely
    pub fn any_function(inner: Matcher) -> Matcher {
        Matcher::from_kind(MatcherKind::Function {
            name: FunctionName::Any,
            inner,
        })
    }

    /// Matches a function whose name passes `check` and whose arguments match `inner`
    /// completely
    pub fn function_with(check: impl Fn(&str) -> bool + 'static, inner: Matcher) -> Matcher {
        Matcher::from_kind(MatcherKind::Function {
            name: FunctionName::Check(Rc::new(check)),
            inner,
        })
    }

    /// Matches a url: either a url token, or a `url()` function holding a string followed
    /// by `modifiers`, if any are allowed.
    ///
    /// The url string is captured as [`URL_CAPTURE`] and each modifier as
    /// [`MODIFIER_CAPTURE`]. With a `check`, only urls it accepts match.
    pub fn url(check: Option<UrlCheck>, modifiers: Option<Matcher>) -> Matcher {
        let string = Matcher::token(TokenType::QuotedString(String::new())).capture(URL_CAPTURE);
        let inner = match modifiers {
            Some(modifier) => Matcher::juxtaposition(
                vec![string, modifier.capture(MODIFIER_CAPTURE).star()],
                false,
            ),
            None => string,
        };
        Matcher::from_kind(MatcherKind::Url { check, inner })
    }

    /// Any ident or function, the syntax of `<url-modifier>`
    pub fn any_url_modifier() -> Matcher {
        Matcher::alternative(vec![
            Matcher::token(TokenType::Ident(String::new())),
            Matcher::any_function(Matcher::anything(super::AnythingQuantifier::Star)),
        ])
    }

    pub(super) fn block_matches<'a>(
        &self,
        list: &ComponentValueList,
        start: usize,
        options: MatchOptions,
        delimiter: &TokenType,
        inner: &Matcher,
    ) -> MatchIter<'a> {
        let found = list
            .get(start)
            .and_then(ComponentValue::as_block)
            .filter(|block| block.start_token_type() == delimiter)
            .and_then(|block| complete_match(inner, block.value(), options))
            .map(|m| self.make_match(list.id(), start, next_index(list, start, options), [&m]));
        Box::new(found.into_iter())
    }

    pub(super) fn function_matches<'a>(
        &self,
        list: &ComponentValueList,
        start: usize,
        options: MatchOptions,
        name: &FunctionName,
        inner: &Matcher,
    ) -> MatchIter<'a> {
        let found = list
            .get(start)
            .and_then(ComponentValue::as_function)
            .filter(|function| name.matches(function.name()))
            .and_then(|function| complete_match(inner, function.value(), options))
            .map(|m| self.make_match(list.id(), start, next_index(list, start, options), [&m]));
        Box::new(found.into_iter())
    }

    pub(super) fn url_matches<'a>(
        &self,
        list: &ComponentValueList,
        start: usize,
        options: MatchOptions,
        check: Option<&UrlCheck>,
        inner: &Matcher,
    ) -> MatchIter<'a> {
        let id = list.id();
        let end = next_index(list, start, options);
        let accepts = |url: &str, modifiers: &[ComponentValue]| {
            check.map_or(true, |check| check(url, modifiers))
        };

        let found = match list.get(start) {
            Some(ComponentValue::Token(token)) => match &token.token_type {
                TokenType::Url(url) if accepts(url, &[]) => {
                    let url = Match::new(id, start, 1).named(URL_CAPTURE);
                    Some(self.make_match(id, start, end, [&url]))
                }
                _ => None,
            },
            Some(ComponentValue::Function(function))
                if function.name().eq_ignore_ascii_case("url") =>
            {
                // Whitespace is allowed around the string and the modifiers
                let values = function.value();
                let inner_options = options.skip_whitespace(true);
                inner
                    .generate_matches(values, skip_all_whitespace(values, 0), inner_options)
                    .filter(|m| m.next() == values.len())
                    .find(|m| {
                        let (url, modifiers) = url_parts(values, m);
                        accepts(&url, &modifiers)
                    })
                    .map(|m| self.make_match(id, start, end, [&m]))
            }
            _ => None,
        };
        Box::new(found.into_iter())
    }
}

/// The first match of `matcher` that covers all of `values`
fn complete_match(
    matcher: &Matcher,
    values: &ComponentValueList,
    options: MatchOptions,
) -> Option<Match> {
    matcher
        .generate_matches(values, skip_whitespace(values, 0, options), options)
        .find(|m| m.next() == values.len())
}

/// The url string and the modifier values captured by a match inside `url()`. Without
/// modifiers the match is the url capture itself.
fn url_parts(values: &ComponentValueList, found: &Match) -> (String, Vec<ComponentValue>) {
    let mut url = String::new();
    let mut modifiers = Vec::new();

    for capture in std::iter::once(found).chain(found.captures()) {
        let captured = capture.values(values).unwrap_or_default();
        match capture.name() {
            Some(URL_CAPTURE) => {
                if let Some(value) = captured
                    .first()
                    .and_then(ComponentValue::as_token)
                    .and_then(Token::value)
                {
                    url = value.to_string();
                }
            }
            Some(MODIFIER_CAPTURE) => {
                modifiers.extend(captured.iter().filter(|v| !v.is_whitespace()).cloned());
            }
            _ => {}
        }
    }

    (url, modifiers)
}
