//! Matchers for single tokens and for the space between them

use crate::match_result::{Match, SIGNIFICANT_WHITESPACE};
use crate::matcher::{
    is_whitespace_at, token_at, MatchIter, MatchOptions, Matcher, MatcherKind, TokenCheck,
};
use cow_utils::CowUtils;
use sanecss_css3::objects::ComponentValueList;
use sanecss_css3::token::{Token, TokenType};
use std::rc::Rc;

impl Matcher {
    /// Matches a token of the given type. The payload of `token_type` is ignored.
    pub fn token(token_type: TokenType) -> Matcher {
        Matcher::from_kind(MatcherKind::Token {
            token_type,
            check: None,
        })
    }

    /// Matches a token of the given type that also passes `check`
    pub fn token_with(token_type: TokenType, check: impl Fn(&Token) -> bool + 'static) -> Matcher {
        Matcher::from_kind(MatcherKind::Token {
            token_type,
            check: Some(Rc::new(check)),
        })
    }

    /// Matches an ident, ASCII case-insensitively
    pub fn keyword(word: &str) -> Matcher {
        Matcher::keywords(&[word])
    }

    /// Matches an ident that is any of `words`, ASCII case-insensitively
    pub fn keywords(words: &[&str]) -> Matcher {
        let words = words
            .iter()
            .map(|w| w.cow_to_ascii_lowercase().into_owned())
            .collect();
        Matcher::from_kind(MatcherKind::Keyword(words))
    }

    pub fn delim(c: char) -> Matcher {
        Matcher::delims(&[c])
    }

    /// Matches a delim that is any of `chars`
    pub fn delims(chars: &[char]) -> Matcher {
        Matcher::from_kind(MatcherKind::Delim(chars.to_vec()))
    }

    /// Matches the name of a custom property: an ident starting with `--`
    pub fn custom_property() -> Matcher {
        Matcher::from_kind(MatcherKind::CustomProperty)
    }

    /// Never matches
    pub fn nothing() -> Matcher {
        Matcher::from_kind(MatcherKind::Nothing)
    }

    /// Matches the empty space between two values, unless that space is whitespace
    pub fn no_whitespace() -> Matcher {
        Matcher::from_kind(MatcherKind::NoWhitespace)
    }

    /// Matches whitespace.
    ///
    /// Insignificant whitespace is optional and matches any run of whitespace, including none.
    /// Significant whitespace must be present: either at the position itself, or, when
    /// whitespace is being skipped, just before it. It is captured as
    /// [`SIGNIFICANT_WHITESPACE`] so [`Matcher::match_against`] can mark it.
    pub fn whitespace(significant: bool) -> Matcher {
        Matcher::from_kind(MatcherKind::Whitespace { significant })
    }

    pub(super) fn token_matches<'a>(
        &self,
        list: &ComponentValueList,
        start: usize,
        options: MatchOptions,
        token_type: &TokenType,
        check: Option<&TokenCheck>,
    ) -> MatchIter<'a> {
        let accept = token_at(list, start).is_some_and(|t| {
            t.token_type.same_kind(token_type) && check.map_or(true, |check| check(t))
        });
        self.single(list, start, options, accept)
    }

    pub(super) fn keyword_matches<'a>(
        &self,
        list: &ComponentValueList,
        start: usize,
        options: MatchOptions,
        words: &[String],
    ) -> MatchIter<'a> {
        let accept = token_at(list, start).is_some_and(|t| match &t.token_type {
            TokenType::Ident(value) => {
                let value = value.cow_to_ascii_lowercase();
                words.iter().any(|w| *w == value)
            }
            _ => false,
        });
        self.single(list, start, options, accept)
    }

    pub(super) fn delim_matches<'a>(
        &self,
        list: &ComponentValueList,
        start: usize,
        options: MatchOptions,
        chars: &[char],
    ) -> MatchIter<'a> {
        let accept = token_at(list, start)
            .is_some_and(|t| matches!(t.token_type, TokenType::Delim(c) if chars.contains(&c)));
        self.single(list, start, options, accept)
    }

    pub(super) fn custom_property_matches<'a>(
        &self,
        list: &ComponentValueList,
        start: usize,
        options: MatchOptions,
    ) -> MatchIter<'a> {
        let accept = token_at(list, start)
            .is_some_and(|t| matches!(&t.token_type, TokenType::Ident(v) if v.starts_with("--")));
        self.single(list, start, options, accept)
    }

    pub(super) fn no_whitespace_matches<'a>(
        &self,
        list: &ComponentValueList,
        start: usize,
    ) -> MatchIter<'a> {
        if start == 0 || !is_whitespace_at(list, start - 1) {
            Box::new(std::iter::once(self.make_match(list.id(), start, start, None)))
        } else {
            Box::new(std::iter::empty())
        }
    }

    pub(super) fn whitespace_matches<'a>(
        &self,
        list: &ComponentValueList,
        start: usize,
        options: MatchOptions,
        significant: bool,
    ) -> MatchIter<'a> {
        let id = list.id();
        let mut end = start;
        while is_whitespace_at(list, end) {
            end += 1;
        }

        if !significant {
            return Box::new(std::iter::once(self.make_match(id, start, end, None)));
        }

        let found = if end > start {
            let ws = Match::new(id, start, 1).named(SIGNIFICANT_WHITESPACE);
            Some(self.make_match(id, start, end, [&ws]))
        } else if options.skip_whitespace && start > 0 && is_whitespace_at(list, start - 1) {
            // Skipped over already by the value before
            let ws = Match::new(id, start - 1, 1).named(SIGNIFICANT_WHITESPACE);
            Some(self.make_match(id, start - 1, start, [&ws]))
        } else {
            None
        };
        Box::new(found.into_iter())
    }
}
