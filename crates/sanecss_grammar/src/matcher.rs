//! Matchers and the machinery they share.
//!
//! Every matcher kind lives in one of the submodules, each adding its constructors to
//! [`Matcher`] and providing the generator that [`Matcher::generate_matches`] dispatches to.

use crate::match_result::Match;
use itertools::Itertools;
use sanecss_css3::objects::{ComponentValue, ComponentValueList, ListId};
use sanecss_css3::token::{Token, TokenType};
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

mod anything;
mod block;
mod combinator;
mod leaf;
mod quantifier;
mod unordered;
mod urange;

pub use anything::AnythingQuantifier;
pub use block::{UrlCheck, MODIFIER_CAPTURE, URL_CAPTURE};

/// Lazily generated matches, longest first
pub type MatchIter<'a> = Box<dyn Iterator<Item = Match> + 'a>;

/// Extra condition on a single token
pub type TokenCheck = Rc<dyn Fn(&Token) -> bool>;

/// Extra condition on a whole match, see [`Matcher::checked`]
pub type MatchCheck = Rc<dyn Fn(&ComponentValueList, &Match, MatchOptions) -> bool>;

/// Options for a matching run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Whitespace between component values is skipped, and counted as part of the match
    /// before it
    pub skip_whitespace: bool,
    /// A match does not need to reach the end of the list
    pub nonterminal: bool,
    /// Rewrite the significance of the whitespace in the matched range
    pub mark_significance: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            skip_whitespace: true,
            nonterminal: false,
            mark_significance: false,
        }
    }
}

impl MatchOptions {
    pub fn skip_whitespace(mut self, skip: bool) -> Self {
        self.skip_whitespace = skip;
        self
    }

    pub fn nonterminal(mut self, nonterminal: bool) -> Self {
        self.nonterminal = nonterminal;
        self
    }

    pub fn mark_significance(mut self, mark: bool) -> Self {
        self.mark_significance = mark;
        self
    }
}

/// The closed set of matcher kinds
pub(crate) enum MatcherKind {
    Token {
        token_type: TokenType,
        check: Option<TokenCheck>,
    },
    Keyword(Vec<String>),
    Delim(Vec<char>),
    Function {
        name: block::FunctionName,
        inner: Matcher,
    },
    Block {
        delimiter: TokenType,
        inner: Matcher,
    },
    Url {
        check: Option<UrlCheck>,
        inner: Matcher,
    },
    CustomProperty,
    Alternative(Vec<Matcher>),
    Juxtaposition {
        matchers: Vec<Matcher>,
        commas: bool,
    },
    Quantifier {
        matcher: Matcher,
        min: usize,
        max: usize,
        commas: bool,
    },
    UnorderedGroup {
        matchers: Vec<Matcher>,
        all: bool,
    },
    Anything {
        quantifier: AnythingQuantifier,
        toplevel: bool,
    },
    Nothing,
    NonEmpty(Matcher),
    NoWhitespace,
    Whitespace {
        significant: bool,
    },
    Checked {
        matcher: Matcher,
        check: MatchCheck,
    },
    Urange,
}

impl MatcherKind {
    fn name(&self) -> &'static str {
        match self {
            MatcherKind::Token { .. } => "token",
            MatcherKind::Keyword(_) => "keyword",
            MatcherKind::Delim(_) => "delim",
            MatcherKind::Function { .. } => "function",
            MatcherKind::Block { .. } => "block",
            MatcherKind::Url { .. } => "url",
            MatcherKind::CustomProperty => "custom-property",
            MatcherKind::Alternative(_) => "alternative",
            MatcherKind::Juxtaposition { .. } => "juxtaposition",
            MatcherKind::Quantifier { .. } => "quantifier",
            MatcherKind::UnorderedGroup { .. } => "unordered-group",
            MatcherKind::Anything { .. } => "anything",
            MatcherKind::Nothing => "nothing",
            MatcherKind::NonEmpty(_) => "non-empty",
            MatcherKind::NoWhitespace => "no-whitespace",
            MatcherKind::Whitespace { .. } => "whitespace",
            MatcherKind::Checked { .. } => "checked",
            MatcherKind::Urange => "urange",
        }
    }
}

/// A piece of grammar that can be matched against a [`ComponentValueList`].
///
/// Matchers are cheap to clone handles. A clone shares the grammar but has its own capture
/// name and default options.
#[derive(Clone)]
pub struct Matcher {
    kind: Rc<MatcherKind>,
    capture: Option<Rc<str>>,
    default_options: MatchOptions,
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("kind", &self.kind.name())
            .field("capture", &self.capture)
            .field("default_options", &self.default_options)
            .finish()
    }
}

impl Matcher {
    pub(crate) fn from_kind(kind: MatcherKind) -> Self {
        Matcher {
            kind: Rc::new(kind),
            capture: None,
            default_options: MatchOptions::default(),
        }
    }

    /// Returns a copy of the matcher whose matches are captured under `name`
    pub fn capture(&self, name: &str) -> Matcher {
        Matcher {
            capture: Some(Rc::from(name)),
            ..self.clone()
        }
    }

    /// Returns true when both handles share one grammar, whatever their capture names
    pub fn same_grammar(&self, other: &Matcher) -> bool {
        Rc::ptr_eq(&self.kind, &other.kind)
    }

    pub fn capture_name(&self) -> Option<&str> {
        self.capture.as_deref()
    }

    /// Options used by [`Matcher::match_against`] when none are passed
    pub fn default_options(&self) -> MatchOptions {
        self.default_options
    }

    pub fn set_default_options(&mut self, options: MatchOptions) -> &mut Self {
        self.default_options = options;
        self
    }

    pub fn with_default_options(mut self, options: MatchOptions) -> Self {
        self.default_options = options;
        self
    }

    /// Generates the matches starting at `start`, longest first and without duplicates.
    /// Nothing is consumed until the iterator is pulled.
    pub fn generate_matches<'a>(
        &'a self,
        list: &'a ComponentValueList,
        start: usize,
        options: MatchOptions,
    ) -> MatchIter<'a> {
        match &*self.kind {
            MatcherKind::Token { token_type, check } => {
                self.token_matches(list, start, options, token_type, check.as_ref())
            }
            MatcherKind::Keyword(words) => self.keyword_matches(list, start, options, words),
            MatcherKind::Delim(chars) => self.delim_matches(list, start, options, chars),
            MatcherKind::CustomProperty => self.custom_property_matches(list, start, options),
            MatcherKind::Nothing => Box::new(std::iter::empty()),
            MatcherKind::NoWhitespace => self.no_whitespace_matches(list, start),
            MatcherKind::Whitespace { significant } => {
                self.whitespace_matches(list, start, options, *significant)
            }
            MatcherKind::Function { name, inner } => {
                self.function_matches(list, start, options, name, inner)
            }
            MatcherKind::Block { delimiter, inner } => {
                self.block_matches(list, start, options, delimiter, inner)
            }
            MatcherKind::Url { check, inner } => {
                self.url_matches(list, start, options, check.as_ref(), inner)
            }
            MatcherKind::Alternative(matchers) => {
                self.alternative_matches(list, start, options, matchers)
            }
            MatcherKind::Juxtaposition { matchers, commas } => {
                self.juxtaposition_matches(list, start, options, matchers, *commas)
            }
            MatcherKind::Quantifier {
                matcher,
                min,
                max,
                commas,
            } => self.quantifier_matches(list, start, options, matcher, *min, *max, *commas),
            MatcherKind::UnorderedGroup { matchers, all } => {
                self.unordered_matches(list, start, options, matchers, *all)
            }
            MatcherKind::Anything {
                quantifier,
                toplevel,
            } => self.anything_matches(list, start, options, *quantifier, *toplevel),
            MatcherKind::NonEmpty(matcher) => Box::new(
                matcher
                    .generate_matches(list, start, options)
                    .filter(|m| m.length() > 0)
                    .map(move |m| self.make_match(list.id(), start, m.next(), Some(&m))),
            ),
            MatcherKind::Checked { matcher, check } => Box::new(
                matcher
                    .generate_matches(list, start, options)
                    .filter(move |m| check(list, m, options))
                    .map(move |m| self.make_match(list.id(), start, m.next(), Some(&m))),
            ),
            MatcherKind::Urange => self.urange_matches(list, start, options),
        }
    }

    /// Finds the first match of the grammar against `list`, starting at its first
    /// non-whitespace value when skipping whitespace. Unless `nonterminal` is set, the match
    /// has to cover the whole list. Without options, the default options are used.
    ///
    /// Unicode-ranges in the accepted match are marked on their tokens, see
    /// [`Match::apply_uranges`].
    pub fn find_match(
        &self,
        list: &ComponentValueList,
        options: Option<MatchOptions>,
    ) -> Option<Match> {
        let options = options.unwrap_or(self.default_options);
        let start = skip_whitespace(list, 0, options);

        let found = self
            .generate_matches(list, start, options)
            .find(|m| options.nonterminal || m.next() == list.len());
        log::debug!(
            "{} matcher {}: {:?}",
            self.kind.name(),
            if found.is_some() { "matched" } else { "did not match" },
            found.as_ref().map(|m| (m.start(), m.next()))
        );
        if let Some(found) = &found {
            found.apply_uranges(list);
        }
        found
    }

    /// Like [`Matcher::find_match`]. With `mark_significance` set, the whitespace in the
    /// matched range is rewritten afterwards: whitespace captured as significant becomes
    /// significant, all other whitespace insignificant.
    pub fn match_against(
        &self,
        list: &mut ComponentValueList,
        options: Option<MatchOptions>,
    ) -> Option<Match> {
        let options = options.unwrap_or(self.default_options);
        let found = self.find_match(list, Some(options))?;
        if options.mark_significance {
            mark_significance(list, &found);
        }
        Some(found)
    }

    /// Builds the match for this matcher from `start` to `end`. Named parts are captured as
    /// they are, unnamed parts contribute their own captures.
    pub(crate) fn make_match<'m>(
        &self,
        list: ListId,
        start: usize,
        end: usize,
        parts: impl IntoIterator<Item = &'m Match>,
    ) -> Match {
        let mut captures = Vec::new();
        let mut found = Match::new(list, start, end.saturating_sub(start));
        for part in parts {
            found.extend_uranges(part);
            if part.name().is_some() {
                captures.push(part.clone());
            } else {
                captures.extend(part.captures().iter().cloned());
            }
        }

        found
            .with_optional_name(self.capture_name())
            .with_captures(captures)
    }

    /// A single match from `start` to the next value, or nothing
    pub(crate) fn single<'a>(
        &self,
        list: &ComponentValueList,
        start: usize,
        options: MatchOptions,
        accept: bool,
    ) -> MatchIter<'a> {
        if accept {
            let end = next_index(list, start, options);
            Box::new(std::iter::once(self.make_match(list.id(), start, end, None)))
        } else {
            Box::new(std::iter::empty())
        }
    }
}

/// Drops repeated matches, keeping the first of each
pub(crate) fn dedup<'a>(matches: impl Iterator<Item = Match> + 'a) -> MatchIter<'a> {
    Box::new(matches.unique())
}

/// Returns `index`, or the index of the first value after it that is not whitespace when
/// skipping whitespace
pub(crate) fn skip_whitespace(
    list: &ComponentValueList,
    index: usize,
    options: MatchOptions,
) -> usize {
    if options.skip_whitespace {
        skip_all_whitespace(list, index)
    } else {
        index
    }
}

/// Index of the first value at or after `index` that is not whitespace
pub(crate) fn skip_all_whitespace(list: &ComponentValueList, mut index: usize) -> usize {
    while list.get(index).is_some_and(ComponentValue::is_whitespace) {
        index += 1;
    }
    index
}

/// Index where matching continues after the value at `index`
pub(crate) fn next_index(list: &ComponentValueList, index: usize, options: MatchOptions) -> usize {
    skip_whitespace(list, index + 1, options)
}

pub(crate) fn is_whitespace_at(list: &ComponentValueList, index: usize) -> bool {
    list.get(index).is_some_and(ComponentValue::is_whitespace)
}

pub(crate) fn token_at(list: &ComponentValueList, index: usize) -> Option<&Token> {
    list.get(index).and_then(ComponentValue::as_token)
}

/// Rewrites whitespace significance in `list` up to the end of `found`, recursing into
/// blocks and functions. Whitespace captured as significant anywhere in `found` becomes
/// significant, all other whitespace insignificant.
pub fn mark_significance(list: &mut ComponentValueList, found: &Match) {
    let mut significant = HashSet::new();
    found.collect_significant_whitespace(&mut significant);
    log::trace!("marking {} significant whitespace values", significant.len());

    let end = found.next();
    list.set_whitespace_significance(end, &|id, index| significant.contains(&(id, index)));
}
