//! Alternatives and sequences of matchers

use crate::match_result::Match;
use crate::matcher::{
    dedup, next_index, token_at, MatchCheck, MatchIter, MatchOptions, Matcher, MatcherKind,
};
use sanecss_css3::objects::ComponentValueList;
use std::rc::Rc;

impl Matcher {
    /// `a | b | c`: any one of the matchers
    pub fn alternative(matchers: Vec<Matcher>) -> Matcher {
        Matcher::from_kind(MatcherKind::Alternative(matchers))
    }

    /// `a b c`: all matchers, in order. With `commas`, each non-empty match after the first
    /// is preceded by a comma.
    pub fn juxtaposition(matchers: Vec<Matcher>, commas: bool) -> Matcher {
        Matcher::from_kind(MatcherKind::Juxtaposition { matchers, commas })
    }

    /// Drops the empty matches of `matcher`
    pub fn non_empty(matcher: Matcher) -> Matcher {
        Matcher::from_kind(MatcherKind::NonEmpty(matcher))
    }

    /// Keeps only the matches of `matcher` that pass `check`
    pub fn checked(
        matcher: Matcher,
        check: impl Fn(&ComponentValueList, &Match, MatchOptions) -> bool + 'static,
    ) -> Matcher {
        let check: MatchCheck = Rc::new(check);
        Matcher::from_kind(MatcherKind::Checked { matcher, check })
    }

    pub(super) fn alternative_matches<'a>(
        &'a self,
        list: &'a ComponentValueList,
        start: usize,
        options: MatchOptions,
        matchers: &'a [Matcher],
    ) -> MatchIter<'a> {
        dedup(matchers.iter().flat_map(move |matcher| {
            matcher
                .generate_matches(list, start, options)
                .map(move |found| self.make_match(list.id(), start, found.next(), [&found]))
        }))
    }

    pub(super) fn juxtaposition_matches<'a>(
        &'a self,
        list: &'a ComponentValueList,
        start: usize,
        options: MatchOptions,
        matchers: &'a [Matcher],
        commas: bool,
    ) -> MatchIter<'a> {
        if matchers.is_empty() {
            return Box::new(std::iter::once(self.make_match(list.id(), start, start, None)));
        }

        dedup(Sequence {
            owner: self,
            matchers,
            list,
            start,
            options,
            commas,
            iters: Vec::new(),
            chosen: Vec::new(),
            started: false,
        })
    }
}

/// Depth first search over the matches of each matcher in a juxtaposition. `iters[i]` holds
/// the remaining candidates for matcher `i`, `chosen[i]` the candidate being tried.
struct Sequence<'a> {
    owner: &'a Matcher,
    matchers: &'a [Matcher],
    list: &'a ComponentValueList,
    start: usize,
    options: MatchOptions,
    commas: bool,
    iters: Vec<MatchIter<'a>>,
    chosen: Vec<Match>,
    started: bool,
}

impl<'a> Sequence<'a> {
    fn candidates(&self) -> MatchIter<'a> {
        let (matchers, list, options) = (self.matchers, self.list, self.options);
        let matcher = &matchers[self.chosen.len()];
        let pos = self.chosen.last().map_or(self.start, Match::next);

        if !self.commas || self.chosen.iter().all(|m| m.length() == 0) {
            return matcher.generate_matches(list, pos, options);
        }

        // Something was matched already, so a non-empty match needs a comma first
        let after_comma: MatchIter<'a> = if token_at(list, pos).is_some_and(|t| t.is_comma()) {
            Box::new(
                matcher
                    .generate_matches(list, next_index(list, pos, options), options)
                    .filter(|m| m.length() > 0),
            )
        } else {
            Box::new(std::iter::empty())
        };
        let empty = matcher
            .generate_matches(list, pos, options)
            .filter(|m| m.length() == 0);
        Box::new(after_comma.chain(empty))
    }
}

impl Iterator for Sequence<'_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        if !self.started {
            self.started = true;
            let first = self.candidates();
            self.iters.push(first);
        }

        loop {
            let candidate = self.iters.last_mut()?.next();
            match candidate {
                None => {
                    self.iters.pop();
                    self.chosen.pop();
                }
                Some(found) => {
                    self.chosen.push(found);
                    if self.chosen.len() == self.matchers.len() {
                        let end = self.chosen.last().map_or(self.start, Match::next);
                        let result =
                            self.owner
                                .make_match(self.list.id(), self.start, end, &self.chosen);
                        self.chosen.pop();
                        return Some(result);
                    }
                    let next = self.candidates();
                    self.iters.push(next);
                }
            }
        }
    }
}
