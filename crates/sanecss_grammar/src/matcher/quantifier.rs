//! Repetition: `?`, `*`, `+`, `{A,B}` and `#`

use crate::match_result::Match;
use crate::matcher::{
    dedup, skip_all_whitespace, token_at, MatchIter, MatchOptions, Matcher, MatcherKind,
};
use sanecss_css3::objects::ComponentValueList;

impl Matcher {
    /// Matches `matcher` between `min` and `max` times. `usize::MAX` is unbounded. With
    /// `commas`, the repetitions are separated by commas, with optional whitespace around
    /// them whether or not whitespace is being skipped.
    pub fn quantifier(matcher: Matcher, min: usize, max: usize, commas: bool) -> Matcher {
        Matcher::from_kind(MatcherKind::Quantifier {
            matcher,
            min,
            max,
            commas,
        })
    }

    /// `?`
    pub fn optional(&self) -> Matcher {
        Matcher::quantifier(self.clone(), 0, 1, false)
    }

    /// `*`
    pub fn star(&self) -> Matcher {
        Matcher::quantifier(self.clone(), 0, usize::MAX, false)
    }

    /// `+`
    pub fn plus(&self) -> Matcher {
        Matcher::quantifier(self.clone(), 1, usize::MAX, false)
    }

    /// `{min,max}`
    pub fn count(&self, min: usize, max: usize) -> Matcher {
        Matcher::quantifier(self.clone(), min, max, false)
    }

    /// `#{min,max}`. Plain `#` is `hash(1, usize::MAX)`.
    pub fn hash(&self, min: usize, max: usize) -> Matcher {
        Matcher::quantifier(self.clone(), min, max, true)
    }

    #[allow(clippy::too_many_arguments)]
    pub(super) fn quantifier_matches<'a>(
        &'a self,
        list: &'a ComponentValueList,
        start: usize,
        options: MatchOptions,
        matcher: &'a Matcher,
        min: usize,
        max: usize,
        commas: bool,
    ) -> MatchIter<'a> {
        dedup(Repeat {
            owner: self,
            matcher,
            list,
            start,
            options,
            min,
            max,
            commas,
            stack: Vec::new(),
            started: false,
        })
    }
}

struct Frame<'a> {
    /// The repetition this frame extends, `None` for the root
    rep: Option<Match>,
    end: usize,
    iter: MatchIter<'a>,
}

/// Depth first search over the repetitions. A frame is yielded once all longer matches
/// through it have been, so matches come out longest first. The search stops for good at
/// the first empty repetition.
struct Repeat<'a> {
    owner: &'a Matcher,
    matcher: &'a Matcher,
    list: &'a ComponentValueList,
    start: usize,
    options: MatchOptions,
    min: usize,
    max: usize,
    commas: bool,
    stack: Vec<Frame<'a>>,
    started: bool,
}

impl<'a> Repeat<'a> {
    /// Candidates for the next repetition, following `reps` earlier ones that end at `pos`
    fn candidates(&self, pos: usize, reps: usize) -> MatchIter<'a> {
        let (matcher, list, options) = (self.matcher, self.list, self.options);
        if reps >= self.max {
            return Box::new(std::iter::empty());
        }
        if !self.commas || reps == 0 {
            return matcher.generate_matches(list, pos, options);
        }

        let comma = skip_all_whitespace(list, pos);
        if token_at(list, comma).is_some_and(|t| t.is_comma()) {
            matcher.generate_matches(list, skip_all_whitespace(list, comma + 1), options)
        } else {
            Box::new(std::iter::empty())
        }
    }

    fn result(&self, end: usize, last: Option<&Match>) -> Match {
        let reps = self.stack.iter().filter_map(|f| f.rep.as_ref()).chain(last);
        self.owner.make_match(self.list.id(), self.start, end, reps)
    }
}

impl Iterator for Repeat<'_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        if !self.started {
            self.started = true;
            let iter = self.candidates(self.start, 0);
            self.stack.push(Frame {
                rep: None,
                end: self.start,
                iter,
            });
        }

        loop {
            let depth = self.stack.len();
            let candidate = self.stack.last_mut()?.iter.next();
            match candidate {
                Some(found) if found.length() == 0 => {
                    // A repetition has to consume something, or there is no end to them
                    log::debug!("empty match in quantifier at {}", found.start());
                    self.stack.clear();
                    return None;
                }
                Some(found) => {
                    let end = found.next();
                    let iter = self.candidates(end, depth);
                    self.stack.push(Frame {
                        rep: Some(found),
                        end,
                        iter,
                    });
                }
                None => {
                    let frame = self.stack.pop()?;
                    if depth > self.min {
                        return Some(self.result(frame.end, frame.rep.as_ref()));
                    }
                }
            }
        }
    }
}
