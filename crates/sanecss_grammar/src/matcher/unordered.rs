//! `a && b` and `a || b`: matchers in any order

use crate::match_result::Match;
use crate::matcher::{dedup, MatchIter, MatchOptions, Matcher, MatcherKind};
use sanecss_css3::objects::ComponentValueList;
use sanecss_shared::errors::{CssError, CssResult};
use std::collections::HashSet;

/// Which of the matchers were used, one bit per matcher
type Used = u64;

const MAX_MATCHERS: usize = Used::BITS as usize;

fn bit(idx: usize) -> Used {
    1 << idx
}

impl Matcher {
    /// `a && b && c`: all of the matchers, in any order
    pub fn all_of(matchers: Vec<Matcher>) -> CssResult<Matcher> {
        Matcher::unordered(matchers, true)
    }

    /// `a || b || c`: one or more of the matchers, in any order
    pub fn some_of(matchers: Vec<Matcher>) -> CssResult<Matcher> {
        Matcher::unordered(matchers, false)
    }

    fn unordered(matchers: Vec<Matcher>, all: bool) -> CssResult<Matcher> {
        if matchers.len() > MAX_MATCHERS {
            return Err(CssError::invalid_argument(format!(
                "An unordered group holds at most {MAX_MATCHERS} matchers, got {}",
                matchers.len()
            )));
        }
        Ok(Matcher::from_kind(MatcherKind::UnorderedGroup { matchers, all }))
    }

    pub(super) fn unordered_matches<'a>(
        &'a self,
        list: &'a ComponentValueList,
        start: usize,
        options: MatchOptions,
        matchers: &'a [Matcher],
        all: bool,
    ) -> MatchIter<'a> {
        let full = match matchers.len() {
            MAX_MATCHERS => Used::MAX,
            n => bit(n) - 1,
        };

        dedup(Unordered {
            owner: self,
            matchers,
            list,
            start,
            options,
            all,
            full,
            stack: Vec::new(),
            dead: HashSet::new(),
            started: false,
        })
    }
}

struct Frame<'a> {
    pos: usize,
    used: Used,
    chosen: Option<Match>,
    /// Some complete match was found through this frame
    produced: bool,
    iter: Box<dyn Iterator<Item = (usize, Match)> + 'a>,
}

/// Depth first search over the order the matchers are used in. Like a quantifier, a frame is
/// yielded after everything below it.
struct Unordered<'a> {
    owner: &'a Matcher,
    matchers: &'a [Matcher],
    list: &'a ComponentValueList,
    start: usize,
    options: MatchOptions,
    all: bool,
    full: Used,
    stack: Vec<Frame<'a>>,
    /// States known not to lead to a complete match when all matchers are required
    dead: HashSet<(usize, Used)>,
    started: bool,
}

impl<'a> Unordered<'a> {
    fn frame(&self, pos: usize, used: Used, chosen: Option<Match>) -> Frame<'a> {
        let (matchers, list, options) = (self.matchers, self.list, self.options);
        let iter = matchers
            .iter()
            .enumerate()
            .filter(move |&(idx, _)| used & bit(idx) == 0)
            .flat_map(move |(idx, matcher)| {
                matcher
                    .generate_matches(list, pos, options)
                    .map(move |found| (idx, found))
            });

        Frame {
            pos,
            used,
            chosen,
            produced: false,
            iter: Box::new(iter),
        }
    }
}

impl Iterator for Unordered<'_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        if !self.started {
            self.started = true;
            let root = self.frame(self.start, 0, None);
            self.stack.push(root);
        }

        loop {
            let top = self.stack.last_mut()?;
            let used = top.used;
            match top.iter.next() {
                Some((idx, found)) => {
                    let used = used | bit(idx);
                    let pos = found.next();
                    if self.all && self.dead.contains(&(pos, used)) {
                        continue;
                    }
                    let frame = self.frame(pos, used, Some(found));
                    self.stack.push(frame);
                }
                None => {
                    let frame = self.stack.pop()?;
                    let complete = if self.all {
                        frame.used == self.full
                    } else {
                        frame.used != 0
                    };

                    let produced = frame.produced || complete;
                    if let Some(parent) = self.stack.last_mut() {
                        parent.produced |= produced;
                    }
                    if self.all && !produced {
                        self.dead.insert((frame.pos, frame.used));
                    }

                    if complete {
                        let chosen = self
                            .stack
                            .iter()
                            .filter_map(|f| f.chosen.as_ref())
                            .chain(frame.chosen.as_ref());
                        return Some(self.owner.make_match(
                            self.list.id(),
                            self.start,
                            frame.pos,
                            chosen,
                        ));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::match_result::Match;
    use crate::matcher::test_util::*;
    use crate::matcher::{MatchOptions, Matcher};
    use sanecss_css3::objects::{ComponentValue, ComponentValueList};
    use sanecss_css3::token::TokenType;
    use test_case::test_case;

    #[test]
    fn too_many_matchers() {
        let comma = Matcher::token(TokenType::Comma);
        assert!(Matcher::all_of(vec![comma.clone(); 64]).is_ok());
        let err = Matcher::some_of(vec![comma; 65]).unwrap_err();
        assert_eq!(err.message(), "An unordered group holds at most 64 matchers, got 65");
    }

    #[test]
    fn sixty_four_matchers() {
        let comma = Matcher::token(TokenType::Comma);
        let matcher = Matcher::all_of(vec![comma; 64]).unwrap();
        let values = list((0..64).map(|_| tok(TokenType::Comma)).collect());
        assert_eq!(matcher.find_match(&values, None).map(|m| m.next()), Some(64));
    }

    enum V {
        A,
        B,
        C,
        D,
        Ws,
        Block,
    }
    use V::*;

    fn values(spec: &[V]) -> ComponentValueList {
        list(
            spec.iter()
                .map(|v| -> ComponentValue {
                    match v {
                        A => ident("A"),
                        B => ident("B"),
                        C => ident("C"),
                        D => ident("D"),
                        Ws => ws(),
                        Block => block(TokenType::LCurly, vec![]),
                    }
                })
                .collect(),
        )
    }

    fn abc(optional: bool) -> Vec<Matcher> {
        ["A", "B", "C"]
            .into_iter()
            .map(|word| {
                let keyword = Matcher::keyword(word);
                if optional {
                    keyword.optional()
                } else {
                    keyword
                }
            })
            .collect()
    }

    #[test_case(&[A, B, C], false, false, &[3], &[3, 2, 1] ; "basic match")]
    #[test_case(&[C, A, B], false, false, &[3], &[3, 2, 1] ; "basic match different order")]
    #[test_case(&[A, B, C, Block], false, false, &[3], &[3, 2, 1] ; "basic match nonterminal")]
    #[test_case(&[], false, false, &[], &[] ; "non-match")]
    #[test_case(&[D, A, B], false, false, &[], &[] ; "non-match nonterminal")]
    #[test_case(&[A, C], false, false, &[], &[2, 1] ; "partial match")]
    #[test_case(&[C, B, Block], false, false, &[], &[2, 1] ; "partial match nonterminal")]
    #[test_case(&[B, Ws, C, Ws, A, Ws], false, true, &[6], &[6, 4, 2] ; "basic match with whitespace")]
    #[test_case(&[B, Ws, C, Ws, A, Ws], false, false, &[], &[1] ; "basic match with non-skipped whitespace")]
    #[test_case(&[A, Ws, B, Ws, C, Ws], true, true, &[6, 4, 2, 0], &[6, 4, 2, 0] ; "optionals with whitespace")]
    #[test_case(&[A, Ws, B, Ws, C, Ws], true, false, &[1, 0], &[1, 0] ; "optionals with non-skipped whitespace")]
    #[test_case(&[B, Ws, C, Ws], true, true, &[4, 2, 0], &[4, 2, 0] ; "optionals missing a")]
    #[test_case(&[C, Ws, A, Ws], true, true, &[2, 0, 4], &[2, 0, 4] ; "optionals missing b")]
    #[test_case(&[A], true, true, &[1, 0], &[1, 0] ; "optionals only a")]
    #[test_case(&[B], true, true, &[1, 0], &[1, 0] ; "optionals only b")]
    #[test_case(&[C], true, true, &[1, 0], &[1, 0] ; "optionals only c")]
    #[test_case(&[], true, true, &[0], &[0] ; "optionals nothing")]
    fn generate_matches(
        spec: &[V],
        optional: bool,
        skip: bool,
        expect_all: &[usize],
        expect_some: &[usize],
    ) {
        let values = values(spec);
        let options = MatchOptions::default().skip_whitespace(skip);

        let all = Matcher::all_of(abc(optional)).unwrap();
        assert_eq!(ends(all.generate_matches(&values, 0, options)), expect_all, "all_of");

        let some = Matcher::some_of(abc(optional)).unwrap();
        assert_eq!(ends(some.generate_matches(&values, 0, options)), expect_some, "some_of");
    }

    #[test]
    fn deduplication() {
        let a = Matcher::keyword("A").optional();
        let values = values(&[A, A, A, A]);
        let options = MatchOptions::default().skip_whitespace(false);

        let all = Matcher::all_of(vec![a.clone(), a.clone(), a.clone()]).unwrap();
        assert_eq!(ends(all.generate_matches(&values, 0, options)), vec![3, 2, 1, 0]);

        let some = Matcher::some_of(vec![a.clone(), a.clone(), a]).unwrap();
        assert_eq!(ends(some.generate_matches(&values, 0, options)), vec![3, 2, 1, 0]);
    }

    #[test]
    fn captures() {
        let a = Matcher::keyword("A").optional();
        let matcher =
            Matcher::all_of(vec![a.capture("foo"), a.capture("bar"), a.capture("foo")]).unwrap();
        let values = values(&[A, A, A, A]);
        let id = values.id();

        let m = |start, length, name| Match::new(id, start, length).named(name);
        let whole = |length, captures| Match::new(id, 0, length).with_captures(captures);
        let (foo00, foo01, foo10, foo11, foo20, foo21) = (
            m(0, 0, "foo"),
            m(0, 1, "foo"),
            m(1, 0, "foo"),
            m(1, 1, "foo"),
            m(2, 0, "foo"),
            m(2, 1, "foo"),
        );
        let (bar00, bar01, bar10, bar11, bar20, bar21) = (
            m(0, 0, "bar"),
            m(0, 1, "bar"),
            m(1, 0, "bar"),
            m(1, 1, "bar"),
            m(2, 0, "bar"),
            m(2, 1, "bar"),
        );

        let found: Vec<_> = matcher.generate_matches(&values, 0, MatchOptions::default()).collect();
        let expected = vec![
            whole(3, vec![foo01.clone(), bar11.clone(), foo21.clone()]),
            whole(2, vec![foo01.clone(), bar11.clone(), foo20.clone()]),
            whole(2, vec![foo01.clone(), bar10.clone(), foo11.clone()]),
            whole(1, vec![foo01.clone(), bar10.clone(), foo10.clone()]),
            whole(3, vec![foo01.clone(), foo11.clone(), bar21.clone()]),
            whole(2, vec![foo01.clone(), foo11.clone(), bar20.clone()]),
            whole(2, vec![foo01.clone(), foo10.clone(), bar11.clone()]),
            whole(1, vec![foo01.clone(), foo10.clone(), bar10.clone()]),
            whole(2, vec![foo00.clone(), bar01.clone(), foo11.clone()]),
            whole(1, vec![foo00.clone(), bar01.clone(), foo10.clone()]),
            whole(1, vec![foo00.clone(), bar00.clone(), foo01.clone()]),
            whole(0, vec![foo00.clone(), bar00.clone(), foo00.clone()]),
            whole(2, vec![foo00.clone(), foo01.clone(), bar11.clone()]),
            whole(1, vec![foo00.clone(), foo01.clone(), bar10.clone()]),
            whole(1, vec![foo00.clone(), foo00.clone(), bar01.clone()]),
            whole(0, vec![foo00.clone(), foo00.clone(), bar00.clone()]),
            whole(3, vec![bar01.clone(), foo11.clone(), foo21.clone()]),
            whole(2, vec![bar01.clone(), foo11.clone(), foo20.clone()]),
            whole(2, vec![bar01.clone(), foo10.clone(), foo11.clone()]),
            whole(1, vec![bar01.clone(), foo10.clone(), foo10.clone()]),
            whole(2, vec![bar00.clone(), foo01.clone(), foo11.clone()]),
            whole(1, vec![bar00.clone(), foo01.clone(), foo10.clone()]),
            whole(1, vec![bar00.clone(), foo00.clone(), foo01.clone()]),
            whole(0, vec![bar00, foo00.clone(), foo00]),
        ];
        assert_eq!(found, expected);
    }
}
