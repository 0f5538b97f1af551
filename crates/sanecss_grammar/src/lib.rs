//! Grammar matching for CSS component values
//!
//! A [`Matcher`] describes a piece of CSS value grammar, like `<length>#` or
//! `[ a | b ] && c?`. Run against a [`ComponentValueList`](sanecss_css3::objects::ComponentValueList),
//! it lazily produces every way the grammar can match a prefix of the list, longest first.
//! Sanitizers use [`Matcher::match_against`] to check that a whole value is valid, and the
//! captured sub-matches to find the parts they care about.
//!
//! [`MatcherFactory`] builds and caches the matchers for the common value types.

pub mod factory;
pub mod match_result;
pub mod matcher;

pub use factory::MatcherFactory;
pub use match_result::Match;
pub use matcher::{MatchIter, MatchOptions, Matcher};
