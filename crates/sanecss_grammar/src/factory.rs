//! Matchers for the basic CSS value types, built once and cached

use crate::matcher::{Matcher, UrlCheck};
use cow_utils::CowUtils;
use itertools::Itertools;
use lazy_static::lazy_static;
use sanecss_css3::objects::ComponentValue;
use sanecss_css3::token::{NumberType, Token, TokenType};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

lazy_static! {
    /// Keywords every property accepts
    pub static ref CSS_WIDE_KEYWORDS: HashSet<&'static str> =
        HashSet::from(["initial", "inherit", "unset", "revert"]);

    static ref LENGTH_UNITS: HashSet<&'static str> = HashSet::from([
        "em", "ex", "ch", "rem", "vw", "vh", "vmin", "vmax", "cm", "mm", "q", "in", "pt", "pc",
        "px",
    ]);
    static ref ANGLE_UNITS: HashSet<&'static str> =
        HashSet::from(["deg", "grad", "rad", "turn"]);
    static ref TIME_UNITS: HashSet<&'static str> = HashSet::from(["s", "ms"]);
    static ref FREQUENCY_UNITS: HashSet<&'static str> = HashSet::from(["hz", "khz"]);
    static ref RESOLUTION_UNITS: HashSet<&'static str> =
        HashSet::from(["dpi", "dpcm", "dppx", "x"]);
}

/// Decides whether a url may be used for the given kind of resource. Gets the kind, the url
/// and the modifier values, if any.
pub type UrlPolicy = Rc<dyn Fn(&str, &str, &[ComponentValue]) -> bool>;

/// Builds matchers for the basic value types.
///
/// Every matcher is built on first use and cached by name, so repeated calls hand out
/// handles to the same grammar.
///
/// ```
/// use sanecss_css3::parser::Parser;
/// use sanecss_css3::parser_config::ParserConfig;
/// use sanecss_grammar::MatcherFactory;
///
/// let factory = MatcherFactory::new();
/// let list = Parser::from_str("12px", ParserConfig::default()).parse_component_value_list();
/// assert!(factory.length().find_match(&list, None).is_some());
/// assert!(factory.angle().find_match(&list, None).is_none());
/// ```
#[derive(Default)]
pub struct MatcherFactory {
    cache: RefCell<HashMap<String, Matcher>>,
    url_policy: Option<UrlPolicy>,
    url_modifiers: Option<Matcher>,
}

impl MatcherFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts urls from [`MatcherFactory::url`] and [`MatcherFactory::urlstring`] to the
    /// ones `policy` accepts
    pub fn with_url_policy(
        mut self,
        policy: impl Fn(&str, &str, &[ComponentValue]) -> bool + 'static,
    ) -> Self {
        self.url_policy = Some(Rc::new(policy));
        self.cache.get_mut().clear();
        self
    }

    /// Allows modifiers matching `modifier` after the string in `url()`
    pub fn with_url_modifiers(mut self, modifier: Matcher) -> Self {
        self.url_modifiers = Some(modifier);
        self.cache.get_mut().clear();
        self
    }

    /// Returns the cached matcher for `key`, building it first if needed
    fn cached(&self, key: &str, build: impl FnOnce() -> Matcher) -> Matcher {
        let found = self.cache.borrow().get(key).cloned();
        if let Some(matcher) = found {
            return matcher;
        }

        log::debug!("building matcher {key}");
        let matcher = build();
        self.cache
            .borrow_mut()
            .insert(key.to_string(), matcher.clone());
        matcher
    }

    /// Whitespace that may be left out
    pub fn optional_whitespace(&self) -> Matcher {
        self.cached("optional_whitespace", || Matcher::whitespace(false))
    }

    /// Whitespace that must be present, like between the values of a space separated list
    pub fn significant_whitespace(&self) -> Matcher {
        self.cached("significant_whitespace", || Matcher::whitespace(true))
    }

    pub fn comma(&self) -> Matcher {
        self.cached("comma", || Matcher::token(TokenType::Comma))
    }

    /// `<ident>`
    pub fn ident(&self) -> Matcher {
        self.cached("ident", || Matcher::token(TokenType::Ident(String::new())))
    }

    /// `<custom-ident>`: an ident that is not a CSS-wide keyword, not `default` and none of
    /// `exclusions`, all ASCII case-insensitively
    pub fn custom_ident(&self, exclusions: &[&str]) -> Matcher {
        let excluded: HashSet<String> = exclusions
            .iter()
            .map(|word| word.cow_to_ascii_lowercase().into_owned())
            .collect();
        let key = format!("custom_ident:{}", excluded.iter().sorted().join(","));

        self.cached(&key, move || {
            Matcher::token_with(TokenType::Ident(String::new()), move |token| {
                let Some(value) = token.value() else {
                    return false;
                };
                let value = value.cow_to_ascii_lowercase();
                value != "default"
                    && !CSS_WIDE_KEYWORDS.contains(value.as_ref())
                    && !excluded.contains(value.as_ref())
            })
        })
    }

    /// `<string>`
    pub fn string(&self) -> Matcher {
        self.cached("string", || {
            Matcher::token(TokenType::QuotedString(String::new()))
        })
    }

    /// A string holding a url for the `kind` of resource, like `@import "foo.css"`
    pub fn urlstring(&self, kind: &str) -> Matcher {
        let policy = self.url_policy.clone();
        let kind = kind.to_string();
        self.cached(&format!("urlstring:{kind}"), move || {
            let string = TokenType::QuotedString(String::new());
            match policy {
                Some(policy) => Matcher::token_with(string, move |token| {
                    token
                        .value()
                        .is_some_and(|url| policy(&kind, url, &[]))
                }),
                None => Matcher::token(string),
            }
        })
    }

    /// `<url>` for the `kind` of resource. The url is captured as `url` and any modifiers as
    /// `modifier`.
    pub fn url(&self, kind: &str) -> Matcher {
        let policy = self.url_policy.clone();
        let modifiers = self.url_modifiers.clone();
        let kind = kind.to_string();
        self.cached(&format!("url:{kind}"), move || {
            let check = policy.map(|policy| -> UrlCheck {
                Rc::new(move |url: &str, modifiers: &[ComponentValue]| {
                    policy(&kind, url, modifiers)
                })
            });
            Matcher::url(check, modifiers)
        })
    }

    /// `initial`, `inherit`, `unset` and `revert`
    pub fn css_wide_keywords(&self) -> Matcher {
        self.cached("css_wide_keywords", || {
            let words: Vec<&str> = CSS_WIDE_KEYWORDS.iter().copied().sorted().collect();
            Matcher::keywords(&words)
        })
    }

    /// `<integer>`
    pub fn integer(&self) -> Matcher {
        self.cached("integer", || {
            Matcher::token_with(number_type(), |token| {
                token.number_type() == Some(NumberType::Integer)
            })
        })
    }

    /// `<number>`
    pub fn number(&self) -> Matcher {
        self.cached("number", || Matcher::token(number_type()))
    }

    /// `<percentage>`
    pub fn percentage(&self) -> Matcher {
        self.cached("percentage", || {
            Matcher::token(TokenType::Percentage {
                value: 0.0,
                repr: String::new(),
                kind: NumberType::Number,
            })
        })
    }

    /// `<number> | <percentage>`
    pub fn number_percentage(&self) -> Matcher {
        self.cached("number_percentage", || {
            Matcher::alternative(vec![self.number(), self.percentage()])
        })
    }

    /// Any `<dimension>`, whatever its unit
    pub fn dimension(&self) -> Matcher {
        self.cached("dimension", || Matcher::token(dimension_type()))
    }

    /// `<length>`. A unitless zero is a length too.
    pub fn length(&self) -> Matcher {
        self.cached("length", || {
            Matcher::alternative(vec![
                Matcher::token_with(number_type(), |token| token.numeric_value() == Some(0.0)),
                with_unit(&LENGTH_UNITS),
            ])
        })
    }

    /// `<length-percentage>`
    pub fn length_percentage(&self) -> Matcher {
        self.cached("length_percentage", || {
            Matcher::alternative(vec![self.length(), self.percentage()])
        })
    }

    /// `<angle>`
    pub fn angle(&self) -> Matcher {
        self.cached("angle", || with_unit(&ANGLE_UNITS))
    }

    /// `<angle-percentage>`
    pub fn angle_percentage(&self) -> Matcher {
        self.cached("angle_percentage", || {
            Matcher::alternative(vec![self.angle(), self.percentage()])
        })
    }

    /// `<time>`
    pub fn time(&self) -> Matcher {
        self.cached("time", || with_unit(&TIME_UNITS))
    }

    /// `<time-percentage>`
    pub fn time_percentage(&self) -> Matcher {
        self.cached("time_percentage", || {
            Matcher::alternative(vec![self.time(), self.percentage()])
        })
    }

    /// `<frequency>`
    pub fn frequency(&self) -> Matcher {
        self.cached("frequency", || with_unit(&FREQUENCY_UNITS))
    }

    /// `<frequency-percentage>`
    pub fn frequency_percentage(&self) -> Matcher {
        self.cached("frequency_percentage", || {
            Matcher::alternative(vec![self.frequency(), self.percentage()])
        })
    }

    /// `<resolution>`
    pub fn resolution(&self) -> Matcher {
        self.cached("resolution", || with_unit(&RESOLUTION_UNITS))
    }

    /// `<urange>`, capturing its bounds as `start` and `end`
    pub fn urange(&self) -> Matcher {
        self.cached("urange", Matcher::urange)
    }
}

fn number_type() -> TokenType {
    TokenType::Number {
        value: 0.0,
        repr: String::new(),
        kind: NumberType::Number,
    }
}

fn dimension_type() -> TokenType {
    TokenType::Dimension {
        value: 0.0,
        repr: String::new(),
        kind: NumberType::Number,
        unit: String::new(),
    }
}

/// A dimension whose unit is one of `units`, ASCII case-insensitively
fn with_unit(units: &'static HashSet<&'static str>) -> Matcher {
    Matcher::token_with(dimension_type(), move |token: &Token| {
        token
            .unit()
            .is_some_and(|unit| units.contains(unit.cow_to_ascii_lowercase().as_ref()))
    })
}
