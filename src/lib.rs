//! Tokenizer, parser and grammar matcher for sanitizing untrusted CSS.
//!
//! The work is split over three crates, re-exported here:
//!
//! - [`shared`]: data sources, locations and error types
//! - [`css3`]: tokens, the tokenizer, the object model and the parser
//! - [`grammar`]: matchers that check component values against CSS value grammars
//!
//! ```
//! use sanecss::prelude::*;
//!
//! let mut value = Parser::from_str("1px , 2em", ParserConfig::default())
//!     .parse_component_value_list();
//! let factory = MatcherFactory::new();
//! let lengths = factory.length().hash(1, usize::MAX);
//! assert!(lengths.match_against(&mut value, None).is_some());
//! ```

pub mod prelude;

pub use sanecss_css3 as css3;
pub use sanecss_grammar as grammar;
pub use sanecss_shared as shared;

pub use sanecss_css3::parse_stylesheet;
