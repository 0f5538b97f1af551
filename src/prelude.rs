pub use sanecss_shared::data_source::{DataSource, StringDataSource};
pub use sanecss_shared::errors::{CssError, CssResult, ParseError};
pub use sanecss_shared::location::Location;

pub use sanecss_css3::objects::*;
pub use sanecss_css3::parse_stylesheet;
pub use sanecss_css3::parser::Parser;
pub use sanecss_css3::parser_config::ParserConfig;
pub use sanecss_css3::token::{Token, TokenType};
pub use sanecss_css3::util::{stringify, StringifyOptions};

pub use sanecss_grammar::{Match, MatchOptions, Matcher, MatcherFactory};
