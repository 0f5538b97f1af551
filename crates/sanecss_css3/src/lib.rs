//! CSS3 tokenizer, object model and parser
//!
//! Text is read from a [`DataSource`](sanecss_shared::data_source::DataSource) by the
//! [`tokenizer::Tokenizer`], and the [`parser::Parser`] builds trees of [`objects`] out of
//! the tokens. Every object serializes back to CSS that tokenizes the same way.
//!
//! The tokenizer and parser follow [CSS Syntax Level 3](https://www.w3.org/TR/css-syntax-3/).

pub mod objects;
pub mod parser;
pub mod parser_config;
pub mod token;
pub mod tokenizer;
pub mod util;
pub mod walker;

use crate::objects::Stylesheet;
use crate::parser::Parser;
use crate::parser_config::ParserConfig;
use sanecss_shared::errors::ParseError;

/// Parses a complete stylesheet, returning it together with any parse errors
pub fn parse_stylesheet(data: &str, config: ParserConfig) -> (Stylesheet, Vec<ParseError>) {
    let mut parser = Parser::from_str(data, config);
    let stylesheet = parser.parse_stylesheet();
    (stylesheet, parser.parse_errors().to_vec())
}
