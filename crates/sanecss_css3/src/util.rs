use crate::objects::ComponentValue;
use crate::token::{Token, TokenType};

/// Options for [`stringify`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringifyOptions {
    /// Drop insignificant tokens and use the shortest spelling of numbers
    pub minify: bool,
}

impl StringifyOptions {
    pub fn minified() -> Self {
        Self { minify: true }
    }
}

/// Turns tokens back into CSS text.
///
/// A `/**/` comment is inserted wherever two adjacent tokens would otherwise tokenize
/// differently, except between the tokens of a unicode-range (see [`Token::urange_hack`]).
/// When minifying, a dropped whitespace token that was doing that job is written as a
/// single space instead.
pub fn stringify(tokens: &[Token], options: StringifyOptions) -> String {
    let mut out = String::new();
    let mut prev: Option<&Token> = None;
    let mut urange_hack = 0usize;
    let mut dropped_whitespace = false;

    for token in tokens {
        if matches!(token.token_type, TokenType::Eof) {
            continue;
        }
        if options.minify && !token.significant() {
            dropped_whitespace |= token.is_whitespace();
            continue;
        }

        if let Some(prev) = prev {
            urange_hack = urange_hack.saturating_sub(1);
            if urange_hack == 0 && Token::separate(prev, token) {
                out.push_str(if dropped_whitespace { " " } else { "/**/" });
            }
        }
        dropped_whitespace = false;
        urange_hack = urange_hack.max(token.urange_hack());

        out.push_str(&token.to_css_string(options.minify));
        prev = Some(token);
    }

    out
}

/// Returns the index and value of the first item that is not a whitespace token
pub fn find_first_non_whitespace(values: &[ComponentValue]) -> Option<(usize, &ComponentValue)> {
    values.iter().enumerate().find(|(_, v)| !v.is_whitespace())
}
