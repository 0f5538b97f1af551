use crate::parser_config::ParserConfig;
use crate::token::{Token, TokenType};
use crate::tokenizer::{TokenListTokenizer, TokenSource, Tokenizer};
use sanecss_shared::data_source::{DataSource, StringDataSource};
use sanecss_shared::errors::ParseError;
use sanecss_shared::location::Location;

mod component_value;
mod declaration;
mod rule;

/// The CSS parser. Builds object trees out of the tokens of a [`TokenSource`].
///
/// Each `parse_*` method is one of the entry points of
/// [parsing](https://drafts.csswg.org/css-syntax/#parser-entry-points). The parser never
/// fails: problems in the input are recorded as parse errors and the parser recovers the way
/// browsers do.
pub struct Parser<T: TokenSource> {
    /// Source of the tokens
    tokenizer: T,
    /// The parser configuration as given
    config: ParserConfig,
    /// The token that was consumed last
    current: Token,
    /// When set, the next consume returns `current` again
    reconsume: bool,
    /// Tokenizer and parser errors, in the order they occurred
    errors: Vec<ParseError>,
    /// Nesting depth of the component value being consumed
    cv_depth: usize,
    /// Set once the recursion limit was hit and the remaining input was thrown away
    depth_exceeded: bool,
    /// Preprocessor comments seen since the last rule or declaration
    pp_comments: Vec<Token>,
}

impl Parser<Tokenizer<StringDataSource>> {
    /// Creates a parser for CSS text
    pub fn from_str(text: &str, config: ParserConfig) -> Self {
        Self::from_data_source(StringDataSource::new(text), config)
    }
}

impl<S: DataSource> Parser<Tokenizer<S>> {
    /// Creates a parser reading characters from a data source
    pub fn from_data_source(source: S, config: ParserConfig) -> Self {
        let tokenizer = Tokenizer::new(source, config.location)
            .with_preprocessor_comments(config.preprocessor_comments);
        Self::new(tokenizer, config)
    }
}

impl Parser<TokenListTokenizer> {
    /// Creates a parser over already tokenized input. `eof` is returned once the tokens run
    /// out, so errors at the end of the input can carry a position.
    pub fn from_tokens(tokens: Vec<Token>, eof: Option<Token>) -> Self {
        Self::new(TokenListTokenizer::new(tokens, eof), ParserConfig::default())
    }
}

impl<T: TokenSource> Parser<T> {
    pub fn new(tokenizer: T, config: ParserConfig) -> Self {
        Self {
            tokenizer,
            config,
            current: Token::eof(),
            reconsume: false,
            errors: Vec::new(),
            cv_depth: 0,
            depth_exceeded: false,
            pp_comments: Vec::new(),
        }
    }

    /// Parse errors found so far, both from the tokenizer and from the parser itself
    pub fn parse_errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn clear_parse_errors(&mut self) {
        self.errors.clear();
        self.tokenizer.clear_parse_errors();
    }

    /// Records a parse error at the given location
    fn parse_error(&mut self, tag: &'static str, location: Option<Location>) {
        log::trace!("parse error {tag} at {location:?}");
        self.errors.push(ParseError::at(tag, location));
    }

    /// Records a parse error at the current token
    fn parse_error_here(&mut self, tag: &'static str) {
        self.parse_error(tag, self.current.position());
    }

    /// Records an unexpected EOF. These are not reported while unwinding from a recursion
    /// limit hit, since it was the parser that threw the input away.
    fn eof_error(&mut self, tag: &'static str) {
        if !self.depth_exceeded {
            self.parse_error_here(tag);
        }
    }

    /// Consumes the next token, making it the current one. Preprocessor comments are set
    /// aside for the rule or declaration they precede.
    fn consume_token(&mut self) -> &Token {
        if self.reconsume {
            self.reconsume = false;
            return &self.current;
        }

        loop {
            let token = self.tokenizer.next_token();
            self.errors.extend(self.tokenizer.take_parse_errors());

            if matches!(token.token_type, TokenType::PreprocessorComment(_)) {
                self.pp_comments.push(token);
                continue;
            }

            self.current = token;
            return &self.current;
        }
    }

    /// Pushes the current token back, so the next consume returns it again
    fn reconsume_current(&mut self) {
        self.reconsume = true;
    }

    /// Consumes whitespace tokens, leaving the first non-whitespace token to be consumed next
    fn skip_whitespace(&mut self) {
        while self.consume_token().is_whitespace() {}
        self.reconsume_current();
    }

    /// Takes the preprocessor comments that precede the construct starting at the current
    /// token
    fn take_pp_comments(&mut self) -> Vec<Token> {
        std::mem::take(&mut self.pp_comments)
    }

    /// Reads the remaining input without doing anything with it
    fn discard_rest(&mut self) {
        self.reconsume = false;
        while !self.current.is_eof() {
            self.current = self.tokenizer.next_token();
            self.errors.extend(self.tokenizer.take_parse_errors());
        }
        self.pp_comments.clear();
    }
}
