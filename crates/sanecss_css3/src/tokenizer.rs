use crate::token::{Number, NumberType, Token, TokenType};
use sanecss_shared::data_source::Character::{Ch, StreamEnd};
use sanecss_shared::data_source::{Character, DataSource};
use sanecss_shared::errors::ParseError;
use sanecss_shared::location::{Location, LocationHandler};
use std::char::REPLACEMENT_CHARACTER;
use std::collections::VecDeque;

/// Anything the parser can pull tokens from
pub trait TokenSource {
    /// Returns the next token. Once the input is exhausted, EOF is returned on every call.
    fn next_token(&mut self) -> Token;
    /// Parse errors collected so far, in the order they occurred
    fn parse_errors(&self) -> &[ParseError];
    /// Removes and returns the collected parse errors
    fn take_parse_errors(&mut self) -> Vec<ParseError>;
    fn clear_parse_errors(&mut self) {
        self.take_parse_errors();
    }
}

/// The CSS3 tokenizer, turning characters from a data source into tokens.
///
/// See [tokenization](https://drafts.csswg.org/css-syntax/#tokenization).
pub struct Tokenizer<S: DataSource> {
    /// Source of (not yet preprocessed) characters
    source: S,
    /// Preprocessed characters that have been looked at but not consumed
    lookahead: VecDeque<Character>,
    /// Tracks the location of the next character to consume
    location: LocationHandler,
    /// Parse errors found so far
    errors: Vec<ParseError>,
    /// Emit `/*@...*/` comments as tokens instead of discarding them
    preprocessor_comments: bool,
}

impl<S: DataSource> Tokenizer<S> {
    /// Creates a new tokenizer on the given source. The first character is reported at the
    /// given location, which does not have to be 1:1.
    pub fn new(source: S, location: Location) -> Self {
        Self {
            source,
            lookahead: VecDeque::new(),
            location: LocationHandler::new(location),
            errors: Vec::new(),
            preprocessor_comments: false,
        }
    }

    /// Keeps comments whose body starts with `@` as preprocessor comment tokens
    pub fn with_preprocessor_comments(mut self, enabled: bool) -> Self {
        self.preprocessor_comments = enabled;
        self
    }

    /// Returns the location of the next character to be consumed
    pub fn current_location(&self) -> Location {
        self.location.current()
    }

    fn parse_error(&mut self, tag: &'static str, location: Location) {
        log::trace!("parse error {tag} at {location}");
        self.errors.push(ParseError::new(tag, location));
    }

    /// Reads one character from the source, normalizing newlines and NUL.
    ///
    /// See [preprocessing](https://drafts.csswg.org/css-syntax/#input-preprocessing).
    fn read_preprocessed(&mut self) -> Character {
        match self.source.read_character() {
            Ch('\0') => Ch(REPLACEMENT_CHARACTER),
            Ch('\u{000C}') => Ch('\n'),
            Ch('\r') => {
                let next = self.source.read_character();
                if next != Ch('\n') {
                    self.source.put_back_character(next);
                }
                Ch('\n')
            }
            c => c,
        }
    }

    /// Looks at the character `offset` positions after the next one without consuming it
    fn look_ahead(&mut self, offset: usize) -> Character {
        while self.lookahead.len() <= offset {
            let c = self.read_preprocessed();
            self.lookahead.push_back(c);
        }
        self.lookahead[offset]
    }

    fn current_char(&mut self) -> Character {
        self.look_ahead(0)
    }

    /// Consumes the next character
    fn next_char(&mut self) -> Character {
        let c = match self.lookahead.pop_front() {
            Some(c) => c,
            None => self.read_preprocessed(),
        };
        self.location.inc(c);
        c
    }

    fn consume_chars(&mut self, len: usize) {
        for _ in 0..len {
            self.next_char();
        }
    }

    /// 4.3.1. [Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    fn consume_token(&mut self) -> Token {
        while self.current_char() == Ch('/') && self.look_ahead(1) == Ch('*') {
            if let Some(token) = self.consume_comment() {
                return token;
            }
        }

        let loc = self.current_location();

        match self.current_char() {
            StreamEnd => Token::new(TokenType::Eof, loc),
            c if c.is_whitespace() => {
                self.consume_whitespace();
                Token::new(TokenType::Whitespace, loc)
            }
            Ch(quote @ ('"' | '\'')) => self.consume_string_token(quote, loc),
            Ch('#') => {
                let next = self.look_ahead(1);
                if self.is_name_char(next) || self.is_valid_escape(1) {
                    self.next_char();
                    let is_id = self.starts_ident_seq(0);
                    let name = self.consume_name();
                    return if is_id {
                        Token::new_id_hash(&name, loc)
                    } else {
                        Token::new_hash(&name, loc)
                    };
                }

                self.next_char();
                Token::new_delim('#', loc)
            }
            Ch(c @ ('$' | '*' | '^' | '~' | '|')) => {
                let token_type = match (c, self.look_ahead(1)) {
                    ('$', Ch('=')) => Some(TokenType::SuffixMatch),
                    ('*', Ch('=')) => Some(TokenType::SubstringMatch),
                    ('^', Ch('=')) => Some(TokenType::PrefixMatch),
                    ('~', Ch('=')) => Some(TokenType::IncludeMatch),
                    ('|', Ch('=')) => Some(TokenType::DashMatch),
                    ('|', Ch('|')) => Some(TokenType::Column),
                    _ => None,
                };

                match token_type {
                    Some(token_type) => {
                        self.consume_chars(2);
                        Token::new(token_type, loc)
                    }
                    None => {
                        self.next_char();
                        Token::new_delim(c, loc)
                    }
                }
            }
            Ch('(') => self.single(TokenType::LParen, loc),
            Ch(')') => self.single(TokenType::RParen, loc),
            Ch('[') => self.single(TokenType::LBracket, loc),
            Ch(']') => self.single(TokenType::RBracket, loc),
            Ch('{') => self.single(TokenType::LCurly, loc),
            Ch('}') => self.single(TokenType::RCurly, loc),
            Ch(',') => self.single(TokenType::Comma, loc),
            Ch(':') => self.single(TokenType::Colon, loc),
            Ch(';') => self.single(TokenType::Semicolon, loc),
            Ch(c @ ('+' | '.')) => {
                if self.starts_number(0) {
                    return self.consume_numeric_token(loc);
                }

                self.next_char();
                Token::new_delim(c, loc)
            }
            Ch('-') => {
                if self.starts_number(0) {
                    return self.consume_numeric_token(loc);
                }

                if self.look_ahead(1) == Ch('-') && self.look_ahead(2) == Ch('>') {
                    self.consume_chars(3);
                    return Token::new(TokenType::Cdc, loc);
                }

                if self.starts_ident_seq(0) {
                    return self.consume_ident_like_seq(loc);
                }

                self.next_char();
                Token::new_delim('-', loc)
            }
            Ch('<') => {
                if self.look_ahead(1) == Ch('!')
                    && self.look_ahead(2) == Ch('-')
                    && self.look_ahead(3) == Ch('-')
                {
                    self.consume_chars(4);
                    return Token::new(TokenType::Cdo, loc);
                }

                self.next_char();
                Token::new_delim('<', loc)
            }
            Ch('@') => {
                self.next_char();

                if self.starts_ident_seq(0) {
                    let name = self.consume_name();
                    return Token::new_atkeyword(&name, loc);
                }

                Token::new_delim('@', loc)
            }
            Ch('\\') => {
                if self.is_valid_escape(0) {
                    return self.consume_ident_like_seq(loc);
                }

                self.parse_error("bad-escape", loc);
                self.next_char();
                Token::new_delim('\\', loc)
            }
            c if c.is_numeric() => self.consume_numeric_token(loc),
            c if self.is_ident_start(c) => self.consume_ident_like_seq(loc),
            Ch(c) => {
                self.next_char();
                Token::new_delim(c, loc)
            }
        }
    }

    fn single(&mut self, token_type: TokenType, loc: Location) -> Token {
        self.next_char();
        Token::new(token_type, loc)
    }

    /// 4.3.2. [Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    ///
    /// Returns a token only for preprocessor comments when those are enabled.
    fn consume_comment(&mut self) -> Option<Token> {
        let loc = self.current_location();
        self.consume_chars(2);

        let mut body = String::new();
        loop {
            match self.next_char() {
                StreamEnd => {
                    self.parse_error("unclosed-comment", loc);
                    break;
                }
                Ch('*') if self.current_char() == Ch('/') => {
                    self.next_char();
                    break;
                }
                Ch(c) => body.push(c),
            }
        }

        if self.preprocessor_comments && body.starts_with('@') {
            return Some(Token::new(TokenType::PreprocessorComment(body), loc));
        }

        None
    }

    fn consume_whitespace(&mut self) {
        while self.current_char().is_whitespace() {
            self.next_char();
        }
    }

    /// 4.3.5. [Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn consume_string_token(&mut self, quote: char, loc: Location) -> Token {
        self.next_char();

        let mut value = String::new();
        loop {
            match self.current_char() {
                StreamEnd => {
                    self.parse_error("unclosed-string", loc);
                    return Token::new_quoted_string(&value, loc);
                }
                Ch('\n') => {
                    let newline = self.current_location();
                    self.parse_error("newline-in-string", newline);
                    return Token::new(TokenType::BadString, loc);
                }
                Ch('\\') => {
                    let backslash = self.current_location();
                    self.next_char();
                    match self.current_char() {
                        StreamEnd => self.parse_error("bad-escape", backslash),
                        Ch('\n') => {
                            self.next_char();
                        }
                        _ => value.push(self.consume_escaped_code_point(backslash)),
                    }
                }
                Ch(c) => {
                    self.next_char();
                    if c == quote {
                        return Token::new_quoted_string(&value, loc);
                    }
                    value.push(c);
                }
            }
        }
    }

    /// 4.3.3. [Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric_token(&mut self, loc: Location) -> Token {
        let (value, repr, kind) = self.consume_number();

        if self.starts_ident_seq(0) {
            let unit = self.consume_name();
            return Token::new(
                TokenType::Dimension {
                    value,
                    repr,
                    kind,
                    unit,
                },
                loc,
            );
        }

        if self.current_char() == Ch('%') {
            self.next_char();
            return Token::new(TokenType::Percentage { value, repr, kind }, loc);
        }

        Token::new(TokenType::Number { value, repr, kind }, loc)
    }

    /// 4.3.12. [Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-a-number)
    fn consume_number(&mut self) -> (Number, String, NumberType) {
        let mut repr = String::new();
        let mut kind = NumberType::Integer;

        if let Ch(c @ ('+' | '-')) = self.current_char() {
            self.next_char();
            repr.push(c);
        }

        repr.push_str(&self.consume_digits());

        if self.current_char() == Ch('.') && self.look_ahead(1).is_numeric() {
            self.next_char();
            repr.push('.');
            repr.push_str(&self.consume_digits());
            kind = NumberType::Number;
        }

        if let Ch(e @ ('e' | 'E')) = self.current_char() {
            let sign = match self.look_ahead(1) {
                Ch(s @ ('+' | '-')) if self.look_ahead(2).is_numeric() => Some(Some(s)),
                c if c.is_numeric() => Some(None),
                _ => None,
            };

            if let Some(sign) = sign {
                self.next_char();
                repr.push(e);
                if let Some(s) = sign {
                    self.next_char();
                    repr.push(s);
                }
                repr.push_str(&self.consume_digits());
                kind = NumberType::Number;
            }
        }

        let value = match repr.parse::<Number>() {
            Ok(v) if v.is_finite() => v,
            Ok(v) => Number::MAX.copysign(v),
            Err(_) => 0.0,
        };

        (value, repr, kind)
    }

    fn consume_digits(&mut self) -> String {
        let mut digits = String::new();
        while let Ch(c) = self.current_char() {
            if !c.is_ascii_digit() {
                break;
            }
            self.next_char();
            digits.push(c);
        }
        digits
    }

    /// 4.3.4. [Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    fn consume_ident_like_seq(&mut self, loc: Location) -> Token {
        let name = self.consume_name();

        if self.current_char() != Ch('(') {
            return Token::new_ident(&name, loc);
        }
        self.next_char();

        if !name.eq_ignore_ascii_case("url") {
            return Token::new_function(&name, loc);
        }

        while self.current_char().is_whitespace() && self.look_ahead(1).is_whitespace() {
            self.next_char();
        }

        let quote_follows = |c: Character| matches!(c, Ch('"' | '\''));
        let next = self.current_char();
        if quote_follows(next) || (next.is_whitespace() && quote_follows(self.look_ahead(1))) {
            return Token::new_function(&name, loc);
        }

        self.consume_url(loc)
    }

    /// 4.3.6. [Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-url-token)
    fn consume_url(&mut self, loc: Location) -> Token {
        let mut url = String::new();

        self.consume_whitespace();

        loop {
            let char_loc = self.current_location();
            match self.next_char() {
                Ch(')') => return Token::new_url(&url, loc),
                StreamEnd => {
                    self.parse_error("unclosed-url", loc);
                    return Token::new_url(&url, loc);
                }
                c if c.is_whitespace() => {
                    self.consume_whitespace();
                    match self.current_char() {
                        Ch(')') => {
                            self.next_char();
                            return Token::new_url(&url, loc);
                        }
                        StreamEnd => {
                            self.parse_error("unclosed-url", loc);
                            return Token::new_url(&url, loc);
                        }
                        _ => {
                            self.consume_remnants_of_bad_url();
                            return Token::new(TokenType::BadUrl, loc);
                        }
                    }
                }
                Ch('"' | '\'' | '(') => {
                    self.parse_error("bad-character-in-url", char_loc);
                    self.consume_remnants_of_bad_url();
                    return Token::new(TokenType::BadUrl, loc);
                }
                Ch(c) if is_non_printable(c) => {
                    self.parse_error("bad-character-in-url", char_loc);
                    self.consume_remnants_of_bad_url();
                    return Token::new(TokenType::BadUrl, loc);
                }
                Ch('\\') => {
                    if self.current_char() == Ch('\n') {
                        self.parse_error("bad-escape", char_loc);
                        self.consume_remnants_of_bad_url();
                        return Token::new(TokenType::BadUrl, loc);
                    }
                    url.push(self.consume_escaped_code_point(char_loc));
                }
                Ch(c) => url.push(c),
            }
        }
    }

    /// 4.3.14. [Consume the remnants of a bad url](https://www.w3.org/TR/css-syntax-3/#consume-remnants-of-bad-url)
    fn consume_remnants_of_bad_url(&mut self) {
        loop {
            let char_loc = self.current_location();
            match self.next_char() {
                Ch(')') | StreamEnd => return,
                Ch('\\') if self.current_char() != Ch('\n') => {
                    self.consume_escaped_code_point(char_loc);
                }
                _ => {}
            }
        }
    }

    /// 4.3.7. [Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    ///
    /// Expects the backslash to be consumed already; `backslash` is its location.
    fn consume_escaped_code_point(&mut self, backslash: Location) -> char {
        let first = self.next_char();

        match first {
            StreamEnd => {
                self.parse_error("bad-escape", backslash);
                REPLACEMENT_CHARACTER
            }
            Ch(c) if c.is_ascii_hexdigit() => {
                let mut hex = String::from(c);
                while hex.len() < 6 && self.current_char().is_hex_digit() {
                    hex.push(self.next_char().into());
                }

                if self.current_char().is_whitespace() {
                    self.next_char();
                }

                u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|&cp| cp != 0)
                    .and_then(char::from_u32)
                    .unwrap_or(REPLACEMENT_CHARACTER)
            }
            Ch(c) => c,
        }
    }

    /// 4.3.11. [Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_name(&mut self) -> String {
        let mut name = String::new();

        loop {
            let c = self.current_char();
            if self.is_name_char(c) {
                name.push(self.next_char().into());
            } else if self.is_valid_escape(0) {
                let backslash = self.current_location();
                self.next_char();
                name.push(self.consume_escaped_code_point(backslash));
            } else {
                return name;
            }
        }
    }

    fn is_ident_start(&self, c: Character) -> bool {
        matches!(c, Ch(c) if c.is_ascii_alphabetic() || c == '_' || !c.is_ascii())
    }

    fn is_name_char(&self, c: Character) -> bool {
        self.is_ident_start(c) || matches!(c, Ch(c) if c.is_ascii_digit() || c == '-')
    }

    /// 4.3.8. [Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
    fn is_valid_escape(&mut self, offset: usize) -> bool {
        self.look_ahead(offset) == Ch('\\') && self.look_ahead(offset + 1) != Ch('\n')
    }

    /// 4.3.9. [Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    fn starts_ident_seq(&mut self, offset: usize) -> bool {
        match self.look_ahead(offset) {
            Ch('-') => {
                let next = self.look_ahead(offset + 1);
                next == Ch('-') || self.is_ident_start(next) || self.is_valid_escape(offset + 1)
            }
            Ch('\\') => self.is_valid_escape(offset),
            c => self.is_ident_start(c),
        }
    }

    /// 4.3.10. [Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
    fn starts_number(&mut self, offset: usize) -> bool {
        match self.look_ahead(offset) {
            Ch('+' | '-') => {
                let next = self.look_ahead(offset + 1);
                next.is_numeric() || (next == Ch('.') && self.look_ahead(offset + 2).is_numeric())
            }
            Ch('.') => self.look_ahead(offset + 1).is_numeric(),
            c => c.is_numeric(),
        }
    }
}

fn is_non_printable(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{E}'..='\u{1F}' | '\u{7F}')
}

impl<S: DataSource> TokenSource for Tokenizer<S> {
    fn next_token(&mut self) -> Token {
        let token = self.consume_token();
        log::trace!("{:?}", token);
        token
    }

    fn parse_errors(&self) -> &[ParseError] {
        &self.errors
    }

    fn take_parse_errors(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }
}

/// Replays a prepared list of tokens, followed by EOF.
pub struct TokenListTokenizer {
    tokens: std::vec::IntoIter<Token>,
    eof: Token,
    /// Always empty: prepared tokens carry no diagnostics
    errors: Vec<ParseError>,
}

impl TokenListTokenizer {
    /// Creates a tokenizer over the given tokens. When `eof` is not an EOF token, an EOF
    /// token at its position is used instead. Without one, the EOF has no position.
    pub fn new(tokens: Vec<Token>, eof: Option<Token>) -> Self {
        let eof = match eof {
            Some(token) if token.is_eof() => token,
            Some(token) => Token::from_type(TokenType::Eof).at(token.position()),
            None => Token::eof(),
        };

        Self {
            tokens: tokens.into_iter(),
            eof,
            errors: Vec::new(),
        }
    }
}

impl TokenSource for TokenListTokenizer {
    fn next_token(&mut self) -> Token {
        self.tokens.next().unwrap_or_else(|| self.eof.clone())
    }

    fn parse_errors(&self) -> &[ParseError] {
        &self.errors
    }

    fn take_parse_errors(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use sanecss_shared::data_source::StringDataSource;

    macro_rules! assert_token_eq {
        ($t1:expr, $t2:expr) => {
            assert_eq!($t1.token_type, $t2.token_type)
        };
    }

    enum Expect {
        /// Token type at line and column
        T(TokenType, usize, usize),
        /// Parse errors reported since the last check
        E(Vec<(&'static str, usize, usize)>),
    }
    use Expect::{E, T};

    fn tokenizer(input: &str) -> Tokenizer<StringDataSource> {
        Tokenizer::new(StringDataSource::new(input), Location::default())
    }

    fn run(input: &str, expect: Vec<Expect>) {
        let mut t = tokenizer(input);
        for (i, e) in expect.into_iter().enumerate() {
            match e {
                T(token_type, line, column) => {
                    assert!(t.parse_errors().is_empty(), "No parse errors at {i}");
                    let token = t.next_token();
                    assert_eq!(token.token_type, token_type, "At {i}");
                    assert_eq!(
                        token.position().map(|l| l.line_column()),
                        Some((line, column)),
                        "Position at {i}"
                    );
                }
                E(errors) => {
                    let found: Vec<_> = t.take_parse_errors().iter().map(|e| e.as_tuple()).collect();
                    assert_eq!(found, errors, "Parse errors at {i}");
                }
            }
        }
        assert!(t.parse_errors().is_empty(), "No parse errors at end of test");
    }

    fn ident(v: &str) -> TokenType {
        TokenType::Ident(v.into())
    }

    fn string(v: &str) -> TokenType {
        TokenType::QuotedString(v.into())
    }

    fn delim(c: char) -> TokenType {
        TokenType::Delim(c)
    }

    fn num(value: Number, repr: &str, kind: NumberType) -> TokenType {
        TokenType::Number {
            value,
            repr: repr.into(),
            kind,
        }
    }

    fn dim(value: Number, repr: &str, kind: NumberType, unit: &str) -> TokenType {
        TokenType::Dimension {
            value,
            repr: repr.into(),
            kind,
            unit: unit.into(),
        }
    }

    const WS: TokenType = TokenType::Whitespace;
    const EOF: TokenType = TokenType::Eof;

    #[test]
    fn character_normalization() {
        let mut t = tokenizer("\x00-\x0c-\r-\r\n-\n\r-");
        let expected = ['\u{FFFD}', '-', '\n', '-', '\n', '-', '\n', '-', '\n', '\n', '-'];
        for c in expected {
            assert_eq!(t.next_char(), Ch(c));
        }
        assert_eq!(t.next_char(), StreamEnd);
    }

    #[test]
    fn whitespace() {
        run(
            "  \n   \t\n\nx\n\n\n\n    \t\t\tz",
            vec![
                T(WS, 1, 1),
                T(ident("x"), 4, 1),
                T(WS, 4, 2),
                T(ident("z"), 8, 8),
                T(EOF, 8, 9),
                T(EOF, 8, 9),
            ],
        );
    }

    #[test]
    fn strings() {
        let expected = "foo bar 🍪🍪🍪🍪x 🍪a \"' \u{FFFD}\u{FFFD}\u{FFFD}\u{FFFD} ok?";
        run(
            r#""foo bar \1f36a \1F36A \01f36a \1F36Ax \01f36aa \"' \0 \d800 \dfff \110000  ok?""#,
            vec![T(string(expected), 1, 1), T(EOF, 1, 81)],
        );
        run(
            r#"'foo bar \1f36a \1F36A \01f36a \1F36Ax \01f36aa "\' \0 \d800 \dfff \110000  ok?'"#,
            vec![T(string(expected), 1, 1), T(EOF, 1, 81)],
        );
    }

    #[test]
    fn string_errors() {
        run(
            "\"foo bar",
            vec![
                T(string("foo bar"), 1, 1),
                E(vec![("unclosed-string", 1, 1)]),
                T(EOF, 1, 9),
            ],
        );
        run(
            "'foo \nbar'",
            vec![
                T(TokenType::BadString, 1, 1),
                E(vec![("newline-in-string", 1, 6)]),
                T(WS, 1, 6),
                T(ident("bar"), 2, 1),
                T(string(""), 2, 4),
                E(vec![("unclosed-string", 2, 4)]),
                T(EOF, 2, 5),
            ],
        );
        run(
            "'foo \\\nbar'",
            vec![T(string("foo bar"), 1, 1), T(EOF, 2, 5)],
        );
        run(
            "'foo \\",
            vec![
                T(string("foo "), 1, 1),
                E(vec![("bad-escape", 1, 6), ("unclosed-string", 1, 1)]),
                T(EOF, 1, 7),
            ],
        );
        run(
            "'foo\\21",
            vec![
                T(string("foo!"), 1, 1),
                E(vec![("unclosed-string", 1, 1)]),
                T(EOF, 1, 8),
            ],
        );
    }

    #[test]
    fn hashes() {
        run(
            "#foo\n#123abc\n#\\21xx\n#!",
            vec![
                T(TokenType::IDHash("foo".into()), 1, 1),
                T(WS, 1, 5),
                T(TokenType::Hash("123abc".into()), 2, 1),
                T(WS, 2, 8),
                T(TokenType::IDHash("!xx".into()), 3, 1),
                T(WS, 3, 7),
                T(delim('#'), 4, 1),
                T(delim('!'), 4, 2),
                T(EOF, 4, 3),
            ],
        );
    }

    #[test]
    fn punctuation() {
        run(
            "$=$()[]{},:;^=^|=|||~=~%`**=",
            vec![
                T(TokenType::SuffixMatch, 1, 1),
                T(delim('$'), 1, 3),
                T(TokenType::LParen, 1, 4),
                T(TokenType::RParen, 1, 5),
                T(TokenType::LBracket, 1, 6),
                T(TokenType::RBracket, 1, 7),
                T(TokenType::LCurly, 1, 8),
                T(TokenType::RCurly, 1, 9),
                T(TokenType::Comma, 1, 10),
                T(TokenType::Colon, 1, 11),
                T(TokenType::Semicolon, 1, 12),
                T(TokenType::PrefixMatch, 1, 13),
                T(delim('^'), 1, 15),
                T(TokenType::DashMatch, 1, 16),
                T(TokenType::Column, 1, 18),
                T(delim('|'), 1, 20),
                T(TokenType::IncludeMatch, 1, 21),
                T(delim('~'), 1, 23),
                T(delim('%'), 1, 24),
                T(delim('`'), 1, 25),
                T(delim('*'), 1, 26),
                T(TokenType::SubstringMatch, 1, 27),
                T(EOF, 1, 29),
            ],
        );
    }

    #[test]
    fn numbers() {
        use NumberType::{Integer, Number as Real};

        let pct = |value, repr: &str, kind| TokenType::Percentage {
            value,
            repr: repr.into(),
            kind,
        };

        run(
            "0123\n12.56\n0px\n+.5em\n+.5e6m\n-12%\n3.5%\n12E-8\n12e+01\n.1ex\n+\n.x\n",
            vec![
                T(num(123.0, "0123", Integer), 1, 1),
                T(WS, 1, 5),
                T(num(12.56, "12.56", Real), 2, 1),
                T(WS, 2, 6),
                T(dim(0.0, "0", Integer, "px"), 3, 1),
                T(WS, 3, 4),
                T(dim(0.5, "+.5", Real, "em"), 4, 1),
                T(WS, 4, 6),
                T(dim(500000.0, "+.5e6", Real, "m"), 5, 1),
                T(WS, 5, 7),
                T(pct(-12.0, "-12", Integer), 6, 1),
                T(WS, 6, 5),
                T(pct(3.5, "3.5", Real), 7, 1),
                T(WS, 7, 5),
                T(num(12e-8, "12E-8", Real), 8, 1),
                T(WS, 8, 6),
                T(num(120.0, "12e+01", Real), 9, 1),
                T(WS, 9, 7),
                T(dim(0.1, ".1", Real, "ex"), 10, 1),
                T(WS, 10, 5),
                T(delim('+'), 11, 1),
                T(WS, 11, 2),
                T(delim('.'), 12, 1),
                T(ident("x"), 12, 2),
                T(WS, 12, 3),
                T(EOF, 13, 1),
            ],
        );
    }

    #[test]
    fn dashes() {
        run(
            "-x-yz\n-->\n--->\n-?",
            vec![
                T(ident("-x-yz"), 1, 1),
                T(WS, 1, 6),
                T(TokenType::Cdc, 2, 1),
                T(WS, 2, 4),
                T(ident("---"), 3, 1),
                T(delim('>'), 3, 4),
                T(WS, 3, 5),
                T(delim('-'), 4, 1),
                T(delim('?'), 4, 2),
                T(EOF, 4, 3),
            ],
        );
    }

    #[test]
    fn comments() {
        run(
            "a/* foo \n bar * /* \\*/b */",
            vec![
                T(ident("a"), 1, 1),
                T(ident("b"), 2, 14),
                T(WS, 2, 15),
                T(delim('*'), 2, 16),
                T(delim('/'), 2, 17),
                T(EOF, 2, 18),
            ],
        );
        run(
            "/* foo \n bar * /* / ?",
            vec![T(EOF, 2, 14), E(vec![("unclosed-comment", 1, 1)])],
        );
        run(
            "foo/**/bar",
            vec![T(ident("foo"), 1, 1), T(ident("bar"), 1, 8), T(EOF, 1, 11)],
        );
    }

    #[test]
    fn preprocessor_comments() {
        let mut t = Tokenizer::new(
            StringDataSource::new("/*@pp*/a/* plain *//*@x*/"),
            Location::default(),
        )
        .with_preprocessor_comments(true);

        assert_token_eq!(t.next_token(), Token::from_type(TokenType::PreprocessorComment("@pp".into())));
        assert_token_eq!(t.next_token(), Token::ident("a"));
        let pp = t.next_token();
        assert_token_eq!(pp, Token::from_type(TokenType::PreprocessorComment("@x".into())));
        assert_eq!(pp.position(), Some(Location::new(1, 20, 19)));
        assert_token_eq!(t.next_token(), Token::eof());

        run("/*@pp*/a", vec![T(ident("a"), 1, 8), T(EOF, 1, 9)]);
    }

    #[test]
    fn less_than_and_at() {
        run(
            "<!-- <3",
            vec![
                T(TokenType::Cdo, 1, 1),
                T(WS, 1, 5),
                T(delim('<'), 1, 6),
                T(num(3.0, "3", NumberType::Integer), 1, 7),
                T(EOF, 1, 8),
            ],
        );
        run(
            "@!foo @abc @-foo-bar @\\21 foo",
            vec![
                T(delim('@'), 1, 1),
                T(delim('!'), 1, 2),
                T(ident("foo"), 1, 3),
                T(WS, 1, 6),
                T(TokenType::AtKeyword("abc".into()), 1, 7),
                T(WS, 1, 11),
                T(TokenType::AtKeyword("-foo-bar".into()), 1, 12),
                T(WS, 1, 21),
                T(TokenType::AtKeyword("!foo".into()), 1, 22),
                T(EOF, 1, 30),
            ],
        );
    }

    #[test]
    fn backslashes() {
        run(
            "\\10abcde \\<\\> \\\nok",
            vec![
                T(ident("\u{10abcd}e"), 1, 1),
                T(WS, 1, 9),
                T(ident("<>"), 1, 10),
                T(WS, 1, 14),
                T(delim('\\'), 1, 15),
                E(vec![("bad-escape", 1, 15)]),
                T(WS, 1, 16),
                T(ident("ok"), 2, 1),
                T(EOF, 2, 3),
            ],
        );
        run(
            "foo\\",
            vec![
                T(ident("foo\u{FFFD}"), 1, 1),
                E(vec![("bad-escape", 1, 4)]),
                T(EOF, 1, 5),
            ],
        );
    }

    #[test]
    fn unicode_range_text_is_plain_tokens() {
        run(
            "U+12-FdDd U+1?",
            vec![
                T(ident("U"), 1, 1),
                T(dim(12.0, "+12", NumberType::Integer, "-FdDd"), 1, 2),
                T(WS, 1, 10),
                T(ident("U"), 1, 11),
                T(num(1.0, "+1", NumberType::Integer), 1, 12),
                T(delim('?'), 1, 14),
                T(EOF, 1, 15),
            ],
        );
    }

    #[test]
    fn url_tokens() {
        let url = |v: &str| TokenType::Url(v.into());
        run(
            "url( http://example.com/ )",
            vec![T(url("http://example.com/"), 1, 1), T(EOF, 1, 27)],
        );
        run(
            "Url(http://example.com/)",
            vec![T(url("http://example.com/"), 1, 1), T(EOF, 1, 25)],
        );
        run(
            "urL(\n   http://example.com/\n   )",
            vec![T(url("http://example.com/"), 1, 1), T(EOF, 3, 5)],
        );
        run(
            "url(",
            vec![T(url(""), 1, 1), E(vec![("unclosed-url", 1, 1)]), T(EOF, 1, 5)],
        );
        run(
            "url( ",
            vec![T(url(""), 1, 1), E(vec![("unclosed-url", 1, 1)]), T(EOF, 1, 6)],
        );
        run(
            "url( http://example.com/",
            vec![
                T(url("http://example.com/"), 1, 1),
                E(vec![("unclosed-url", 1, 1)]),
                T(EOF, 1, 25),
            ],
        );
        run(
            "url( http://example.com/ ",
            vec![
                T(url("http://example.com/"), 1, 1),
                E(vec![("unclosed-url", 1, 1)]),
                T(EOF, 1, 26),
            ],
        );
        run(
            "url( http://example.com/\\'xyz )",
            vec![T(url("http://example.com/'xyz"), 1, 1), T(EOF, 1, 32)],
        );
    }

    #[test]
    fn bad_urls() {
        run(
            "url( http://example.com/ xyz\na\\)bc)def",
            vec![
                T(TokenType::BadUrl, 1, 1),
                T(ident("def"), 2, 7),
                T(EOF, 2, 10),
            ],
        );
        run(
            "url( http://example.com/'xyz )",
            vec![
                T(TokenType::BadUrl, 1, 1),
                E(vec![("bad-character-in-url", 1, 25)]),
                T(EOF, 1, 31),
            ],
        );
        run(
            "url( http://example.com/\x1fxyz )",
            vec![
                T(TokenType::BadUrl, 1, 1),
                E(vec![("bad-character-in-url", 1, 25)]),
                T(EOF, 1, 31),
            ],
        );
        run(
            "url( http://example.com/\\\nxyz )x",
            vec![
                T(TokenType::BadUrl, 1, 1),
                E(vec![("bad-escape", 1, 25)]),
                T(ident("x"), 2, 6),
                T(EOF, 2, 7),
            ],
        );
    }

    #[test]
    fn url_functions() {
        let func = || TokenType::Function("url".into());
        run(
            "url(\"http://example.com/()\")",
            vec![
                T(func(), 1, 1),
                T(string("http://example.com/()"), 1, 5),
                T(TokenType::RParen, 1, 28),
                T(EOF, 1, 29),
            ],
        );
        run(
            "url(\n'http://example.com/'\n)",
            vec![
                T(func(), 1, 1),
                T(WS, 1, 5),
                T(string("http://example.com/"), 2, 1),
                T(WS, 2, 22),
                T(TokenType::RParen, 3, 1),
                T(EOF, 3, 2),
            ],
        );
        run(
            "url(    'http://example.com/')",
            vec![
                T(func(), 1, 1),
                T(WS, 1, 8),
                T(string("http://example.com/"), 1, 9),
                T(TokenType::RParen, 1, 30),
                T(EOF, 1, 31),
            ],
        );
        run(
            "url('http://example.com/\n')x",
            vec![
                T(func(), 1, 1),
                T(TokenType::BadString, 1, 5),
                E(vec![("newline-in-string", 1, 25)]),
                T(WS, 1, 25),
                T(string(")x"), 2, 1),
                E(vec![("unclosed-string", 2, 1)]),
                T(EOF, 2, 4),
            ],
        );
        run(
            "foobar( 123 )",
            vec![
                T(TokenType::Function("foobar".into()), 1, 1),
                T(WS, 1, 8),
                T(num(123.0, "123", NumberType::Integer), 1, 9),
                T(WS, 1, 12),
                T(TokenType::RParen, 1, 13),
                T(EOF, 1, 14),
            ],
        );
    }

    #[test]
    fn start_location() {
        let mut t = Tokenizer::new(StringDataSource::new("a b\nc"), Location::new(10, 5, 100));
        assert_eq!(t.next_token().position(), Some(Location::new(10, 5, 100)));
        assert_eq!(t.next_token().position(), Some(Location::new(10, 6, 101)));
        assert_eq!(t.next_token().position(), Some(Location::new(10, 7, 102)));
        assert_eq!(t.next_token().position(), Some(Location::new(10, 8, 103)));
        assert_eq!(t.next_token().position(), Some(Location::new(11, 1, 104)));
    }

    #[test]
    fn token_list_tokenizer() {
        let tokens = vec![Token::whitespace(), Token::whitespace(), Token::whitespace()];
        let eof = Token::new(TokenType::Eof, Location::new(123, 42, 0));

        let mut t = TokenListTokenizer::new(tokens.clone(), Some(eof.clone()));
        for token in &tokens {
            assert_eq!(&t.next_token(), token);
        }
        for _ in 0..3 {
            assert_eq!(t.next_token(), eof);
        }
        assert!(t.parse_errors().is_empty());

        let mut t = TokenListTokenizer::new(vec![], Some(eof.clone()));
        assert_eq!(t.next_token(), eof);

        let not_eof = Token::new(TokenType::Semicolon, Location::new(456, 23, 0));
        let mut t = TokenListTokenizer::new(tokens.clone(), Some(not_eof));
        t.next_token();
        t.next_token();
        t.next_token();
        let tok = t.next_token();
        assert!(tok.is_eof());
        assert_eq!(tok.position(), Some(Location::new(456, 23, 0)));
        assert_eq!(t.next_token(), tok);

        let mut t = TokenListTokenizer::new(vec![], None);
        let tok = t.next_token();
        assert!(tok.is_eof());
        assert_eq!(tok.position(), None);
        t.clear_parse_errors();
    }
}
