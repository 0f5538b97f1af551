use sanecss_shared::errors::{CssError, CssResult};
use sanecss_shared::location::Location;
use std::cell::Cell;
use std::fmt;

pub type Number = f64;

/// Type flag of a numeric token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberType {
    Integer,
    Number,
}

#[derive(Debug, PartialEq, Clone)]
pub enum TokenType {
    /// A [`<ident-token>`](https://drafts.csswg.org/css-syntax/#ident-token-diagram)
    Ident(String),
    /// A [`<function-token>`](https://drafts.csswg.org/css-syntax/#function-token-diagram)
    ///
    /// The value does not include the opening parenthesis.
    Function(String),
    /// A [`<at-keyword-token>`](https://drafts.csswg.org/css-syntax/#at-keyword-token-diagram)
    ///
    /// The value does not include the `@` marker.
    AtKeyword(String),
    /// A [`<hash-token>`](https://drafts.csswg.org/css-syntax/#hash-token-diagram) with the type flag set to "unrestricted"
    ///
    /// The value does not include the `#` marker.
    Hash(String),
    /// A [`<hash-token>`](https://drafts.csswg.org/css-syntax/#hash-token-diagram) with the type flag set to "id"
    ///
    /// The value does not include the `#` marker.
    ///
    /// Hash that is a valid ID selector.
    IDHash(String),
    /// A [`<string-token>`](https://drafts.csswg.org/css-syntax/#string-token-diagram)
    ///
    /// The value does not include the quotes.
    QuotedString(String),
    /// A `<bad-string-token>`
    ///
    /// This token always indicates a parse error.
    BadString,
    /// A [`<url-token>`](https://drafts.csswg.org/css-syntax/#url-token-diagram)
    Url(String),
    /// A `<bad-url-token>`
    BadUrl,
    /// A `<delim-token>`
    Delim(char),
    Number {
        value: Number,
        repr: String,
        kind: NumberType,
    },
    Percentage {
        value: Number,
        repr: String,
        kind: NumberType,
    },
    Dimension {
        value: Number,
        repr: String,
        kind: NumberType,
        unit: String,
    },
    /// A [`<whitespace-token>`](https://drafts.csswg.org/css-syntax/#whitespace-token-diagram)
    Whitespace,
    /// A `<!--` `<CDO-token>`
    Cdo,
    /// A `-->` `<CDC-token>`
    Cdc,
    /// A `:` `<colon-token>`
    Colon,
    /// A `;` `<semicolon-token>`
    Semicolon,
    /// A `<comma-token>`
    Comma,
    /// A `<[-token>`
    LBracket,
    /// A `<]-token>`
    RBracket,
    /// A `<(-token>`
    LParen,
    /// A `<)-token>`
    RParen,
    /// A `<{-token>`
    LCurly,
    /// A `<}-token>`
    RCurly,
    /// `~=`
    IncludeMatch,
    /// `|=`
    DashMatch,
    /// `^=`
    PrefixMatch,
    /// `$=`
    SuffixMatch,
    /// `*=`
    SubstringMatch,
    /// `||`
    Column,
    /// A `/*@...*/` comment kept for preprocessors. The value is the comment body.
    PreprocessorComment(String),
    /// A `<EOF-token>`
    Eof,
}

impl TokenType {
    /// Name of the token type as used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            TokenType::Ident(_) => "ident",
            TokenType::Function(_) => "function",
            TokenType::AtKeyword(_) => "at-keyword",
            TokenType::Hash(_) | TokenType::IDHash(_) => "hash",
            TokenType::QuotedString(_) => "string",
            TokenType::BadString => "bad-string",
            TokenType::Url(_) => "url",
            TokenType::BadUrl => "bad-url",
            TokenType::Delim(_) => "delim",
            TokenType::Number { .. } => "number",
            TokenType::Percentage { .. } => "percentage",
            TokenType::Dimension { .. } => "dimension",
            TokenType::Whitespace => "whitespace",
            TokenType::Cdo => "CDO",
            TokenType::Cdc => "CDC",
            TokenType::Colon => "colon",
            TokenType::Semicolon => "semicolon",
            TokenType::Comma => "comma",
            TokenType::LBracket => "[",
            TokenType::RBracket => "]",
            TokenType::LParen => "(",
            TokenType::RParen => ")",
            TokenType::LCurly => "{",
            TokenType::RCurly => "}",
            TokenType::IncludeMatch => "include-match",
            TokenType::DashMatch => "dash-match",
            TokenType::PrefixMatch => "prefix-match",
            TokenType::SuffixMatch => "suffix-match",
            TokenType::SubstringMatch => "substring-match",
            TokenType::Column => "column",
            TokenType::PreprocessorComment(_) => "preprocessor-comment",
            TokenType::Eof => "EOF",
        }
    }

    /// Returns true when both values are of the same kind, ignoring their payload
    pub fn same_kind(&self, other: &TokenType) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// A single CSS token. Tokens are values: changing the significance flag produces a copy.
#[derive(Clone, Debug)]
pub struct Token {
    /// Type of the token
    pub token_type: TokenType,
    /// Location of the token in the source, if it came from one
    pub location: Option<Location>,
    /// Insignificant tokens are dropped when minifying
    significant: bool,
    /// Number of tokens, starting with this one, that form a single unicode-range
    urange_hack: Cell<usize>,
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.token_type == other.token_type
            && self.location == other.location
            && self.significant == other.significant
    }
}

impl From<TokenType> for Token {
    fn from(token_type: TokenType) -> Self {
        Token::from_type(token_type)
    }
}

impl Token {
    /// Returns a new token for the given type on the given location
    pub fn new(token_type: TokenType, location: Location) -> Token {
        Token {
            token_type,
            location: Some(location),
            significant: true,
            urange_hack: Cell::new(0),
        }
    }

    /// Returns a new token without a source location
    pub fn from_type(token_type: TokenType) -> Token {
        Token {
            token_type,
            location: None,
            significant: true,
            urange_hack: Cell::new(0),
        }
    }

    /// Returns the same token placed at the given location
    pub fn at(mut self, location: Option<Location>) -> Token {
        self.location = location;
        self
    }

    pub(crate) fn new_delim(c: char, location: Location) -> Token {
        Token::new(TokenType::Delim(c), location)
    }

    pub(crate) fn new_id_hash(value: &str, location: Location) -> Token {
        Token::new(TokenType::IDHash(value.to_string()), location)
    }

    pub(crate) fn new_hash(value: &str, location: Location) -> Token {
        Token::new(TokenType::Hash(value.to_string()), location)
    }

    pub(crate) fn new_atkeyword(keyword: &str, location: Location) -> Token {
        Token::new(TokenType::AtKeyword(keyword.to_string()), location)
    }

    pub(crate) fn new_ident(value: &str, location: Location) -> Token {
        Token::new(TokenType::Ident(value.to_string()), location)
    }

    pub(crate) fn new_function(value: &str, location: Location) -> Token {
        Token::new(TokenType::Function(value.to_string()), location)
    }

    pub(crate) fn new_quoted_string(value: &str, location: Location) -> Token {
        Token::new(TokenType::QuotedString(value.to_string()), location)
    }

    pub(crate) fn new_url(value: &str, location: Location) -> Token {
        Token::new(TokenType::Url(value.to_string()), location)
    }

    /// An unpositioned `<ident-token>`
    pub fn ident(value: &str) -> Token {
        Token::from_type(TokenType::Ident(value.to_string()))
    }

    /// An unpositioned `<function-token>`
    pub fn function(name: &str) -> Token {
        Token::from_type(TokenType::Function(name.to_string()))
    }

    /// An unpositioned `<at-keyword-token>`
    pub fn at_keyword(name: &str) -> Token {
        Token::from_type(TokenType::AtKeyword(name.to_string()))
    }

    /// An unpositioned `<string-token>`
    pub fn string(value: &str) -> Token {
        Token::from_type(TokenType::QuotedString(value.to_string()))
    }

    pub fn whitespace() -> Token {
        Token::from_type(TokenType::Whitespace)
    }

    pub fn eof() -> Token {
        Token::from_type(TokenType::Eof)
    }

    /// A `<delim-token>`. The value must be exactly one character.
    pub fn delim(value: &str) -> CssResult<Token> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Token::from_type(TokenType::Delim(c))),
            _ => Err(CssError::invalid_argument(
                "Delim token value must be a single character",
            )),
        }
    }

    /// A hash token. `id` selects the "id" type flag, otherwise it is "unrestricted".
    pub fn hash(value: &str, id: bool) -> Token {
        if id {
            Token::from_type(TokenType::IDHash(value.to_string()))
        } else {
            Token::from_type(TokenType::Hash(value.to_string()))
        }
    }

    /// A `<number-token>`. Without a representation, the serialized value is used.
    pub fn number(value: Number, repr: Option<&str>, kind: NumberType) -> CssResult<Token> {
        let repr = check_numeric(value, repr, kind)?;
        Ok(Token::from_type(TokenType::Number { value, repr, kind }))
    }

    /// A `<percentage-token>`. The representation excludes the `%`.
    pub fn percentage(value: Number, repr: Option<&str>, kind: NumberType) -> CssResult<Token> {
        let repr = check_numeric(value, repr, kind)?;
        Ok(Token::from_type(TokenType::Percentage { value, repr, kind }))
    }

    /// A `<dimension-token>`. The representation excludes the unit.
    pub fn dimension(
        value: Number,
        repr: Option<&str>,
        kind: NumberType,
        unit: &str,
    ) -> CssResult<Token> {
        if unit.is_empty() {
            return Err(CssError::invalid_argument("Dimension token must have a unit"));
        }
        let repr = check_numeric(value, repr, kind)?;
        Ok(Token::from_type(TokenType::Dimension {
            value,
            repr,
            kind,
            unit: unit.to_string(),
        }))
    }

    /// Returns the position of the token in the source
    pub fn position(&self) -> Option<Location> {
        self.location
    }

    pub fn significant(&self) -> bool {
        self.significant
    }

    /// Returns a copy with the given significance, or an identical copy when unchanged
    pub fn copy_with_significance(&self, significant: bool) -> Token {
        let mut token = self.clone();
        token.significant = significant;
        token
    }

    pub fn urange_hack(&self) -> usize {
        self.urange_hack.get()
    }

    /// Records that this and the next `count - 1` tokens form one unicode-range. Keeps the
    /// largest count seen.
    pub fn set_urange_hack(&self, count: usize) {
        if count > self.urange_hack.get() {
            self.urange_hack.set(count);
        }
    }

    /// String value of ident, function, at-keyword, hash, string, url and preprocessor comment
    /// tokens
    pub fn value(&self) -> Option<&str> {
        match &self.token_type {
            TokenType::Ident(v)
            | TokenType::Function(v)
            | TokenType::AtKeyword(v)
            | TokenType::Hash(v)
            | TokenType::IDHash(v)
            | TokenType::QuotedString(v)
            | TokenType::Url(v)
            | TokenType::PreprocessorComment(v) => Some(v),
            _ => None,
        }
    }

    /// Numeric value of number, percentage and dimension tokens
    pub fn numeric_value(&self) -> Option<Number> {
        match &self.token_type {
            TokenType::Number { value, .. }
            | TokenType::Percentage { value, .. }
            | TokenType::Dimension { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Original textual representation of number, percentage and dimension tokens
    pub fn representation(&self) -> Option<&str> {
        match &self.token_type {
            TokenType::Number { repr, .. }
            | TokenType::Percentage { repr, .. }
            | TokenType::Dimension { repr, .. } => Some(repr),
            _ => None,
        }
    }

    pub fn number_type(&self) -> Option<NumberType> {
        match &self.token_type {
            TokenType::Number { kind, .. }
            | TokenType::Percentage { kind, .. }
            | TokenType::Dimension { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn unit(&self) -> Option<&str> {
        match &self.token_type {
            TokenType::Dimension { unit, .. } => Some(unit),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.token_type.name()
    }
}

impl Token {
    pub fn is_comma(&self) -> bool {
        matches!(self.token_type, TokenType::Comma)
    }

    pub fn is_string(&self) -> bool {
        matches!(self.token_type, TokenType::QuotedString(_))
    }

    pub fn is_ident(&self) -> bool {
        matches!(self.token_type, TokenType::Ident(_))
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self.token_type, TokenType::Whitespace)
    }

    pub fn is_colon(&self) -> bool {
        matches!(self.token_type, TokenType::Colon)
    }

    pub fn is_semicolon(&self) -> bool {
        matches!(self.token_type, TokenType::Semicolon)
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.token_type, TokenType::Eof)
    }

    pub fn is_delim(&self, delim: char) -> bool {
        matches!(self.token_type, TokenType::Delim(c) if c == delim)
    }

    /// Returns true for the tokens that open a simple block
    pub fn is_block_start(&self) -> bool {
        matches!(
            self.token_type,
            TokenType::LCurly | TokenType::LBracket | TokenType::LParen
        )
    }

    /// Returns true when `ident` matches the value of an ident token ASCII case-insensitively
    pub fn is_ident_named(&self, ident: &str) -> bool {
        matches!(&self.token_type, TokenType::Ident(v) if v.eq_ignore_ascii_case(ident))
    }
}

/// Validates a numeric representation against its value and returns the representation to
/// store
fn check_numeric(value: Number, repr: Option<&str>, kind: NumberType) -> CssResult<String> {
    if !value.is_finite() {
        return Err(CssError::invalid_argument("Numeric value must be finite"));
    }
    if kind == NumberType::Integer && value.fract() != 0.0 {
        return Err(CssError::invalid_argument(
            "Integer type flag requires an integral value",
        ));
    }

    match repr {
        None => Ok(format_number(value, kind)),
        Some(repr) => match repr.parse::<Number>() {
            Ok(v) if is_css_number(repr) && v == value => Ok(repr.to_string()),
            _ => Err(CssError::invalid_argument(format!(
                "Representation \"{repr}\" does not match value {value}"
            ))),
        },
    }
}

/// Returns true when the string is a complete CSS `<number>` production
fn is_css_number(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == frac_start {
            return false;
        }
        digits += i - frac_start;
    }
    if digits == 0 {
        return false;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }
    i == bytes.len()
}

/// Formats a number the way it is serialized when no usable representation exists: integers
/// as integers, other values with up to 15 significant digits.
pub fn format_number(value: Number, kind: NumberType) -> String {
    if kind == NumberType::Integer && value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let sci = format!("{:.14e}", value);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if !(-4..15).contains(&exponent) {
        let mut mantissa = trim_fraction(mantissa).to_string();
        if !mantissa.contains('.') {
            mantissa.push_str(".0");
        }
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{}", exponent.abs());
    }

    let precision = (14 - exponent).max(0) as usize;
    trim_fraction(&format!("{:.*}", precision, value)).to_string()
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Serializes a number, keeping the original representation when it still denotes the value
fn serialize_number(value: Number, repr: &str, kind: NumberType) -> String {
    match repr.parse::<Number>() {
        Ok(v) if v == value && is_css_number(repr) => repr.to_string(),
        _ => format_number(value, kind),
    }
}

/// Shortest spelling of a number that keeps its value, its type flag and an explicit `+`.
/// The sign is needed where the tokens around the number depend on it, like `U+4??` or
/// `2n+1`.
fn shortest_number(value: Number, repr: &str, kind: NumberType) -> String {
    let original = serialize_number(value, repr, kind);
    let mut formatted = format_number(value, kind);
    if repr.starts_with('+') && !formatted.starts_with(['+', '-']) {
        formatted.insert(0, '+');
    }
    let keeps_type = kind == NumberType::Integer
        || formatted.contains(|c| matches!(c, '.' | 'e' | 'E'));

    if keeps_type && formatted.len() < original.len() {
        formatted
    } else {
        original
    }
}

fn hex_escape(out: &mut String, c: char) {
    out.push_str(&format!("\\{:x} ", c as u32));
}

/// Escapes an identifier per [CSSOM](https://drafts.csswg.org/cssom/#serialize-an-identifier).
/// `<` and `>` are always hex-escaped so the output can never close an HTML `<style>` element.
pub fn escape_ident(ident: &str) -> String {
    escape_identifier_like(ident, true)
}

/// Like `escape_ident`, but without the rules that only apply at the start of an identifier
pub fn escape_name(name: &str) -> String {
    escape_identifier_like(name, false)
}

fn escape_identifier_like(value: &str, is_ident: bool) -> String {
    let mut out = String::with_capacity(value.len());
    let chars: Vec<char> = value.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        match c {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => hex_escape(&mut out, c),
            '0'..='9' if is_ident && i == 0 => hex_escape(&mut out, c),
            '0'..='9' if is_ident && i == 1 && chars[0] == '-' => hex_escape(&mut out, c),
            '-' if is_ident && i == 0 && chars.len() == 1 => out.push_str("\\-"),
            '<' | '>' => hex_escape(&mut out, c),
            c if !c.is_ascii() || c.is_ascii_alphanumeric() || c == '-' || c == '_' => out.push(c),
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }

    out
}

/// Serializes a string as a double quoted CSS string
pub fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' | '<' | '>' => hex_escape(&mut out, c),
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Returns true when a dimension unit would be read back as an exponent
fn unit_looks_like_exponent(unit: &str) -> bool {
    let mut chars = unit.chars();
    if !matches!(chars.next(), Some('e' | 'E')) {
        return false;
    }
    match chars.next() {
        Some('+' | '-') => matches!(chars.next(), Some(c) if c.is_ascii_digit()),
        Some(c) => c.is_ascii_digit(),
        None => false,
    }
}

fn serialize_unit(number: &str, unit: &str) -> String {
    if !number.contains(['e', 'E']) && unit_looks_like_exponent(unit) {
        let mut chars = unit.chars();
        let mut out = String::new();
        if let Some(first) = chars.next() {
            hex_escape(&mut out, first);
        }
        out.push_str(&escape_name(chars.as_str()));
        return out;
    }
    escape_ident(unit)
}

impl Token {
    /// Serializes the token. With `minify`, numbers use their shortest spelling.
    pub fn to_css_string(&self, minify: bool) -> String {
        let number = |value: Number, repr: &str, kind: NumberType| {
            if minify {
                shortest_number(value, repr, kind)
            } else {
                serialize_number(value, repr, kind)
            }
        };

        match &self.token_type {
            TokenType::Ident(v) => escape_ident(v),
            TokenType::Function(v) => format!("{}(", escape_ident(v)),
            TokenType::AtKeyword(v) => format!("@{}", escape_ident(v)),
            TokenType::IDHash(v) => format!("#{}", escape_ident(v)),
            TokenType::Hash(v) => format!("#{}", escape_name(v)),
            TokenType::QuotedString(v) => escape_string(v),
            TokenType::BadString => "'badstring\n".into(),
            TokenType::Url(v) => format!("url({})", escape_string(v)),
            TokenType::BadUrl => "url(badurl'')".into(),
            TokenType::Delim('\\') => "\\\n".into(),
            TokenType::Delim(c) => c.to_string(),
            TokenType::Number { value, repr, kind } => number(*value, repr, *kind),
            TokenType::Percentage { value, repr, kind } => {
                format!("{}%", number(*value, repr, *kind))
            }
            TokenType::Dimension {
                value,
                repr,
                kind,
                unit,
            } => {
                let n = number(*value, repr, *kind);
                let u = serialize_unit(&n, unit);
                format!("{n}{u}")
            }
            TokenType::Whitespace => " ".into(),
            TokenType::Cdo => "<!--".into(),
            TokenType::Cdc => "-->".into(),
            TokenType::Colon => ":".into(),
            TokenType::Semicolon => ";".into(),
            TokenType::Comma => ",".into(),
            TokenType::LBracket => "[".into(),
            TokenType::RBracket => "]".into(),
            TokenType::LParen => "(".into(),
            TokenType::RParen => ")".into(),
            TokenType::LCurly => "{".into(),
            TokenType::RCurly => "}".into(),
            TokenType::IncludeMatch => "~=".into(),
            TokenType::DashMatch => "|=".into(),
            TokenType::PrefixMatch => "^=".into(),
            TokenType::SuffixMatch => "$=".into(),
            TokenType::SubstringMatch => "*=".into(),
            TokenType::Column => "||".into(),
            TokenType::PreprocessorComment(v) => format!("/*{v}*/"),
            TokenType::Eof => String::new(),
        }
    }

    /// Decides whether a comment must be inserted between two tokens so that their
    /// serializations tokenize back into the same two tokens.
    ///
    /// See [serialization](https://drafts.csswg.org/css-syntax/#serialization).
    pub fn separate(first: &Token, second: &Token) -> bool {
        use TokenType::*;

        let b = &second.token_type;
        let ident_like = matches!(b, Ident(_) | Function(_) | Url(_) | BadUrl);
        let numeric = matches!(b, Number { .. } | Percentage { .. } | Dimension { .. });
        let is_hash = matches!(b, Hash(_) | IDHash(_));

        match &first.token_type {
            Ident(_) => {
                ident_like
                    || numeric
                    || is_hash
                    || matches!(b, Delim('-') | Cdc | LParen)
            }
            AtKeyword(_) => ident_like || numeric || matches!(b, Delim('-') | Cdc),
            Hash(_) | IDHash(_) | Dimension { .. } => {
                ident_like || numeric || is_hash || matches!(b, Delim('-') | Cdc)
            }
            Delim('#') | Delim('-') => ident_like || numeric || matches!(b, Delim('-')),
            Number { .. } => ident_like || numeric || is_hash || matches!(b, Delim('%')),
            Delim('@') => ident_like || matches!(b, Delim('-')),
            Delim('.') | Delim('+') => numeric,
            Delim('/') => matches!(b, Delim('*')),
            Delim('<') => ident_like || matches!(b, Delim('!') | Delim('/')),
            _ => false,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_css_string(false))
    }
}
