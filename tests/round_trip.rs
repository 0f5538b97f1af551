use sanecss::css3::token::{Token, TokenType};
use sanecss::css3::tokenizer::{TokenSource, Tokenizer};
use sanecss::prelude::*;
use test_case::test_case;

fn token_types(css: &str) -> Vec<TokenType> {
    let mut tokenizer = Tokenizer::new(StringDataSource::new(css), Location::default());
    let mut types = Vec::new();
    loop {
        let token: Token = tokenizer.next_token();
        if token.is_eof() {
            return types;
        }
        types.push(token.token_type);
    }
}

fn tokens(css: &str) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(StringDataSource::new(css), Location::default());
    std::iter::from_fn(|| Some(tokenizer.next_token()))
        .take_while(|t| !t.is_eof())
        .collect()
}

#[test_case("a/**/b" ; "comment between idents")]
#[test_case("1/**/px" ; "number before ident")]
#[test_case("#a/**/#b" ; "adjacent hashes")]
#[test_case("-/**/-x" ; "dash before ident")]
#[test_case("1e/**/2" ; "unit like an exponent")]
#[test_case("@x/**/-y" ; "at-keyword before dash ident")]
#[test_case("a(b)/**/c[d]{e}" ; "blocks and functions")]
#[test_case("'\\3c x\\3e' \"a\\\nb\"" ; "strings with escapes")]
#[test_case("/ /**/*" ; "slash before star")]
fn tokens_survive_serialization(css: &str) {
    let original = tokens(css);
    let text = stringify(&original, StringifyOptions::default());
    assert_eq!(
        token_types(&text),
        original.into_iter().map(|t| t.token_type).collect::<Vec<_>>(),
        "{text}"
    );
}

#[test]
fn url_tokens_serialize_as_functions() {
    let original = tokens("url(a\\)b) url( c )");
    let text = stringify(&original, StringifyOptions::default());
    assert_eq!(text, "url(\"a)b\") url(\"c\")");
    // Serializing again changes nothing
    assert_eq!(stringify(&tokens(&text), StringifyOptions::default()), text);
}

const STYLESHEETS: &[&str] = &[
    "a { color : red ; }\n\n@media screen { b { margin: 0 } }",
    "@import url(foo.css) screen;\n.x>.y{background:url( 'a.png' ) no-repeat !important}",
    "@font-face{font-family:x;src:url(x.woff)format('woff')}p{unicode-range:U+0-7F}",
    "<!-- a:hover { x : 1e3px } -->",
];

#[test]
fn parsed_stylesheets_survive_serialization() {
    for css in STYLESHEETS {
        let (stylesheet, _) = parse_stylesheet(css, ParserConfig::default());
        let text = stylesheet.to_string();
        let (reparsed, errors) = parse_stylesheet(&text, ParserConfig::default());
        assert!(errors.is_empty(), "{text}: {errors:?}");
        assert_eq!(reparsed.to_string(), text);
    }
}

#[test]
fn minification_is_idempotent() {
    for css in STYLESHEETS {
        let (stylesheet, _) = parse_stylesheet(css, ParserConfig::default());
        let once = stylesheet.to_css_string(StringifyOptions::minified());
        let (reparsed, _) = parse_stylesheet(&once, ParserConfig::default());
        let twice = reparsed.to_css_string(StringifyOptions::minified());
        assert_eq!(once, twice);
    }
}

#[test]
fn deep_nesting_is_cut_off() {
    let css = format!("a {{ b: {} }}", "(".repeat(200));
    let (_, errors) = parse_stylesheet(&css, ParserConfig::default());
    let tags: Vec<_> = errors.iter().map(|e| e.tag).collect();
    assert_eq!(tags, vec!["recursion-depth-exceeded"]);
}
