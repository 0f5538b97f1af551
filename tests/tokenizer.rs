use sanecss::css3::token::Token;
use sanecss::css3::tokenizer::{TokenSource, Tokenizer};
use sanecss::shared::data_source::StringDataSource;
use sanecss::shared::location::Location;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use test_case::test_case;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Root {
    tests: Vec<Test>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Test {
    description: String,
    input: String,
    /// Type name and serialization of every token before EOF
    output: Vec<(String, String)>,
    #[serde(default)]
    errors: Vec<Error>,
    #[serde(default)]
    preprocessor_comments: bool,
}

#[derive(Debug, Deserialize)]
struct Error {
    tag: String,
    line: usize,
    col: usize,
}

fn load(name: &str) -> anyhow::Result<Root> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/tokenizer")
        .join(name);
    let contents = fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn tokenize(test: &Test) -> (Vec<Token>, Vec<(String, usize, usize)>) {
    let source = StringDataSource::new(&test.input);
    let mut tokenizer = Tokenizer::new(source, Location::default())
        .with_preprocessor_comments(test.preprocessor_comments);

    let mut tokens = Vec::new();
    loop {
        let token = tokenizer.next_token();
        if token.is_eof() {
            break;
        }
        tokens.push(token);
    }

    let errors = tokenizer
        .parse_errors()
        .iter()
        .map(|e| (e.tag.to_string(), e.line, e.column))
        .collect();
    (tokens, errors)
}

#[test_case("basic.json")]
#[test_case("errors.json")]
fn fixtures(name: &str) {
    let _ = simple_logger::SimpleLogger::new().init();
    let root = load(name).unwrap();

    for test in &root.tests {
        let (tokens, errors) = tokenize(test);
        let output: Vec<(String, String)> = tokens
            .iter()
            .map(|t| (t.type_name().to_string(), t.to_string()))
            .collect();
        assert_eq!(output, test.output, "{}", test.description);

        let expected: Vec<_> = test
            .errors
            .iter()
            .map(|e| (e.tag.clone(), e.line, e.col))
            .collect();
        assert_eq!(errors, expected, "{}", test.description);
    }
}
