#![allow(clippy::unwrap_used)]

use criterion::{criterion_group, criterion_main, Criterion};
use sanecss::css3::tokenizer::{TokenSource, Tokenizer};
use sanecss::prelude::*;
use std::hint::black_box;

fn tokenize(css: &str) -> usize {
    let mut tokenizer = Tokenizer::new(StringDataSource::new(css), Location::default());
    let mut count = 0;
    while !tokenizer.next_token().is_eof() {
        count += 1;
    }
    count
}

fn criterion_benchmark(c: &mut Criterion) {
    // Criterion can report inconsistent results from run to run in some cases.  We attempt to
    // minimize that in this setup.
    // https://stackoverflow.com/a/74136347/61048
    let mut group = c.benchmark_group("tokenization");
    group.significance_level(0.1).sample_size(500);

    // Read the stylesheet outside of the closure to avoid issues with file io
    let css = std::fs::read_to_string("tests/fixtures/stylesheets/sample.css").unwrap();

    group.bench_function("sample stylesheet", |b| b.iter(|| tokenize(black_box(&css))));

    group.bench_function("parse and serialize", |b| {
        b.iter(|| {
            let (stylesheet, _) = parse_stylesheet(black_box(&css), ParserConfig::default());
            stylesheet.to_css_string(StringifyOptions::minified())
        })
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
