#![allow(clippy::unwrap_used)]

use criterion::{criterion_group, criterion_main, Criterion};
use sanecss::prelude::*;
use std::hint::black_box;

fn values(css: &str) -> ComponentValueList {
    Parser::from_str(css, ParserConfig::default()).parse_component_value_list()
}

fn criterion_benchmark(c: &mut Criterion) {
    // Criterion can report inconsistent results from run to run in some cases.  We attempt to
    // minimize that in this setup.
    // https://stackoverflow.com/a/74136347/61048
    let mut group = c.benchmark_group("matching");
    group.significance_level(0.1).sample_size(500);

    let factory = MatcherFactory::new();

    let lengths = factory.length_percentage().hash(1, usize::MAX);
    let list = values(&vec!["1px"; 50].join(", "));
    group.bench_function("comma separated lengths", |b| {
        b.iter(|| lengths.find_match(black_box(&list), None))
    });

    // Every subset in every order, the worst case for an unordered group
    let group_of = |words: &[&str]| {
        Matcher::some_of(words.iter().map(|w| Matcher::keyword(w)).collect()).unwrap()
    };
    let unordered = group_of(&["a", "b", "c", "d", "e", "f"]);
    let list = values("f e d c b a");
    group.bench_function("unordered group", |b| {
        b.iter(|| unordered.find_match(black_box(&list), None))
    });

    let ranges = factory.urange().hash(1, usize::MAX);
    let list = values("U+0000-00FF, U+0131, U+0152-0153, U+02??, U+1e-20, u+10????");
    group.bench_function("unicode ranges", |b| {
        b.iter(|| ranges.find_match(black_box(&list), None))
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
