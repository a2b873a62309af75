use criterion::{criterion_group, criterion_main, Criterion};
use termlink_core::tokenizer::{extract_multitokens, tokenize};

fn bench_extract(c: &mut Criterion) {
    let text = "Gaussian distribution central moments of a random variable \
                probability theory and stochastic processes "
        .repeat(200);
    c.bench_function("tokenize_extract", |b| {
        b.iter(|| {
            let words = tokenize(&text);
            extract_multitokens(&words, 4)
        })
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
