use criterion::{criterion_group, criterion_main, Criterion};
use pseudoc::{
    lexer::{self, SUGGESTED_TOKENS_CAPACITY},
    token_stream::TokenStream,
};
use std::hint::black_box;

static INPUT: &str = include_str!("../../demos/big.alg");

fn lex_reused(input: &str, tokens: &mut TokenStream) {
    tokens.clear();
    lexer::lex(input, tokens);
    black_box(tokens.len());
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut tokens = TokenStream::with_capacity(SUGGESTED_TOKENS_CAPACITY * 16);

    c.bench_function("lex in new", |b| {
        b.iter(|| black_box(lexer::lex_in_new(black_box(INPUT))));
    });
    c.bench_function("lex reused", |b| {
        b.iter(|| lex_reused(black_box(INPUT), &mut tokens));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
