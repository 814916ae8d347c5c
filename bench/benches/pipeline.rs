use criterion::{criterion_group, criterion_main, Criterion};
use pseudoc::{
    codegen::{self, Options},
    lexer::lex_in_new,
    parser::parse_program,
    Transpiler,
};
use std::hint::black_box;

static INPUT: &str = include_str!("../../demos/big.alg");

fn criterion_benchmark(c: &mut Criterion) {
    let mut transpiler = Transpiler::new();
    c.bench_function("transpile", |b| {
        b.iter(|| {
            let code = transpiler.transpile(black_box(INPUT)).unwrap();
            black_box(code);
        });
    });

    let mut tokens = lex_in_new(INPUT);
    let program = parse_program(&mut tokens).unwrap();
    let options = Options::default();
    c.bench_function("codegen", |b| {
        b.iter(|| black_box(codegen::generate(black_box(&program), &options)));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
