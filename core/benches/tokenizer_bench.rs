use criterion::{criterion_group, criterion_main, Criterion};
use docquery_core::tokenizer::Analyzer;

fn bench_analyze(c: &mut Criterion) {
    let analyzer = Analyzer::default();
    let text = "The quick brown fox jumps over the lazy dog while running through fields. ".repeat(250);
    c.bench_function("analyze_long_text", |b| b.iter(|| analyzer.analyze(&text)));
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);
