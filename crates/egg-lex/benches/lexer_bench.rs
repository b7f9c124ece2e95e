//! Lexer benchmarks.
//!
//! Run with: `cargo bench --package egg-lex`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use egg_lex::{Lexer, LexerKind};
use egg_util::Handler;

fn lexer_item_count(source: &str) -> usize {
    let handler = Handler::new();
    let mut lexer = Lexer::new(source, &handler);
    let mut count = 0;
    loop {
        let item = lexer.next();
        if item.kind == LexerKind::EndOfFile {
            break;
        }
        count += 1;
    }
    count
}

fn bench_lexer_keywords(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    let source = "int x = 42; int add(int a, int b) { return a + b; }";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("simple_declaration", |b| {
        b.iter(|| lexer_item_count(black_box("int x = 42;")))
    });

    group.bench_function("function_with_body", |b| {
        b.iter(|| lexer_item_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_complex");

    let source = r#"
        int fibonacci(int n) {
            if (n <= 1) {
                return n;
            }
            return fibonacci(n - 1) + fibonacci(n - 2);
        }

        type Point {
            int x;
            int y;
            int magnitude() {
                return x * x + y * y;
            }
        }

        var p = { x: 1, y: 2 };
        print(string(p.x) + "," + string(p.y));
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("complex_source", |b| {
        b.iter(|| lexer_item_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_strings");

    group.bench_function("short_string", |b| {
        b.iter(|| lexer_item_count(black_box("string s = \"hello\";")))
    });

    group.bench_function("long_string", |b| {
        let source = "string s = \"This is a longer string that contains some text for benchmarking purposes.\";";
        b.iter(|| lexer_item_count(black_box(source)))
    });

    group.bench_function("multiline_backquoted", |b| {
        let source = "string s = `line one\nline two\nline three with a ``backtick``.`;";
        b.iter(|| lexer_item_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_numbers(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_numbers");

    group.bench_function("integer", |b| {
        b.iter(|| lexer_item_count(black_box("int x = 123456;")))
    });

    group.bench_function("float", |b| {
        b.iter(|| lexer_item_count(black_box("float x = 3.14159;")))
    });

    group.bench_function("hex", |b| {
        b.iter(|| lexer_item_count(black_box("int x = 0xDEADBEEF;")))
    });

    group.finish();
}

fn bench_lexer_identifiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_identifiers");

    group.bench_function("short_ident", |b| {
        b.iter(|| lexer_item_count(black_box("int x = 42;")))
    });

    group.bench_function("long_ident", |b| {
        b.iter(|| lexer_item_count(black_box("int very_long_variable_name = 42;")))
    });

    group.bench_function("many_idents", |b| {
        b.iter(|| {
            lexer_item_count(black_box(
                "int a = 1; int b = 2; int c = 3; int d = 4; int e = 5;",
            ))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_lexer_keywords,
    bench_lexer_complex,
    bench_lexer_strings,
    bench_lexer_numbers,
    bench_lexer_identifiers
);
criterion_main!(benches);
